//! The crawl frontier
//!
//! This module holds the shared FIFO of URLs waiting to be crawled together
//! with the set of every URL ever queued. Both live behind one lock, so
//! `enqueue` is an atomic insert-if-absent: a URL enters the crawl at most
//! once no matter how many workers discover it at the same moment.

use crate::crawler::registry::WorkerRegistry;
use crate::state::WorkerStatus;
use crate::storage::lock;
use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs waiting to be crawled, oldest first
    queue: VecDeque<CanonicalUrl>,

    /// Every URL ever placed on the queue
    enqueued: HashSet<CanonicalUrl>,
}

/// Shared work queue consumed by the worker pool
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it was queued before
    ///
    /// Returns true if this call placed the URL on the queue.
    pub fn enqueue(&self, url: CanonicalUrl) -> bool {
        {
            let mut state = lock(&self.state);
            if !state.enqueued.insert(url.clone()) {
                return false;
            }
            state.queue.push_back(url);
        }
        self.notify.notify_one();
        true
    }

    /// Waits up to `timeout` for a URL
    ///
    /// Returns None when the timeout elapses with the queue still empty, so
    /// the caller can go and check whether the crawl is over.
    pub async fn dequeue(&self, timeout: Duration) -> Option<CanonicalUrl> {
        self.wait_for_url(timeout, None).await
    }

    /// Waits up to `timeout` for a URL on behalf of worker `worker_id`
    ///
    /// The worker's registry slot flips to PROCESSING under the same lock
    /// that pops the URL. A termination check therefore never sees an empty
    /// queue and an all-WAITING registry while a URL is between the two.
    pub async fn dequeue_for(
        &self,
        registry: &WorkerRegistry,
        worker_id: usize,
        timeout: Duration,
    ) -> Option<CanonicalUrl> {
        self.wait_for_url(timeout, Some((registry, worker_id))).await
    }

    /// Pops a URL without waiting
    pub fn try_dequeue(&self) -> Option<CanonicalUrl> {
        self.pop(None)
    }

    async fn wait_for_url(
        &self,
        timeout: Duration,
        claim: Option<(&WorkerRegistry, usize)>,
    ) -> Option<CanonicalUrl> {
        let deadline = Instant::now() + timeout;

        loop {
            // Register interest before looking at the queue so an enqueue
            // landing between the check and the wait still wakes us
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(url) = self.pop(claim) {
                return Some(url);
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }

    fn pop(&self, claim: Option<(&WorkerRegistry, usize)>) -> Option<CanonicalUrl> {
        let mut state = lock(&self.state);
        let url = state.queue.pop_front()?;
        if let Some((registry, worker_id)) = claim {
            registry.set_status(worker_id, WorkerStatus::Processing);
        }
        Some(url)
    }

    /// Evaluates `check` while holding the frontier lock, if the queue is empty
    ///
    /// Returns false without calling `check` when URLs are waiting.
    pub(crate) fn is_empty_and(&self, check: impl FnOnce() -> bool) -> bool {
        let state = lock(&self.state);
        state.queue.is_empty() && check()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).queue.is_empty()
    }

    /// Returns the number of URLs waiting to be crawled
    pub fn len(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Returns the number of URLs ever queued
    pub fn enqueued_count(&self) -> usize {
        lock(&self.state).enqueued.len()
    }

    /// Returns true if `url` was ever queued
    pub fn was_enqueued(&self, url: &CanonicalUrl) -> bool {
        lock(&self.state).enqueued.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::canonicalize_str;
    use std::sync::Arc;

    fn url(s: &str) -> CanonicalUrl {
        canonicalize_str(s).unwrap()
    }

    #[test]
    fn test_new_frontier() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.len(), 0);
        assert_eq!(frontier.enqueued_count(), 0);
    }

    #[test]
    fn test_enqueue_once() {
        let frontier = Frontier::new();

        assert!(frontier.enqueue(url("http://test.com")));
        assert!(!frontier.enqueue(url("http://test.com")));
        assert!(!frontier.enqueue(url("http://test.com/")));

        assert_eq!(frontier.len(), 1);
        assert!(frontier.was_enqueued(&url("http://test.com")));
    }

    #[test]
    fn test_dequeued_url_is_not_requeued() {
        let frontier = Frontier::new();
        frontier.enqueue(url("http://test.com/a"));

        assert_eq!(frontier.try_dequeue(), Some(url("http://test.com/a")));
        assert!(!frontier.enqueue(url("http://test.com/a")));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let frontier = Frontier::new();
        frontier.enqueue(url("http://test.com/1"));
        frontier.enqueue(url("http://test.com/2"));
        frontier.enqueue(url("http://test.com/3"));

        assert_eq!(frontier.try_dequeue(), Some(url("http://test.com/1")));
        assert_eq!(frontier.try_dequeue(), Some(url("http://test.com/2")));
        assert_eq!(frontier.try_dequeue(), Some(url("http://test.com/3")));
        assert_eq!(frontier.try_dequeue(), None);
    }

    #[tokio::test]
    async fn test_dequeue_times_out_when_empty() {
        let frontier = Frontier::new();
        let started = std::time::Instant::now();

        let result = frontier.dequeue(Duration::from_millis(50)).await;

        assert!(result.is_none());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_dequeue_wakes_on_enqueue() {
        let frontier = Arc::new(Frontier::new());

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue(Duration::from_secs(5)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.enqueue(url("http://test.com/late"));

        let result = waiter.await.unwrap();
        assert_eq!(result, Some(url("http://test.com/late")));
    }

    #[tokio::test]
    async fn test_dequeue_for_marks_worker_processing() {
        let frontier = Frontier::new();
        let registry = WorkerRegistry::new(2);
        frontier.enqueue(url("http://test.com"));

        let result = frontier
            .dequeue_for(&registry, 1, Duration::from_millis(10))
            .await;

        assert!(result.is_some());
        assert_eq!(registry.status(1), WorkerStatus::Processing);
        assert_eq!(registry.status(0), WorkerStatus::Waiting);
    }

    #[tokio::test]
    async fn test_dequeue_for_timeout_leaves_status_alone() {
        let frontier = Frontier::new();
        let registry = WorkerRegistry::new(1);

        let result = frontier
            .dequeue_for(&registry, 0, Duration::from_millis(10))
            .await;

        assert!(result.is_none());
        assert_eq!(registry.status(0), WorkerStatus::Waiting);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_enqueue_single_winner() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for _ in 0..32 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                frontier.enqueue(url("http://test.com/contended"))
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_is_empty_and_skips_check_when_queued() {
        let frontier = Frontier::new();
        frontier.enqueue(url("http://test.com"));

        let mut called = false;
        assert!(!frontier.is_empty_and(|| {
            called = true;
            true
        }));
        assert!(!called);
    }
}
