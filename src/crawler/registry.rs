//! Worker registry and termination check
//!
//! Each worker owns one slot in a fixed-size array and is the only writer
//! of it. Any worker may read all slots. The crawl is over when the frontier
//! is empty and every slot reads WAITING; there is no separate "done" flag.

use crate::crawler::frontier::Frontier;
use crate::state::WorkerStatus;
use std::sync::atomic::{AtomicU8, Ordering};

/// Status of every worker in the pool, indexed by worker id
#[derive(Debug)]
pub struct WorkerRegistry {
    slots: Box<[AtomicU8]>,
}

impl WorkerRegistry {
    /// Creates a registry for `workers` workers, all WAITING
    pub fn new(workers: usize) -> Self {
        let slots = (0..workers)
            .map(|_| AtomicU8::new(WorkerStatus::Waiting.as_u8()))
            .collect();
        Self { slots }
    }

    /// Returns the number of registered workers
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Publishes the status of worker `worker_id`
    ///
    /// Must only be called by the worker owning the slot (or by the frontier
    /// on its behalf while handing it a URL).
    pub fn set_status(&self, worker_id: usize, status: WorkerStatus) {
        self.slots[worker_id].store(status.as_u8(), Ordering::SeqCst);
    }

    pub fn status(&self, worker_id: usize) -> WorkerStatus {
        WorkerStatus::from_u8(self.slots[worker_id].load(Ordering::SeqCst))
            .unwrap_or(WorkerStatus::Processing)
    }

    /// Returns true if no worker holds a URL
    pub fn all_waiting(&self) -> bool {
        (0..self.slots.len()).all(|id| self.status(id) == WorkerStatus::Waiting)
    }

    /// Returns the number of workers holding a URL
    pub fn busy_count(&self) -> usize {
        (0..self.slots.len())
            .filter(|&id| self.status(id) == WorkerStatus::Processing)
            .count()
    }

    /// Returns every worker's status, in worker id order
    pub fn snapshot(&self) -> Vec<WorkerStatus> {
        (0..self.slots.len()).map(|id| self.status(id)).collect()
    }

    /// Decides whether the crawl is finished
    ///
    /// True when the frontier is empty and every worker is WAITING. The
    /// registry is read under the frontier lock, and workers become
    /// PROCESSING under that same lock when they take a URL, so a true
    /// answer can't race with a URL in flight. Idle workers still re-ask
    /// after a short backoff rather than trusting one false answer forever.
    pub fn crawl_complete(&self, frontier: &Frontier) -> bool {
        frontier.is_empty_and(|| self.all_waiting())
    }
}
