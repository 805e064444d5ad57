//! In-memory `Fetcher` for engine tests

use crate::crawler::fetcher::{FetchResponse, Fetcher, ProbeResponse};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum ProbeReply {
    Response(ProbeResponse),
    Unreachable,
}

/// Serves canned pages and probe answers keyed by exact URL
///
/// Unknown pages fetch as 404. Unknown probes answer 200 `text/html`.
#[derive(Debug)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, FetchResponse>,
    probes: HashMap<String, ProbeReply>,
    probe_calls: Mutex<HashMap<String, usize>>,
    fetch_calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            probes: HashMap::new(),
            probe_calls: Mutex::new(HashMap::new()),
            fetch_calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                status: 200,
                body: html.to_string(),
            },
        );
        self
    }

    pub fn fetch_status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                status,
                body: String::new(),
            },
        );
        self
    }

    pub fn probe(mut self, url: &str, status: u16, content_type: Option<&str>) -> Self {
        self.probes.insert(
            url.to_string(),
            ProbeReply::Response(ProbeResponse {
                status,
                content_type: content_type.map(str::to_string),
            }),
        );
        self
    }

    pub fn probe_unreachable(mut self, url: &str) -> Self {
        self.probes.insert(url.to_string(), ProbeReply::Unreachable);
        self
    }

    pub fn probe_count(&self, url: &str) -> usize {
        self.probe_calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_probes(&self) -> usize {
        self.probe_calls.lock().unwrap().values().sum()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetch_calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
        *self.fetch_calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        Ok(self.pages.get(url).cloned().unwrap_or(FetchResponse {
            status: 404,
            body: String::new(),
        }))
    }

    async fn probe(&self, url: &str) -> FetchResult<ProbeResponse> {
        *self.probe_calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        match self.probes.get(url) {
            Some(ProbeReply::Response(response)) => Ok(response.clone()),
            Some(ProbeReply::Unreachable) => Err(FetchError::Transport {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }),
            None => Ok(ProbeResponse {
                status: 200,
                content_type: Some("text/html".to_string()),
            }),
        }
    }
}
