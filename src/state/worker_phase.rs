//! Worker phase definitions for the crawl loop
//!
//! A worker cycles IDLE → FETCHING → EXTRACTING → VALIDATING_LINKS →
//! RECORDING → IDLE until the crawl is complete, then moves to TERMINATED.
//! A failed fetch short-cuts FETCHING straight back to IDLE.
use std::fmt;

/// Represents the step of the crawl loop a worker is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerPhase {
    /// Waiting on the frontier
    #[default]
    Idle,

    /// Downloading the page body
    Fetching,

    /// Pulling links and resources out of the page
    Extracting,

    /// Canonicalizing and probing each link
    ValidatingLinks,

    /// Writing the sitemap and asset entries for the page
    Recording,

    /// Left the pool for good
    Terminated,
}

impl WorkerPhase {
    /// Returns true if the worker may move from this phase to `next`
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Fetching)
                | (Self::Idle, Self::Terminated)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Idle)
                | (Self::Extracting, Self::ValidatingLinks)
                | (Self::ValidatingLinks, Self::Recording)
                | (Self::Recording, Self::Idle)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::ValidatingLinks => "validating_links",
            Self::Recording => "recording",
            Self::Terminated => "terminated",
        }
    }

    /// Returns all possible worker phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Fetching,
            Self::Extracting,
            Self::ValidatingLinks,
            Self::Recording,
            Self::Terminated,
        ]
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
