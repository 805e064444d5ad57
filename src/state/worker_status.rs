use std::fmt;

/// The status a worker publishes in the worker registry
///
/// The crawl is finished once the frontier is empty and every worker reads
/// `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WorkerStatus {
    /// Idle, looking for work on the frontier
    #[default]
    Waiting = 0,

    /// Holding a URL: fetching it, probing its links or recording results
    Processing = 1,
}

impl WorkerStatus {
    /// Encodes the status for storage in an atomic registry slot
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a registry slot value
    ///
    /// Returns None if the value doesn't match any known status.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Waiting),
            1 => Some(Self::Processing),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
