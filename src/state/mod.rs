//! State module for tracking crawl workers
//!
//! # Components
//!
//! - `WorkerStatus`: the WAITING/PROCESSING flag each worker publishes in the registry
//! - `WorkerPhase`: the step of the crawl loop a worker is in

mod worker_phase;
mod worker_status;

// Re-export main types
pub use worker_phase::WorkerPhase;
pub use worker_status::WorkerStatus;
