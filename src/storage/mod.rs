//! Storage module for the shared crawl state
//!
//! This module holds the structures every worker writes to:
//! - `ResultStore`: the sitemap and asset index, read only after the crawl ends
//! - `InvalidUrlSet`: links whose probe failed, so they are never probed twice
//!
//! Nothing here outlives a run; there is no persistence between crawls.

mod invalid;
mod results;

pub use invalid::InvalidUrlSet;
pub use results::{AssetIndex, PageRecord, ResultStore, Sitemap};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if another worker panicked while holding it
///
/// Every critical section in the crawl is a single insert or pop, so a
/// poisoned lock never guards a half-applied update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
