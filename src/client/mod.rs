//! Round-history acquisition
//!
//! The engine consumes an oldest-first history; this module owns fetching it
//! from the upstream results API and translating every failure into
//! [`SicboError::DataUnavailable`](crate::error::SicboError::DataUnavailable).

pub mod history;

#[cfg(test)]
mod tests;

pub use history::{parse_history, UpstreamClient, UpstreamResponse};

use crate::error::Result;
use crate::types::HistoryEntry;
use async_trait::async_trait;

/// Source of finished rounds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch recent rounds, ordered oldest to newest
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
