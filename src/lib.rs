//! Sicbo Big/Small Predictor
//!
//! Predicts the next round of a three-dice Big/Small game from recent
//! round history with an adaptively weighted heuristic ensemble.
//!
//! ## Architecture
//!
//! ```text
//! Upstream API → HistorySource → StreakContext → Predictors → VoteStore
//!                                                     ↓            ↓
//!                                           EnsembleCombiner ← PerformanceTracker
//!                                                     ↓
//!                                              HTTP API (/sicbo)
//! ```

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod ml;
pub mod server;
pub mod types;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
mod types_tests;
