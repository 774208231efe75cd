//! Ensemble prediction engine
//!
//! Provides the Big/Small prediction for the next round with:
//! - Streak and break-probability detection
//! - Heuristic vote producers (trend, patterns, reversion, follow-or-break, rules)
//! - Rolling per-predictor accuracy scoring
//! - Weighted ensemble combination

pub mod ensemble;
pub mod performance;
pub mod predictors;
pub mod streak;


pub use ensemble::{combine, Ballot, EnsembleEngine, EnsembleResult, INSUFFICIENT_HISTORY_RATIONALE};
pub use performance::{PerformanceTracker, VoteStore};
pub use predictors::{BridgeSignal, PredictorKind, RuleVerdict, Vote};
pub use streak::StreakContext;
