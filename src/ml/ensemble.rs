//! Ensemble prediction
//!
//! Combines the heuristic predictors into one Big/Small call:
//! - Base weight per predictor, shifted by streak regime
//! - Scaled by each predictor's rolling accuracy score
//! - Damped in choppy or overlong runs ("bad pattern")
//! - Bonus for the follow-or-break signal
//!
//! The engine owns the vote store used for accuracy scoring, so each
//! engine instance is fully isolated.

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::performance::{PerformanceTracker, VoteStore};
use super::predictors::{self, BridgeSignal, PredictorKind, RuleVerdict, Vote};
use super::streak::StreakContext;
use crate::config::EngineConfig;
use crate::types::{Category, HistoryEntry};

pub const INSUFFICIENT_HISTORY_RATIONALE: &str = "Not enough history, random guess";

/// Final prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub category: Category,
    pub rationale: String,
    /// Share of the winning side's accumulated weight (0-1)
    pub confidence: f64,
}

/// Every predictor's output for one history
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    pub trend: Vote,
    pub short: Vote,
    pub mean: Vote,
    pub switch: Vote,
    pub bridge: BridgeSignal,
    pub rules: RuleVerdict,
}

impl Ballot {
    pub fn cast(history: &[HistoryEntry], ctx: &StreakContext) -> Self {
        Self {
            trend: predictors::trend(history, ctx),
            short: predictors::short_pattern(history, ctx),
            mean: predictors::mean_deviation(history, ctx),
            switch: predictors::recent_switch(history, ctx),
            bridge: predictors::bridge_break(history, ctx),
            rules: predictors::heuristic_rules(history, ctx),
        }
    }

    /// Vote of a recorded predictor
    pub fn vote(&self, kind: PredictorKind) -> Vote {
        match kind {
            PredictorKind::Trend => self.trend,
            PredictorKind::ShortPattern => self.short,
            PredictorKind::MeanDeviation => self.mean,
            PredictorKind::RecentSwitch => self.switch,
            PredictorKind::BridgeBreak => self.bridge.vote,
        }
    }
}

/// Base weight before performance scaling
fn base_weight(kind: PredictorKind, streak: usize) -> f64 {
    match kind {
        PredictorKind::Trend if streak >= 3 => 0.15,
        PredictorKind::Trend => 0.20,
        PredictorKind::ShortPattern if streak >= 2 => 0.20,
        PredictorKind::ShortPattern => 0.15,
        PredictorKind::MeanDeviation => 0.10,
        PredictorKind::RecentSwitch => 0.10,
        PredictorKind::BridgeBreak if streak >= 3 => 0.35,
        PredictorKind::BridgeBreak => 0.30,
    }
}

/// Rule cascade weight; not scaled by performance
fn rules_weight(streak: usize) -> f64 {
    if streak >= 2 {
        0.30
    } else {
        0.25
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    big: f64,
    small: f64,
}

impl Tally {
    fn add(&mut self, category: Category, weight: f64) {
        match category {
            Category::Big => self.big += weight,
            Category::Small => self.small += weight,
        }
    }

    fn scale(&mut self, factor: f64) {
        self.big *= factor;
        self.small *= factor;
    }
}

/// Merge a ballot into a final category and confidence.
///
/// Scores missing from `scores` count as neutral (1.0).
pub fn combine(
    ballot: &Ballot,
    scores: &HashMap<PredictorKind, f64>,
    ctx: &StreakContext,
) -> EnsembleResult {
    let streak = ctx.length;
    let mut tally = Tally::default();

    for kind in PredictorKind::ALL {
        let score = scores
            .get(&kind)
            .copied()
            .unwrap_or(PerformanceTracker::NEUTRAL);
        if let Some(category) = ballot.vote(kind) {
            tally.add(category, base_weight(kind, streak) * score);
        }
    }
    tally.add(ballot.rules.category, rules_weight(streak));

    let bad_pattern = ctx.switches >= 6 || streak >= 7;
    if bad_pattern {
        tally.scale(0.5);
    }

    // An abstaining bridge receives its bonus on the Small side.
    let bridge_side = ballot.bridge.vote.unwrap_or(Category::Small);
    if ballot.bridge.break_probability > 0.5 {
        tally.add(bridge_side, 0.4);
    } else if streak >= 3 {
        tally.add(bridge_side, 0.35);
    }

    let category = if tally.big > tally.small {
        Category::Big
    } else {
        Category::Small
    };
    let total = tally.big + tally.small;
    let confidence = if total > 0.0 {
        tally.big.max(tally.small) / total
    } else {
        0.5
    };

    tracing::debug!(
        big = tally.big,
        small = tally.small,
        bad_pattern,
        streak,
        "ensemble tally"
    );

    EnsembleResult {
        category,
        rationale: format!("{} | {}", ballot.rules.rationale, ballot.bridge.rationale),
        confidence,
    }
}

/// Stateful ensemble predictor
pub struct EnsembleEngine {
    config: EngineConfig,
    tracker: PerformanceTracker,
    votes: Mutex<VoteStore>,
}

impl EnsembleEngine {
    pub fn new(config: EngineConfig) -> Self {
        let tracker = PerformanceTracker::new(config.performance_lookback);
        Self {
            config,
            tracker,
            votes: Mutex::new(VoteStore::new()),
        }
    }

    /// Predict the round after the last entry of `history` (oldest first)
    pub fn predict(&self, history: &[HistoryEntry]) -> EnsembleResult {
        self.predict_with_rng(history, &mut rand::rng())
    }

    /// As [`predict`](Self::predict), drawing the short-history guess from `rng`
    pub fn predict_with_rng<R: Rng + ?Sized>(
        &self,
        history: &[HistoryEntry],
        rng: &mut R,
    ) -> EnsembleResult {
        if history.len() < self.config.min_history {
            let category = if rng.random_bool(0.5) {
                Category::Big
            } else {
                Category::Small
            };
            tracing::debug!(rounds = history.len(), %category, "insufficient history");
            return EnsembleResult {
                category,
                rationale: INSUFFICIENT_HISTORY_RATIONALE.to_string(),
                confidence: 0.5,
            };
        }

        let ctx = StreakContext::detect(history);
        let ballot = Ballot::cast(history, &ctx);
        let scores = self.record_and_score(history, &ballot);

        for kind in PredictorKind::ALL {
            tracing::trace!(
                predictor = %kind,
                vote = ?ballot.vote(kind),
                score = scores.get(&kind).copied().unwrap_or_default(),
                "predictor"
            );
        }

        combine(&ballot, &scores, &ctx)
    }

    /// Record this round's votes, then score every predictor. Both steps
    /// hold the store lock.
    fn record_and_score(
        &self,
        history: &[HistoryEntry],
        ballot: &Ballot,
    ) -> HashMap<PredictorKind, f64> {
        let mut votes = self.votes.lock();
        if let Some(last) = history.last() {
            for kind in PredictorKind::ALL {
                votes.record(kind, &last.session, ballot.vote(kind));
            }
        }
        self.score_all(&votes, history)
    }

    fn score_all(&self, votes: &VoteStore, history: &[HistoryEntry]) -> HashMap<PredictorKind, f64> {
        PredictorKind::ALL
            .into_iter()
            .map(|kind| (kind, self.tracker.score(votes, kind, history)))
            .collect()
    }

    /// Accuracy score of every recorded predictor against `history`,
    /// without recording anything
    pub fn performance_scores(&self, history: &[HistoryEntry]) -> HashMap<PredictorKind, f64> {
        self.score_all(&self.votes.lock(), history)
    }

    /// Vote recorded for a predictor and session
    pub fn recorded_vote(&self, kind: PredictorKind, session: &str) -> Vote {
        self.votes.lock().get(kind, session)
    }

    pub fn recorded_votes(&self) -> usize {
        self.votes.lock().len()
    }
}

impl Default for EnsembleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::history_from;

    fn neutral_scores() -> HashMap<PredictorKind, f64> {
        PredictorKind::ALL.into_iter().map(|k| (k, 1.0)).collect()
    }

    #[test]
    fn test_base_weights_by_regime() {
        assert_eq!(base_weight(PredictorKind::Trend, 2), 0.20);
        assert_eq!(base_weight(PredictorKind::Trend, 3), 0.15);
        assert_eq!(base_weight(PredictorKind::ShortPattern, 1), 0.15);
        assert_eq!(base_weight(PredictorKind::ShortPattern, 2), 0.20);
        assert_eq!(base_weight(PredictorKind::BridgeBreak, 2), 0.30);
        assert_eq!(base_weight(PredictorKind::BridgeBreak, 3), 0.35);
        assert_eq!(rules_weight(1), 0.25);
        assert_eq!(rules_weight(2), 0.30);
    }

    #[test]
    fn test_combine_alternating_history_by_hand() {
        // Alternating 15 rounds ending Small: switches = 14, so both sides halve.
        // trend S 0.20, short S 0.15, mean B 0.10, switch B 0.10,
        // bridge S 0.30, rules B 0.25 (rule b: Xỉu,Tài,Xỉu)
        // big = 0.45 / 2, small = 0.65 / 2, no bonus (bridge 0.1, streak 1)
        let history = history_from("SBSBSBSBSBSBSBS");
        let ctx = StreakContext::detect(&history);
        assert_eq!(ctx.switches, 14);

        let ballot = Ballot::cast(&history, &ctx);
        assert_eq!(ballot.trend, Some(Category::Small));
        assert_eq!(ballot.short, Some(Category::Small));
        assert_eq!(ballot.mean, Some(Category::Big));
        assert_eq!(ballot.switch, Some(Category::Big));
        assert_eq!(ballot.bridge.vote, Some(Category::Small));
        assert_eq!(ballot.rules.category, Category::Big);

        let result = combine(&ballot, &neutral_scores(), &ctx);
        assert_eq!(result.category, Category::Small);
        let expected = 0.325 / (0.225 + 0.325);
        assert!((result.confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_combine_scales_by_performance() {
        let history = history_from("SBSBSBSBSBSBSBS");
        let ctx = StreakContext::detect(&history);
        let ballot = Ballot::cast(&history, &ctx);

        let mut scores = neutral_scores();
        scores.insert(PredictorKind::Trend, 0.0);
        scores.insert(PredictorKind::ShortPattern, 0.0);
        scores.insert(PredictorKind::BridgeBreak, 0.0);

        // Only Big voters keep weight
        let result = combine(&ballot, &scores, &ctx);
        assert_eq!(result.category, Category::Big);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_combine_with_abstaining_predictors() {
        let ctx = StreakContext::detect(&[]);
        let ballot = Ballot {
            trend: None,
            short: None,
            mean: None,
            switch: None,
            bridge: BridgeSignal {
                vote: None,
                break_probability: 0.0,
                rationale: String::new(),
            },
            rules: RuleVerdict {
                category: Category::Big,
                rationale: String::new(),
            },
        };
        let mut scores = neutral_scores();
        let result = combine(&ballot, &scores, &ctx);
        assert_eq!(result.category, Category::Big);
        assert_eq!(result.confidence, 1.0);

        scores.clear();
        let tied = Ballot {
            trend: Some(Category::Big),
            mean: Some(Category::Small),
            rules: RuleVerdict {
                category: Category::Small,
                rationale: String::new(),
            },
            ..ballot
        };
        // trend 0.20 Big vs mean 0.10 + rules 0.25 Small
        let result = combine(&tied, &scores, &ctx);
        assert_eq!(result.category, Category::Small);
    }

    #[test]
    fn test_bridge_bonus_applies_on_strong_break() {
        let history = history_from("BBBBBBB");
        let ctx = StreakContext::detect(&history);
        let ballot = Ballot::cast(&history, &ctx);
        assert!(ballot.bridge.break_probability > 0.5);

        let zero: HashMap<PredictorKind, f64> =
            PredictorKind::ALL.into_iter().map(|k| (k, 0.0)).collect();
        let result = combine(&ballot, &zero, &ctx);
        // rules Small 0.30 halved + 0.4 bonus on the bridge's Small vote
        assert_eq!(result.category, Category::Small);
        assert_eq!(result.confidence, 1.0);
        assert!(result.rationale.contains("streak too long"));
    }
}
