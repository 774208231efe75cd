//! Rolling predictor accuracy
//!
//! Every prediction cycle records each predictor's vote against the session
//! it was cast on. Once later rounds are known, a predictor is scored by how
//! often its vote for session `s` matched the realized outcome of `s + 1`.

use std::collections::HashMap;

use super::predictors::{PredictorKind, Vote};
use crate::types::HistoryEntry;

/// Votes cast per predictor, keyed by session id
#[derive(Debug, Default)]
pub struct VoteStore {
    votes: HashMap<PredictorKind, HashMap<String, Vote>>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote the first time a session is evaluated.
    ///
    /// Returns `false` if a vote for this predictor and session already exists;
    /// the stored vote is kept.
    pub fn record(&mut self, kind: PredictorKind, session: &str, vote: Vote) -> bool {
        let sessions = self.votes.entry(kind).or_default();
        if sessions.contains_key(session) {
            return false;
        }
        sessions.insert(session.to_string(), vote);
        true
    }

    /// Vote cast for a session; `None` if the predictor abstained or never voted
    pub fn get(&self, kind: PredictorKind, session: &str) -> Vote {
        self.votes
            .get(&kind)
            .and_then(|sessions| sessions.get(session))
            .copied()
            .flatten()
    }

    /// Total number of recorded votes across predictors
    pub fn len(&self) -> usize {
        self.votes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores predictors in [0, 2] from their recent hit rate
#[derive(Debug, Clone, Copy)]
pub struct PerformanceTracker {
    lookback: usize,
}

impl PerformanceTracker {
    pub const NEUTRAL: f64 = 1.0;

    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }

    /// 1.0 means coin-flip accuracy, 2.0 every vote right, 0.0 every vote
    /// wrong. A missing vote counts as wrong.
    pub fn score(&self, store: &VoteStore, kind: PredictorKind, history: &[HistoryEntry]) -> f64 {
        if history.len() < 2 {
            return Self::NEUTRAL;
        }
        let window = self.lookback.min(history.len() - 1);
        if window == 0 {
            return Self::NEUTRAL;
        }

        let correct = history
            .windows(2)
            .rev()
            .take(window)
            .filter(|pair| {
                let vote = store.get(kind, &pair[0].session);
                vote.is_some() && vote == pair[1].category
            })
            .count();

        let half = window as f64 / 2.0;
        (1.0 + (correct as f64 - half) / half).clamp(0.0, 2.0)
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new(10)
    }
}
