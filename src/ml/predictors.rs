//! Heuristic vote producers
//!
//! Each predictor looks at the round history (and the streak context
//! derived from it) and votes for the next round's category, or abstains.
//! Trend, ShortPattern, MeanDeviation and RecentSwitch share the streak
//! regime rule in [`StreakContext::regime_vote`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::streak::{count_of, count_switches, outcomes, tail, StreakContext};
use crate::types::{outcome_label, Category, HistoryEntry};

/// A predictor's vote. `None` means the predictor abstains.
pub type Vote = Option<Category>;

/// Predictors whose votes are recorded and re-weighted by accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    Trend,
    ShortPattern,
    MeanDeviation,
    RecentSwitch,
    BridgeBreak,
}

impl PredictorKind {
    pub const ALL: [PredictorKind; 5] = [
        PredictorKind::Trend,
        PredictorKind::ShortPattern,
        PredictorKind::MeanDeviation,
        PredictorKind::RecentSwitch,
        PredictorKind::BridgeBreak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PredictorKind::Trend => "trend",
            PredictorKind::ShortPattern => "short",
            PredictorKind::MeanDeviation => "mean",
            PredictorKind::RecentSwitch => "switch",
            PredictorKind::BridgeBreak => "bridge",
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Most frequent contiguous pattern of length `len`.
///
/// Ties go to the pattern that appeared first.
fn dominant_pattern(window: &[Option<Category>], len: usize) -> Option<(&[Option<Category>], usize)> {
    if len == 0 || window.len() < len {
        return None;
    }
    let mut counts: Vec<(&[Option<Category>], usize)> = Vec::new();
    for pattern in window.windows(len) {
        match counts.iter_mut().find(|(p, _)| *p == pattern) {
            Some((_, count)) => *count += 1,
            None => counts.push((pattern, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best, candidate| match best {
            Some((_, best_count)) if best_count >= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Vote from a recurring pattern: Big when the pattern's tail differs from
/// the latest round, Small otherwise.
fn pattern_vote(pattern: &[Option<Category>], window: &[Option<Category>]) -> Category {
    if pattern.last() != window.last() {
        Category::Big
    } else {
        Category::Small
    }
}

/// Big after a Small round, Small otherwise
fn against_latest(window: &[Option<Category>]) -> Category {
    match window.last() {
        Some(Some(Category::Small)) => Category::Big,
        _ => Category::Small,
    }
}

/// Weighted recency trend with 4-round pattern search
pub fn trend(history: &[HistoryEntry], ctx: &StreakContext) -> Vote {
    if let Some(vote) = ctx.regime_vote(3) {
        return Some(vote);
    }

    let last15 = outcomes(tail(history, 15));
    if last15.is_empty() {
        return None;
    }

    let (mut big_weight, mut small_weight) = (0.0_f64, 0.0_f64);
    for (i, outcome) in last15.iter().enumerate() {
        let weight = 1.3_f64.powi(i as i32);
        match outcome {
            Some(Category::Big) => big_weight += weight,
            Some(Category::Small) => small_weight += weight,
            None => {}
        }
    }
    let total_weight = big_weight + small_weight;

    let last10 = tail(last15.as_slice(), 10);
    if let Some((pattern, count)) = dominant_pattern(last10, 4) {
        if count >= 3 {
            return Some(pattern_vote(pattern, last10));
        }
    }
    if total_weight > 0.0 && (big_weight - small_weight).abs() / total_weight >= 0.25 {
        return Some(if big_weight > small_weight {
            Category::Big
        } else {
            Category::Small
        });
    }
    Some(against_latest(&last15))
}

/// Two-round pattern over the last 8 rounds
pub fn short_pattern(history: &[HistoryEntry], ctx: &StreakContext) -> Vote {
    if let Some(vote) = ctx.regime_vote(2) {
        return Some(vote);
    }

    let last8 = outcomes(tail(history, 8));
    if last8.is_empty() {
        return None;
    }
    if let Some((pattern, count)) = dominant_pattern(&last8, 2) {
        if count >= 2 {
            return Some(pattern_vote(pattern, &last8));
        }
    }
    Some(against_latest(&last8))
}

/// Reversion toward balance over the last 12 rounds
pub fn mean_deviation(history: &[HistoryEntry], ctx: &StreakContext) -> Vote {
    if let Some(vote) = ctx.regime_vote(2) {
        return Some(vote);
    }

    let last12 = outcomes(tail(history, 12));
    if last12.is_empty() {
        return None;
    }
    // Unclassified rounds count on the Small side.
    let big = count_of(&last12, Category::Big);
    let small = last12.len() - big;
    let deviation = big.abs_diff(small) as f64 / last12.len() as f64;

    if deviation < 0.2 {
        return Some(against_latest(&last12));
    }
    Some(if small > big { Category::Big } else { Category::Small })
}

/// Bet against the latest round when the last 10 rounds are choppy
pub fn recent_switch(history: &[HistoryEntry], ctx: &StreakContext) -> Vote {
    if let Some(vote) = ctx.regime_vote(2) {
        return Some(vote);
    }

    let last10 = outcomes(tail(history, 10));
    if last10.is_empty() {
        return None;
    }
    // Choppy (>= 4 switches) and calm windows currently vote the same way.
    let switches = count_switches(&last10);
    tracing::trace!(switches, "recent switch fallback");
    Some(against_latest(&last10))
}

/// Outcome of the follow-or-break heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSignal {
    pub vote: Vote,
    /// Streak break probability after adjustment
    pub break_probability: f64,
    pub rationale: String,
}

/// Decide whether to follow or break the current bridge
pub fn bridge_break(history: &[HistoryEntry], ctx: &StreakContext) -> BridgeSignal {
    if history.len() < 5 {
        return BridgeSignal {
            vote: None,
            break_probability: 0.0,
            rationale: "[bridge] not enough rounds to follow or break".to_string(),
        };
    }

    let recent = tail(history, 20);
    let last20 = outcomes(recent);
    let scores: Vec<f64> = recent.iter().map(|entry| f64::from(entry.score)).collect();
    let n = scores.len().max(1) as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let deviation = scores.iter().map(|s| (s - mean).abs()).sum::<f64>() / n;

    let dominant = dominant_pattern(&last20, 2);
    let stable = dominant.filter(|(_, count)| *count >= 3);
    let last5_on_streak = tail(last20.as_slice(), 5).iter().all(|o| *o == ctx.current);

    let label = outcome_label(ctx.current);
    let streak = ctx.length;
    let base = ctx.break_probability;

    let (break_probability, rationale) = if streak >= 3 && deviation < 2.0 && stable.is_none() {
        (
            (base - 0.25).max(0.1),
            format!("[bridge] follow: stable run of {streak} {label}"),
        )
    } else if streak >= 6 {
        (
            (base + 0.3).min(0.95),
            format!("[bridge] break: streak too long ({streak} {label})"),
        )
    } else if streak >= 3 && deviation > 3.5 {
        (
            (base + 0.25).min(0.9),
            format!("[bridge] break: high volatility (score deviation {deviation:.1})"),
        )
    } else if let (Some((pattern, _)), true) = (stable, last5_on_streak) {
        let shape: Vec<&str> = pattern.iter().map(|o| outcome_label(*o)).collect();
        (
            (base + 0.2).min(0.85),
            format!("[bridge] break: repeating pattern {}", shape.join(",")),
        )
    } else {
        (
            (base - 0.2).max(0.1),
            "[bridge] follow: no strong break signal".to_string(),
        )
    };

    let vote = if break_probability > 0.5 {
        ctx.against()
    } else {
        ctx.follow()
    };

    BridgeSignal {
        vote: Some(vote),
        break_probability,
        rationale,
    }
}

/// Vote and explanation from the rule cascade
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    pub category: Category,
    pub rationale: String,
}

impl RuleVerdict {
    fn new(category: Category, rationale: impl Into<String>) -> Self {
        Self {
            category,
            rationale: rationale.into(),
        }
    }
}

/// Hand-written rule cascade; the first matching rule wins
pub fn heuristic_rules(history: &[HistoryEntry], ctx: &StreakContext) -> RuleVerdict {
    use Category::{Big, Small};

    let streak = ctx.length;
    if (2..=4).contains(&streak) {
        return RuleVerdict::new(
            ctx.follow(),
            format!("[rules] follow: short run of {streak} {}", outcome_label(ctx.current)),
        );
    }

    let all = outcomes(history);
    match tail(all.as_slice(), 3) {
        [Some(Big), Some(Small), Some(Big)] => {
            return RuleVerdict::new(Small, "[rules] break: alternating Tài,Xỉu,Tài");
        }
        [Some(Small), Some(Big), Some(Small)] => {
            return RuleVerdict::new(Big, "[rules] break: alternating Xỉu,Tài,Xỉu");
        }
        _ => {}
    }
    match tail(all.as_slice(), 4) {
        [Some(Big), Some(Big), Some(Small), Some(Small)] => {
            return RuleVerdict::new(Big, "[rules] follow: double pattern Tài,Tài,Xỉu,Xỉu");
        }
        [Some(Small), Some(Small), Some(Big), Some(Big)] => {
            return RuleVerdict::new(Small, "[rules] follow: double pattern Xỉu,Xỉu,Tài,Tài");
        }
        _ => {}
    }
    if all.len() >= 7 {
        let last7 = tail(all.as_slice(), 7);
        if last7.iter().all(|o| *o == Some(Small)) {
            return RuleVerdict::new(Big, "[rules] break: Xỉu streak too long (7 rounds)");
        }
        if last7.iter().all(|o| *o == Some(Big)) {
            return RuleVerdict::new(Small, "[rules] break: Tài streak too long (7 rounds)");
        }
    }

    let recent = tail(history, 5);
    let mean_score =
        recent.iter().map(|e| f64::from(e.score)).sum::<f64>() / recent.len().max(1) as f64;
    if mean_score > 11.0 {
        return RuleVerdict::new(Big, format!("[rules] follow: high mean score ({mean_score:.1})"));
    }
    if mean_score < 7.0 {
        return RuleVerdict::new(Small, format!("[rules] follow: low mean score ({mean_score:.1})"));
    }

    let recent = outcomes(recent);
    let big = count_of(&recent, Big);
    let small = count_of(&recent, Small);
    if big > small + 1 {
        return RuleVerdict::new(
            Small,
            format!("[rules] break: Tài dominates ({big}/{})", recent.len()),
        );
    }
    if small > big + 1 {
        return RuleVerdict::new(
            Big,
            format!("[rules] break: Xỉu dominates ({small}/{})", recent.len()),
        );
    }

    if count_of(&all, Big) > count_of(&all, Small) {
        RuleVerdict::new(Small, "[rules] break: Tài ahead overall")
    } else {
        RuleVerdict::new(Big, "[rules] follow: Xỉu ahead or level overall")
    }
}
