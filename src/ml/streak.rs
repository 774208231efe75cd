//! Streak and reversal detection
//!
//! Measures how long the current run of identical outcomes is and estimates
//! the probability that the run ("bridge") breaks on the next round.

use crate::types::{Category, HistoryEntry};

/// Rounds inspected for switches and imbalance
pub const BREAK_WINDOW: usize = 15;

/// Streak state at the end of a history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakContext {
    /// Trailing rounds sharing the last round's outcome (0 for empty history)
    pub length: usize,
    /// Outcome of the last round
    pub current: Option<Category>,
    /// Adjacent outcome changes within the last `BREAK_WINDOW` rounds
    pub switches: usize,
    /// |big - small| / window within the last `BREAK_WINDOW` rounds
    pub imbalance: f64,
    pub break_probability: f64,
}

impl StreakContext {
    pub fn detect(history: &[HistoryEntry]) -> Self {
        let Some(last) = history.last() else {
            return Self {
                length: 0,
                current: None,
                switches: 0,
                imbalance: 0.0,
                break_probability: 0.0,
            };
        };

        let current = last.category;
        let length = history
            .iter()
            .rev()
            .take_while(|entry| entry.category == current)
            .count();

        let window = outcomes(tail(history, BREAK_WINDOW));
        let switches = count_switches(&window);
        let big = count_of(&window, Category::Big);
        let small = count_of(&window, Category::Small);
        let imbalance = big.abs_diff(small) as f64 / window.len() as f64;

        Self {
            length,
            current,
            switches,
            imbalance,
            break_probability: break_probability(length, switches, imbalance),
        }
    }

    /// Stay with the current outcome. An unclassified run follows into Small.
    pub fn follow(&self) -> Category {
        match self.current {
            Some(Category::Big) => Category::Big,
            _ => Category::Small,
        }
    }

    /// Bet on the run ending. An unclassified run breaks into Big.
    pub fn against(&self) -> Category {
        match self.current {
            Some(Category::Big) => Category::Small,
            _ => Category::Big,
        }
    }

    /// Shared "follow or break" rule for predictors with a streak regime.
    ///
    /// Returns `None` when the streak is shorter than `threshold`, leaving
    /// the predictor to its own fallback.
    pub fn regime_vote(&self, threshold: usize) -> Option<Category> {
        if self.length < threshold {
            return None;
        }
        if self.break_probability > 0.6 {
            Some(self.against())
        } else {
            Some(self.follow())
        }
    }
}

/// Break probability policy, first matching rule by streak length
pub fn break_probability(streak: usize, switches: usize, imbalance: f64) -> f64 {
    let switches = switches as f64;
    match streak {
        s if s >= 6 => (0.8 + switches / 15.0 + imbalance * 0.3).min(0.95),
        4 | 5 => (0.5 + switches / 12.0 + imbalance * 0.25).min(0.90),
        2 | 3 if switches >= 5.0 => 0.45,
        1 if switches >= 6.0 => 0.30,
        _ => 0.0,
    }
}

/// Last `n` items (or all of them when shorter)
pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

pub fn outcomes(history: &[HistoryEntry]) -> Vec<Option<Category>> {
    history.iter().map(|entry| entry.category).collect()
}

pub fn count_switches(outcomes: &[Option<Category>]) -> usize {
    outcomes.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

pub fn count_of(outcomes: &[Option<Category>], category: Category) -> usize {
    outcomes.iter().filter(|o| **o == Some(category)).count()
}
