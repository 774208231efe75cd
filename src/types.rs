//! Core types shared across the service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a round's score falls outside the classifiable range
pub const UNCLASSIFIED_LABEL: &str = "Không xác định";

/// Outcome category of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// High sum, 11-17 ("Tài")
    Big,
    /// Low sum, 4-10 ("Xỉu")
    Small,
}

impl Category {
    /// Classify a three-dice total. Scores outside 4..=17 are unclassified.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            4..=10 => Some(Category::Small),
            11..=17 => Some(Category::Big),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Category::Big => Category::Small,
            Category::Small => Category::Big,
        }
    }

    /// Display label used on the public API
    pub fn label(self) -> &'static str {
        match self {
            Category::Big => "Tài",
            Category::Small => "Xỉu",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a possibly unclassified outcome
pub fn outcome_label(outcome: Option<Category>) -> &'static str {
    outcome.map(Category::label).unwrap_or(UNCLASSIFIED_LABEL)
}

/// One finished round, ordered oldest to newest within a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Session identifier, e.g. "#0123456"
    pub session: String,
    /// Sum of the three dice
    pub score: u8,
    pub dice: [u8; 3],
    /// Derived from `score`; `None` when out of range
    pub category: Option<Category>,
}

impl HistoryEntry {
    pub fn new(session: impl Into<String>, score: u8, dice: [u8; 3]) -> Self {
        Self {
            session: session.into(),
            score,
            dice,
            category: Category::from_score(score),
        }
    }
}

/// Identifier of the round after `session`: first run of digits + 1, zero
/// padded to seven digits, keeping the non-numeric prefix. Anything after the
/// digits is dropped.
pub fn next_session_id(session: &str) -> Option<String> {
    let digits_at = session.find(|c: char| c.is_ascii_digit())?;
    let (prefix, rest) = session.split_at(digits_at);
    let digits_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let number: u64 = rest[..digits_len].parse().ok()?;
    Some(format!("{}{:07}", prefix, number.checked_add(1)?))
}
