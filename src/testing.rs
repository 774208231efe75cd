//! Test fixtures for building round histories

use crate::types::HistoryEntry;

/// Split a total into three plausible dice faces
pub fn dice_for(score: u8) -> [u8; 3] {
    let first = score.saturating_sub(2).clamp(1, 6);
    let rest = score.saturating_sub(first);
    let second = rest.saturating_sub(1).clamp(1, 6);
    [first, second, rest.saturating_sub(second)]
}

/// Session ids "#0000001", "#0000002", ...
pub fn session_id(index: usize) -> String {
    format!("#{:07}", index + 1)
}

/// History from scores, oldest first
pub fn history_with_scores(scores: &[u8]) -> Vec<HistoryEntry> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| HistoryEntry::new(session_id(i), score, dice_for(score)))
        .collect()
}

/// History from a pattern string: `B` = Big (14), `S` = Small (7),
/// anything else = unclassified (3).
pub fn history_from(pattern: &str) -> Vec<HistoryEntry> {
    let scores: Vec<u8> = pattern
        .chars()
        .map(|c| match c {
            'B' => 14,
            'S' => 7,
            _ => 3,
        })
        .collect();
    history_with_scores(&scores)
}
