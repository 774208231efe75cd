//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;

    #[test]
    fn test_category_from_score_bounds() {
        assert_eq!(Category::from_score(3), None);
        assert_eq!(Category::from_score(4), Some(Category::Small));
        assert_eq!(Category::from_score(10), Some(Category::Small));
        assert_eq!(Category::from_score(11), Some(Category::Big));
        assert_eq!(Category::from_score(17), Some(Category::Big));
        assert_eq!(Category::from_score(18), None);
    }

    #[test]
    fn test_category_opposite() {
        assert_eq!(Category::Big.opposite(), Category::Small);
        assert_eq!(Category::Small.opposite(), Category::Big);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Big.label(), "Tài");
        assert_eq!(Category::Small.to_string(), "Xỉu");
        assert_eq!(outcome_label(None), UNCLASSIFIED_LABEL);
        assert_eq!(outcome_label(Some(Category::Big)), "Tài");
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(serde_json::to_string(&Category::Big).unwrap(), "\"BIG\"");
        let small: Category = serde_json::from_str("\"SMALL\"").unwrap();
        assert_eq!(small, Category::Small);
    }

    #[test]
    fn test_history_entry_derives_category() {
        let entry = HistoryEntry::new("#0000001", 12, [3, 4, 5]);
        assert_eq!(entry.category, Some(Category::Big));

        let entry = HistoryEntry::new("#0000002", 2, [1, 1, 0]);
        assert_eq!(entry.category, None);
    }

    #[test]
    fn test_next_session_id() {
        assert_eq!(next_session_id("#0123456").as_deref(), Some("#0123457"));
        assert_eq!(next_session_id("#0999999").as_deref(), Some("#1000000"));
        assert_eq!(next_session_id("#12345678").as_deref(), Some("#12345679"));
        assert_eq!(next_session_id("42").as_deref(), Some("0000043"));
    }

    #[test]
    fn test_next_session_id_ignores_trailing_garbage() {
        assert_eq!(next_session_id("#12a").as_deref(), Some("#0000013"));
        assert_eq!(next_session_id("#0000099-r").as_deref(), Some("#0000100"));
    }

    #[test]
    fn test_next_session_id_unparseable() {
        assert_eq!(next_session_id("#"), None);
        assert_eq!(next_session_id("#abc"), None);
        assert_eq!(next_session_id(""), None);
    }
}
