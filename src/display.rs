//! Display-only values for the public API
//!
//! These are cosmetic: they are drawn from fresh randomness and carry no
//! information from the engine beyond the predicted category.

use rand::Rng;

use crate::types::Category;

/// Three plausible totals for the predicted side, e.g. "12,15,11"
pub fn score_range<R: Rng + ?Sized>(category: Category, rng: &mut R) -> String {
    let range: std::ops::RangeInclusive<u8> = match category {
        Category::Big => 11..=16,
        Category::Small => 5..=10,
    };
    (0..3)
        .map(|_| rng.random_range(range.clone()).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Percentage between 50% and 100%, e.g. "73%"
pub fn confidence_percent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let value: f64 = rng.random_range(0.5..1.0);
    format!("{:.0}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_score_range_stays_on_predicted_side() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            for (category, low, high) in [(Category::Big, 11, 16), (Category::Small, 5, 10)] {
                let range = score_range(category, &mut rng);
                let values: Vec<u8> = range.split(',').map(|v| v.parse().unwrap()).collect();
                assert_eq!(values.len(), 3);
                assert!(values.iter().all(|v| (low..=high).contains(v)), "{range}");
            }
        }
    }

    #[test]
    fn test_confidence_percent_format() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let text = confidence_percent(&mut rng);
            let number: u32 = text.trim_end_matches('%').parse().unwrap();
            assert!(text.ends_with('%'));
            assert!((50..=100).contains(&number), "{text}");
        }
    }
}
