//! Conversions from upstream numeric fields to the canonical scales
//!
//! Rating precedence is fixed and must stay in this order:
//! 1. curated average rating
//! 2. `score * 5` derived from the relevance score
//! 3. null
//!
//! Counts never become null; zero is the correct default for an unknown count.

pub const MAX_RATING: f64 = 5.0;

fn unit_score(score: Option<f64>) -> Option<f64> {
    score.filter(|s| s.is_finite() && (0.0..=1.0).contains(s))
}

/// Relevance score in [0, 1] to an integer in [0, 100]; anything else is 0
pub fn to_recommend_score(score: Option<f64>) -> u8 {
    unit_score(score)
        .map(|s| (s * 100.0).round() as u8)
        .unwrap_or(0)
}

/// Resolves the displayed rating in [0, 5], or `None` when nothing trustworthy exists
pub fn to_rating(curated: Option<f64>, score: Option<f64>) -> Option<f64> {
    if let Some(curated) = curated.filter(|c| c.is_finite()) {
        // `+ 0.0` turns a curated -0.0 into 0.0
        return Some(curated.clamp(0.0, MAX_RATING) + 0.0);
    }
    unit_score(score).map(|s| s * MAX_RATING)
}

/// A count field: negatives clamp to 0, fractions round, absent is 0
pub fn to_count(value: Option<f64>) -> u64 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0).round() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_score_scales_and_rounds() {
        assert_eq!(to_recommend_score(Some(0.9)), 90);
        assert_eq!(to_recommend_score(Some(0.456)), 46);
        assert_eq!(to_recommend_score(Some(0.0)), 0);
        assert_eq!(to_recommend_score(Some(1.0)), 100);
    }

    #[test]
    fn test_recommend_score_rejects_out_of_range() {
        assert_eq!(to_recommend_score(None), 0);
        assert_eq!(to_recommend_score(Some(1.5)), 0);
        assert_eq!(to_recommend_score(Some(-0.1)), 0);
        assert_eq!(to_recommend_score(Some(f64::NAN)), 0);
    }

    #[test]
    fn test_curated_rating_wins_over_score() {
        assert_eq!(to_rating(Some(4.2), Some(0.5)), Some(4.2));
    }

    #[test]
    fn test_rating_derived_from_score() {
        assert_eq!(to_rating(None, Some(0.8)), Some(4.0));
    }

    #[test]
    fn test_rating_absent_is_none() {
        assert_eq!(to_rating(None, None), None);
        assert_eq!(to_rating(None, Some(3.0)), None);
    }

    #[test]
    fn test_curated_zero_is_kept() {
        assert_eq!(to_rating(Some(0.0), Some(0.9)), Some(0.0));
    }

    #[test]
    fn test_curated_negative_zero_becomes_zero() {
        let rating = to_rating(Some(-0.0), None).unwrap();
        assert!(rating.is_sign_positive());
    }

    #[test]
    fn test_curated_rating_is_clamped() {
        assert_eq!(to_rating(Some(7.5), None), Some(5.0));
        assert_eq!(to_rating(Some(-1.0), None), Some(0.0));
    }

    #[test]
    fn test_counts_default_to_zero() {
        assert_eq!(to_count(None), 0);
        assert_eq!(to_count(Some(-4.0)), 0);
        assert_eq!(to_count(Some(12.6)), 13);
        assert_eq!(to_count(Some(250.0)), 250);
    }
}
