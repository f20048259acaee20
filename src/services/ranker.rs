use std::cmp::Ordering;

use crate::models::{CanonicalAttraction, RankCriterion};

/// A canonical record tagged with its upstream position
///
/// The position is the secondary sort key. With it the ranking comparator is a
/// total order, so every selection strategy produces the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub position: usize,
    pub attraction: CanonicalAttraction,
}

/// Tags records with their upstream positions
pub fn candidates(records: Vec<CanonicalAttraction>) -> Vec<Candidate> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, attraction)| Candidate {
            position,
            attraction,
        })
        .collect()
}

/// `Less` means `a` is ranked above `b`
pub fn compare(criterion: RankCriterion, a: &Candidate, b: &Candidate) -> Ordering {
    compare_key(criterion, &a.attraction, &b.attraction).then(a.position.cmp(&b.position))
}

/// Criterion key only, descending; equal keys compare `Equal`
fn compare_key(
    criterion: RankCriterion,
    a: &CanonicalAttraction,
    b: &CanonicalAttraction,
) -> Ordering {
    match criterion {
        RankCriterion::Recommend => b.recommend_score.cmp(&a.recommend_score),
        RankCriterion::Heat => b.heat_score.cmp(&a.heat_score),
        RankCriterion::Rating => compare_rating(b.rating, a.rating),
    }
}

/// Missing ratings sort below every number
///
/// `-0.0` and `0.0` are the same rating.
fn compare_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

pub fn ranks_higher(criterion: RankCriterion, a: &Candidate, b: &Candidate) -> bool {
    compare(criterion, a, b) == Ordering::Less
}

/// Sorts candidates in place under the total order
pub fn sort_candidates(candidates: &mut [Candidate], criterion: RankCriterion) {
    candidates.sort_by(|a, b| compare(criterion, a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{attraction, ids, scored};

    fn rank(records: Vec<CanonicalAttraction>, criterion: RankCriterion) -> Vec<CanonicalAttraction> {
        let mut tagged = candidates(records);
        sort_candidates(&mut tagged, criterion);
        tagged.into_iter().map(|c| c.attraction).collect()
    }

    fn heated(id: &str, heat_score: u64) -> CanonicalAttraction {
        CanonicalAttraction {
            heat_score,
            ..attraction(id)
        }
    }

    fn rated(id: &str, rating: Option<f64>) -> CanonicalAttraction {
        CanonicalAttraction {
            rating,
            ..attraction(id)
        }
    }

    #[test]
    fn test_recommend_descending_with_stable_ties() {
        let ranked = rank(
            vec![scored("a", 40), scored("b", 90), scored("c", 40), scored("d", 90)],
            RankCriterion::Recommend,
        );
        assert_eq!(ids(&ranked), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_heat_descending() {
        let ranked = rank(
            vec![heated("a", 10), heated("b", 300), heated("c", 25)],
            RankCriterion::Heat,
        );
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rating_null_sinks_to_bottom() {
        let ranked = rank(
            vec![
                rated("none-1", None),
                rated("low", Some(0.0)),
                rated("high", Some(4.8)),
                rated("none-2", None),
                rated("mid", Some(3.5)),
            ],
            RankCriterion::Rating,
        );
        assert_eq!(ids(&ranked), vec!["high", "mid", "low", "none-1", "none-2"]);
    }

    #[test]
    fn test_rank_is_repeatable() {
        let records = vec![scored("x", 50), scored("y", 50), scored("z", 70)];
        let first = rank(records.clone(), RankCriterion::Recommend);
        let second = rank(records, RankCriterion::Recommend);
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_breaks_ties_by_position() {
        let tagged = candidates(vec![scored("a", 50), scored("b", 50)]);
        assert!(ranks_higher(RankCriterion::Recommend, &tagged[0], &tagged[1]));
        assert!(!ranks_higher(RankCriterion::Recommend, &tagged[1], &tagged[0]));
        assert!(!ranks_higher(RankCriterion::Recommend, &tagged[0], &tagged[0]));
    }

    #[test]
    fn test_sort_candidates_keeps_positions() {
        let mut tagged = candidates(vec![scored("a", 10), scored("b", 80), scored("c", 80)]);
        sort_candidates(&mut tagged, RankCriterion::Recommend);
        let positions: Vec<usize> = tagged.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 0]);
    }

    #[test]
    fn test_signed_zero_ratings_tie_in_upstream_order() {
        let ranked = rank(
            vec![rated("a", Some(-0.0)), rated("b", Some(0.0)), rated("c", Some(-0.0))],
            RankCriterion::Rating,
        );
        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
    }
}
