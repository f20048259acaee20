use serde_json::{json, Value};

use redseeker_api::{
    models::{AttractionQuery, FeedPage, RankCriterion, RawAttraction},
    services::{
        feed::build_page,
        selector::{PageRequest, SelectionStrategy},
    },
};

const CRITERIA: [RankCriterion; 3] = [
    RankCriterion::Recommend,
    RankCriterion::Heat,
    RankCriterion::Rating,
];

/// Deterministic pseudo-random candidate sets with deliberate ties and duplicates
///
/// Ratings come out missing (no score, no curated value), derived from the score,
/// or curated.
fn generate(seed: u64, len: usize) -> Vec<RawAttraction> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };

    (0..len)
        .map(|_| {
            let id = next() % (len as u64 + 1);
            let mut entry: Value = json!({
                "id": id.to_string(),
                "name": format!("site {}", id),
                "heatScore": next() % 4,
                "category": (next() % 9) + 1,
            });
            match next() % 3 {
                0 => {}
                1 => entry["score"] = json!((next() % 5) as f64 / 4.0),
                _ => {
                    entry["score"] = json!((next() % 5) as f64 / 4.0);
                    entry["averageRating"] = json!((next() % 11) as f64 / 2.0);
                }
            }
            RawAttraction::from(entry)
        })
        .collect()
}

fn page(
    raws: &[RawAttraction],
    page: i64,
    size: i64,
    criterion: RankCriterion,
    strategy: SelectionStrategy,
) -> FeedPage {
    build_page(
        raws,
        &AttractionQuery::default(),
        PageRequest::new(page, size, 1_000).unwrap(),
        criterion,
        strategy,
    )
}

fn ids(page: &FeedPage) -> Vec<String> {
    page.items.iter().map(|item| item.id.clone()).collect()
}

#[test]
fn test_top_k_matches_full_sort() {
    for seed in 0..20 {
        let raws = generate(seed, 60);
        for criterion in CRITERIA {
            for (p, size) in [(1, 1), (1, 5), (2, 7), (3, 10), (1, 100)] {
                let sorted = page(&raws, p, size, criterion, SelectionStrategy::FullSort);
                let heap = page(&raws, p, size, criterion, SelectionStrategy::TopK);
                assert_eq!(sorted, heap, "seed {} criterion {} page {}", seed, criterion, p);
            }
        }
    }
}

#[test]
fn test_missing_ratings_rank_last_on_every_strategy() {
    for seed in 0..10 {
        let raws = generate(seed, 60);
        let total = page(&raws, 1, 1_000, RankCriterion::Rating, SelectionStrategy::FullSort).total;
        // One short of the whole set, so the heap has to evict
        let size = (total as i64 - 1).max(1);

        for strategy in [SelectionStrategy::FullSort, SelectionStrategy::TopK] {
            let result = page(&raws, 1, size, RankCriterion::Rating, strategy);
            let first_missing = result
                .items
                .iter()
                .position(|item| item.rating.is_none())
                .unwrap_or(result.items.len());
            assert!(result.items[first_missing..]
                .iter()
                .all(|item| item.rating.is_none()));
            assert!(result.items[..first_missing]
                .windows(2)
                .all(|pair| pair[0].rating >= pair[1].rating));
        }
    }
}

#[test]
fn test_top_k_matches_full_sort_for_every_page_size() {
    let raws = generate(5, 70);
    for criterion in CRITERIA {
        for size in 1..=9 {
            let sorted = page(&raws, 2, size, criterion, SelectionStrategy::FullSort);
            let heap = page(&raws, 2, size, criterion, SelectionStrategy::TopK);
            assert_eq!(sorted, heap, "criterion {} size {}", criterion, size);
        }
    }
}

#[test]
fn test_pages_cover_every_candidate_once() {
    for seed in 0..10 {
        let raws = generate(seed, 45);
        let first = page(&raws, 1, 4, RankCriterion::Recommend, SelectionStrategy::Auto);
        let full = page(&raws, 1, 1_000, RankCriterion::Recommend, SelectionStrategy::Auto);

        let mut stitched = Vec::new();
        for p in 1..=first.total_pages {
            let current = page(
                &raws,
                p as i64,
                4,
                RankCriterion::Recommend,
                SelectionStrategy::Auto,
            );
            assert_eq!(current.total, first.total);
            assert!(current.items.len() <= 4);
            stitched.extend(ids(&current));
        }

        assert_eq!(stitched, ids(&full));
        assert_eq!(stitched.len(), first.total);
    }
}

#[test]
fn test_total_pages_formula() {
    let raws = generate(7, 30);
    for size in 1..=12 {
        let result = page(&raws, 1, size, RankCriterion::Heat, SelectionStrategy::Auto);
        let expected = result.total.div_ceil(size as usize).max(1);
        assert_eq!(result.total_pages, expected);
    }
}

#[test]
fn test_repeated_requests_are_identical() {
    let raws = generate(11, 50);
    for criterion in CRITERIA {
        let first = page(&raws, 2, 6, criterion, SelectionStrategy::Auto);
        let second = page(&raws, 2, 6, criterion, SelectionStrategy::Auto);
        assert_eq!(first, second);
    }
}

#[test]
fn test_ids_are_unique_after_dedup() {
    let raws = generate(3, 80);
    let result = page(&raws, 1, 1_000, RankCriterion::Rating, SelectionStrategy::Auto);
    let mut seen = ids(&result);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), result.items.len());
}
