use std::time::Instant;

use crate::{
    error::AppResult,
    models::{AttractionQuery, FeedPage, RankCriterion, RawAttraction},
    services::{
        filter::{self, Predicates},
        normalizer, ranker,
        providers::CandidateProvider,
        selector::{self, PageRequest, SelectionStrategy},
    },
};

/// Produces one page of the attraction feed
///
/// Fetches the candidate set from the provider, then runs the synchronous
/// pipeline:
/// 1. normalize (malformed records dropped)
/// 2. dedup by id, last seen wins
/// 3. keyword / category filter
/// 4. rank and select the requested page
///
/// Upstream failures propagate unchanged; the pipeline never sees a partial set.
pub async fn get_page(
    provider: &dyn CandidateProvider,
    query: &AttractionQuery,
    request: PageRequest,
    criterion: RankCriterion,
    strategy: SelectionStrategy,
) -> AppResult<FeedPage> {
    let start = Instant::now();

    let raws = provider.fetch_candidates(query).await?;
    let page = build_page(&raws, query, request, criterion, strategy);

    tracing::info!(
        provider = provider.name(),
        fetched = raws.len(),
        total = page.total,
        page = page.page,
        returned = page.items.len(),
        criterion = %criterion,
        processing_time_ms = start.elapsed().as_millis(),
        "Feed page built"
    );

    Ok(page)
}

/// The pure part of [`get_page`]: raw candidates in, one page out
pub fn build_page(
    raws: &[RawAttraction],
    query: &AttractionQuery,
    request: PageRequest,
    criterion: RankCriterion,
    strategy: SelectionStrategy,
) -> FeedPage {
    let records = normalizer::dedup_last_seen(normalizer::normalize_all(raws));
    let records = filter::filter(records, &Predicates::from_query(query));
    let selection =
        selector::select_page(ranker::candidates(records), request, criterion, strategy);

    FeedPage {
        items: selection.items,
        total: selection.total,
        page: request.page(),
        page_size: request.page_size(),
        total_pages: selection.total_pages,
    }
}
