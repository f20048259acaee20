use crate::{
    error::AppResult,
    models::{AttractionQuery, RawAttraction},
};

pub mod recommend_api;

pub use recommend_api::RecommendApiProvider;

/// Source of raw attraction candidates
///
/// Implementations own transport, caching and their own error mapping. They hand
/// back upstream entries untouched; interpreting them is the normalizer's job, so a
/// provider never drops or repairs individual records.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Fetch the candidate set for one feed request
    ///
    /// May return an empty list. Transport or protocol failures are errors; the
    /// pipeline never runs on a partial response.
    async fn fetch_candidates(&self, query: &AttractionQuery) -> AppResult<Vec<RawAttraction>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
