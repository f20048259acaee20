pub mod feed;
pub mod filter;
pub mod normalizer;
pub mod providers;
pub mod ranker;
pub mod scoring;
pub mod selector;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod fixtures;

pub use providers::CandidateProvider;
