use std::sync::Arc;

use crate::{
    config::Config,
    services::{providers::CandidateProvider, selector::SelectionStrategy},
};

/// Shared application state
///
/// Immutable after startup. Each request builds its own candidate set and heap,
/// so nothing here needs a lock.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CandidateProvider>,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub selection_strategy: SelectionStrategy,
}

impl AppState {
    pub fn new(provider: Arc<dyn CandidateProvider>, config: &Config) -> Self {
        Self {
            provider,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            selection_strategy: config.selection_strategy,
        }
    }
}
