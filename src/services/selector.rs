//! Page materialization: full sort or bounded top-K selection
//!
//! The bounded strategy keeps a fixed-capacity min-heap whose root is the
//! lowest-ranked element retained so far. Every later candidate only has to beat
//! the root to get in, so selecting the best K of N costs O(N log K) instead of
//! O(N log N). Both strategies use the same total-order comparator (criterion key,
//! then upstream position), which makes their pages identical.
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::{
    error::{AppError, AppResult},
    models::{CanonicalAttraction, RankCriterion},
    services::ranker::{self, Candidate},
};

/// How a page gets materialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Top-K whenever it can skip part of the candidate set, full sort otherwise
    #[default]
    Auto,
    FullSort,
    TopK,
}

/// Validated pagination parameters (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl PageRequest {
    /// Rejects non-positive values; clamps `page_size` to `max_page_size`
    pub fn new(page: i64, page_size: i64, max_page_size: usize) -> AppResult<Self> {
        if page <= 0 {
            return Err(AppError::InvalidInput(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }
        if page_size <= 0 {
            return Err(AppError::InvalidInput(format!(
                "pageSize must be a positive integer, got {}",
                page_size
            )));
        }

        let page = usize::try_from(page)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| AppError::InvalidInput("page is out of range".to_string()))?;
        let requested = usize::try_from(page_size).unwrap_or(usize::MAX);
        let page_size = NonZeroUsize::new(requested.min(max_page_size.max(1)))
            .ok_or_else(|| AppError::Internal("page size clamped to zero".to_string()))?;

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page.get()
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// Number of ranked items needed to fill this page
    pub fn end(&self) -> usize {
        self.page().saturating_mul(self.page_size())
    }
}

/// Result of selecting one page
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub items: Vec<CanonicalAttraction>,
    pub total: usize,
    pub total_pages: usize,
}

/// `ceil(total / page_size)`, at least 1
pub fn total_pages(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get()).max(1)
}

/// Ranks the candidates and returns the requested page
pub fn select_page(
    candidates: Vec<Candidate>,
    request: PageRequest,
    criterion: RankCriterion,
    strategy: SelectionStrategy,
) -> Selection {
    let total = candidates.len();
    let needed = request.end();

    let use_heap = match strategy {
        SelectionStrategy::Auto => needed < total,
        SelectionStrategy::TopK => true,
        SelectionStrategy::FullSort => false,
    };

    tracing::debug!(
        total,
        page = request.page(),
        page_size = request.page_size(),
        criterion = %criterion,
        top_k = use_heap,
        "Selecting page"
    );

    let ranked = if use_heap {
        top_k(candidates, needed, criterion)
    } else {
        full_sort(candidates, criterion)
    };

    let items = ranked
        .into_iter()
        .skip(request.offset())
        .take(request.page_size())
        .map(|candidate| candidate.attraction)
        .collect();

    Selection {
        items,
        total,
        total_pages: total_pages(total, request.page_size),
    }
}

pub fn full_sort(mut candidates: Vec<Candidate>, criterion: RankCriterion) -> Vec<Candidate> {
    ranker::sort_candidates(&mut candidates, criterion);
    candidates
}

/// The `k` best candidates in rank order
pub fn top_k(candidates: Vec<Candidate>, k: usize, criterion: RankCriterion) -> Vec<Candidate> {
    let Some(capacity) = NonZeroUsize::new(k) else {
        return Vec::new();
    };
    if candidates.len() <= k {
        return full_sort(candidates, criterion);
    }

    let mut heap = BoundedMinHeap::new(capacity, |a: &Candidate, b: &Candidate| {
        ranker::ranks_higher(criterion, a, b)
    });

    for candidate in candidates {
        heap.offer(candidate);
    }

    full_sort(heap.into_vec(), criterion)
}

/// Fixed-capacity heap whose root is the lowest-ranked retained element
///
/// Invariant: no parent ranks higher than either of its children.
pub struct BoundedMinHeap<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    items: Vec<T>,
    capacity: NonZeroUsize,
    ranks_higher: F,
}

impl<T, F> BoundedMinHeap<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// `ranks_higher(a, b)` must be a strict ordering: false for equal elements
    pub fn new(capacity: NonZeroUsize, ranks_higher: F) -> Self {
        Self {
            items: Vec::with_capacity(capacity.get()),
            capacity,
            ranks_higher,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// The element that the next candidate has to beat
    pub fn lowest(&self) -> Option<&T> {
        self.items.first()
    }

    /// Inserts while below capacity; afterwards replaces the root only if `item`
    /// ranks strictly higher. Returns whether `item` was retained.
    pub fn offer(&mut self, item: T) -> bool {
        if self.len() < self.capacity.get() {
            self.items.push(item);
            self.sift_up(self.len() - 1);
            return true;
        }

        let beats_root = self
            .lowest()
            .is_some_and(|lowest| (self.ranks_higher)(&item, lowest));
        if beats_root {
            self.items[0] = item;
            self.sift_down(0);
            true
        } else {
            false
        }
    }

    /// Retained elements in heap (not rank) order
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.ranks_higher)(&self.items[parent], &self.items[index]) {
                self.items.swap(parent, index);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut lowest = index;

            if left < len && (self.ranks_higher)(&self.items[lowest], &self.items[left]) {
                lowest = left;
            }
            if right < len && (self.ranks_higher)(&self.items[lowest], &self.items[right]) {
                lowest = right;
            }
            if lowest == index {
                break;
            }

            self.items.swap(index, lowest);
            index = lowest;
        }
    }

    #[cfg(test)]
    fn holds_invariant(&self) -> bool {
        (1..self.items.len()).all(|child| {
            let parent = (child - 1) / 2;
            !(self.ranks_higher)(&self.items[parent], &self.items[child])
        })
    }
}
