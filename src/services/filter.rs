use crate::models::{AttractionQuery, CanonicalAttraction};

/// Keyword and category predicates, ANDed together
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Predicates<'a> {
    pub keyword: Option<&'a str>,
    pub category_id: Option<u8>,
}

impl<'a> Predicates<'a> {
    pub fn from_query(query: &'a AttractionQuery) -> Self {
        Self {
            keyword: query.effective_keyword(),
            category_id: query.category_id,
        }
    }

    pub fn matches(&self, record: &CanonicalAttraction) -> bool {
        self.matches_category(record) && self.matches_keyword(record)
    }

    fn matches_category(&self, record: &CanonicalAttraction) -> bool {
        self.category_id
            .map_or(true, |category_id| record.category_id == category_id)
    }

    /// Case-sensitive substring match on name, history, intro or any tag
    fn matches_keyword(&self, record: &CanonicalAttraction) -> bool {
        let Some(keyword) = self.keyword.filter(|k| !k.is_empty()) else {
            return true;
        };

        record.name.contains(keyword)
            || record.history.contains(keyword)
            || record.brief_intro.contains(keyword)
            || record.tags.iter().any(|tag| tag.contains(keyword))
    }
}

/// Keeps the records matching every supplied predicate, preserving order
pub fn filter(records: Vec<CanonicalAttraction>, predicates: &Predicates) -> Vec<CanonicalAttraction> {
    records
        .into_iter()
        .filter(|record| predicates.matches(record))
        .collect()
}
