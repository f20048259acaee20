use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

// ============================================================================
// Upstream (untrusted) types
// ============================================================================

/// One attraction entry exactly as the upstream provider returned it
///
/// No schema is assumed: field names differ between upstream revisions, numbers may
/// arrive as strings, and whole entries may not even be objects. The normalizer is
/// the only reader of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttraction(pub Value);

impl From<Value> for RawAttraction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl RawAttraction {
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Values present under `keys`, in key order
    pub fn values<'a, 'k>(&'a self, keys: &'k [&'k str]) -> impl Iterator<Item = &'a Value> + 'k
    where
        'a: 'k,
    {
        let object = self.as_object();
        keys.iter()
            .filter_map(move |key| object.and_then(|object| object.get(*key)))
    }

    /// First value among `keys`, in key order, that `f` accepts
    ///
    /// A value `f` rejects is skipped, so a garbage alias falls through to the next.
    pub fn first_map<'a, T>(
        &'a self,
        keys: &[&str],
        f: impl FnMut(&'a Value) -> Option<T>,
    ) -> Option<T> {
        self.values(keys).find_map(f)
    }

    /// First value among `keys` that is usable as a finite number
    pub fn first_number(&self, keys: &[&str]) -> Option<f64> {
        self.first_map(keys, value_as_f64)
    }

    /// String entries of the first array found among `keys`
    pub fn string_list(&self, keys: &[&str]) -> Vec<String> {
        let Some(object) = self.as_object() else {
            return Vec::new();
        };
        keys.iter()
            .filter_map(|key| object.get(*key))
            .find_map(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reads a JSON number, or a string holding one, as a finite `f64`
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

// ============================================================================
// Canonical types
// ============================================================================

/// A normalized attraction, independent of upstream field naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAttraction {
    pub id: String,
    pub name: String,
    pub category_id: u8,
    pub category_name: String,
    /// Both coordinates are present or neither is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// 0..=100
    pub recommend_score: u8,
    /// 0.0..=5.0, or null when nothing trustworthy is known
    pub rating: Option<f64>,
    pub rating_count: u64,
    pub heat_score: u64,
    pub tags: Vec<String>,
    pub history: String,
    pub brief_intro: String,
    pub reason: String,
    pub address: String,
    pub business_hours: Option<String>,
    pub per_capita_consumption: f64,
    pub image_url: Option<String>,
    /// Historical period the site belongs to, passed through from upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_end: Option<i64>,
}

/// Ordering criterion for the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankCriterion {
    #[default]
    Recommend,
    Heat,
    Rating,
}

impl Display for RankCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankCriterion::Recommend => write!(f, "recommend"),
            RankCriterion::Heat => write!(f, "heat"),
            RankCriterion::Rating => write!(f, "rating"),
        }
    }
}

/// Caller-owned context for one feed request
///
/// Everything that personalizes a request travels here; the ranking core keeps no
/// state of its own between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionQuery {
    pub keyword: Option<String>,
    pub category_id: Option<u8>,
    pub city: Option<String>,
    pub user_id: Option<i64>,
    pub travel_style: Option<String>,
    pub days: Option<u32>,
    pub user_longitude: Option<f64>,
    pub user_latitude: Option<f64>,
    /// ISO-8601 timestamp of the planned visit, forwarded verbatim
    pub visit_time: Option<String>,
}

impl AttractionQuery {
    /// The keyword with surrounding whitespace removed, or `None` when blank
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// One materialized page of the feed, in the shape the presentation layer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<CanonicalAttraction>,
    /// Candidates after filtering, before slicing
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    /// `ceil(total / page_size)`, never below 1
    pub total_pages: usize,
}

/// A domain category as listed by the categories endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub id: u8,
    pub name: String,
    pub backend_label: String,
    pub synthetic_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_map_skips_rejected_values() {
        let raw = RawAttraction::from(json!({ "id": null, "attractionId": 42 }));
        assert_eq!(
            raw.first_map(&["id", "attractionId"], Value::as_i64),
            Some(42)
        );
    }

    #[test]
    fn test_first_on_non_object_is_none() {
        let raw = RawAttraction::from(json!(["not", "an", "object"]));
        assert_eq!(raw.first_map(&["id"], |v| Some(v.clone())), None);
        assert!(raw.string_list(&["tags"]).is_empty());
    }

    #[test]
    fn test_first_number_accepts_numeric_strings() {
        let raw = RawAttraction::from(json!({ "averageRating": "4.5" }));
        assert_eq!(raw.first_number(&["averageRating"]), Some(4.5));
    }

    #[test]
    fn test_first_number_skips_garbage_alias() {
        let raw = RawAttraction::from(json!({ "averageRating": "n/a", "rating": 3 }));
        assert_eq!(raw.first_number(&["averageRating", "rating"]), Some(3.0));
    }

    #[test]
    fn test_string_list_drops_non_strings() {
        let raw = RawAttraction::from(json!({ "tags": ["红色", 7, null, "抗战"] }));
        assert_eq!(raw.string_list(&["tags"]), vec!["红色", "抗战"]);
    }

    #[test]
    fn test_rank_criterion_serialization() {
        assert_eq!(
            serde_json::to_string(&RankCriterion::Heat).unwrap(),
            "\"heat\""
        );
        let parsed: RankCriterion = serde_json::from_str("\"rating\"").unwrap();
        assert_eq!(parsed, RankCriterion::Rating);
        assert_eq!(RankCriterion::default(), RankCriterion::Recommend);
    }

    #[test]
    fn test_effective_keyword_ignores_blank() {
        let query = AttractionQuery {
            keyword: Some("   ".to_string()),
            ..AttractionQuery::default()
        };
        assert_eq!(query.effective_keyword(), None);

        let query = AttractionQuery {
            keyword: Some(" 井冈山 ".to_string()),
            ..AttractionQuery::default()
        };
        assert_eq!(query.effective_keyword(), Some("井冈山"));
    }

    #[test]
    fn test_feed_page_serializes_camel_case() {
        let page = FeedPage {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 12,
            total_pages: 1,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["pageSize"], 12);
        assert_eq!(value["totalPages"], 1);
    }
}
