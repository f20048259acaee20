//! Category taxonomy shared by every caller that needs to interpret a category value
//!
//! Three vocabularies meet here:
//! - domain ids 1-9 with display names (what the UI shows and filters on)
//! - the five coarse English labels the upstream recommendation API emits
//! - `Category-<n>` synthetic keys the upstream emits when it has no label for an id
//!
//! The label table is authoritative in both directions and is deliberately not
//! symmetric: `Memorial Hall` resolves to 3 even though ids 1, 3 and 8 are all sent
//! upstream as `Memorial Hall`. These strings are a wire contract with the upstream
//! provider and must not be edited.
use serde_json::Value;

use crate::models::CategoryInfo;

pub const OTHER_ID: u8 = 9;
pub const OTHER_NAME: &str = "其他";

const SYNTHETIC_PREFIX: &str = "Category-";

struct DomainCategory {
    id: u8,
    name: &'static str,
    backend_label: &'static str,
}

const DOMAIN_CATEGORIES: [DomainCategory; 9] = [
    DomainCategory { id: 1, name: "纪念馆", backend_label: "Memorial Hall" },
    DomainCategory { id: 2, name: "烈士陵园", backend_label: "Martyr Cemetery" },
    DomainCategory { id: 3, name: "会议旧址", backend_label: "Memorial Hall" },
    DomainCategory { id: 4, name: "战役遗址", backend_label: "Revolutionary Site" },
    DomainCategory { id: 5, name: "名人故居", backend_label: "Celebrity Residence" },
    DomainCategory { id: 6, name: "革命根据地", backend_label: "Revolutionary Site" },
    DomainCategory { id: 7, name: "纪念碑塔", backend_label: "Martyr Cemetery" },
    DomainCategory { id: 8, name: "博物馆", backend_label: "Memorial Hall" },
    DomainCategory { id: 9, name: "其他纪念地", backend_label: "Patriotic Education Base" },
];

/// Upstream label -> domain id
const BACKEND_LABELS: [(&str, u8); 5] = [
    ("Revolutionary Site", 1),
    ("Celebrity Residence", 5),
    ("Memorial Hall", 3),
    ("Martyr Cemetery", 2),
    ("Patriotic Education Base", 9),
];

/// A category value after resolution; always carries a usable display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCategory {
    pub id: u8,
    pub name: &'static str,
}

impl ResolvedCategory {
    pub const OTHER: Self = Self {
        id: OTHER_ID,
        name: OTHER_NAME,
    };
}

fn domain(id: u8) -> Option<&'static DomainCategory> {
    DOMAIN_CATEGORIES.iter().find(|category| category.id == id)
}

/// Resolves the first usable value among the category aliases of a record. Never fails.
///
/// A value that names no domain category is skipped, and the sentinel is returned
/// only when nothing resolves. A single value can be passed as `Some(&value)`.
pub fn resolve<'a>(values: impl IntoIterator<Item = &'a Value>) -> ResolvedCategory {
    values
        .into_iter()
        .find_map(try_resolve)
        .unwrap_or(ResolvedCategory::OTHER)
}

/// Resolves one category value, `None` when it names no domain category
pub fn try_resolve(raw: &Value) -> Option<ResolvedCategory> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .and_then(try_resolve_id),
        Value::String(s) => try_resolve_str(s),
        _ => None,
    }
}

/// A domain id; anything outside 1-9 is unresolvable
fn try_resolve_id(id: i64) -> Option<ResolvedCategory> {
    u8::try_from(id)
        .ok()
        .and_then(domain)
        .map(|category| ResolvedCategory {
            id: category.id,
            name: category.name,
        })
}

/// A synthetic key, a backend label, a display name or a numeric string
fn try_resolve_str(raw: &str) -> Option<ResolvedCategory> {
    let raw = raw.trim();

    if let Some(suffix) = raw.strip_prefix(SYNTHETIC_PREFIX) {
        return suffix.trim().parse::<i64>().ok().and_then(try_resolve_id);
    }

    if let Some((_, id)) = BACKEND_LABELS.iter().find(|(label, _)| *label == raw) {
        return try_resolve_id(i64::from(*id));
    }

    if let Some(category) = DOMAIN_CATEGORIES.iter().find(|c| c.name == raw) {
        return Some(ResolvedCategory {
            id: category.id,
            name: category.name,
        });
    }

    let resolved = raw.parse::<i64>().ok().and_then(try_resolve_id);
    if resolved.is_none() {
        tracing::debug!(category = %raw, "Unresolvable category value");
    }
    resolved
}

pub fn is_domain_id(id: i64) -> bool {
    u8::try_from(id).ok().and_then(domain).is_some()
}

/// All nine domain categories in id order
pub fn all() -> Vec<CategoryInfo> {
    DOMAIN_CATEGORIES
        .iter()
        .map(|category| CategoryInfo {
            id: category.id,
            name: category.name.to_string(),
            backend_label: category.backend_label.to_string(),
            synthetic_key: format!("{}{}", SYNTHETIC_PREFIX, category.id),
        })
        .collect()
}
