use serde_json::Value;
use std::collections::HashMap;

use crate::{
    models::{CanonicalAttraction, RawAttraction},
    services::{scoring, taxonomy},
};

const ID_KEYS: &[&str] = &["id", "attractionId", "attraction_id"];
const NAME_KEYS: &[&str] = &["name", "attractionName", "attraction_name"];
const CATEGORY_KEYS: &[&str] = &["category", "categoryId", "category_id"];
const SCORE_KEYS: &[&str] = &["score"];
const CURATED_RATING_KEYS: &[&str] = &["averageRating", "average_rating", "rating"];
const RATING_COUNT_KEYS: &[&str] = &["totalRatings", "total_ratings", "ratingCount"];
const HEAT_KEYS: &[&str] = &["heatScore", "heat_score"];
const LONGITUDE_KEYS: &[&str] = &["longitude", "lng", "lon"];
const LATITUDE_KEYS: &[&str] = &["latitude", "lat"];

/// Converts one upstream record into a canonical attraction
///
/// Returns `None` when the record has no usable identity (or is not an object at
/// all). Identity is never fabricated: a made-up id would collide in dedup and
/// selection downstream.
pub fn normalize(raw: &RawAttraction) -> Option<CanonicalAttraction> {
    raw.as_object()?;
    let id = identity(raw)?;

    let category = taxonomy::resolve(raw.values(CATEGORY_KEYS));
    let score = raw.first_number(SCORE_KEYS);
    let (longitude, latitude) = coordinates(raw);

    Some(CanonicalAttraction {
        id,
        name: text(raw, NAME_KEYS),
        category_id: category.id,
        category_name: category.name.to_string(),
        longitude,
        latitude,
        recommend_score: scoring::to_recommend_score(score),
        rating: scoring::to_rating(raw.first_number(CURATED_RATING_KEYS), score),
        rating_count: scoring::to_count(raw.first_number(RATING_COUNT_KEYS)),
        heat_score: scoring::to_count(raw.first_number(HEAT_KEYS)),
        tags: raw.string_list(&["tags"]),
        history: text(raw, &["history"]),
        brief_intro: text(raw, &["brief_intro", "briefIntro", "history"]),
        reason: text(raw, &["reason"]),
        address: text(raw, &["address"]),
        business_hours: optional_text(raw, &["business_hours", "businessHours"]),
        per_capita_consumption: raw
            .first_number(&["per_capita_consumption", "perCapitaConsumption"])
            .map(|v| v.max(0.0))
            .unwrap_or(0.0),
        image_url: optional_text(raw, &["image_url", "imageUrl"]),
        stage_name: optional_text(raw, &["stageName", "stage_name"]),
        stage_start: stage_year(raw, &["stageStart", "stage_start"]),
        stage_end: stage_year(raw, &["stageEnd", "stage_end"]),
    })
}

/// Normalizes a batch, dropping records that cannot be normalized
///
/// One bad record never aborts the batch. Relative order is preserved.
pub fn normalize_all(raws: &[RawAttraction]) -> Vec<CanonicalAttraction> {
    let normalized: Vec<CanonicalAttraction> = raws.iter().filter_map(normalize).collect();

    let dropped = raws.len() - normalized.len();
    if dropped > 0 {
        tracing::debug!(
            received = raws.len(),
            dropped,
            "Dropped malformed upstream records"
        );
    }

    normalized
}

/// Removes duplicate identities, keeping the last-seen record for each id
///
/// The survivor keeps its own (later) position, so the upstream order of the
/// remaining records is unchanged.
pub fn dedup_last_seen(records: Vec<CanonicalAttraction>) -> Vec<CanonicalAttraction> {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        last_index.insert(record.id.as_str(), index);
    }

    if last_index.len() == records.len() {
        return records;
    }

    let keep: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(index, record)| last_index.get(record.id.as_str()) == Some(&index))
        .collect();

    tracing::debug!(
        duplicates = records.len() - last_index.len(),
        "Collapsed duplicate upstream identities"
    );

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}

fn identity(raw: &RawAttraction) -> Option<String> {
    raw.first_map(ID_KEYS, identity_value)
}

fn identity_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| format!("{}", f as i64))
            }
        }
        _ => None,
    }
}

fn text(raw: &RawAttraction, keys: &[&str]) -> String {
    optional_text(raw, keys).unwrap_or_default()
}

/// First non-empty string among `keys`
fn optional_text(raw: &RawAttraction, keys: &[&str]) -> Option<String> {
    raw.first_map(keys, |value| {
        value
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn stage_year(raw: &RawAttraction, keys: &[&str]) -> Option<i64> {
    raw.first_number(keys)
        .filter(|year| year.fract() == 0.0)
        .map(|year| year as i64)
}

/// Both coordinates or neither; (0, 0) is a real place and is never used as a default
fn coordinates(raw: &RawAttraction) -> (Option<f64>, Option<f64>) {
    let longitude = raw
        .first_number(LONGITUDE_KEYS)
        .filter(|lon| (-180.0..=180.0).contains(lon));
    let latitude = raw
        .first_number(LATITUDE_KEYS)
        .filter(|lat| (-90.0..=90.0).contains(lat));

    match (longitude, latitude) {
        (Some(lon), Some(lat)) => (Some(lon), Some(lat)),
        _ => (None, None),
    }
}
