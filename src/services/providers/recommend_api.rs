//! Upstream recommendation API provider
//!
//! API Flow:
//! 1. POST {api_url}/recommend/list with `{city, preferences?, userId?, travelStyle?,
//!    days?, userLongitude?, userLatitude?, visitTime?}`
//! 2. The response is either the `{success, message, data: [...]}` envelope or a
//!    bare JSON array of attraction entries.
//!
//! The keyword of a search is forwarded as a preference so the upstream can weight
//! matching attractions; the authoritative keyword filter still runs locally.
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{AttractionQuery, RawAttraction},
    services::providers::CandidateProvider,
};

const PROVIDER_NAME: &str = "recommend_api";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RecommendListRequest {
    city: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    preferences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    travel_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visit_time: Option<String>,
}

fn key_part<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

impl RecommendListRequest {
    /// Every forwarded field takes part, so two requests share an entry only when
    /// the upstream would see identical bodies
    fn cache_key(&self) -> CacheKey {
        let mut key = format!(
            "{}:{}:{}",
            self.city,
            self.preferences.join(","),
            key_part(&self.user_id)
        );

        let has_context = self.travel_style.is_some()
            || self.days.is_some()
            || self.user_longitude.is_some()
            || self.user_latitude.is_some()
            || self.visit_time.is_some();
        if has_context {
            key.push_str(&format!(
                ":{}:{}:{}:{}:{}",
                key_part(&self.travel_style),
                key_part(&self.days),
                key_part(&self.user_longitude),
                key_part(&self.user_latitude),
                key_part(&self.visit_time)
            ));
        }

        CacheKey::Candidates(key)
    }
}

#[derive(Clone)]
pub struct RecommendApiProvider {
    http_client: HttpClient,
    api_url: String,
    default_city: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl RecommendApiProvider {
    pub fn new(
        api_url: String,
        default_city: String,
        timeout: Duration,
        cache: Option<Cache>,
        cache_ttl: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            default_city,
            cache,
            cache_ttl,
        })
    }

    fn request_body(&self, query: &AttractionQuery) -> RecommendListRequest {
        let city = query
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(&self.default_city)
            .to_string();

        RecommendListRequest {
            city,
            preferences: query
                .effective_keyword()
                .map(|keyword| vec![keyword.to_string()])
                .unwrap_or_default(),
            user_id: query.user_id,
            travel_style: query.travel_style.clone(),
            days: query.days,
            user_longitude: query.user_longitude,
            user_latitude: query.user_latitude,
            visit_time: query.visit_time.clone(),
        }
    }

    async fn fetch_uncached(&self, body: &RecommendListRequest) -> AppResult<Vec<RawAttraction>> {
        let url = format!("{}/recommend/list", self.api_url);
        let response = self.http_client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recommendation API returned status {}: {}",
                status, body
            )));
        }

        let payload: Value = response.json().await?;
        let candidates = parse_candidates(payload)?;

        tracing::info!(
            city = %body.city,
            results = candidates.len(),
            provider = PROVIDER_NAME,
            "Candidates fetched"
        );

        Ok(candidates)
    }
}

/// Unwraps the upstream envelope into raw entries
///
/// Individual entries are not validated here; a garbage entry is still a candidate
/// that the normalizer will drop.
pub fn parse_candidates(payload: Value) -> AppResult<Vec<RawAttraction>> {
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut envelope) => {
            if envelope.get("success").and_then(Value::as_bool) == Some(false) {
                let message = envelope
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("upstream reported failure")
                    .to_string();
                return Err(AppError::ExternalApi(message));
            }

            match envelope.remove("data") {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(AppError::ExternalApi(
                        "Invalid recommendation response format".to_string(),
                    ))
                }
            }
        }
        _ => {
            return Err(AppError::ExternalApi(
                "Invalid recommendation response format".to_string(),
            ))
        }
    };

    Ok(entries.into_iter().map(RawAttraction::from).collect())
}

#[async_trait::async_trait]
impl CandidateProvider for RecommendApiProvider {
    async fn fetch_candidates(&self, query: &AttractionQuery) -> AppResult<Vec<RawAttraction>> {
        let body = self.request_body(query);

        match &self.cache {
            Some(cache) => cached!(cache, body.cache_key(), self.cache_ttl, async {
                self.fetch_uncached(&body).await
            }),
            None => self.fetch_uncached(&body).await,
        }
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
