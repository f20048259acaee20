use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{AttractionQuery, FeedPage, RankCriterion},
    routes::AppState,
    services::{feed, selector::PageRequest, taxonomy},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub keyword: Option<String>,
    pub category: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<RankCriterion>,
    pub city: Option<String>,
    pub user_id: Option<i64>,
    pub travel_style: Option<String>,
    pub days: Option<u32>,
    pub user_longitude: Option<f64>,
    pub user_latitude: Option<f64>,
    pub visit_time: Option<String>,
}

impl FeedParams {
    fn into_query(self) -> AppResult<AttractionQuery> {
        let category_id = match self.category {
            Some(id) if taxonomy::is_domain_id(id) => u8::try_from(id).ok(),
            Some(id) => {
                return Err(AppError::InvalidInput(format!(
                    "category must be between 1 and 9, got {}",
                    id
                )))
            }
            None => None,
        };

        if let Some(lon) = self.user_longitude.filter(|lon| !(-180.0..=180.0).contains(lon)) {
            return Err(AppError::InvalidInput(format!(
                "userLongitude must be between -180 and 180, got {}",
                lon
            )));
        }
        if let Some(lat) = self.user_latitude.filter(|lat| !(-90.0..=90.0).contains(lat)) {
            return Err(AppError::InvalidInput(format!(
                "userLatitude must be between -90 and 90, got {}",
                lat
            )));
        }

        Ok(AttractionQuery {
            keyword: self.keyword,
            category_id,
            city: self.city,
            user_id: self.user_id,
            travel_style: self.travel_style.filter(|style| !style.trim().is_empty()),
            days: self.days.filter(|days| *days > 0),
            user_longitude: self.user_longitude,
            user_latitude: self.user_latitude,
            visit_time: self.visit_time.filter(|time| !time.trim().is_empty()),
        })
    }
}

/// Handler for the ranked attraction feed
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<FeedParams>, QueryRejection>,
) -> AppResult<Json<FeedPage>> {
    let Query(params) = params.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let request = PageRequest::new(
        params.page.unwrap_or(1),
        params.page_size.unwrap_or(state.default_page_size as i64),
        state.max_page_size,
    )?;
    let criterion = params.sort.unwrap_or_default();
    let query = params.into_query()?;

    tracing::info!(
        request_id = %request_id,
        keyword = ?query.keyword,
        category = ?query.category_id,
        page = request.page(),
        page_size = request.page_size(),
        criterion = %criterion,
        "Processing feed request"
    );

    let page = feed::get_page(
        state.provider.as_ref(),
        &query,
        request,
        criterion,
        state.selection_strategy,
    )
    .await
    .inspect_err(|e| {
        if e.is_client_error() {
            tracing::warn!(request_id = %request_id, error = %e, "Feed request rejected");
        } else {
            tracing::error!(request_id = %request_id, code = e.code(), error = %e, "Feed request failed");
        }
    })?;

    Ok(Json(page))
}
