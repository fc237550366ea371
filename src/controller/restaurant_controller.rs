use std::sync::Arc;

use axum::extract::Query;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use tracing::{debug, info, warn};

use crate::controller::AppState;
use crate::models::filter::{parse_truthy, FilterCriteria, UNSET_RATING};
use crate::models::restaurant::SearchResult;
use crate::services::search_service::SearchService;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";
pub const DROPPED_ROWS_HEADER: &str = "x-dropped-rows";

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/search",
            get(search_restaurants)
                .head(method_not_implemented)
                .fallback(method_not_implemented),
        )
        .layer(Extension(app_state.search_service))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchRestaurantParam {
    pub query: String,
    pub veg: String,
}

impl SearchRestaurantParam {
    /// First value wins for a repeated key; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = None;
        let mut veg = None;
        for (key, value) in pairs {
            match key.as_str() {
                "query" if query.is_none() => query = Some(value),
                "veg" if veg.is_none() => veg = Some(value),
                _ => {}
            }
        }
        Self {
            query: query.unwrap_or_default(),
            veg: veg.unwrap_or_default(),
        }
    }

    /// Only a truthy `veg` filters; absent or false means no preference.
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            city: self.query,
            vegetarian: parse_truthy(&self.veg).then_some(true),
            min_rating: UNSET_RATING,
            ..FilterCriteria::default()
        }
    }
}

pub async fn search_restaurants(
    Extension(search_service): Extension<Arc<SearchService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let criteria = SearchRestaurantParam::from_pairs(pairs).into_criteria();
    debug!("Search criteria: {:?}", criteria);

    let outcome = match search_service.search(&criteria).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            return status_phrase(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let dropped = outcome.dropped;
    let body = match serde_json::to_string(&SearchResult::from(outcome.restaurants)) {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to serialize search result due to: {}", e);
            return status_phrase(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    info!(
        "Search for city {:?} returned {} bytes, {} rows dropped",
        criteria.city,
        body.len(),
        dropped
    );

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8)),
            (
                HeaderName::from_static(DROPPED_ROWS_HEADER),
                HeaderValue::from(dropped),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn method_not_implemented() -> Response {
    status_phrase(StatusCode::NOT_IMPLEMENTED)
}

/// Bare status phrase as the body, e.g. `Not Implemented`.
fn status_phrase(status: StatusCode) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        status.canonical_reason().unwrap_or_default(),
    )
        .into_response()
}
