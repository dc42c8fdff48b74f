//! Read-only lookup endpoints backed by third-party APIs.
//!
//! - GET /api/youtube?location=...  — video search proxy
//! - GET /api/maps?location=...     — map embed URL builder

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::routes::weather::{AppState, LocationQuery};
use crate::services::youtube::VideoSearchResponse;

/// Map embed information for a location.
#[derive(Debug, Serialize, ToSchema)]
pub struct MapsResponse {
    pub location: String,
    /// Embed URL when an API key is configured, public search URL otherwise
    pub embed_url: String,
    pub api_key_configured: bool,
}

/// Search YouTube for weather videos about a location.
#[utoipa::path(
    get,
    path = "/api/youtube",
    tag = "Lookups",
    params(LocationQuery),
    responses(
        (status = 200, description = "Video search results", body = VideoSearchResponse),
        (status = 502, description = "YouTube API error", body = ErrorResponse),
    )
)]
pub async fn youtube_search(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<VideoSearchResponse>, AppError> {
    let result = state
        .youtube_client
        .search_location_videos(&params.location)
        .await?;
    Ok(Json(result))
}

/// Get a Google Maps embed URL for a location.
#[utoipa::path(
    get,
    path = "/api/maps",
    tag = "Lookups",
    params(LocationQuery),
    responses(
        (status = 200, description = "Map embed information", body = MapsResponse),
    )
)]
pub async fn maps_embed(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Json<MapsResponse> {
    let embed_url = build_maps_url(&params.location, state.google_maps_api_key.as_deref());
    Json(MapsResponse {
        location: params.location,
        embed_url,
        api_key_configured: state.google_maps_api_key.is_some(),
    })
}

/// Build the maps URL: the Embed API URL with a key, the public search URL
/// without one.
fn build_maps_url(location: &str, api_key: Option<&str>) -> String {
    let encoded = urlencoding::encode(location);
    match api_key {
        Some(key) => format!(
            "https://www.google.com/maps/embed/v1/place?key={}&q={}",
            key, encoded
        ),
        None => format!("https://www.google.com/maps/search/?api=1&query={}", encoded),
    }
}
