//! Weather proxy endpoints.
//!
//! - GET /api/weather/current?location=...
//! - GET /api/weather/forecast?location=...

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, ErrorResponse};
use crate::services::forecast::{aggregate_daily, DailyForecast};
use crate::services::openweather::{CurrentWeather, OpenWeatherClient};
use crate::services::youtube::YoutubeClient;

/// Shared application state for weather and lookup endpoints.
/// CRUD and export routes take the connection pool as state directly.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) weather_client: OpenWeatherClient,
    pub(crate) youtube_client: YoutubeClient,
    pub(crate) google_maps_api_key: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Location: zip, postal code, "lat,lon" pair, landmark, town or city
    pub location: String,
}

/// Get current weather for a location.
#[utoipa::path(
    get,
    path = "/api/weather/current",
    tag = "Weather",
    params(LocationQuery),
    responses(
        (status = 200, description = "Current conditions for the location", body = CurrentWeather),
        (status = 404, description = "Location not found or invalid", body = ErrorResponse),
        (status = 502, description = "Upstream weather provider error", body = ErrorResponse),
    )
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<CurrentWeather>, AppError> {
    let current = state.weather_client.fetch_current(&params.location).await?;
    Ok(Json(current))
}

/// Get the 5-day forecast for a location, aggregated to daily summaries.
#[utoipa::path(
    get,
    path = "/api/weather/forecast",
    tag = "Weather",
    params(LocationQuery),
    responses(
        (status = 200, description = "Up to five daily forecast summaries", body = Vec<DailyForecast>),
        (status = 404, description = "Location not found or invalid", body = ErrorResponse),
        (status = 502, description = "Upstream weather provider error", body = ErrorResponse),
    )
)]
pub async fn get_weather_forecast(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Vec<DailyForecast>>, AppError> {
    let samples = state.weather_client.fetch_forecast(&params.location).await?;
    Ok(Json(aggregate_daily(&samples)))
}
