//! OpenWeatherMap API client.
//!
//! Fetches current conditions and the 3-hourly 5-day forecast.
//! See: https://openweathermap.org/api

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::title_case;
use crate::services::forecast::ForecastSample;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the OpenWeatherMap current-weather and forecast endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Current conditions for a location, parsed from the provider response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentWeather {
    /// Resolved location label, e.g. "Zurich, CH"
    pub location: String,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Weather description (title-cased)
    pub description: String,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Visibility in kilometres, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    name: String,
    sys: Option<OwmSys>,
    main: OwmMain,
    weather: Vec<OwmDescription>,
    wind: Option<OwmWind>,
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    feels_like: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmDescription {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    #[serde(default)]
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmDescription>,
    wind: Option<OwmWind>,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Construct a client against an alternative base URL (used in tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current conditions for a free-text location.
    pub async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, AppError> {
        let response: OwmCurrentResponse = self.get_json("weather", location).await?;
        Ok(parse_current(response))
    }

    /// Fetch the raw 3-hourly forecast samples for a free-text location.
    ///
    /// The provider returns up to 40 samples covering 5 days; callers
    /// aggregate them with [`crate::services::forecast::aggregate_daily`].
    pub async fn fetch_forecast(&self, location: &str) -> Result<Vec<ForecastSample>, AppError> {
        let response: OwmForecastResponse = self.get_json("forecast", location).await?;

        Ok(response
            .list
            .into_iter()
            .map(|item| ForecastSample {
                timestamp: item.dt,
                temperature: item.main.temp,
                humidity: item.main.humidity,
                description: item
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_default(),
                feels_like: item.main.feels_like,
                wind_speed: item.wind.and_then(|w| w.speed).unwrap_or(0.0),
            })
            .collect())
    }

    /// Issue a request by location name; on a 404, fall back once to a
    /// lat/lon query when the location looks like a coordinate pair.
    /// Anything still unresolved surfaces as not-found.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &str,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("OpenWeatherMap request failed: {}", e))
            })?;

        let response = if response.status() == reqwest::StatusCode::NOT_FOUND {
            let Some((lat, lon)) = parse_coordinates(location) else {
                return Err(AppError::NotFound("Location not found or invalid".to_string()));
            };
            let retry = self
                .client
                .get(&url)
                .query(&[
                    ("lat", lat.to_string().as_str()),
                    ("lon", lon.to_string().as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ])
                .send()
                .await
                .map_err(|e| {
                    AppError::ExternalServiceError(format!("OpenWeatherMap request failed: {}", e))
                })?;
            if retry.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(AppError::NotFound("Location not found or invalid".to_string()));
            }
            retry
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("OpenWeatherMap JSON parse error: {}", e))
        })
    }
}

/// Interpret a location string as a "lat,lon" pair, if both halves parse.
fn parse_coordinates(location: &str) -> Option<(f64, f64)> {
    let (lat, lon) = location.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

fn parse_current(data: OwmCurrentResponse) -> CurrentWeather {
    let country = data
        .sys
        .and_then(|s| s.country)
        .unwrap_or_default();

    CurrentWeather {
        location: format!("{}, {}", data.name, country),
        temperature: data.main.temp,
        humidity: data.main.humidity,
        description: title_case(
            data.weather
                .first()
                .map(|w| w.description.as_str())
                .unwrap_or(""),
        ),
        feels_like: data.main.feels_like,
        wind_speed: data.wind.and_then(|w| w.speed).unwrap_or(0.0),
        pressure: data.main.pressure,
        // Provider reports metres; responses use kilometres.
        visibility: data.visibility.map(|v| v / 1000.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Zurich",
            "sys": { "country": "CH" },
            "main": { "temp": 4.2, "humidity": 81, "feels_like": 1.5, "pressure": 1021 },
            "weather": [ { "description": "scattered clouds" } ],
            "wind": { "speed": 2.6 },
            "visibility": 10000
        })
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("47.37, 8.54"), Some((47.37, 8.54)));
        assert_eq!(parse_coordinates("Zurich"), None);
        assert_eq!(parse_coordinates("47.37,east"), None);
    }

    #[tokio::test]
    async fn test_fetch_current_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Zurich"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("key", &server.uri());
        let current = client.fetch_current("Zurich").await.unwrap();

        assert_eq!(current.location, "Zurich, CH");
        assert_eq!(current.temperature, 4.2);
        assert_eq!(current.description, "Scattered Clouds");
        assert_eq!(current.visibility, Some(10.0));
    }

    #[tokio::test]
    async fn test_fetch_current_unknown_location_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("key", &server.uri());
        let err = client.fetch_current("Atlantis").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_current_falls_back_to_coordinates() {
        let server = MockServer::start().await;
        // Name lookup misses...
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "47.37,8.54"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // ...coordinate lookup hits.
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "47.37"))
            .and(query_param("lon", "8.54"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("key", &server.uri());
        let current = client.fetch_current("47.37,8.54").await.unwrap();
        assert_eq!(current.location, "Zurich, CH");
    }

    #[tokio::test]
    async fn test_fetch_current_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("key", &server.uri());
        let err = client.fetch_current("Zurich").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_fetch_forecast_maps_samples() {
        let body = serde_json::json!({
            "list": [
                {
                    "dt": 1772323200,
                    "main": { "temp": 10.0, "humidity": 70, "feels_like": 8.0, "pressure": 1015 },
                    "weather": [ { "description": "light rain" } ],
                    "wind": { "speed": 3.1 }
                },
                {
                    "dt": 1772334000,
                    "main": { "temp": 12.0, "humidity": 65, "feels_like": 10.5, "pressure": 1014 },
                    "weather": [ { "description": "overcast clouds" } ],
                    "wind": {}
                }
            ]
        });

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Zurich"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::with_base_url("key", &server.uri());
        let samples = client.fetch_forecast("Zurich").await.unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].description, "light rain");
        assert_eq!(samples[0].temperature, 10.0);
        // Missing wind speed defaults to 0
        assert_eq!(samples[1].wind_speed, 0.0);
    }
}
