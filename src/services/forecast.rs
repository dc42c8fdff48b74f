//! Daily forecast aggregation.
//!
//! Buckets the provider's 3-hourly forecast samples into per-day summaries:
//! arithmetic means of the numeric fields, first sample's description as the
//! representative weather for the day.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::helpers::{mean, title_case};

/// Maximum number of daily summaries returned (the provider covers 5 days).
pub const MAX_FORECAST_DAYS: usize = 5;

/// One raw 3-hourly forecast observation from the provider.
#[derive(Debug, Clone)]
pub struct ForecastSample {
    /// Unix timestamp (UTC) of the observation window.
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
    pub feels_like: f64,
    pub wind_speed: f64,
}

/// Aggregated forecast for one calendar day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyForecast {
    /// Calendar date in `YYYY-MM-DD`
    pub date: String,
    /// Mean air temperature in Celsius
    pub temperature: f64,
    /// Mean relative humidity percentage
    pub humidity: f64,
    /// Weather description of the day's first sample (title-cased)
    pub description: String,
    /// Mean feels-like temperature in Celsius
    pub feels_like: f64,
    /// Mean wind speed in m/s
    pub wind_speed: f64,
}

/// Bucket 3-hourly samples by UTC calendar date and summarise each day.
///
/// Samples whose timestamps fall outside the representable range are
/// skipped. Days are returned in ascending date order, truncated to
/// [`MAX_FORECAST_DAYS`]. A partial final day produces a summary over
/// however many samples it has; an empty input produces an empty output.
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailyForecast> {
    // BTreeMap keeps buckets date-ascending for free.
    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();

    for sample in samples {
        let Some(dt) = DateTime::from_timestamp(sample.timestamp, 0) else {
            tracing::warn!(
                "Skipping forecast sample with out-of-range timestamp {}",
                sample.timestamp
            );
            continue;
        };
        buckets.entry(dt.date_naive()).or_default().push(sample);
    }

    buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, day_samples)| {
            let temps: Vec<f64> = day_samples.iter().map(|s| s.temperature).collect();
            let humidity: Vec<f64> = day_samples.iter().map(|s| s.humidity).collect();
            let feels_like: Vec<f64> = day_samples.iter().map(|s| s.feels_like).collect();
            let wind: Vec<f64> = day_samples.iter().map(|s| s.wind_speed).collect();

            DailyForecast {
                date: date.format("%Y-%m-%d").to_string(),
                temperature: mean(&temps),
                humidity: mean(&humidity),
                // Policy: the chronologically first sample represents the day.
                description: title_case(&day_samples[0].description),
                feels_like: mean(&feels_like),
                wind_speed: mean(&wind),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2026-03-01T00:00:00Z
    const DAY_ONE: i64 = 1772323200;
    const DAY_SECS: i64 = 86_400;

    fn sample(timestamp: i64, temperature: f64, description: &str) -> ForecastSample {
        ForecastSample {
            timestamp,
            temperature,
            humidity: 70.0,
            description: description.to_string(),
            feels_like: temperature - 2.0,
            wind_speed: 3.0,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_means_per_bucket() {
        let samples = vec![
            sample(DAY_ONE, 10.0, "light rain"),
            sample(DAY_ONE + 3 * 3600, 12.0, "overcast clouds"),
        ];

        let daily = aggregate_daily(&samples);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, "2026-03-01");
        assert_eq!(daily[0].temperature, 11.0);
        assert_eq!(daily[0].feels_like, 9.0);
        assert_eq!(daily[0].humidity, 70.0);
    }

    #[test]
    fn test_first_sample_description_wins() {
        let samples = vec![
            sample(DAY_ONE, 5.0, "light rain"),
            sample(DAY_ONE + 3 * 3600, 6.0, "clear sky"),
        ];

        let daily = aggregate_daily(&samples);
        assert_eq!(daily[0].description, "Light Rain");
    }

    #[test]
    fn test_days_sorted_ascending() {
        // Deliberately out of order — grouping must still sort by date.
        let samples = vec![
            sample(DAY_ONE + 2 * DAY_SECS, 8.0, "mist"),
            sample(DAY_ONE, 4.0, "snow"),
            sample(DAY_ONE + DAY_SECS, 6.0, "rain"),
        ];

        let dates: Vec<String> = aggregate_daily(&samples)
            .into_iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-03-02", "2026-03-03"]);
    }

    #[test]
    fn test_truncates_to_five_days() {
        // 6 days of data; the sixth must be dropped.
        let samples: Vec<ForecastSample> = (0..6)
            .map(|day| sample(DAY_ONE + day * DAY_SECS, 10.0, "clouds"))
            .collect();

        let daily = aggregate_daily(&samples);
        assert_eq!(daily.len(), MAX_FORECAST_DAYS);
        assert_eq!(daily.last().unwrap().date, "2026-03-05");
    }

    #[test]
    fn test_partial_final_day_not_padded() {
        // Full provider window: 40 samples at 3h resolution starting mid-day,
        // so the data spans 6 calendar dates but only 5 summaries come back.
        let start = DAY_ONE + 12 * 3600;
        let samples: Vec<ForecastSample> = (0..40)
            .map(|i| sample(start + i * 3 * 3600, 10.0, "clouds"))
            .collect();

        let daily = aggregate_daily(&samples);
        assert_eq!(daily.len(), 5);
    }

    #[test]
    fn test_fewer_than_five_days() {
        let samples = vec![
            sample(DAY_ONE, 10.0, "clouds"),
            sample(DAY_ONE + DAY_SECS, 12.0, "clouds"),
        ];
        assert_eq!(aggregate_daily(&samples).len(), 2);
    }
}
