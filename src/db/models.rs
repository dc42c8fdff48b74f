use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A persisted weather query record.
///
/// Dates are stored as `YYYY-MM-DD` TEXT, timestamps as RFC 3339 TEXT.
/// `updated_at` stays NULL until the record is first modified.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeatherQuery {
    pub id: i64,
    pub location: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub output_temperature: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
