//! CRUD endpoints for the weather query resource.
//!
//! - POST   /api/queries
//! - GET    /api/queries?skip=N&limit=M
//! - GET    /api/queries/:id
//! - PUT    /api/queries/:id
//! - DELETE /api/queries/:id

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::db::{models, queries};
use crate::errors::{AppError, ErrorResponse};

const DEFAULT_PAGE_LIMIT: i64 = 100;
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Payload and response types
// ---------------------------------------------------------------------------

/// Payload for creating a weather query record. All fields required.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWeatherQuery {
    /// Location: zip, postal code, GPS pair, landmark, town or city
    pub location: String,
    /// Start date in YYYY-MM-DD
    pub date_from: String,
    /// End date in YYYY-MM-DD; must not precede date_from
    pub date_to: String,
    /// Target temperature value
    pub output_temperature: f64,
}

/// Payload for a partial update. Absent fields leave the stored record
/// untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWeatherQuery {
    pub location: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub output_temperature: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct Pagination {
    /// Number of records to skip (default 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default 100)
    pub limit: Option<i64>,
}

/// A stored weather query record.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherQueryResponse {
    pub id: i64,
    pub location: String,
    /// Start date in YYYY-MM-DD
    pub date_from: String,
    /// End date in YYYY-MM-DD
    pub date_to: String,
    pub output_temperature: f64,
    /// Creation time in RFC 3339
    pub created_at: String,
    /// Last update time in RFC 3339; null until first update
    pub updated_at: Option<String>,
}

impl From<models::WeatherQuery> for WeatherQueryResponse {
    fn from(q: models::WeatherQuery) -> Self {
        Self {
            id: q.id,
            location: q.location,
            date_from: q.date_from.format(DATE_FORMAT).to_string(),
            date_to: q.date_to.format(DATE_FORMAT).to_string(),
            output_temperature: q.output_temperature,
            created_at: q.created_at.to_rfc3339(),
            updated_at: q.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| AppError::Validation {
        field,
        message: format!("{} must be a date in YYYY-MM-DD format", field),
    })
}

fn validate_location(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation {
            field: "location",
            message: "location must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate a create payload into insert parameters.
fn validate_create(payload: CreateWeatherQuery) -> Result<queries::NewWeatherQuery, AppError> {
    let location = validate_location(&payload.location)?;
    let date_from = parse_date("date_from", &payload.date_from)?;
    let date_to = parse_date("date_to", &payload.date_to)?;
    check_date_range(date_from, date_to)?;

    Ok(queries::NewWeatherQuery {
        location,
        date_from,
        date_to,
        output_temperature: payload.output_temperature,
    })
}

/// Validate the fields present in an update payload. The cross-field
/// range check runs later, against the merged record.
fn validate_update(payload: UpdateWeatherQuery) -> Result<queries::WeatherQueryChanges, AppError> {
    Ok(queries::WeatherQueryChanges {
        location: payload
            .location
            .as_deref()
            .map(validate_location)
            .transpose()?,
        date_from: payload
            .date_from
            .as_deref()
            .map(|v| parse_date("date_from", v))
            .transpose()?,
        date_to: payload
            .date_to
            .as_deref()
            .map(|v| parse_date("date_to", v))
            .transpose()?,
        output_temperature: payload.output_temperature,
    })
}

fn check_date_range(date_from: NaiveDate, date_to: NaiveDate) -> Result<(), AppError> {
    if date_to < date_from {
        return Err(AppError::Validation {
            field: "date_to",
            message: "date_to must not precede date_from".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Create a new weather query record.
#[utoipa::path(
    post,
    path = "/api/queries",
    tag = "Queries",
    request_body = CreateWeatherQuery,
    responses(
        (status = 201, description = "Record created", body = WeatherQueryResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn create_query(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateWeatherQuery>,
) -> Result<(StatusCode, Json<WeatherQueryResponse>), AppError> {
    let params = validate_create(payload)?;
    let record = queries::insert_query(&pool, params).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// List weather query records in insertion order.
#[utoipa::path(
    get,
    path = "/api/queries",
    tag = "Queries",
    params(Pagination),
    responses(
        (status = 200, description = "Page of records", body = Vec<WeatherQueryResponse>),
    )
)]
pub async fn list_queries(
    State(pool): State<SqlitePool>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<WeatherQueryResponse>>, AppError> {
    let skip = page.skip.unwrap_or(0).max(0);
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(0);

    let records = queries::list_queries(&pool, skip, limit).await?;
    Ok(Json(
        records.into_iter().map(WeatherQueryResponse::from).collect(),
    ))
}

/// Get a single weather query record by id.
#[utoipa::path(
    get,
    path = "/api/queries/{id}",
    tag = "Queries",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "The record", body = WeatherQueryResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn get_query(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Json<WeatherQueryResponse>, AppError> {
    let record = queries::get_query(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Weather query {} not found", id)))?;
    Ok(Json(record.into()))
}

/// Partially update a weather query record.
///
/// Per-field checks apply only to fields present in the payload; the
/// date-range invariant is checked against the merged record.
#[utoipa::path(
    put,
    path = "/api/queries/{id}",
    tag = "Queries",
    params(("id" = i64, Path, description = "Record id")),
    request_body = UpdateWeatherQuery,
    responses(
        (status = 200, description = "Updated record", body = WeatherQueryResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn update_query(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateWeatherQuery>,
) -> Result<Json<WeatherQueryResponse>, AppError> {
    let changes = validate_update(payload)?;

    let existing = queries::get_query(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Weather query {} not found", id)))?;

    let effective_from = changes.date_from.unwrap_or(existing.date_from);
    let effective_to = changes.date_to.unwrap_or(existing.date_to);
    check_date_range(effective_from, effective_to)?;

    let record = queries::update_query(&pool, id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Weather query {} not found", id)))?;
    Ok(Json(record.into()))
}

/// Delete a weather query record.
#[utoipa::path(
    delete,
    path = "/api/queries/{id}",
    tag = "Queries",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn delete_query(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let found = queries::delete_query(&pool, id).await?;
    if !found {
        return Err(AppError::NotFound(format!(
            "Weather query {} not found",
            id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
