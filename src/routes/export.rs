//! Export endpoints: the full record set in five download formats.
//!
//! - GET /api/export/json
//! - GET /api/export/csv
//! - GET /api/export/xml
//! - GET /api/export/pdf
//! - GET /api/export/markdown

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use sqlx::SqlitePool;

use crate::db::queries;
use crate::errors::{AppError, ErrorResponse};
use crate::services::export::{self, ExportRow};

async fn load_rows(pool: &SqlitePool) -> Result<Vec<ExportRow>, AppError> {
    let records = queries::list_all_queries(pool).await?;
    Ok(records.iter().map(ExportRow::from).collect())
}

/// Build a download response with content type and attachment disposition.
fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Export all weather queries as JSON.
#[utoipa::path(
    get,
    path = "/api/export/json",
    tag = "Export",
    responses(
        (status = 200, description = "All records as a JSON array", body = String, content_type = "application/json"),
        (status = 500, description = "Export failed", body = ErrorResponse),
    )
)]
pub async fn export_json(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = load_rows(&pool).await?;
    let body = export::to_json(&rows)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json".to_string())],
        body,
    )
        .into_response())
}

/// Export all weather queries as CSV.
#[utoipa::path(
    get,
    path = "/api/export/csv",
    tag = "Export",
    responses(
        (status = 200, description = "All records as CSV", body = String, content_type = "text/csv"),
        (status = 500, description = "Export failed", body = ErrorResponse),
    )
)]
pub async fn export_csv(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = load_rows(&pool).await?;
    let body = export::to_csv(&rows)?;
    Ok(attachment("text/csv", "weather_queries.csv", body.into_bytes()))
}

/// Export all weather queries as XML.
#[utoipa::path(
    get,
    path = "/api/export/xml",
    tag = "Export",
    responses(
        (status = 200, description = "All records as XML", body = String, content_type = "application/xml"),
        (status = 500, description = "Export failed", body = ErrorResponse),
    )
)]
pub async fn export_xml(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = load_rows(&pool).await?;
    let body = export::to_xml(&rows)?;
    Ok(attachment(
        "application/xml",
        "weather_queries.xml",
        body.into_bytes(),
    ))
}

/// Export all weather queries as a PDF document.
#[utoipa::path(
    get,
    path = "/api/export/pdf",
    tag = "Export",
    responses(
        (status = 200, description = "All records as a PDF table", body = Vec<u8>, content_type = "application/pdf"),
        (status = 500, description = "Export failed", body = ErrorResponse),
    )
)]
pub async fn export_pdf(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = load_rows(&pool).await?;
    let body = export::to_pdf(&rows)?;
    Ok(attachment("application/pdf", "weather_queries.pdf", body))
}

/// Export all weather queries as Markdown.
#[utoipa::path(
    get,
    path = "/api/export/markdown",
    tag = "Export",
    responses(
        (status = 200, description = "All records as a Markdown table", body = String, content_type = "text/markdown"),
        (status = 500, description = "Export failed", body = ErrorResponse),
    )
)]
pub async fn export_markdown(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = load_rows(&pool).await?;
    let body = export::to_markdown(&rows);
    Ok(attachment(
        "text/markdown",
        "weather_queries.md",
        body.into_bytes(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!().run(&pool).await.expect("migrations");
        pool
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_load_rows_flattens_records() {
        let pool = test_pool().await;
        queries::insert_query(
            &pool,
            queries::NewWeatherQuery {
                location: "Zurich".to_string(),
                date_from: date("2026-03-01"),
                date_to: date("2026-03-05"),
                output_temperature: 4.5,
            },
        )
        .await
        .unwrap();

        let rows = load_rows(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "Zurich");
        assert_eq!(rows[0].date_from, "2026-03-01");
        assert_eq!(rows[0].updated_at, None);
    }

    #[tokio::test]
    async fn test_attachment_sets_disposition() {
        let response = attachment("text/csv", "weather_queries.csv", b"id\n".to_vec());
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=weather_queries.csv"
        );
    }

    #[tokio::test]
    async fn test_export_endpoints_tolerate_empty_store() {
        let pool = test_pool().await;
        for result in [
            export_json(State(pool.clone())).await,
            export_csv(State(pool.clone())).await,
            export_xml(State(pool.clone())).await,
            export_pdf(State(pool.clone())).await,
            export_markdown(State(pool)).await,
        ] {
            assert!(result.is_ok());
        }
    }
}
