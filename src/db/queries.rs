use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::models::WeatherQuery;

const SELECT_COLUMNS: &str =
    "id, location, date_from, date_to, output_temperature, created_at, updated_at";

/// Validated parameters for inserting a new weather query record.
#[derive(Debug)]
pub struct NewWeatherQuery {
    pub location: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub output_temperature: f64,
}

/// Field-level changes for a partial update. `None` leaves the stored
/// value untouched.
#[derive(Debug, Default)]
pub struct WeatherQueryChanges {
    pub location: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub output_temperature: Option<f64>,
}

/// Insert a new weather query record, assigning id and created_at.
pub async fn insert_query(
    pool: &SqlitePool,
    params: NewWeatherQuery,
) -> Result<WeatherQuery, sqlx::Error> {
    sqlx::query_as::<_, WeatherQuery>(&format!(
        "INSERT INTO weather_queries (location, date_from, date_to, output_temperature, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(&params.location)
    .bind(params.date_from)
    .bind(params.date_to)
    .bind(params.output_temperature)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Get a single weather query record by id.
pub async fn get_query(pool: &SqlitePool, id: i64) -> Result<Option<WeatherQuery>, sqlx::Error> {
    sqlx::query_as::<_, WeatherQuery>(&format!(
        "SELECT {SELECT_COLUMNS} FROM weather_queries WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get a page of weather query records in insertion order.
pub async fn list_queries(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<WeatherQuery>, sqlx::Error> {
    sqlx::query_as::<_, WeatherQuery>(&format!(
        "SELECT {SELECT_COLUMNS} FROM weather_queries ORDER BY id LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

/// Get every weather query record in insertion order (used by the exports).
pub async fn list_all_queries(pool: &SqlitePool) -> Result<Vec<WeatherQuery>, sqlx::Error> {
    sqlx::query_as::<_, WeatherQuery>(&format!(
        "SELECT {SELECT_COLUMNS} FROM weather_queries ORDER BY id"
    ))
    .fetch_all(pool)
    .await
}

/// Apply a partial update to a record, merging absent fields from the
/// stored row. Sets `updated_at`. Returns `None` when the id is absent.
pub async fn update_query(
    pool: &SqlitePool,
    id: i64,
    changes: WeatherQueryChanges,
) -> Result<Option<WeatherQuery>, sqlx::Error> {
    sqlx::query_as::<_, WeatherQuery>(&format!(
        "UPDATE weather_queries SET
            location = COALESCE($1, location),
            date_from = COALESCE($2, date_from),
            date_to = COALESCE($3, date_to),
            output_temperature = COALESCE($4, output_temperature),
            updated_at = $5
         WHERE id = $6
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(changes.location)
    .bind(changes.date_from)
    .bind(changes.date_to)
    .bind(changes.output_temperature)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a record by id. Returns whether a record was found and removed.
pub async fn delete_query(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM weather_queries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn sample_params() -> NewWeatherQuery {
        NewWeatherQuery {
            location: "Zurich".to_string(),
            date_from: date("2026-03-01"),
            date_to: date("2026-03-05"),
            output_temperature: 4.5,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let pool = test_pool().await;
        let record = insert_query(&pool, sample_params()).await.unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.location, "Zurich");
        assert_eq!(record.updated_at, None);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = test_pool().await;
        assert_eq!(get_query(&pool, 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let pool = test_pool().await;
        for loc in ["A", "B", "C"] {
            let mut params = sample_params();
            params.location = loc.to_string();
            insert_query(&pool, params).await.unwrap();
        }

        let page = list_queries(&pool, 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].location, "B");
        assert_eq!(page[1].location, "C");
    }

    #[tokio::test]
    async fn test_partial_update_merges_fields() {
        let pool = test_pool().await;
        let record = insert_query(&pool, sample_params()).await.unwrap();

        let changes = WeatherQueryChanges {
            output_temperature: Some(-2.0),
            ..Default::default()
        };
        let updated = update_query(&pool, record.id, changes)
            .await
            .unwrap()
            .expect("record exists");

        assert_eq!(updated.output_temperature, -2.0);
        // Untouched fields survive the merge
        assert_eq!(updated.location, record.location);
        assert_eq!(updated.date_from, record.date_from);
        assert_eq!(updated.date_to, record.date_to);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let pool = test_pool().await;
        let result = update_query(&pool, 99, WeatherQueryChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_found() {
        let pool = test_pool().await;
        let record = insert_query(&pool, sample_params()).await.unwrap();

        assert!(delete_query(&pool, record.id).await.unwrap());
        assert!(!delete_query(&pool, record.id).await.unwrap());
        assert_eq!(get_query(&pool, record.id).await.unwrap(), None);
    }
}
