// Weather Query API v0.1
use axum::routing::{get, post};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::weather::AppState;
use services::openweather::OpenWeatherClient;
use services::youtube::YoutubeClient;

/// Maximum number of connections in the database pool.
const DB_POOL_MAX_CONNECTIONS: u32 = 5;

/// Weather Query API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Query API",
        version = "0.1.0",
        description = "Weather service with OpenWeatherMap proxying, CRUD persistence of \
            weather query records, multi-format export (JSON, CSV, XML, PDF, Markdown), \
            and YouTube/Google Maps lookups.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Weather", description = "Current conditions and 5-day forecast"),
        (name = "Queries", description = "Weather query record CRUD"),
        (name = "Export", description = "Record set export in five formats"),
        (name = "Lookups", description = "YouTube and Google Maps lookups"),
    ),
    paths(
        routes::health::health_check,
        routes::weather::get_current_weather,
        routes::weather::get_weather_forecast,
        routes::queries::create_query,
        routes::queries::list_queries,
        routes::queries::get_query,
        routes::queries::update_query,
        routes::queries::delete_query,
        routes::export::export_json,
        routes::export::export_csv,
        routes::export::export_xml,
        routes::export::export_pdf,
        routes::export::export_markdown,
        routes::integrations::youtube_search,
        routes::integrations::maps_embed,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::queries::CreateWeatherQuery,
            routes::queries::UpdateWeatherQuery,
            routes::queries::WeatherQueryResponse,
            routes::integrations::MapsResponse,
            services::openweather::CurrentWeather,
            services::forecast::DailyForecast,
            services::youtube::Video,
            services::youtube::VideoSearchResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_query_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Set up database connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Upstream clients
    let weather_client = OpenWeatherClient::new(&config.openweather_api_key);
    let youtube_client = YoutubeClient::new(config.youtube_api_key.clone());

    let app_state = AppState {
        weather_client,
        youtube_client,
        google_maps_api_key: config.google_maps_api_key.clone(),
    };

    // CORS — browser frontend issues all four CRUD methods plus GET downloads
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    // Build router
    // CRUD and export routes use SqlitePool state directly; weather and
    // lookup routes use AppState with the upstream clients.
    let query_routes = Router::new()
        .route(
            "/api/queries",
            post(routes::queries::create_query).get(routes::queries::list_queries),
        )
        .route(
            "/api/queries/:id",
            get(routes::queries::get_query)
                .put(routes::queries::update_query)
                .delete(routes::queries::delete_query),
        )
        .with_state(pool.clone());

    let export_routes = Router::new()
        .route("/api/export/json", get(routes::export::export_json))
        .route("/api/export/csv", get(routes::export::export_csv))
        .route("/api/export/xml", get(routes::export::export_xml))
        .route("/api/export/pdf", get(routes::export::export_pdf))
        .route("/api/export/markdown", get(routes::export::export_markdown))
        .with_state(pool.clone());

    let weather_routes = Router::new()
        .route(
            "/api/weather/current",
            get(routes::weather::get_current_weather),
        )
        .route(
            "/api/weather/forecast",
            get(routes::weather::get_weather_forecast),
        )
        .route("/api/youtube", get(routes::integrations::youtube_search))
        .route("/api/maps", get(routes::integrations::maps_embed))
        .with_state(app_state);

    // Health check uses SqlitePool to verify DB connectivity
    let health_routes = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .with_state(pool);

    let app = Router::new()
        .merge(health_routes)
        .merge(query_routes)
        .merge(export_routes)
        .merge(weather_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
