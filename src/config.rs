/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub openweather_api_key: String,
    /// Optional — the YouTube lookup degrades gracefully without it.
    pub youtube_api_key: Option<String>,
    /// Optional — without it the maps endpoint returns a public search URL.
    pub google_maps_api_key: Option<String>,
    pub port: u16,
}

/// Read an optional env var, treating an empty value as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://weather_queries.db?mode=rwc".to_string()),
            openweather_api_key: std::env::var("OPENWEATHER_API_KEY")
                .expect("OPENWEATHER_API_KEY must be set"),
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            google_maps_api_key: optional_env("GOOGLE_MAPS_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        std::env::set_var("OPENWEATHER_API_KEY", "test-key");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("YOUTUBE_API_KEY");
        std::env::set_var("GOOGLE_MAPS_API_KEY", "  ");
        std::env::remove_var("PORT");

        let config = AppConfig::from_env();

        assert_eq!(config.port, 8000);
        assert!(config.database_url.starts_with("sqlite://"));
        assert_eq!(config.youtube_api_key, None);
        // Whitespace-only values count as unset
        assert_eq!(config.google_maps_api_key, None);
    }
}
