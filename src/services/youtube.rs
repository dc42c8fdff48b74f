//! YouTube Data API v3 search client.
//!
//! Looks up weather-related videos for a location. Works without an API
//! key by returning an empty result carrying the suggested search query.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::errors::AppError;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RESULTS: u32 = 5;

/// Client for the YouTube Data API search endpoint.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

/// A single video search hit.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Video {
    pub title: String,
    pub description: String,
    /// Default thumbnail URL
    pub thumbnail: String,
    pub video_id: String,
    /// Watch URL on youtube.com
    pub url: String,
}

/// Video search response. Without a configured API key, `videos` is empty
/// and `search_query` carries the query the caller could run manually.
#[derive(Debug, Serialize, ToSchema)]
pub struct VideoSearchResponse {
    pub videos: Vec<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

// --- YouTube Data API JSON response types ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    description: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YoutubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_URL)
    }

    /// Construct a client against an alternative base URL (used in tests).
    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search for weather videos about a location.
    pub async fn search_location_videos(
        &self,
        location: &str,
    ) -> Result<VideoSearchResponse, AppError> {
        let query = format!("weather {}", location);

        let Some(api_key) = &self.api_key else {
            return Ok(VideoSearchResponse {
                videos: Vec::new(),
                message: Some(
                    "YouTube API key not configured. Set the YOUTUBE_API_KEY environment variable."
                        .to_string(),
                ),
                search_query: Some(query),
            });
        };

        let url = format!("{}/search", self.base_url);
        let max_results = MAX_RESULTS.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("YouTube request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "YouTube returned HTTP {}",
                response.status()
            )));
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("YouTube JSON parse error: {}", e))
        })?;

        let videos = search
            .items
            .into_iter()
            .filter_map(|item| {
                // Playlist/channel hits have no videoId; skip them.
                let video_id = item.id.video_id?;
                Some(Video {
                    title: item.snippet.title,
                    description: item.snippet.description,
                    thumbnail: item
                        .snippet
                        .thumbnails
                        .and_then(|t| t.default)
                        .map(|t| t.url)
                        .unwrap_or_default(),
                    url: format!("https://www.youtube.com/watch?v={}", video_id),
                    video_id,
                })
            })
            .collect();

        Ok(VideoSearchResponse {
            videos,
            message: None,
            search_query: None,
        })
    }
}
