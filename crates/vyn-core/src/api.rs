use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Result, VynError};
use crate::model::{Coordinate, Post};

/// The three backend calls the pipeline depends on.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// `GET /api/feed`: the analyzed demo dataset.
    async fn demo_feed(&self, timeout: Duration) -> Result<Vec<Post>>;

    /// `GET /api/news`: location-scoped news. Coordinates are omitted when unknown.
    async fn news_feed(&self, coord: Option<Coordinate>, timeout: Duration) -> Result<Vec<Post>>;

    /// `POST /api/submit-location`. The response body is ignored.
    async fn submit_location(&self, coord: Coordinate, timeout: Duration) -> Result<()>;
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Option<Vec<Post>>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(VynError::NetworkFailure(format!(
            "backend responded with status {}",
            status
        )));
    }
    Ok(())
}

#[async_trait]
impl FeedBackend for ApiClient {
    async fn demo_feed(&self, timeout: Duration) -> Result<Vec<Post>> {
        let response = self
            .client
            .get(self.url("/api/feed"))
            .timeout(timeout)
            .send()
            .await?;
        ensure_success(&response)?;

        let posts: Vec<Post> = response.json().await?;
        Ok(posts)
    }

    async fn news_feed(&self, coord: Option<Coordinate>, timeout: Duration) -> Result<Vec<Post>> {
        let mut request = self.client.get(self.url("/api/news")).timeout(timeout);
        if let Some(coord) = coord {
            request = request.query(&[("lat", coord.latitude), ("lon", coord.longitude)]);
        }

        let response = request.send().await?;
        ensure_success(&response)?;

        let body: NewsResponse = response.json().await?;
        Ok(body.news.unwrap_or_default())
    }

    async fn submit_location(&self, coord: Coordinate, timeout: Duration) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/submit-location"))
            .timeout(timeout)
            .json(&coord)
            .send()
            .await?;
        ensure_success(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/feed"), "http://localhost:5000/api/feed");
    }

    #[test]
    fn test_news_response_missing_field_is_empty() {
        let body: NewsResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(body.news.unwrap_or_default().is_empty());

        let body: NewsResponse = serde_json::from_str(r#"{"news": null}"#).unwrap();
        assert!(body.news.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_location_body_shape() {
        let coord = Coordinate {
            latitude: 1.5,
            longitude: -2.25,
            accuracy: 10.0,
        };
        let body = serde_json::to_value(coord).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"latitude": 1.5, "longitude": -2.25, "accuracy": 10.0})
        );
    }
}
