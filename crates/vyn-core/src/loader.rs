use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::FeedBackend;
use crate::error::Result;
use crate::model::{Coordinate, FeedMode, Post};

/// The demo feed is analyzed server-side on every request and is slow.
pub const DEFAULT_DEMO_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LIVE_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct FeedLoader {
    backend: Arc<dyn FeedBackend>,
    demo_timeout: Duration,
    live_timeout: Duration,
}

impl FeedLoader {
    pub fn new(backend: Arc<dyn FeedBackend>) -> Self {
        Self {
            backend,
            demo_timeout: DEFAULT_DEMO_TIMEOUT,
            live_timeout: DEFAULT_LIVE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, demo: Duration, live: Duration) -> Self {
        self.demo_timeout = demo;
        self.live_timeout = live;
        self
    }

    pub fn timeout_for(&self, mode: FeedMode) -> Duration {
        match mode {
            FeedMode::Demo => self.demo_timeout,
            FeedMode::Live => self.live_timeout,
        }
    }

    /// Fetches the feed for `mode`. Every failure resolves to an empty list.
    pub async fn load(&self, mode: FeedMode, coord: Option<Coordinate>) -> Vec<Post> {
        match self.try_load(mode, coord).await {
            Ok(posts) => {
                info!(mode = mode.as_str(), count = posts.len(), "feed loaded");
                posts
            }
            Err(e) => {
                warn!(mode = mode.as_str(), error = %e, "feed load failed, showing empty feed");
                Vec::new()
            }
        }
    }

    async fn try_load(&self, mode: FeedMode, coord: Option<Coordinate>) -> Result<Vec<Post>> {
        let timeout = self.timeout_for(mode);
        let request = async {
            match mode {
                FeedMode::Demo => self.backend.demo_feed(timeout).await,
                FeedMode::Live => self.backend.news_feed(coord, timeout).await,
            }
        };
        tokio::time::timeout(timeout, request).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VynError;
    use crate::model::PostId;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        news_coords: Mutex<Vec<Option<Coordinate>>>,
        fail: bool,
        delay: Option<Duration>,
    }

    fn sample(id: i64) -> Post {
        Post {
            id: PostId::Number(id),
            username: format!("user{}", id),
            caption: String::new(),
            image_url: None,
            likes: None,
            flag: "Safe".to_string(),
            risk_score: Some(10.0),
            ai_image_probability: None,
        }
    }

    #[async_trait]
    impl FeedBackend for RecordingBackend {
        async fn demo_feed(&self, _timeout: Duration) -> Result<Vec<Post>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(VynError::NetworkFailure("connection refused".to_string()));
            }
            Ok(vec![sample(1), sample(2)])
        }

        async fn news_feed(&self, coord: Option<Coordinate>, _timeout: Duration) -> Result<Vec<Post>> {
            self.news_coords.lock().unwrap().push(coord);
            if self.fail {
                return Err(VynError::MalformedResponse("expected object".to_string()));
            }
            Ok(vec![sample(3)])
        }

        async fn submit_location(&self, _coord: Coordinate, _timeout: Duration) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_demo_preserves_source_order() {
        let loader = FeedLoader::new(Arc::new(RecordingBackend::default()));
        let posts = loader.load(FeedMode::Demo, None).await;

        let ids: Vec<String> = posts.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_live_without_coordinate_still_requests() {
        let backend = Arc::new(RecordingBackend::default());
        let loader = FeedLoader::new(backend.clone());

        let posts = loader.load(FeedMode::Live, None).await;
        assert_eq!(posts.len(), 1);
        assert_eq!(*backend.news_coords.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_failures_yield_empty_feed() {
        let loader = FeedLoader::new(Arc::new(RecordingBackend {
            fail: true,
            ..Default::default()
        }));

        assert!(loader.load(FeedMode::Demo, None).await.is_empty());
        assert!(loader.load(FeedMode::Live, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_a_hard_cutoff() {
        let loader = FeedLoader::new(Arc::new(RecordingBackend {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        }))
        .with_timeouts(Duration::from_millis(20), Duration::from_millis(20));

        let started = std::time::Instant::now();
        assert!(loader.load(FeedMode::Demo, None).await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_demo_timeout_is_longer() {
        let loader = FeedLoader::new(Arc::new(RecordingBackend::default()));
        assert!(loader.timeout_for(FeedMode::Demo) > loader.timeout_for(FeedMode::Live));
    }
}
