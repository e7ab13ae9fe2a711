use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::FeedBackend;
use crate::model::Coordinate;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Best-effort upload of an acquired coordinate.
///
/// `submit` returns nothing: the only trace of a failure is a log line.
#[derive(Clone)]
pub struct TelemetrySubmitter {
    backend: Arc<dyn FeedBackend>,
    timeout: Duration,
}

impl TelemetrySubmitter {
    pub fn new(backend: Arc<dyn FeedBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn submit(&self, coord: Coordinate) {
        let request = self.backend.submit_location(coord, self.timeout);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(())) => debug!("location submitted"),
            Ok(Err(e)) => warn!(error = %e, "location submission failed"),
            Err(_) => warn!("location submission timed out"),
        }
    }

    /// Runs `submit` on its own task. The handle is dropped, not awaited.
    pub fn spawn(&self, coord: Coordinate) {
        let submitter = self.clone();
        tokio::spawn(async move {
            submitter.submit(coord).await;
        });
    }
}
