use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, VynError};
use crate::model::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Accuracy tiers a provider may be asked for, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Lowest,
    Low,
    Balanced,
    High,
    Highest,
}

/// Source of the device's position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinate>;
}

/// Upper bound on a single position fix.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(15);

/// Step 1: foreground permission. Anything but an explicit grant is `false`.
pub async fn request_permission(provider: &dyn LocationProvider) -> bool {
    match provider.request_permission().await {
        Ok(status) if status.is_granted() => true,
        Ok(status) => {
            warn!(?status, "location permission not granted, continuing without coordinates");
            false
        }
        Err(e) => {
            warn!(error = %e, "location permission request failed, continuing without coordinates");
            false
        }
    }
}

/// Step 2: one fix at the balanced tier. Errors and timeouts yield `None`.
pub async fn capture_position(provider: &dyn LocationProvider) -> Option<Coordinate> {
    let fix = tokio::time::timeout(POSITION_TIMEOUT, provider.current_position(Accuracy::Balanced));
    match fix.await.map_err(VynError::from).and_then(|r| r) {
        Ok(coord) => {
            debug!(latitude = coord.latitude, longitude = coord.longitude, "location acquired");
            Some(coord)
        }
        Err(e) => {
            warn!(error = %e, "location unavailable, continuing without coordinates");
            None
        }
    }
}

/// Asks for permission and a single fix. Any failure yields `None`.
///
/// Nothing is retried or cached here; callers decide whether to reuse a
/// previous result.
pub async fn acquire(provider: &dyn LocationProvider) -> Option<Coordinate> {
    if !request_permission(provider).await {
        return None;
    }
    capture_position(provider).await
}

/// A provider backed by a fixed, user-supplied position.
///
/// Terminals have no positioning hardware, so "permission" is the user's
/// choice to share a configured coordinate.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationProvider {
    share: bool,
    position: Option<Coordinate>,
}

impl StaticLocationProvider {
    pub fn new(share: bool, position: Option<Coordinate>) -> Self {
        Self { share, position }
    }

    pub fn denied() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        if !self.share {
            return Ok(PermissionStatus::Denied);
        }
        if self.position.is_none() {
            return Ok(PermissionStatus::Undetermined);
        }
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinate> {
        if !self.share {
            return Err(VynError::PermissionDenied);
        }
        self.position
            .ok_or_else(|| VynError::LocationUnavailable("no position configured".to_string()))
    }
}
