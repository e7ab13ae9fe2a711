use thiserror::Error;

pub type Result<T> = std::result::Result<T, VynError>;

/// Everything that can go wrong along the feed pipeline.
///
/// None of these ever reach the user directly: the pipeline degrades locally
/// (no coordinate, dropped telemetry, empty feed) and logs the cause.
#[derive(Debug, Error)]
pub enum VynError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("network error: {0}")]
    NetworkFailure(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for VynError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VynError::Timeout
        } else if err.is_decode() {
            VynError::MalformedResponse(err.to_string())
        } else {
            VynError::NetworkFailure(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for VynError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        VynError::Timeout
    }
}
