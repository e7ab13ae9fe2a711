pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod telemetry;
pub mod theme;

// Re-export main types for convenience
pub use api::{ApiClient, FeedBackend};
pub use classify::{FlagBand, PostPresentation, RiskBand};
pub use config::Config;
pub use error::{Result, VynError};
pub use loader::FeedLoader;
pub use location::{Accuracy, LocationProvider, PermissionStatus, StaticLocationProvider};
pub use model::{Coordinate, FeedMode, Post, PostId};
pub use orchestrator::{FeedOrchestrator, FeedView};
pub use pipeline::{Pipeline, PipelineEvent, PipelineEventKind, PipelineState};
pub use telemetry::TelemetrySubmitter;
pub use theme::{Rgb, Theme};
