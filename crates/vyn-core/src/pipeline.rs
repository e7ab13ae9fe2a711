//! One run of the feed pipeline
//!
//! A run walks permission → position → (telemetry ∥ feed load) and reports
//! every step as a [`PipelineEvent`] tagged with the run's generation. It never
//! fails: each step degrades forward into the next one.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::loader::FeedLoader;
use crate::location::{self, LocationProvider};
use crate::model::{Coordinate, FeedMode, Post};
use crate::telemetry::TelemetrySubmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    RequestingPermission,
    AcquiringLocation,
    LoadingFeed,
    Ready,
}

impl PipelineState {
    pub fn is_loading(&self) -> bool {
        !matches!(self, PipelineState::Idle | PipelineState::Ready)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::RequestingPermission => "Requesting location permission",
            PipelineState::AcquiringLocation => "Finding your location",
            PipelineState::LoadingFeed => "Loading feed",
            PipelineState::Ready => "Ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEventKind {
    Entered(PipelineState),
    /// A fresh acquisition finished. Not sent when a known location is reused.
    Located(Option<Coordinate>),
    Loaded(Vec<Post>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineEvent {
    pub generation: u64,
    pub kind: PipelineEventKind,
}

/// Parameters for a single run.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest {
    pub generation: u64,
    pub mode: FeedMode,
    /// `Some(..)` reuses a previous acquisition (which may itself be `None`).
    pub known_location: Option<Option<Coordinate>>,
}

pub struct Pipeline {
    provider: Arc<dyn LocationProvider>,
    loader: FeedLoader,
    telemetry: TelemetrySubmitter,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        loader: FeedLoader,
        telemetry: TelemetrySubmitter,
    ) -> Self {
        Self {
            provider,
            loader,
            telemetry,
        }
    }

    pub async fn run(&self, request: RunRequest, events: UnboundedSender<PipelineEvent>) {
        let generation = request.generation;
        let emit = |kind: PipelineEventKind| {
            // The orchestrator is gone; nothing left to report to.
            let _ = events.send(PipelineEvent { generation, kind });
        };

        info!(generation, mode = request.mode.as_str(), "pipeline run started");

        let coord = match request.known_location {
            Some(known) => {
                debug!(generation, "reusing previously acquired location");
                emit(PipelineEventKind::Entered(PipelineState::AcquiringLocation));
                known
            }
            None => {
                let granted = location::request_permission(self.provider.as_ref()).await;
                let coord = if granted {
                    emit(PipelineEventKind::Entered(PipelineState::AcquiringLocation));
                    location::capture_position(self.provider.as_ref()).await
                } else {
                    None
                };
                emit(PipelineEventKind::Located(coord));

                if let Some(coord) = coord {
                    self.telemetry.spawn(coord);
                }
                coord
            }
        };

        emit(PipelineEventKind::Entered(PipelineState::LoadingFeed));
        let posts = self.loader.load(request.mode, coord).await;
        info!(generation, count = posts.len(), "pipeline run finished");
        emit(PipelineEventKind::Loaded(posts));
    }
}
