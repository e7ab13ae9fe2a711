use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::model::{Coordinate, FeedMode, Post};
use crate::pipeline::{Pipeline, PipelineEvent, PipelineEventKind, PipelineState, RunRequest};

/// What a front end should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedView<'a> {
    Loading(PipelineState),
    Empty,
    Posts(&'a [Post]),
}

/// Owns the feed mode and the displayed list, and sequences pipeline runs.
///
/// Each run gets a new generation number. Starting a run aborts the previous
/// task and any event still in flight from an older generation is dropped, so
/// the displayed list always belongs to the current mode.
pub struct FeedOrchestrator {
    pipeline: Arc<Pipeline>,
    mode: FeedMode,
    state: PipelineState,
    posts: Vec<Post>,
    location: Option<Option<Coordinate>>,
    reacquire_location: bool,
    generation: u64,
    task: Option<JoinHandle<()>>,
    tx: UnboundedSender<PipelineEvent>,
    rx: UnboundedReceiver<PipelineEvent>,
}

impl FeedOrchestrator {
    pub fn new(pipeline: Arc<Pipeline>, mode: FeedMode) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            pipeline,
            mode,
            state: PipelineState::Idle,
            posts: Vec::new(),
            location: None,
            reacquire_location: false,
            generation: 0,
            task: None,
            tx,
            rx,
        }
    }

    /// Re-run permission and acquisition on every run instead of once.
    pub fn with_reacquire_location(mut self, reacquire: bool) -> Self {
        self.reacquire_location = reacquire;
        self
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The coordinate from the last completed acquisition, if any.
    pub fn location(&self) -> Option<Coordinate> {
        self.location.flatten()
    }

    pub fn view(&self) -> FeedView<'_> {
        match self.state {
            PipelineState::Ready if self.posts.is_empty() => FeedView::Empty,
            PipelineState::Ready => FeedView::Posts(&self.posts),
            state => FeedView::Loading(state),
        }
    }

    /// First run after mount. Does nothing once a run has started.
    pub fn start(&mut self) {
        if self.state == PipelineState::Idle {
            self.begin_run();
        }
    }

    /// Switches mode and restarts the pipeline. Returns `false` if unchanged.
    pub fn set_mode(&mut self, mode: FeedMode) -> bool {
        if mode == self.mode && self.state != PipelineState::Idle {
            return false;
        }
        self.mode = mode;
        self.begin_run();
        true
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    fn begin_run(&mut self) {
        // A fix the old run already queued must not be asked for again.
        self.poll();
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.generation += 1;
        self.posts.clear();
        self.state = PipelineState::RequestingPermission;

        let known_location = if self.reacquire_location {
            None
        } else {
            self.location
        };
        let request = RunRequest {
            generation: self.generation,
            mode: self.mode,
            known_location,
        };
        debug!(generation = self.generation, mode = self.mode.as_str(), "starting pipeline run");

        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            pipeline.run(request, tx).await;
        }));
    }

    /// Applies one event. Events from superseded runs are ignored, except a
    /// finished location fix when none is known yet.
    pub fn apply(&mut self, event: PipelineEvent) -> bool {
        if event.generation != self.generation {
            if let PipelineEventKind::Located(coord) = event.kind {
                if self.location.is_none() {
                    debug!(event_generation = event.generation, "keeping location from superseded run");
                    self.location = Some(coord);
                    return true;
                }
            }
            debug!(
                event_generation = event.generation,
                current = self.generation,
                "dropping event from superseded run"
            );
            return false;
        }

        match event.kind {
            PipelineEventKind::Entered(state) => {
                debug!(generation = self.generation, ?state, "pipeline state");
                self.state = state;
            }
            PipelineEventKind::Located(coord) => {
                self.location = Some(coord);
            }
            PipelineEventKind::Loaded(posts) => {
                self.posts = posts;
                self.state = PipelineState::Ready;
                self.task = None;
            }
        }
        true
    }

    /// Applies every event already queued. Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Waits for the next queued event and applies it.
    pub async fn next_event(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Drives the current run until it reaches `Ready`.
    pub async fn settle(&mut self) {
        while self.state != PipelineState::Ready && self.state != PipelineState::Idle {
            self.next_event().await;
        }
    }
}

impl Drop for FeedOrchestrator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FeedBackend;
    use crate::error::Result;
    use crate::loader::FeedLoader;
    use crate::location::StaticLocationProvider;
    use crate::model::PostId;
    use crate::telemetry::TelemetrySubmitter;
    use async_trait::async_trait;
    use std::time::Duration;

    struct EmptyBackend;

    #[async_trait]
    impl FeedBackend for EmptyBackend {
        async fn demo_feed(&self, _timeout: Duration) -> Result<Vec<Post>> {
            Ok(Vec::new())
        }

        async fn news_feed(&self, _coord: Option<Coordinate>, _timeout: Duration) -> Result<Vec<Post>> {
            Ok(Vec::new())
        }

        async fn submit_location(&self, _coord: Coordinate, _timeout: Duration) -> Result<()> {
            Ok(())
        }
    }

    fn orchestrator() -> FeedOrchestrator {
        let backend: Arc<dyn FeedBackend> = Arc::new(EmptyBackend);
        let pipeline = Pipeline::new(
            Arc::new(StaticLocationProvider::denied()),
            FeedLoader::new(backend.clone()),
            TelemetrySubmitter::new(backend),
        );
        FeedOrchestrator::new(Arc::new(pipeline), FeedMode::Demo)
    }

    fn post(id: i64) -> Post {
        Post {
            id: PostId::Number(id),
            username: "a".to_string(),
            caption: String::new(),
            image_url: None,
            likes: None,
            flag: String::new(),
            risk_score: None,
            ai_image_probability: None,
        }
    }

    #[tokio::test]
    async fn test_stale_events_are_ignored() {
        let mut orch = orchestrator();
        orch.start();
        orch.toggle_mode();
        assert_eq!(orch.generation(), 2);

        let stale = PipelineEvent {
            generation: 1,
            kind: PipelineEventKind::Loaded(vec![post(1)]),
        };
        assert!(!orch.apply(stale));
        assert!(orch.posts().is_empty());
        assert!(orch.state().is_loading());
    }

    #[tokio::test]
    async fn test_superseded_location_fix_is_kept() {
        let mut orch = orchestrator();
        orch.start();
        orch.toggle_mode();

        let fix = Coordinate {
            latitude: 40.7128,
            longitude: -74.006,
            accuracy: 30.0,
        };
        assert!(orch.apply(PipelineEvent {
            generation: 1,
            kind: PipelineEventKind::Located(Some(fix)),
        }));
        assert_eq!(orch.location(), Some(fix));

        // Only the first fix counts; later stale ones are dropped.
        assert!(!orch.apply(PipelineEvent {
            generation: 1,
            kind: PipelineEventKind::Located(None),
        }));
        assert_eq!(orch.location(), Some(fix));
    }

    #[tokio::test]
    async fn test_loaded_event_replaces_list() {
        let mut orch = orchestrator();
        orch.start();

        let current = orch.generation();
        assert!(orch.apply(PipelineEvent {
            generation: current,
            kind: PipelineEventKind::Loaded(vec![post(1), post(2)]),
        }));
        assert_eq!(orch.state(), PipelineState::Ready);
        assert!(matches!(orch.view(), FeedView::Posts(posts) if posts.len() == 2));
    }

    #[tokio::test]
    async fn test_toggle_invalidates_list_immediately() {
        let mut orch = orchestrator();
        orch.start();
        let generation = orch.generation();
        orch.apply(PipelineEvent {
            generation,
            kind: PipelineEventKind::Loaded(vec![post(1)]),
        });

        orch.toggle_mode();
        assert_eq!(orch.mode(), FeedMode::Live);
        assert!(orch.posts().is_empty());
        assert_eq!(orch.view(), FeedView::Loading(PipelineState::RequestingPermission));
    }

    #[tokio::test]
    async fn test_set_same_mode_is_noop() {
        let mut orch = orchestrator();
        orch.start();
        assert!(!orch.set_mode(FeedMode::Demo));
        assert_eq!(orch.generation(), 1);
    }

    #[test]
    fn test_idle_view_is_loading() {
        let orch = orchestrator();
        assert_eq!(orch.view(), FeedView::Loading(PipelineState::Idle));
    }
}
