use std::path::PathBuf;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::warn;
use vyn_core::{Config, FeedMode, FeedOrchestrator, FeedView, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    DarkMode,
    LiveFeed,
}

impl SettingsItem {
    pub fn all() -> [SettingsItem; 2] {
        [SettingsItem::DarkMode, SettingsItem::LiveFeed]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsItem::DarkMode => "Dark mode",
            SettingsItem::LiveFeed => "Live news (uses location)",
        }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub dark_mode: bool,

    // Feed
    pub feed: FeedOrchestrator,
    pub feed_state: ListState,

    // Settings modal
    pub show_settings: bool,
    pub settings_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Feed area for mouse hit-testing (updated during render)
    pub feed_area: Option<Rect>,

    // Where the theme choice is persisted; `None` keeps it in memory only
    pub config_path: Option<PathBuf>,
    pub api_url: String,
}

impl App {
    pub fn new(feed: FeedOrchestrator, dark_mode: bool, api_url: String) -> Self {
        Self {
            should_quit: false,
            dark_mode,
            feed,
            feed_state: ListState::default(),
            show_settings: false,
            settings_state: ListState::default(),
            animation_frame: 0,
            feed_area: None,
            config_path: None,
            api_url,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn theme(&self) -> &'static Theme {
        Theme::for_dark_mode(self.dark_mode)
    }

    pub fn mode(&self) -> FeedMode {
        self.feed.mode()
    }

    /// Called after the orchestrator applied an event.
    pub fn on_feed_changed(&mut self) {
        match self.feed.view() {
            FeedView::Posts(posts) => {
                let selected = self.feed_state.selected().unwrap_or(0).min(posts.len() - 1);
                self.feed_state.select(Some(selected));
            }
            FeedView::Empty | FeedView::Loading(_) => {
                self.feed_state = ListState::default();
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        self.feed.toggle_mode();
        self.feed_state = ListState::default();
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.persist_theme();
    }

    fn persist_theme(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        // Never replace a file we could not read with defaults.
        let mut config = match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "config unreadable, theme not saved");
                return;
            }
        };
        config.dark_mode = Some(self.dark_mode);
        if let Err(e) = config.save_to(path) {
            warn!(error = %e, "could not save theme preference");
        }
    }

    // Feed navigation
    fn post_count(&self) -> usize {
        match self.feed.view() {
            FeedView::Posts(posts) => posts.len(),
            _ => 0,
        }
    }

    pub fn feed_nav_down(&mut self) {
        let len = self.post_count();
        if len > 0 {
            let i = self.feed_state.selected().unwrap_or(0);
            self.feed_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn feed_nav_up(&mut self) {
        if self.post_count() > 0 {
            let i = self.feed_state.selected().unwrap_or(0);
            self.feed_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn feed_nav_first(&mut self) {
        if self.post_count() > 0 {
            self.feed_state.select(Some(0));
        }
    }

    pub fn feed_nav_last(&mut self) {
        let len = self.post_count();
        if len > 0 {
            self.feed_state.select(Some(len - 1));
        }
    }

    // Settings modal
    pub fn open_settings(&mut self) {
        self.show_settings = true;
        self.settings_state.select(Some(0));
    }

    pub fn close_settings(&mut self) {
        self.show_settings = false;
    }

    pub fn settings_nav_down(&mut self) {
        let len = SettingsItem::all().len();
        let i = self.settings_state.selected().unwrap_or(0);
        self.settings_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn settings_nav_up(&mut self) {
        let i = self.settings_state.selected().unwrap_or(0);
        self.settings_state.select(Some(i.saturating_sub(1)));
    }

    pub fn setting_enabled(&self, item: SettingsItem) -> bool {
        match item {
            SettingsItem::DarkMode => self.dark_mode,
            SettingsItem::LiveFeed => self.mode() == FeedMode::Live,
        }
    }

    pub fn activate_setting(&mut self) {
        let selected = self
            .settings_state
            .selected()
            .and_then(|i| SettingsItem::all().get(i).copied());
        match selected {
            Some(SettingsItem::DarkMode) => self.toggle_theme(),
            Some(SettingsItem::LiveFeed) => self.toggle_mode(),
            None => {}
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.feed.state().is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
