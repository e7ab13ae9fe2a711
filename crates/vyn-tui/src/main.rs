use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vyn_core::{
    ApiClient, Config, Coordinate, FeedBackend, FeedLoader, FeedMode, FeedOrchestrator, Pipeline,
    PostPresentation, StaticLocationProvider, TelemetrySubmitter,
};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Demo,
    Live,
}

impl From<ModeArg> for FeedMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Demo => FeedMode::Demo,
            ModeArg::Live => FeedMode::Live,
        }
    }
}

#[derive(Parser)]
#[command(name = "vyn")]
#[command(version, about = "Social feed with scam and AI-image trust annotations")]
struct Cli {
    /// Backend base URL (overrides VYN_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Feed to open with
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Start with the light theme
    #[arg(long)]
    light: bool,

    /// Latitude to report as the device position
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude to report as the device position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Horizontal accuracy in meters for --lat/--lon
    #[arg(long, default_value_t = 100.0)]
    accuracy: f64,

    /// Deny location access for this session
    #[arg(long)]
    no_location: bool,

    /// Load the feed once, print it and exit
    #[arg(long)]
    print: bool,

    /// Log file for the interactive UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const DEFAULT_LOG_FILTER: &str = "vyn=info,vyn_core=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs go to stderr in print mode. The interactive UI owns the terminal,
/// so there they go to a file or nowhere.
fn init_logging(cli: &Cli) -> Result<()> {
    if cli.print {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => match dirs::cache_dir() {
            Some(dir) => dir.join("vyn").join("vyn.log"),
            None => return Ok(()),
        },
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_feed(cli: &Cli, config: &Config, api_url: &str) -> FeedOrchestrator {
    let backend: Arc<dyn FeedBackend> = Arc::new(ApiClient::new(api_url));

    let position = match (cli.lat, cli.lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinate {
            latitude,
            longitude,
            accuracy: cli.accuracy,
        }),
        _ => config.location,
    };
    let share = !cli.no_location && config.share_location();
    let provider = Arc::new(StaticLocationProvider::new(share, position));

    let loader = FeedLoader::new(backend.clone())
        .with_timeouts(config.demo_timeout(), config.live_timeout());
    let pipeline = Pipeline::new(provider, loader, TelemetrySubmitter::new(backend));

    let mode = cli.mode.map(FeedMode::from).unwrap_or_else(|| config.feed_mode());
    FeedOrchestrator::new(Arc::new(pipeline), mode)
        .with_reacquire_location(config.reacquire_location.unwrap_or(false))
}

async fn print_feed(mut feed: FeedOrchestrator) -> Result<()> {
    feed.start();
    feed.settle().await;

    if feed.posts().is_empty() {
        println!("No posts available");
        return Ok(());
    }

    let theme = vyn_core::Theme::default();
    for post in feed.posts() {
        let view = PostPresentation::new(post, &theme);
        let flag = if view.flag_label.is_empty() { "-" } else { view.flag_label.as_str() };
        println!("@{} [{}] risk {} ({})", post.username, flag, view.risk_label, view.risk_band.as_str());
        if !post.caption.is_empty() {
            println!("  {}", post.caption);
        }
        if let Some(probability) = &view.ai_probability {
            println!("  AI image probability: {}", probability);
        }
        if let Some(likes) = &view.likes {
            println!("  {} likes", likes);
        }
    }
    Ok(())
}

async fn run_tui(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(tui::TICK_RATE);

    app.feed.start();
    let result = event_loop(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn event_loop(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => handler::handle_event(app, event)?,
            changed = app.feed.next_event() => {
                if changed {
                    app.on_feed_changed();
                }
            }
            else => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    // An explicit flag beats the environment, which beats the file.
    let api_url = match &cli.api_url {
        Some(url) => url.trim().to_string(),
        None => config.api_url(),
    };
    info!(api_url = %api_url, print = cli.print, "vyn starting");

    let feed = build_feed(&cli, &config, &api_url);

    if cli.print {
        return print_feed(feed).await;
    }

    let dark_mode = !cli.light && config.dark_mode();
    let app = App::new(feed, dark_mode, api_url).with_config_path(Config::get_config_path().ok());
    run_tui(app).await
}
