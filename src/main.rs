//! Nudge O'Clock - A countdown timer that nudges you along the way
//!
//! This is the main entry point for the nudge-oclock server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use nudge_oclock::{
    api::create_router,
    config::Config,
    services::{sink_for, DesktopNotifier, ThemeStore},
    state::AppState,
    tasks::{spawn_nudge_dispatcher, Effects},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("nudge_oclock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting nudge-oclock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, preview={}min, mute={}, notifications={}",
        config.host, config.port, config.minutes, config.mute, !config.no_notifications
    );

    let theme = match config.theme_path() {
        Some(path) => ThemeStore::load(path),
        None => {
            warn!("No config directory found, theme preference will not be saved");
            ThemeStore::in_memory()
        }
    };

    let state = Arc::new(AppState::new(theme, config.minutes));

    // Chimes and notifications react to timer events
    spawn_nudge_dispatcher(
        Arc::clone(&state),
        Effects {
            tones: sink_for(config.mute),
            notifier: Arc::new(DesktopNotifier::new(!config.no_notifications)),
        },
    );

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start    - Start a countdown with nudges");
    info!("  POST /timer/pause    - Pause or resume");
    info!("  POST /timer/reset    - Stop and clear");
    info!("  GET  /timer/status   - Current countdown, nudges and progress");
    info!("  POST /nudges/preview - Marker layout for a configuration");
    info!("  GET  /events         - Server-sent timer events");
    info!("  GET  /theme          - Dark-mode preference");
    info!("  POST /theme/toggle   - Flip dark mode");
    info!("  GET  /health         - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stop the ticker before the runtime goes away
    if let Err(e) = state.reset() {
        warn!("Failed to reset timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
