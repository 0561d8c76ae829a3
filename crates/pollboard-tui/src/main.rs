// Pollboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build backend client and credential store
// 4. Create mpsc channels
// 5. Subscribe to live updates
// 6. Spawn app event loop
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use pollboard_core::app::{self, AppState};
use pollboard_core::config;
use pollboard_core::credentials::FileCredentialStore;
use pollboard_net::{subscribe, HttpPollApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Pollboard starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: backend={}, live updates {}",
        config.backend_url(),
        if config.live.enabled { "on" } else { "off" }
    );

    let credential_path = config
        .storage
        .credential_path
        .clone()
        .context("no credential path configured")?;
    let credentials = FileCredentialStore::new(credential_path);
    let api = Arc::new(HttpPollApi::from_config(&config));

    let (live_tx, live_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // Held for the whole session; dropping it stops the listener.
    let subscription = if config.live.enabled {
        Some(subscribe(config.live_url(), live_tx))
    } else {
        drop(live_tx);
        None
    };

    let state = AppState::new(config, Box::new(credentials));
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(api, cmd_rx, live_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    if let Err(e) = pollboard_tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    drop(subscription);

    info!("Pollboard shut down cleanly");
    Ok(())
}

/// Log to a file; the terminal belongs to the TUI.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("pollboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pollboard_core=info,pollboard_net=info,pollboard_tui=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
