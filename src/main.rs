// FinView - personal finance dashboard for the terminal
//
// A tabbed TUI behind a login gate: a static overview dashboard, a QR
// scan-and-pay flow, and a profile menu.
//
// Architecture:
// - Capabilities (auth, camera permission, decode feed, URI opener) are
//   constructed here and injected; nothing downstream touches a global
// - Session: the scan-and-pay state machine, driven by events and timers
// - TUI (ratatui): renders app state and dispatches keyboard input
// - Storage: appends completed payments to JSON Lines files
// - Event system: one mpsc channel funnels background events into the TUI

mod account;
mod auth;
mod cli;
mod config;
mod events;
mod logging;
mod payload;
mod scanner;
mod session;
mod storage;
mod theme;
mod tui;
mod util;

use anyhow::Result;
use auth::DeviceAuth;
use chrono::Utc;
use config::{Config, LogRotation, PermissionSetting};
use logging::{LogBuffer, TuiLogLayer};
use scanner::{ConfiguredPermission, DecodeSource, FileSource, PermissionStatus, ScriptedSource};
use session::SystemOpener;
use std::sync::Arc;
use storage::Storage;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::app::App;

/// Generate a unique run ID for payment log file naming
/// Format: YYYYMMDD-HHMMSS-XXXX (timestamp + 4 random hex chars)
fn generate_run_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    // Use RandomState to get a random value without adding a dependency
    let random = RandomState::new().build_hasher().finish();
    let short_hash = format!("{:04x}", random & 0xFFFF);

    format!("{}-{}", timestamp, short_hash)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --edit, --path)
    // If a command was handled, exit early
    if cli::handle_cli() {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();

    // Logs render inside the TUI; anything written to stdout would garble
    // the alternate screen, so tracing goes to the in-memory buffer and
    // optionally to rotating files.
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let log_buffer = LogBuffer::new();
    let default_filter = format!("finview={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must be kept alive for the duration of the program so
    // buffered file logs flush on exit
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            match std::fs::create_dir_all(&config.logging.file_dir) {
                Err(e) => {
                    eprintln!(
                        "Warning: Could not create log directory {:?}: {}",
                        config.logging.file_dir, e
                    );
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .init();
                    None
                }
                Ok(()) => {
                    let file_appender = match config.logging.file_rotation {
                        LogRotation::Hourly => tracing_appender::rolling::hourly(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Daily => tracing_appender::rolling::daily(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                        LogRotation::Never => tracing_appender::rolling::never(
                            &config.logging.file_dir,
                            &config.logging.file_prefix,
                        ),
                    };

                    // Non-blocking writer: file writes happen on a background thread
                    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .with(
                            tracing_subscriber::fmt::layer()
                                .json()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();

                    Some(guard)
                }
            }
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        };

    let run_id = generate_run_id();
    tracing::debug!("Run ID: {}", run_id);

    // One channel carries everything background tasks produce into the TUI
    let (event_tx, event_rx) = mpsc::channel(1000);

    // Construct the capabilities and inject them; swapping any of these for
    // a real implementation is a main()-only change
    let auth = Arc::new(DeviceAuth::new(
        config.account.name.clone(),
        config.account.email.clone(),
    ));
    let permission_decision = match config.scanner.permission {
        PermissionSetting::Grant => PermissionStatus::Granted,
        PermissionSetting::Deny => PermissionStatus::Denied,
    };
    let permission = Arc::new(ConfiguredPermission::new(
        permission_decision,
        config.scanner.prompt_delay(),
    ));
    let opener = Arc::new(SystemOpener);

    // Fire the one-shot permission request
    scanner::spawn_permission_request(&*permission, event_tx.clone());

    // Spawn the decode feed: scripted demo payloads, or tailing a file
    // written by an external scanner
    let (feed_shutdown_tx, feed_shutdown_rx) = tokio::sync::oneshot::channel();
    let feed_source: Box<dyn DecodeSource> = match (&config.feed_path, config.demo_feed) {
        (Some(path), _) => {
            tracing::info!("tailing decode feed at {:?}", path);
            Box::new(FileSource::new(path.clone()))
        }
        (None, true) => {
            tracing::info!("demo feed active");
            Box::new(ScriptedSource::demo(config.scanner.demo_interval()))
        }
        (None, false) => {
            tracing::warn!("no decode feed configured, scanner will never capture");
            Box::new(ScriptedSource::once(Vec::new(), std::time::Duration::ZERO))
        }
    };
    let feed_tx = event_tx.clone();
    let feed_handle = tokio::spawn(async move {
        scanner::run_feed(feed_source, feed_tx, feed_shutdown_rx).await;
    });

    // Spawn the payment record storage task (if enabled)
    let (record_tx, storage_handle) = if config.storage.enabled {
        let (record_tx, record_rx) = mpsc::channel(64);
        let storage = Storage::new(config.storage.dir.clone(), run_id, record_rx)?;
        let handle = tokio::spawn(storage.run());
        (Some(record_tx), Some(handle))
    } else {
        (None, None)
    };

    // Run the TUI in the main task; blocks until the user quits
    tracing::info!("Starting TUI");
    let app = App::with_config(
        &config,
        log_buffer,
        auth,
        permission,
        opener,
        event_tx,
        record_tx.clone(),
    );
    if let Err(e) = tui::run_tui(app, event_rx).await {
        tracing::error!("TUI error: {:?}", e);
    }

    tracing::info!("Shutting down...");

    // Stop the feed, then close the storage channel so the task drains
    let _ = feed_shutdown_tx.send(());
    let _ = feed_handle.await;
    drop(record_tx);
    if let Some(handle) = storage_handle {
        let _ = handle.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
