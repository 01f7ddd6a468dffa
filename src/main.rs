//! Entry point for the flipbook viewer.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load the flipbook manifest via `document`.
//! - Load user configuration from `conf/config.toml`.
//! - Resolve the starting page (locator parameter, then cached bookmark).
//! - Launch the GUI application.

mod app;
mod cache;
mod config;
mod document;
mod engine;
mod geometry;
mod link;
mod media;

use crate::app::run_app;
use crate::cache::load_bookmark;
use crate::config::load_config;
use crate::document::load_document;
use crate::link::DocumentLocator;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Consume a pending Ctrl-C request, if any. Polled from the app's tick
/// handler so teardown runs on the UI thread.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let raw_locator = parse_args()?;
    let mut config = load_config(Path::new("conf/config.toml"));
    if let Ok(base) = env::var("FLIPLEAF_MEDIA_BASE") {
        info!(%base, "Media base overridden from environment");
        config.media_base_url = base;
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());
    install_sigint_handler();

    let locator = DocumentLocator::parse(&raw_locator);
    info!(
        source = %locator.source,
        requested_page = ?locator.page,
        "Opening flipbook"
    );
    let document = load_document(&locator.source)?;
    let total_pages = document.page_count();

    let start_page = locator
        .start_index(total_pages)
        .or_else(|| {
            let cached = load_bookmark(&locator.source).filter(|page| *page < total_pages);
            if let Some(page) = cached {
                info!(page = page + 1, "Resuming from cached page");
            }
            cached
        })
        .unwrap_or(0);

    run_app(document, config, locator, start_page).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args() -> Result<String> {
    let mut args = env::args().skip(1);
    args.next()
        .ok_or_else(|| anyhow!("Usage: flipleaf <path-or-url-to-flipbook>[?page=N]"))
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| SIGINT_REQUESTED.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {err}");
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
