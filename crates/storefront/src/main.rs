//! Sweetcart page snapshot.
//!
//! Loads the product catalog and the saved cart, rebuilds the page the way
//! the widget would show it on load, and writes the rendered HTML to
//! `SWEETCART_OUTPUT` (or stdout).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use sentry::integrations::tracing as sentry_tracing;
use sweetcart_storefront::catalog::load_catalog;
use sweetcart_storefront::config::WidgetConfig;
use sweetcart_storefront::error::{AppError, Result};
use sweetcart_storefront::ledger::Ledger;
use sweetcart_storefront::render::render_page;
use sweetcart_storefront::storage::{CartStorage, FileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WidgetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Logs go to stderr so the snapshot can be piped from stdout.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sweetcart_storefront=info,sweetcart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match WidgetConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            return AppError::from(e).report();
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => e.report(),
    }
}

async fn run(config: WidgetConfig) -> Result<()> {
    tracing::debug!(?config, "Configuration loaded");

    let catalog = load_catalog(&config.catalog, config.fetch_timeout).await;
    let storage = CartStorage::with_key(
        FileStore::new(&config.storage_path),
        config.storage_key.clone(),
    );

    let mut ledger = Ledger::new();
    if let Some(entries) = storage.load() {
        ledger.restore(entries);
    }
    tracing::info!(
        entries = ledger.len(),
        active = ledger.active_count(),
        "Cart restored"
    );

    let html = render_page(&catalog, &ledger, config.currency)?;

    match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, &html).await?;
            tracing::info!(path = %path.display(), bytes = html.len(), "Snapshot written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
