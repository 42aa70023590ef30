//! Dashboard watcher binary.
//!
//! Polls the dashboard for new analyses; on a changed timestamp it
//! screenshots the analyzed page, runs an AI audit, and applies the
//! resulting high-priority fixes. Ctrl+C stops the loop and closes the
//! browser.

mod dashboard;
mod fixes;
mod watcher;

use clap::Parser;
use dashboard::DashboardClient;
use mcp_vision_core::backend::BackendKind;
use mcp_vision_core::VisionConfig;
use std::path::PathBuf;
use std::time::Duration;
use watcher::{Watcher, WatcherConfig};

#[derive(Parser)]
#[command(name = "ui-watcher", about = "Dashboard watcher with AI-powered UI audits")]
struct Cli {
    /// Dashboard base URL to poll
    #[clap(long, default_value = "http://localhost:3002")]
    dashboard_url: String,

    /// Poll interval in seconds
    #[clap(long, default_value = "2")]
    interval_secs: u64,

    /// Directory to save screenshots into
    #[clap(long, default_value = "screenshots")]
    screenshots_dir: PathBuf,

    /// Directory holding the files the dashboard analyzes
    #[clap(long, default_value = "../local")]
    local_dir: PathBuf,

    /// Vision backend: openrouter or gemini
    #[clap(long, default_value = "openrouter")]
    backend: BackendKind,

    /// Model override (each backend has its own default)
    #[clap(long)]
    model: Option<String>,

    /// Custom Chrome/Chromium binary path
    #[clap(long)]
    browser_path: Option<String>,

    /// Pass --no-sandbox to the browser (needed in most containers)
    #[clap(long)]
    no_sandbox: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    server_common::init_logging();

    let key_var = cli.backend.key_var();
    if std::env::var(key_var).ok().filter(|k| !k.is_empty()).is_none() {
        tracing::warn!(
            "{} not set; the AI audit step will be skipped until it is configured",
            key_var
        );
    }

    let vision = VisionConfig {
        backend: cli.backend,
        model: cli.model,
    };

    let config = WatcherConfig {
        interval: Duration::from_secs(cli.interval_secs),
        screenshots_dir: cli.screenshots_dir,
        local_dir: cli.local_dir,
        browser_path: cli.browser_path,
        no_sandbox: cli.no_sandbox,
    };

    let mut watcher = Watcher::new(DashboardClient::new(cli.dashboard_url), vision, config);

    let result = tokio::select! {
        result = watcher.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, stopping watcher");
            Ok(())
        }
    };

    watcher.shutdown().await;
    result
}
