//! The watch loop: poll the dashboard, diff the analysis timestamp, and on a
//! change run the screenshot → audit → fix pipeline.
//!
//! One long-lived headless browser serves all screenshots (a page is opened
//! and closed per shot). The loop is fully sequential: a fixed-interval
//! sleep, no backoff, no retries; every step's failure is logged and the
//! loop continues.

use crate::dashboard::{DashboardAnalysis, DashboardClient};
use crate::fixes;
use anyhow::{Context, Result};
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use futures::StreamExt;
use mcp_vision_core::backend::backend_from_env;
use mcp_vision_core::VisionConfig;
use std::path::PathBuf;
use std::time::Duration;

pub struct WatcherConfig {
    pub interval: Duration,
    /// Where captured PNGs are written.
    pub screenshots_dir: PathBuf,
    /// Directory holding the files the dashboard analyzes.
    pub local_dir: PathBuf,
    pub browser_path: Option<String>,
    pub no_sandbox: bool,
}

/// True when the observed timestamp differs from the last recorded one.
/// Repeated identical timestamps never re-trigger.
pub fn should_trigger(last: Option<&str>, current: &str) -> bool {
    last != Some(current)
}

pub struct Watcher {
    dashboard: DashboardClient,
    vision: VisionConfig,
    config: WatcherConfig,
    browser: Option<Browser>,
    last_analyzed_at: Option<String>,
}

impl Watcher {
    pub fn new(dashboard: DashboardClient, vision: VisionConfig, config: WatcherConfig) -> Self {
        Self {
            dashboard,
            vision,
            config,
            browser: None,
            last_analyzed_at: None,
        }
    }

    /// Run the watch loop until cancelled. Errors out only when the
    /// dashboard is down at startup.
    pub async fn run(&mut self) -> Result<()> {
        if !self.dashboard.health().await {
            anyhow::bail!(
                "dashboard at {} is not responding; start it first",
                self.dashboard.base_url()
            );
        }

        std::fs::create_dir_all(&self.config.screenshots_dir).with_context(|| {
            format!(
                "Failed to create screenshots dir: {}",
                self.config.screenshots_dir.display()
            )
        })?;

        tracing::info!(
            dashboard = %self.dashboard.base_url(),
            interval_secs = self.config.interval.as_secs(),
            "dashboard is up, starting watch loop"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }

    /// Close the browser, best-effort.
    pub async fn shutdown(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!(error = %e, "browser close failed");
            }
            let _ = browser.wait().await;
            tracing::info!("browser stopped");
        }
    }

    async fn poll_once(&mut self) {
        let Some(analysis) = self.dashboard.latest_analysis().await else {
            return;
        };

        let (Some(analyzed_at), Some(filename)) =
            (analysis.analyzed_at.clone(), analysis.filename.clone())
        else {
            return;
        };

        if !should_trigger(self.last_analyzed_at.as_deref(), &analyzed_at) {
            return;
        }

        tracing::info!(filename = %filename, analyzed_at = %analyzed_at, "new analysis detected");

        match self.capture(&filename).await {
            Ok(png_bytes) => self.audit_and_fix(&filename, &png_bytes, &analysis).await,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to take screenshot");
            }
        }

        self.last_analyzed_at = Some(analyzed_at);
    }

    /// Screenshot the dashboard's copy of the file and save it to disk.
    async fn capture(&mut self, filename: &str) -> Result<Vec<u8>> {
        let url = self.dashboard.local_page_url(filename);

        let browser = self.ensure_browser().await?;
        let page = browser
            .new_page(url.as_str())
            .await
            .with_context(|| format!("Failed to open {}", url))?;

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(true)
            .build();

        let png_bytes = page.screenshot(params).await.context("Screenshot failed")?;

        if let Err(e) = page.close().await {
            tracing::warn!(error = %e, "page close failed");
        }

        let shot_path = self
            .config
            .screenshots_dir
            .join(format!("{}_{}.png", filename, chrono::Utc::now().timestamp()));
        std::fs::write(&shot_path, &png_bytes)
            .with_context(|| format!("Failed to write {}", shot_path.display()))?;

        tracing::info!(path = %shot_path.display(), "screenshot saved");
        Ok(png_bytes)
    }

    /// Audit the screenshot and apply the resulting high-priority fixes.
    /// Degrades to logging when no API key is configured.
    async fn audit_and_fix(
        &self,
        filename: &str,
        png_bytes: &[u8],
        dashboard_analysis: &DashboardAnalysis,
    ) {
        let backend = match backend_from_env(self.vision.backend, self.vision.model.clone()) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::warn!(error = %e, "skipping AI audit");
                return;
            }
        };

        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes);
        let audit = mcp_vision_core::audit_screenshot_with(backend.as_ref(), &b64, None).await;

        if let Some(ref error) = audit.error {
            tracing::error!(error = %error, "AI audit failed");
            return;
        }

        tracing::info!(
            visual_score = audit.overall_score,
            technical_score = dashboard_analysis.technical_score(),
            total_issues = dashboard_analysis.total_issues(),
            audit_issues = audit.issues.len(),
            "AI visual analysis"
        );

        let priority_fixes = fixes::from_issues(&audit.issues);
        if priority_fixes.is_empty() {
            return;
        }

        tracing::info!(count = priority_fixes.len(), "applying high-priority fixes");
        match fixes::apply_fixes(&self.config.local_dir, filename, &priority_fixes) {
            Ok(applied) => tracing::info!(applied, "fixes applied"),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "failed to apply fixes"),
        }
    }

    async fn ensure_browser(&mut self) -> Result<&Browser> {
        if self.browser.is_none() {
            let mut builder = BrowserConfig::builder()
                .window_size(1920, 1080)
                .arg("--disable-dev-shm-usage")
                .arg("--disable-gpu");

            if let Some(ref path) = self.config.browser_path {
                builder = builder.chrome_executable(path);
            }

            if self.config.no_sandbox {
                builder = builder.no_sandbox();
            }

            let config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .context("Failed to launch browser")?;

            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            tracing::info!("browser started");
            self.browser = Some(browser);
        }

        self.browser.as_ref().context("Browser not initialized")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_triggers() {
        assert!(should_trigger(None, "2025-06-01T12:00:00Z"));
    }

    #[test]
    fn test_changed_timestamp_triggers() {
        assert!(should_trigger(
            Some("2025-06-01T12:00:00Z"),
            "2025-06-01T12:05:00Z"
        ));
    }

    #[test]
    fn test_identical_timestamp_never_retriggers() {
        let seen = "2025-06-01T12:00:00Z";
        assert!(!should_trigger(Some(seen), seen));
        assert!(!should_trigger(Some(seen), seen));
    }
}
