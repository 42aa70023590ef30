//! Per-call browser lifecycle for page scraping.
//!
//! Every scrape launches a fresh headless Chrome via CDP, does its work, and
//! closes the browser unconditionally — error paths included. Failures never
//! escape as faults: they come back inside `ScrapeResult.error`.

use anyhow::{Context, Result};
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

fn default_true() -> bool {
    true
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_timeout_ms() -> u64 {
    30000
}

/// When navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    DomContentLoaded,
    Load,
}

impl Default for WaitUntil {
    fn default() -> Self {
        WaitUntil::DomContentLoaded
    }
}

/// Options for scraping a page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct ScrapeOptions {
    /// Capture a PNG screenshot of the page
    #[serde(default = "default_true")]
    #[schemars(description = "Whether to take a screenshot (default: true)")]
    pub screenshot: bool,

    /// Extract the serialized DOM as HTML
    #[serde(default = "default_true")]
    #[schemars(description = "Whether to extract DOM content (default: true)")]
    pub dom: bool,

    /// Capture the full scrollable page instead of just the viewport
    #[serde(default = "default_true")]
    #[schemars(description = "Whether to capture a full-page screenshot (default: true)")]
    pub full_page: bool,

    /// Viewport width in pixels
    #[serde(default = "default_viewport_width")]
    #[validate(range(min = 320, max = 7680))]
    #[schemars(description = "Viewport width in pixels (default: 1920)")]
    pub viewport_width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_viewport_height")]
    #[validate(range(min = 240, max = 4320))]
    #[schemars(description = "Viewport height in pixels (default: 1080)")]
    pub viewport_height: u32,

    /// Navigation timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    #[validate(range(min = 1000, max = 120000))]
    #[schemars(description = "Navigation timeout in milliseconds (default: 30000)")]
    pub timeout_ms: u64,

    /// When to consider navigation succeeded
    #[serde(default)]
    #[schemars(description = "When navigation counts as finished: 'domcontentloaded' (default) or 'load'")]
    pub wait_until: WaitUntil,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            screenshot: true,
            dom: true,
            full_page: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            timeout_ms: default_timeout_ms(),
            wait_until: WaitUntil::default(),
        }
    }
}

/// Result of scraping a page.
///
/// `error` and the payload fields (`title`/`screenshot`/`dom`/`status`) are
/// mutually exclusive; the url is always echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeResult {
    /// The URL that was scraped
    pub url: String,
    /// Page title
    pub title: Option<String>,
    /// Base64-encoded PNG screenshot
    pub screenshot: Option<String>,
    /// DOM content as HTML
    pub dom: Option<String>,
    /// HTTP status code, when the browser reports one
    pub status: Option<i64>,
    /// Error message if scraping failed
    pub error: Option<String>,
}

impl ScrapeResult {
    /// An error result; payload fields stay unset.
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            screenshot: None,
            dom: None,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Browser launch configuration shared by all scrape calls.
#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    /// Custom Chrome/Chromium binary path.
    pub browser_path: Option<String>,
    /// Pass --no-sandbox (needed in most containers).
    pub no_sandbox: bool,
}

/// Stateless scraper. Holds only the launch configuration; every call gets
/// its own browser process.
pub struct Scraper {
    config: ScraperConfig,
}

/// Reads the HTTP status of the main document from the Navigation Timing
/// entry. Returns 0 when the browser doesn't expose `responseStatus`.
const NAV_STATUS_JS: &str = r#"
(() => {
    const entry = performance.getEntriesByType('navigation')[0];
    return entry && entry.responseStatus ? entry.responseStatus : 0;
})()
"#;

impl Scraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Scrape a page. Never fails at the call level: all errors are folded
    /// into `ScrapeResult.error`.
    pub async fn scrape(&self, url: &str, opts: &ScrapeOptions) -> ScrapeResult {
        tracing::info!(url, "starting scrape");

        let mut browser = match self.launch(opts).await {
            Ok(browser) => browser,
            Err(e) => {
                tracing::error!(url, error = %format!("{e:#}"), "browser launch failed");
                return ScrapeResult::failure(url, format!("Error: {e:#}"));
            }
        };

        let timeout = Duration::from_millis(opts.timeout_ms);
        let outcome =
            tokio::time::timeout(timeout, scrape_with(&browser, url, opts)).await;

        // Close unconditionally, error paths included.
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        let _ = browser.wait().await;

        match outcome {
            Ok(Ok(result)) => {
                tracing::info!(url, "scrape finished");
                result
            }
            Ok(Err(e)) => {
                tracing::error!(url, error = %format!("{e:#}"), "scrape failed");
                ScrapeResult::failure(url, format!("Error: {e:#}"))
            }
            Err(_) => {
                tracing::error!(url, timeout_ms = opts.timeout_ms, "scrape timed out");
                ScrapeResult::failure(
                    url,
                    format!(
                        "Timeout: page took too long to load (>{}ms)",
                        opts.timeout_ms
                    ),
                )
            }
        }
    }

    /// Probe that a browser can be launched at all. Used by `check_browser`.
    pub async fn probe(&self) -> Result<String> {
        let mut browser = self.launch(&ScrapeOptions::default()).await?;

        let version = browser
            .version()
            .await
            .map(|v| v.product)
            .context("Failed to query browser version")?;

        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        let _ = browser.wait().await;

        Ok(version)
    }

    async fn launch(&self, opts: &ScrapeOptions) -> Result<Browser> {
        let mut builder = BrowserConfig::builder()
            .window_size(opts.viewport_width, opts.viewport_height)
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

        Ok(browser)
    }
}

async fn scrape_with(browser: &Browser, url: &str, opts: &ScrapeOptions) -> Result<ScrapeResult> {
    let page = browser
        .new_page(url)
        .await
        .with_context(|| format!("Failed to open {}", url))?;

    if opts.wait_until == WaitUntil::Load {
        let _ = page.wait_for_navigation().await;
    }

    let status = read_status(&page).await;
    if let Some(code) = status {
        if code >= 400 {
            anyhow::bail!("HTTP {} error", code);
        }
    }

    let title = page.get_title().await.unwrap_or(None);

    let screenshot = if opts.screenshot {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(opts.full_page)
            .build();

        let png_bytes = page
            .screenshot(params)
            .await
            .context("Screenshot failed")?;

        tracing::debug!(bytes = png_bytes.len(), "screenshot captured");
        Some(base64::engine::general_purpose::STANDARD.encode(&png_bytes))
    } else {
        None
    };

    let dom = if opts.dom {
        let html = page.content().await.context("Failed to get DOM")?;
        tracing::debug!(chars = html.len(), "DOM extracted");
        Some(html)
    } else {
        None
    };

    Ok(ScrapeResult {
        url: url.to_string(),
        title,
        screenshot,
        dom,
        status,
        error: None,
    })
}

async fn read_status(page: &Page) -> Option<i64> {
    let value = page
        .evaluate_expression(NAV_STATUS_JS.trim())
        .await
        .ok()?
        .into_value::<i64>()
        .ok()?;

    (value > 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts: ScrapeOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.screenshot);
        assert!(opts.dom);
        assert!(opts.full_page);
        assert_eq!(opts.viewport_width, 1920);
        assert_eq!(opts.viewport_height, 1080);
        assert_eq!(opts.timeout_ms, 30000);
        assert_eq!(opts.wait_until, WaitUntil::DomContentLoaded);
    }

    #[test]
    fn test_wait_until_wire_values() {
        let opts: ScrapeOptions =
            serde_json::from_str(r#"{"wait_until": "load"}"#).unwrap();
        assert_eq!(opts.wait_until, WaitUntil::Load);

        let opts: ScrapeOptions =
            serde_json::from_str(r#"{"wait_until": "domcontentloaded"}"#).unwrap();
        assert_eq!(opts.wait_until, WaitUntil::DomContentLoaded);

        assert!(serde_json::from_str::<ScrapeOptions>(r#"{"wait_until": "networkidle"}"#).is_err());
    }

    #[test]
    fn test_options_range_validation() {
        let opts: ScrapeOptions =
            serde_json::from_str(r#"{"timeout_ms": 500}"#).unwrap();
        assert!(opts.validate().is_err());

        let opts: ScrapeOptions =
            serde_json::from_str(r#"{"viewport_width": 10}"#).unwrap();
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_failure_has_no_payload() {
        let result = ScrapeResult::failure("https://example.com", "Error: boom");
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.error.as_deref(), Some("Error: boom"));
        assert!(result.title.is_none());
        assert!(result.screenshot.is_none());
        assert!(result.dom.is_none());
        assert!(result.status.is_none());
    }
}
