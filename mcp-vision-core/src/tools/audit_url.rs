//! Scrape a page and audit its UI in one step.

use crate::VisionState;
use mcp_scrape_core::scraper::ScrapeOptions;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct AuditUrlInput {
    /// URL of the page to scrape and audit
    #[validate(length(min = 1))]
    #[schemars(description = "URL of the page to scrape and audit")]
    pub url: String,

    /// Viewport width for the screenshot
    #[serde(default = "default_width")]
    #[validate(range(min = 320, max = 7680))]
    #[schemars(description = "Viewport width for the screenshot (default: 1920)")]
    pub viewport_width: u32,

    /// Viewport height for the screenshot
    #[serde(default = "default_height")]
    #[validate(range(min = 240, max = 4320))]
    #[schemars(description = "Viewport height for the screenshot (default: 1080)")]
    pub viewport_height: u32,
}

pub async fn execute(
    state: &Arc<VisionState>,
    input: AuditUrlInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let opts = ScrapeOptions {
        screenshot: true,
        dom: true,
        viewport_width: input.viewport_width,
        viewport_height: input.viewport_height,
        ..Default::default()
    };

    let scrape = state.scraper.scrape(&input.url, &opts).await;

    if let Some(ref err) = scrape.error {
        let message = format!("Scraping failed: {}", err);
        return Ok(json!({
            "scrape": scrape,
            "audit": null,
            "error": message
        }));
    }

    let audit = match scrape.screenshot {
        Some(ref b64) => Some(super::run_audit(state, b64, scrape.dom.as_deref()).await),
        None => None,
    };

    Ok(json!({
        "scrape": scrape,
        "audit": audit,
        "error": null
    }))
}
