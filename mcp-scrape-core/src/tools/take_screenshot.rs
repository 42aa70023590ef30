//! Screenshot a page without extracting the DOM.

use crate::scraper::{ScrapeOptions, Scraper};
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct TakeScreenshotInput {
    /// URL of the page to screenshot
    #[validate(length(min = 1))]
    #[schemars(description = "URL of the page to screenshot")]
    pub url: String,

    /// Capture the full scrollable page instead of just the viewport
    #[serde(default = "default_true")]
    #[schemars(description = "Whether to capture the full page (default: true)")]
    pub full_page: bool,

    /// Viewport width in pixels
    #[serde(default = "default_width")]
    #[validate(range(min = 320, max = 7680))]
    #[schemars(description = "Viewport width (default: 1920)")]
    pub width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_height")]
    #[validate(range(min = 240, max = 4320))]
    #[schemars(description = "Viewport height (default: 1080)")]
    pub height: u32,
}

pub async fn execute(
    scraper: &Arc<Scraper>,
    input: TakeScreenshotInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let opts = ScrapeOptions {
        screenshot: true,
        dom: false,
        full_page: input.full_page,
        viewport_width: input.width,
        viewport_height: input.height,
        ..Default::default()
    };

    let result = scraper.scrape(&input.url, &opts).await;

    serde_json::to_value(&result)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
