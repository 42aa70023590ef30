//! Scrape a page: title, screenshot, DOM, HTTP status.

use crate::scraper::{ScrapeOptions, Scraper};
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct ScrapePageInput {
    /// URL of the page to scrape
    #[validate(length(min = 1))]
    #[schemars(description = "URL of the page to scrape")]
    pub url: String,

    /// Scraping options (all optional, sensible defaults)
    #[schemars(description = "Scraping options: screenshot, dom, full_page, viewport size, timeout_ms, wait_until")]
    pub options: Option<ScrapeOptions>,
}

pub async fn execute(
    scraper: &Arc<Scraper>,
    input: ScrapePageInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let opts = input.options.unwrap_or_default();
    opts.validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let result = scraper.scrape(&input.url, &opts).await;

    serde_json::to_value(&result)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
