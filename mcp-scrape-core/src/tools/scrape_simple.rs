//! Scrape a page with default options.

use crate::scraper::{ScrapeOptions, Scraper};
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct ScrapeSimpleInput {
    /// URL of the page to scrape
    #[validate(length(min = 1))]
    #[schemars(description = "URL of the page to scrape")]
    pub url: String,
}

pub async fn execute(
    scraper: &Arc<Scraper>,
    input: ScrapeSimpleInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let result = scraper.scrape(&input.url, &ScrapeOptions::default()).await;

    serde_json::to_value(&result)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
