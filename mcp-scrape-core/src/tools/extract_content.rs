//! Extract a page's DOM without taking a screenshot.

use crate::scraper::{ScrapeOptions, Scraper};
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct ExtractContentInput {
    /// URL of the page to extract content from
    #[validate(length(min = 1))]
    #[schemars(description = "URL of the page to extract content from")]
    pub url: String,
}

pub async fn execute(
    scraper: &Arc<Scraper>,
    input: ExtractContentInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let opts = ScrapeOptions {
        screenshot: false,
        dom: true,
        ..Default::default()
    };

    let result = scraper.scrape(&input.url, &opts).await;

    serde_json::to_value(&result)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
