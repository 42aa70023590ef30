//! Probe that a browser can be launched. Useful for debugging setups.

use crate::scraper::Scraper;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct CheckBrowserInput {}

pub async fn execute(
    scraper: &Arc<Scraper>,
    _input: CheckBrowserInput,
) -> Result<serde_json::Value, Error> {
    match scraper.probe().await {
        Ok(version) => Ok(json!({
            "status": "success",
            "message": "Browser connection successful",
            "browser_version": version
        })),
        Err(e) => Ok(json!({
            "status": "error",
            "message": format!("Browser connection failed: {:#}", e),
            "help": "Install Chrome/Chromium, or point --browser-path at a binary"
        })),
    }
}
