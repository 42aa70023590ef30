//! Structured UI audit of a screenshot, optionally with DOM context.

use crate::VisionState;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct AuditScreenshotInput {
    /// Base64 encoded screenshot of the UI to audit
    #[validate(length(min = 1))]
    #[schemars(description = "Base64 encoded screenshot of the UI to audit")]
    pub screenshot_b64: String,

    /// DOM content (HTML) for additional context
    #[schemars(description = "DOM content (HTML) for additional context (optional)")]
    pub dom_content: Option<String>,
}

pub async fn execute(
    state: &Arc<VisionState>,
    input: AuditScreenshotInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let audit =
        super::run_audit(state, &input.screenshot_b64, input.dom_content.as_deref()).await;

    serde_json::to_value(&audit)
        .map_err(|e| Error::internal(format!("Failed to serialize result: {}", e)))
}
