//! Free-text UI review of a screenshot, flexible input shapes.

use crate::analysis::{REVIEW_PROMPT, REVIEW_SYSTEM_PROMPT};
use crate::backend::VisionRequest;
use crate::image::{self, ImageArg};
use crate::VisionState;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct AnalyzeScreenshotInput {
    /// UI screenshot: base64 string (raw or data URL), protocol image
    /// object, or a structured input with base64_data / file_path
    #[schemars(
        description = "UI screenshot to analyze. Accepts a base64 string (with or without data URL prefix), a protocol image object, or an object with base64_data, file_path, or url."
    )]
    pub image: ImageArg,
}

pub async fn execute(
    state: &Arc<VisionState>,
    input: AnalyzeScreenshotInput,
) -> Result<serde_json::Value, Error> {
    let backend = match state.backend() {
        Ok(backend) => backend,
        Err(e) => return Ok(serde_json::Value::String(format!("Error: {}", e))),
    };

    let data_url = match image::normalize(&input.image) {
        Ok(url) => url,
        Err(e) => {
            return Ok(serde_json::Value::String(format!(
                "Error analyzing UI screenshot: {}",
                e
            )))
        }
    };

    tracing::debug!(chars = data_url.len(), "normalized image input");

    let request = VisionRequest {
        system: REVIEW_SYSTEM_PROMPT,
        prompt: REVIEW_PROMPT,
        image_data_url: &data_url,
        max_tokens: 2000,
    };

    match backend.analyze_image(&request).await {
        Ok(text) => Ok(serde_json::Value::String(text)),
        Err(e) => Ok(serde_json::Value::String(format!(
            "Error analyzing UI screenshot: {}",
            e
        ))),
    }
}
