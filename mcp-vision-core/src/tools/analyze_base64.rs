//! Free-text UI review of base64 image data.

use super::analyze_screenshot::{self, AnalyzeScreenshotInput};
use crate::image::ImageArg;
use crate::VisionState;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct AnalyzeBase64Input {
    /// Base64 encoded image data (with or without data URL prefix)
    #[validate(length(min = 1))]
    #[schemars(description = "Base64 encoded image data (with or without data URL prefix)")]
    pub base64_data: String,
}

pub async fn execute(
    state: &Arc<VisionState>,
    input: AnalyzeBase64Input,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let image = ImageArg::Raw(input.base64_data);

    analyze_screenshot::execute(state, AnalyzeScreenshotInput { image }).await
}
