//! Free-text UI review of an image on disk.

use super::analyze_screenshot::{self, AnalyzeScreenshotInput};
use crate::image::{ImageArg, ImageInput};
use crate::VisionState;
use pmcp::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[schemars(deny_unknown_fields)]
pub struct AnalyzeImageFileInput {
    /// Path to the UI screenshot image file
    #[validate(length(min = 1))]
    #[schemars(description = "Path to the UI screenshot image file")]
    pub file_path: String,
}

pub async fn execute(
    state: &Arc<VisionState>,
    input: AnalyzeImageFileInput,
) -> Result<serde_json::Value, Error> {
    input
        .validate()
        .map_err(|e| Error::validation(format!("Validation failed: {}", e)))?;

    let image = ImageArg::Input(ImageInput {
        file_path: Some(input.file_path),
        ..Default::default()
    });

    analyze_screenshot::execute(state, AnalyzeScreenshotInput { image }).await
}
