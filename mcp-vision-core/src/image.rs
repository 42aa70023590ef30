//! Image-input normalization.
//!
//! Tools accept images in several shapes: a bare base64 string, a data URL,
//! a protocol-native image object (`data` + `mimeType`), or a structured
//! `ImageInput` carrying base64 data or a file path. Everything funnels
//! through `normalize()` into a single `data:<mime>;base64,<payload>` string
//! that the vision backends consume.

use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// MIME type assumed when nothing else declares one.
pub const DEFAULT_MIME: &str = "image/png";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("URL-based image input is not supported yet")]
    UrlNotSupported,

    #[error("Image input must provide base64_data, file_path, or url")]
    MissingSource,
}

/// Structured image input, every source optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ImageInput {
    /// Base64 encoded image data (with or without data URL prefix)
    #[schemars(description = "Base64 encoded image data (with or without data URL prefix)")]
    pub base64_data: Option<String>,

    /// Path to an image file (PNG, JPEG, etc.)
    #[schemars(description = "Path to an image file (PNG, JPEG, etc.)")]
    pub file_path: Option<String>,

    /// URL to an image (declared for future expansion, not implemented)
    #[schemars(description = "URL to an image (not implemented yet)")]
    pub url: Option<String>,

    /// Image format hint (png, jpeg, etc.)
    #[schemars(description = "Image format hint (png, jpeg, etc.)")]
    pub format_hint: Option<String>,
}

/// Any of the accepted image shapes.
///
/// Untagged: a JSON string is `Raw`, an object with `data` is the
/// protocol-native image content, any other object is an `ImageInput`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ImageArg {
    /// Bare base64 or data URL string
    Raw(String),

    /// Protocol-native image content
    Content {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: Option<String>,
    },

    /// Structured input with base64 data, a file path, or a URL
    Input(ImageInput),
}

/// Normalize any accepted image shape into a base64 data URL.
pub fn normalize(arg: &ImageArg) -> Result<String, ImageError> {
    match arg {
        ImageArg::Raw(s) => Ok(normalize_raw(s)),

        ImageArg::Content { data, mime_type } => {
            let mime = mime_type
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MIME);
            Ok(format!("data:{};base64,{}", mime, data))
        }

        ImageArg::Input(input) => normalize_input(input),
    }
}

/// A bare string is either already a data URL or raw base64 assumed PNG.
pub fn normalize_raw(s: &str) -> String {
    if s.starts_with("data:image/") {
        s.to_string()
    } else {
        format!("data:image/png;base64,{}", s)
    }
}

fn normalize_input(input: &ImageInput) -> Result<String, ImageError> {
    if let Some(ref b64) = input.base64_data {
        if b64.starts_with("data:image/") {
            return Ok(b64.clone());
        }
        let format = input.format_hint.as_deref().unwrap_or("png");
        return Ok(format!("data:image/{};base64,{}", format, b64));
    }

    if let Some(ref path) = input.file_path {
        return encode_file(Path::new(path));
    }

    if input.url.is_some() {
        return Err(ImageError::UrlNotSupported);
    }

    Err(ImageError::MissingSource)
}

fn encode_file(path: &Path) -> Result<String, ImageError> {
    if !path.exists() {
        return Err(ImageError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime_for_extension(path), data))
}

/// MIME type from the file extension; PNG when unrecognized.
fn mime_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => DEFAULT_MIME,
    }
}

/// Split a data URL back into its MIME type and base64 payload.
///
/// The Gemini API takes the two separately while OpenRouter takes the URL
/// whole.
pub fn split_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    rest.split_once(";base64,")
}
