//! Vision model backends.
//!
//! Two interchangeable HTTP clients behind `VisionBackend`: OpenRouter's
//! chat-completions endpoint and Google's Gemini generateContent endpoint.
//! Both take a normalized image data URL and return the model's free text.
//!
//! API keys are read per call, so a server started without one keeps running
//! and the affected tools degrade to a descriptive error.

use crate::image;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;
use thiserror::Error;

pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash-preview-05-20";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("{var} environment variable not set. Set your API key to enable vision analysis.")]
    MissingApiKey { var: &'static str },

    #[error("Vision API request failed: {0}")]
    Http(String),

    #[error("Vision API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Vision API returned an empty response")]
    EmptyResponse,

    #[error("Image data URL is malformed")]
    BadImage,
}

/// Which vision provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenRouter,
    Gemini,
}

impl BackendKind {
    /// Env var holding this provider's API key.
    pub fn key_var(self) -> &'static str {
        match self {
            BackendKind::OpenRouter => OPENROUTER_API_KEY_VAR,
            BackendKind::Gemini => GEMINI_API_KEY_VAR,
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openrouter" => Ok(BackendKind::OpenRouter),
            "gemini" => Ok(BackendKind::Gemini),
            other => Err(format!(
                "unknown backend '{}', expected 'openrouter' or 'gemini'",
                other
            )),
        }
    }
}

/// One vision call: prompts, image, output token limit.
#[derive(Debug)]
pub struct VisionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub image_data_url: &'a str,
    pub max_tokens: u32,
}

#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn analyze_image(&self, request: &VisionRequest<'_>) -> Result<String, VisionError>;
}

/// Build the configured backend, reading its API key from the environment.
pub fn backend_from_env(
    kind: BackendKind,
    model: Option<String>,
) -> Result<Box<dyn VisionBackend>, VisionError> {
    match kind {
        BackendKind::OpenRouter => Ok(Box::new(OpenRouterBackend::from_env(model)?)),
        BackendKind::Gemini => Ok(Box::new(GeminiBackend::from_env(model)?)),
    }
}

fn key_from_env(var: &'static str) -> Result<String, VisionError> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or(VisionError::MissingApiKey { var })
}

async fn read_json(response: reqwest::Response) -> Result<Value, VisionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(VisionError::Api {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| VisionError::Http(e.to_string()))
}

/// OpenRouter chat-completions client.
#[derive(Debug)]
pub struct OpenRouterBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterBackend {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    pub fn from_env(model: Option<String>) -> Result<Self, VisionError> {
        let api_key = key_from_env(OPENROUTER_API_KEY_VAR)?;
        Ok(Self::new(
            api_key,
            model.unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            OPENROUTER_BASE_URL.to_string(),
        ))
    }
}

#[async_trait]
impl VisionBackend for OpenRouterBackend {
    async fn analyze_image(&self, request: &VisionRequest<'_>) -> Result<String, VisionError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": request.system
                },
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": request.prompt},
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": request.image_data_url,
                                "detail": "high"
                            }
                        }
                    ]
                }
            ],
            "max_tokens": request.max_tokens,
            "temperature": 0.7
        });

        tracing::debug!(model = %self.model, "sending image to OpenRouter");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Http(e.to_string()))?;

        let value = read_json(response).await?;

        let content = value
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if content.is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        tracing::debug!(chars = content.len(), "OpenRouter analysis received");
        Ok(content.to_string())
    }
}

/// Gemini generateContent client.
pub struct GeminiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    pub fn from_env(model: Option<String>) -> Result<Self, VisionError> {
        let api_key = key_from_env(GEMINI_API_KEY_VAR)?;
        Ok(Self::new(
            api_key,
            model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            GEMINI_BASE_URL.to_string(),
        ))
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn analyze_image(&self, request: &VisionRequest<'_>) -> Result<String, VisionError> {
        // Gemini takes the MIME type and payload separately.
        let (mime, data) =
            image::split_data_url(request.image_data_url).ok_or(VisionError::BadImage)?;

        let body = json!({
            "systemInstruction": {
                "parts": [{"text": request.system}]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {"text": request.prompt},
                        {"inline_data": {"mime_type": mime, "data": data}}
                    ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": 0.7
            }
        });

        tracing::debug!(model = %self.model, "sending image to Gemini");

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Http(e.to_string()))?;

        let value = read_json(response).await?;

        let parts = value
            .pointer("/candidates/0/content/parts")
            .and_then(|v| v.as_array());

        let content: String = parts
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        tracing::debug!(chars = content.len(), "Gemini analysis received");
        Ok(content.to_string())
    }
}
