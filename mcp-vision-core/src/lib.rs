//! Vision-analysis MCP server core library.
//!
//! Provides `build_server()` which constructs a fully-configured MCP `Server`
//! with UI-analysis tools backed by a vision model (OpenRouter or Gemini),
//! plus the combined scrape-and-audit tool.

pub mod analysis;
pub mod backend;
pub mod image;
pub mod resources;
pub mod tools;

use analysis::{UiAnalysis, AUDIT_SYSTEM_PROMPT};
use backend::{backend_from_env, BackendKind, VisionBackend, VisionError, VisionRequest};
use mcp_scrape_core::scraper::{Scraper, ScraperConfig};
use pmcp::types::{ServerCapabilities, ToolCapabilities};
use pmcp::Server;
use std::sync::Arc;

/// Which vision provider to use, and with which model.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub backend: BackendKind,
    /// Model override; each backend has its own default.
    pub model: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenRouter,
            model: None,
        }
    }
}

/// Shared state captured by every vision tool.
pub struct VisionState {
    config: VisionConfig,
    /// Used by `audit_url`; launches a fresh browser per call.
    pub scraper: Scraper,
}

impl VisionState {
    pub fn new(config: VisionConfig, scraper_config: ScraperConfig) -> Self {
        Self {
            config,
            scraper: Scraper::new(scraper_config),
        }
    }

    /// Build the configured backend, reading its API key from the
    /// environment. Called per tool invocation so a key added or removed at
    /// runtime takes effect without a restart.
    pub fn backend(&self) -> Result<Box<dyn VisionBackend>, VisionError> {
        backend_from_env(self.config.backend, self.config.model.clone())
    }

    /// Env var the configured backend reads its key from.
    pub fn key_var(&self) -> &'static str {
        self.config.backend.key_var()
    }
}

/// Run the structured audit on a base64 screenshot with the given backend.
///
/// API failures come back inside the `UiAnalysis` record; unparsable model
/// output falls back to a raw-text summary. Used by the `audit_screenshot`
/// and `audit_url` tools and by the watcher.
pub async fn audit_screenshot_with(
    backend: &dyn VisionBackend,
    screenshot_b64: &str,
    dom_content: Option<&str>,
) -> UiAnalysis {
    let data_url = image::normalize_raw(screenshot_b64);
    let prompt = analysis::audit_prompt(dom_content);

    let request = VisionRequest {
        system: AUDIT_SYSTEM_PROMPT,
        prompt: &prompt,
        image_data_url: &data_url,
        max_tokens: 2000,
    };

    match backend.analyze_image(&request).await {
        Ok(text) => {
            tracing::debug!(chars = text.len(), "audit response received");
            analysis::parse_analysis(&text)
        }
        Err(e) => UiAnalysis::failure(format!("Analysis error: {}", e)),
    }
}

/// Build a fully-configured MCP server with vision-analysis capabilities.
pub fn build_server(config: VisionConfig, scraper_config: ScraperConfig) -> pmcp::Result<Server> {
    let state = Arc::new(VisionState::new(config, scraper_config));

    let builder = Server::builder()
        .name("ui-vision")
        .version(env!("CARGO_PKG_VERSION"))
        .capabilities(ServerCapabilities {
            tools: Some(ToolCapabilities {
                list_changed: Some(true),
            }),
            ..Default::default()
        });

    let builder = tools::register_tools(builder, state.clone());
    let builder = resources::register_resources(builder, state);

    builder.build()
}
