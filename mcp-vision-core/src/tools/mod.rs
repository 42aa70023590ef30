//! Tool registration for all vision-analysis tools.

pub mod analyze_base64;
pub mod analyze_image_file;
pub mod analyze_screenshot;
pub mod audit_screenshot;
pub mod audit_url;

use crate::analysis::UiAnalysis;
use crate::VisionState;
use pmcp::TypedTool;
use std::sync::Arc;

/// Run the structured audit on a base64 screenshot. All failures come back
/// inside the `UiAnalysis` record, never as a fault.
pub(crate) async fn run_audit(
    state: &Arc<VisionState>,
    screenshot_b64: &str,
    dom_content: Option<&str>,
) -> UiAnalysis {
    let backend = match state.backend() {
        Ok(backend) => backend,
        Err(e) => return UiAnalysis::failure(e.to_string()),
    };

    crate::audit_screenshot_with(backend.as_ref(), screenshot_b64, dom_content).await
}

/// Register all vision tools onto the server builder.
///
/// Each tool captures an `Arc<VisionState>`; backends are built per call so
/// a missing API key degrades that call, not the server.
pub fn register_tools(builder: pmcp::ServerBuilder, state: Arc<VisionState>) -> pmcp::ServerBuilder {
    // --- Free-text review ---

    let s = state.clone();
    let builder = builder.tool(
        "analyze_screenshot",
        TypedTool::new(
            "analyze_screenshot",
            move |input: analyze_screenshot::AnalyzeScreenshotInput, _extra| {
                let s = s.clone();
                Box::pin(async move { analyze_screenshot::execute(&s, input).await })
            },
        )
        .with_description(
            "Analyze a UI screenshot for issues, fixes, and improvements. Accepts base64 strings, data URLs, protocol image objects, or {base64_data|file_path} inputs.",
        ),
    );

    let s = state.clone();
    let builder = builder.tool(
        "analyze_image_file",
        TypedTool::new(
            "analyze_image_file",
            move |input: analyze_image_file::AnalyzeImageFileInput, _extra| {
                let s = s.clone();
                Box::pin(async move { analyze_image_file::execute(&s, input).await })
            },
        )
        .with_description("Analyze a UI screenshot from an image file on disk."),
    );

    let s = state.clone();
    let builder = builder.tool(
        "analyze_base64",
        TypedTool::new(
            "analyze_base64",
            move |input: analyze_base64::AnalyzeBase64Input, _extra| {
                let s = s.clone();
                Box::pin(async move { analyze_base64::execute(&s, input).await })
            },
        )
        .with_description("Analyze a UI screenshot from base64 image data."),
    );

    // --- Structured audits ---

    let s = state.clone();
    let builder = builder.tool(
        "audit_screenshot",
        TypedTool::new(
            "audit_screenshot",
            move |input: audit_screenshot::AuditScreenshotInput, _extra| {
                let s = s.clone();
                Box::pin(async move { audit_screenshot::execute(&s, input).await })
            },
        )
        .with_description(
            "Audit a UI screenshot and return a structured report: score, issues with severity, strengths, and priority recommendations. Optionally pass DOM content for context.",
        ),
    );

    let s = state;
    let builder = builder.tool(
        "audit_url",
        TypedTool::new("audit_url", move |input: audit_url::AuditUrlInput, _extra| {
            let s = s.clone();
            Box::pin(async move { audit_url::execute(&s, input).await })
        })
        .with_description(
            "Scrape a page and audit its UI in one step. Returns both the scrape result and the structured audit.",
        ),
    );

    builder
}
