//! MCP resources for the vision server.
//!
//! Provides the analysis guidelines:
//! - `ui-analysis://guidelines` — input formats and screenshot advice
//!
//! Registered as a tool since PMCP's ResourceCollection currently supports
//! static resources. The content is available via the `get_guidelines` tool.

use crate::VisionState;
use pmcp::TypedTool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct GetGuidelinesInput {}

const GUIDELINES: &str = r#"# UI Analysis Guidelines

## Supported Image Input Formats:

### 1. Direct Base64 String
- Raw base64: "iVBORw0KGgoAAAANSUhEUgAA..."
- Data URL: "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA..."

### 2. Structured Input Object
{
    "base64_data": "iVBORw0KGgoAAAANSUhEUgAA...",
    "format_hint": "png"
}

### 3. File Path
{
    "file_path": "/path/to/screenshot.png"
}

## Best Practices for UI Screenshots:
- Provide clear, high-resolution screenshots (PNG format preferred)
- Capture the full interface or relevant sections
- Ensure good contrast and visibility of all elements
- Include different states if relevant (hover, active, error states)
- Consider capturing both desktop and mobile views

## Analysis Focus Areas:
- Visual Hierarchy: layout, spacing, typography, color usage
- Accessibility: color contrast, text readability, button sizes
- Usability: navigation clarity, button placement, information flow
- Design Consistency: alignment, spacing patterns, visual elements
- Interactive Elements: button states, form elements, links

## Common Issues to Look For:
- Poor color contrast ratios
- Inconsistent spacing and alignment
- Unclear or missing call-to-action buttons
- Cluttered or overwhelming layouts
- Poor typography hierarchy
- Missing visual feedback for interactions

## Tools:
- analyze_screenshot: flexible input, free-text review
- analyze_image_file / analyze_base64: convenience wrappers
- audit_screenshot: structured report with score and issues
- audit_url: scrape a live page and audit it in one step
"#;

/// Register resource-like tools onto the server builder.
pub fn register_resources(
    builder: pmcp::ServerBuilder,
    _state: Arc<VisionState>,
) -> pmcp::ServerBuilder {
    builder.tool(
        "get_guidelines",
        TypedTool::new("get_guidelines", move |_input: GetGuidelinesInput, _extra| {
            Box::pin(async move { Ok(serde_json::Value::String(GUIDELINES.to_string())) })
        })
        .with_description(
            "Get the UI analysis guidelines: supported image input formats and screenshot best practices.",
        ),
    )
}
