//! Tool registration for all scraping tools.

pub mod check_browser;
pub mod extract_content;
pub mod scrape_page;
pub mod scrape_simple;
pub mod take_screenshot;

use crate::scraper::Scraper;
use pmcp::TypedTool;
use std::sync::Arc;

/// Register all scraping tools onto the server builder.
///
/// Each tool captures an `Arc<Scraper>`; the scraper launches a fresh
/// browser per call, so nothing here holds browser state.
pub fn register_tools(builder: pmcp::ServerBuilder, scraper: Arc<Scraper>) -> pmcp::ServerBuilder {
    // --- Scraping ---

    let s = scraper.clone();
    let builder = builder.tool(
        "scrape_page",
        TypedTool::new(
            "scrape_page",
            move |input: scrape_page::ScrapePageInput, _extra| {
                let s = s.clone();
                Box::pin(async move { scrape_page::execute(&s, input).await })
            },
        )
        .with_description(
            "Scrape a page: title, screenshot (base64 PNG), DOM content, and HTTP status. Accepts viewport and timeout options.",
        ),
    );

    let s = scraper.clone();
    let builder = builder.tool(
        "scrape_simple",
        TypedTool::new(
            "scrape_simple",
            move |input: scrape_simple::ScrapeSimpleInput, _extra| {
                let s = s.clone();
                Box::pin(async move { scrape_simple::execute(&s, input).await })
            },
        )
        .with_description(
            "Scrape a page with default options: full-page screenshot plus DOM at 1920x1080.",
        ),
    );

    // --- Partial captures ---

    let s = scraper.clone();
    let builder = builder.tool(
        "take_screenshot",
        TypedTool::new(
            "take_screenshot",
            move |input: take_screenshot::TakeScreenshotInput, _extra| {
                let s = s.clone();
                Box::pin(async move { take_screenshot::execute(&s, input).await })
            },
        )
        .with_description(
            "Take a screenshot of a page without extracting DOM content. Returns base64-encoded PNG.",
        ),
    );

    let s = scraper.clone();
    let builder = builder.tool(
        "extract_content",
        TypedTool::new(
            "extract_content",
            move |input: extract_content::ExtractContentInput, _extra| {
                let s = s.clone();
                Box::pin(async move { extract_content::execute(&s, input).await })
            },
        )
        .with_description(
            "Extract a page's title and DOM content without taking a screenshot.",
        ),
    );

    // --- Diagnostics ---

    let s = scraper;
    let builder = builder.tool(
        "check_browser",
        TypedTool::new(
            "check_browser",
            move |input: check_browser::CheckBrowserInput, _extra| {
                let s = s.clone();
                Box::pin(async move { check_browser::execute(&s, input).await })
            },
        )
        .with_description(
            "Check that a headless browser can be launched. Reports the browser version or a descriptive failure.",
        ),
    );

    builder
}
