//! Integration tests against a real headless browser.
//!
//! These launch Chrome/Chromium via CDP and scrape real websites. They are
//! `#[ignore]` by default because they require a browser binary installed.
//!
//! Run with:
//!   cargo test -p mcp-scrape-core --test scrape_live -- --ignored

use mcp_scrape_core::scraper::{ScrapeOptions, Scraper, ScraperConfig};

fn test_scraper() -> Scraper {
    Scraper::new(ScraperConfig {
        no_sandbox: true,
        ..Default::default()
    })
}

#[tokio::test]
#[ignore]
async fn test_scrape_example_dot_com() {
    let scraper = test_scraper();

    let result = scraper
        .scrape("https://example.com", &ScrapeOptions::default())
        .await;

    assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
    assert_eq!(result.url, "https://example.com");
    assert!(result
        .title
        .as_deref()
        .unwrap_or("")
        .contains("Example Domain"));
    assert!(result.screenshot.is_some());
    assert!(result.dom.as_deref().unwrap_or("").contains("<html"));
}

#[tokio::test]
#[ignore]
async fn test_screenshot_only_skips_dom() {
    let scraper = test_scraper();

    let opts = ScrapeOptions {
        dom: false,
        ..Default::default()
    };
    let result = scraper.scrape("https://example.com", &opts).await;

    assert!(result.error.is_none());
    assert!(result.screenshot.is_some());
    assert!(result.dom.is_none());
}

#[tokio::test]
#[ignore]
async fn test_unresolvable_host_reports_error() {
    let scraper = test_scraper();

    let result = scraper
        .scrape(
            "https://definitely-not-a-real-host.invalid",
            &ScrapeOptions::default(),
        )
        .await;

    // Error surfaces as data; the payload fields stay unset.
    assert!(result.error.is_some());
    assert!(result.title.is_none());
    assert!(result.screenshot.is_none());
    assert!(result.dom.is_none());
}
