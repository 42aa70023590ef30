//! Page-scraping MCP server core library.
//!
//! Provides `build_server()` which constructs a fully-configured MCP `Server`
//! with scraping tools, ready to be served over HTTP. Each tool call launches
//! its own headless browser and closes it when done.

pub mod scraper;
pub mod tools;

use pmcp::types::{ServerCapabilities, ToolCapabilities};
use pmcp::Server;
use scraper::{Scraper, ScraperConfig};
use std::sync::Arc;

/// Build a fully-configured MCP server with scraping capabilities.
pub fn build_server(config: ScraperConfig) -> pmcp::Result<Server> {
    let scraper = Arc::new(Scraper::new(config));

    let builder = Server::builder()
        .name("scrape")
        .version(env!("CARGO_PKG_VERSION"))
        .capabilities(ServerCapabilities {
            tools: Some(ToolCapabilities {
                list_changed: Some(true),
            }),
            ..Default::default()
        });

    let builder = tools::register_tools(builder, scraper);

    builder.build()
}
