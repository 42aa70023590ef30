//! Web Scraping MCP Server binary.
//!
//! `serve` (default): start the MCP server over Streamable HTTP. Every tool
//! call launches its own headless browser, so there is no browser state to
//! tear down on shutdown.

use clap::{Parser, Subcommand};
use mcp_scrape_core::scraper::ScraperConfig;

#[derive(Parser)]
#[command(name = "scrape-server", about = "Web Scraping MCP Server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (default when no subcommand given)
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    #[clap(flatten)]
    server: server_common::CliArgs,

    /// Custom Chrome/Chromium binary path
    #[clap(long)]
    browser_path: Option<String>,

    /// Pass --no-sandbox to the browser (needed in most containers)
    #[clap(long)]
    no_sandbox: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = match cli.command {
        Some(Command::Serve(args)) => args,
        None => ServeArgs::parse_from(["scrape-server", "serve"]),
    };

    server_common::init_logging();

    let config = ScraperConfig {
        browser_path: args.browser_path,
        no_sandbox: args.no_sandbox,
    };

    let server = mcp_scrape_core::build_server(config)?;

    tokio::select! {
        result = server_common::run_http(server, &args.server) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down");
            Ok(())
        }
    }
}
