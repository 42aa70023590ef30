//! UI Vision MCP Server binary.
//!
//! `serve` (default): start the MCP server over Streamable HTTP. A missing
//! API key is warned about at startup and degrades the affected tools to a
//! textual error per call; the server itself always comes up.

use clap::{Parser, Subcommand};
use mcp_scrape_core::scraper::ScraperConfig;
use mcp_vision_core::backend::BackendKind;
use mcp_vision_core::VisionConfig;

#[derive(Parser)]
#[command(name = "vision-server", about = "UI Vision MCP Server")]
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

    /// Vision backend: openrouter or gemini
    #[clap(long, default_value = "openrouter")]
    backend: BackendKind,

    /// Model override (each backend has its own default)
    #[clap(long)]
    model: Option<String>,

    /// Custom Chrome/Chromium binary path (used by audit_url)
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
        None => ServeArgs::parse_from(["vision-server", "serve"]),
    };

    server_common::init_logging();

    let key_var = args.backend.key_var();
    if std::env::var(key_var).ok().filter(|k| !k.is_empty()).is_none() {
        tracing::warn!(
            "{} not set; vision tools will return an error until it is configured",
            key_var
        );
    } else {
        tracing::info!("{} found, vision tools enabled", key_var);
    }

    let config = VisionConfig {
        backend: args.backend,
        model: args.model,
    };

    let scraper_config = ScraperConfig {
        browser_path: args.browser_path,
        no_sandbox: args.no_sandbox,
    };

    let server = mcp_vision_core::build_server(config, scraper_config)?;

    tokio::select! {
        result = server_common::run_http(server, &args.server) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down");
            Ok(())
        }
    }
}
