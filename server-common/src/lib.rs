//! Shared bootstrap for the MCP servers in this workspace.
//!
//! Binaries build their `Server` in the matching core crate and hand it to
//! `run_http()`. The watcher binary is not an MCP server but reuses
//! `init_logging()` so all three processes log the same way.

use pmcp::server::streamable_http_server::{StreamableHttpServer, StreamableHttpServerConfig};
use pmcp::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// CLI arguments shared by the HTTP-serving binaries.
#[derive(Debug, Clone, clap::Args)]
pub struct CliArgs {
    /// Host to bind to
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[clap(long, default_value = "3200")]
    pub port: u16,
}

/// Initialize tracing with an env-filter defaulting to `info`.
///
/// Safe to call exactly once per process; binaries call it before anything
/// else so startup warnings (missing API keys, browser probes) are visible.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Serve an MCP server over Streamable HTTP until the handle resolves.
pub async fn run_http(server: Server, args: &CliArgs) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    tracing::info!(host = %args.host, port = args.port, "starting MCP HTTP server");

    let server = Arc::new(Mutex::new(server));

    let config = StreamableHttpServerConfig {
        session_id_generator: None,
        enable_json_response: true,
        event_store: None,
        on_session_initialized: None,
        on_session_closed: None,
        http_middleware: None,
    };

    let http_server = StreamableHttpServer::with_config(addr, server, config);
    let (bound_addr, server_handle) = http_server.start().await?;

    tracing::info!("MCP server listening on http://{}/mcp", bound_addr);

    server_handle.await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(clap::Parser)]
    struct TestCli {
        #[clap(flatten)]
        server: CliArgs,
    }

    #[test]
    fn test_cli_args_defaults() {
        use clap::Parser;

        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.server.host, "127.0.0.1");
        assert_eq!(cli.server.port, 3200);
    }

    #[test]
    fn test_cli_args_custom() {
        use clap::Parser;

        let cli = TestCli::parse_from(["test", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(cli.server.host, "0.0.0.0");
        assert_eq!(cli.server.port, 8080);
    }
}
