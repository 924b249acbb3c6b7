//! Tenant Router
//!
//! Edge router that dispatches requests by path prefix and hostname.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                TENANT ROUTER                 │
//!     Client Request      │  ┌────────┐   ┌──────────┐   ┌───────────┐  │
//!     ────────────────────┼─▶│ tenant │──▶│ matcher  │──▶│ upstream  │  │
//!                         │  │resolver│   │ (route)  │   │ URL build │  │
//!                         │  └────────┘   └──────────┘   └─────┬─────┘  │
//!                         │                                    ▼        │
//!                         │                             ┌───────────┐   │      API / WS /
//!     Client Response     │  ┌──────────────────┐       │  request  │   │      Emit / Pages
//!     ◀───────────────────┼──│ relay / tunnel   │◀──────│ transform │◀──┼────▶ origins
//!                         │  └──────────────────┘       └───────────┘   │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tenant_router::config::load_config;
use tenant_router::observability::init_logging;
use tenant_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "tenant-router")]
#[command(about = "Host-based edge router with tenant header injection", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override its values.
    #[arg(short, long, env = "ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.check {
        println!("configuration OK");
        return Ok(());
    }

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_domain = %config.tenant.base_domain,
        api_v1 = %config.origins.api_v1,
        ws = %config.origins.ws,
        emit = %config.origins.emit,
        frontend = %config.frontend.default_origin,
        frontend_overrides = config.frontend.hosts.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
