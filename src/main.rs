//! Instafood proxy.
//!
//! ```text
//!     Browser                       ┌──────────────────────────────┐
//!     ──── GET /api/restaurants ───▶│ cors → request-id → trace    │
//!     ──── GET /api/menu ──────────▶│        → handlers            │──── GET ───▶ upstream
//!     ◀─── 200 JSON / 500 text ─────│ ◀── relay JSON or fail ──────│◀─── JSON ───  service
//!                                   └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use instafood_proxy::config::resolve_config;
use instafood_proxy::lifecycle::{signals, Shutdown};
use instafood_proxy::observability::{logging, metrics};
use instafood_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "instafood-proxy")]
#[command(about = "CORS relay for the Instafood restaurant and menu API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides the config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.port)?;

    logging::init(&config.observability);

    tracing::info!("instafood-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config)?;
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
