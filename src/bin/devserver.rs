//! devserver - serve the state directory over HTTP for local development
//!
//! ```bash
//! devserver              # server.addr, 0.0.0.0:8000 by default
//! devserver 9000         # 0.0.0.0:9000
//! devserver 127.0.0.1 9000
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use frontline_sync::config::{defaults, SyncConfig};
use frontline_sync::server::create_app;

#[derive(Parser, Debug)]
#[command(name = "devserver")]
#[command(about = "Serve the timeline data directory with permissive CORS")]
struct Args {
    /// `[PORT]` or `[HOST] [PORT]`
    #[arg(num_args = 0..=2, value_name = "HOST PORT")]
    endpoint: Vec<String>,

    /// Directory to serve (defaults to the configured data directory)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl Args {
    /// Listen address: a single positional is the port, two are host then
    /// port, none falls back to `server.addr` from the config.
    fn listen_addr(&self, config: &SyncConfig) -> Result<String> {
        let (host, port) = match self.endpoint.as_slice() {
            [] => return Ok(config.server.addr.clone()),
            [port] => (defaults::SERVER_HOST, port),
            [host, port] => (host.as_str(), port),
            _ => bail!("expected at most HOST and PORT"),
        };
        let port: u16 = port
            .parse()
            .with_context(|| format!("Invalid port: {port}"))?;
        Ok(format!("{host}:{port}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = SyncConfig::load();
    let addr = args.listen_addr(&config)?;
    let dir = args.dir.unwrap_or(config.storage.data_dir);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %listener.local_addr()?, dir = %dir.display(), "Listening");
    axum::serve(listener, create_app(&dir))
        .await
        .context("Server error")?;
    Ok(())
}
