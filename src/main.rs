//! Oxyde preview - serves the documentation saved by a test run
//!
//! Usage: `oxyde <documentation.json> [port]`
//!
//! Settings come from `~/.oxyde/config.yaml`; the port argument overrides the
//! configured preview port.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;

use oxyde::{logging, Config, DocContext, PreviewModel, PreviewServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default()?;
    let _guard = logging::init(&config.log);

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: oxyde <documentation.json> [port]")?;
    let port = match args.next() {
        Some(port) => port.parse().context("invalid port number")?,
        None => config.preview_port,
    };

    let dc = DocContext::load_json(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), endpoints = dc.endpoints().len(), "Documentation loaded");

    let server = PreviewServer::new(PreviewModel::from_context(&dc))?;
    server.serve(SocketAddr::from(([127, 0, 0, 1], port))).await?;

    Ok(())
}
