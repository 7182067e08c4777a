use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use docroot::config::Config;
use docroot::server;

/// Serves files from a directory over HTTP/1.0, one request per connection.
#[derive(Debug, Parser)]
#[command(name = "docroot", version)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Directory to serve files from
    web_root: PathBuf,

    /// YAML file supplying defaults for the options below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (all interfaces by default)
    #[arg(long)]
    host: Option<String>,

    /// Pending-connection queue length
    #[arg(long)]
    backlog: Option<u32>,

    /// File served for the target `/`
    #[arg(long)]
    default_document: Option<String>,

    /// Bytes read and sent per body chunk
    #[arg(long)]
    chunk_size: Option<usize>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        cfg.server.port = self.port;
        cfg.site.web_root = self.web_root;

        if let Some(host) = self.host {
            cfg.server.host = host;
        }
        if let Some(backlog) = self.backlog {
            cfg.server.backlog = backlog;
        }
        if let Some(doc) = self.default_document {
            cfg.site.default_document = doc;
        }
        if let Some(size) = self.chunk_size {
            cfg.site.chunk_size = size;
        }

        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Cli::parse().into_config()?;
    cfg.validate()?;
    cfg.check_web_root()
        .context("web root must be an existing directory")?;

    tracing::info!("Serving {}", cfg.site.web_root.display());

    tokio::select! {
        res = server::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
