use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tracing::{info, info_span, warn, Instrument};

use crate::config::{Config, ServerConfig, SiteConfig};
use crate::http::connection::Connection;

/// Pause after a failed `accept`, so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound, listening socket.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Binds `host:port` and starts listening with the configured backlog.
    pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let address = cfg.address();
        let addr = lookup_host(address.as_str())
            .await
            .with_context(|| format!("resolving {}", address))?
            .next()
            .with_context(|| format!("no address found for {}", address))?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("binding {}", addr))?;

        let inner = socket.listen(cfg.backlog)?;
        info!("Listening on {} (backlog {})", inner.local_addr()?, cfg.backlog);

        Ok(Self { inner })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accepts forever, one task per connection.
    ///
    /// Tasks are never awaited and their number is not limited. A failed
    /// `accept` is logged and the loop keeps going after [`ACCEPT_BACKOFF`].
    pub async fn accept_loop(self, site: Arc<SiteConfig>) {
        loop {
            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            info!("Accepted connection from {}", peer);

            let site = Arc::clone(&site);
            tokio::spawn(
                async move {
                    if let Err(e) = Connection::new(socket, site).run().await {
                        warn!("Connection error from {}: {:#}", peer, e);
                    }
                }
                .instrument(info_span!("conn", %peer)),
            );
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = Listener::bind(&cfg.server).await?;
    listener.accept_loop(Arc::new(cfg.site.clone())).await;
    Ok(())
}
