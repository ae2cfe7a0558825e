// ABOUTME: Static HTTP server over the content root, run as a background tokio task.
// ABOUTME: Refuses occupied ports, and stops by draining in-flight connections before closing.

mod files;

pub use files::{Resolved, Site, content_type, resolve};

use hyper::HeaderMap;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::config::client_host;
use crate::types::Port;

/// How long the pre-bind probe waits for a connection to an occupied port.
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Something already accepts connections on the address.
    #[error("port {port} is already in use on {host}")]
    PortInUse { host: String, port: Port },

    /// The bind host did not resolve to any address.
    #[error("could not resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: Port,
        #[source]
        source: io::Error,
    },

    /// The socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// A running server. Stop it with [`ServerHandle::stop`]; dropping the handle
/// also ends the serve loop, but without waiting for it.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, let in-flight requests finish, then close the listener.
    ///
    /// Safe to call when the serve loop already ended on its own.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "server task ended abnormally");
        }
        tracing::info!(addr = %self.local_addr, "server stopped");
    }
}

/// Start serving `content_root` on `host:port`.
///
/// Every response carries `headers` on top of the default static-file headers.
pub async fn start(
    host: &str,
    port: Port,
    content_root: &Path,
    headers: HeaderMap,
) -> Result<ServerHandle, BindError> {
    if port_in_use(host, port).await {
        return Err(BindError::PortInUse {
            host: host.to_string(),
            port,
        });
    }

    let bind_host = if host.is_empty() { "0.0.0.0" } else { host };
    let addr = tokio::net::lookup_host((bind_host, port.get()))
        .await
        .and_then(|mut addrs| {
            addrs
                .next()
                .ok_or_else(|| io::Error::other("no addresses found"))
        })
        .map_err(|source| BindError::Resolve {
            host: host.to_string(),
            port,
            source,
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| BindError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| BindError::Bind { addr, source })?;

    let site = Arc::new(Site::new(content_root, headers));
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(serve(listener, site, shutdown_rx));

    tracing::info!(
        addr = %local_addr,
        root = %content_root.display(),
        "serving HTTP on {} port {} (http://{}:{}/)",
        host,
        port,
        host,
        port
    );

    Ok(ServerHandle {
        local_addr,
        shutdown,
        task,
    })
}

/// True when something already accepts connections on `host:port`.
pub async fn port_in_use(host: &str, port: Port) -> bool {
    let target = (client_host(host), port.get());
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(target)).await,
        Ok(Ok(_))
    )
}

/// Accept loop. Returns once shutdown is signalled and every connection task
/// has finished.
async fn serve(listener: TcpListener, site: Arc<Site>, mut shutdown: watch::Receiver<bool>) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    connections.spawn(serve_connection(
                        stream,
                        peer,
                        site.clone(),
                        shutdown.clone(),
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },
            _ = shutdown.changed() => break,
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    tracing::debug!(in_flight = connections.len(), "draining connections");
    while connections.join_next().await.is_some() {}
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    site: Arc<Site>,
    mut shutdown: watch::Receiver<bool>,
) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let site = site.clone();
        async move { Ok::<_, Infallible>(site.respond(req, peer).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => {
            if let Err(e) = result {
                tracing::debug!(%peer, error = %e, "connection error");
            }
        }
        _ = shutdown.changed() => {
            conn.as_mut().graceful_shutdown();
            if let Err(e) = conn.await {
                tracing::debug!(%peer, error = %e, "connection error during shutdown");
            }
        }
    }
}
