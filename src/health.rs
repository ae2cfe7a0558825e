// ABOUTME: Post-deploy health verification against the freshly started server.
// ABOUTME: Bounded GET attempts with a fixed pause; failures are logged, never raised.

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::{HealthCheckConfig, client_host};
use crate::types::Port;

/// Pause between failed attempts. Fixed, not exponential: the server is local
/// and is expected to be ready almost immediately.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

const USER_AGENT: &str = concat!("webroll-health/", env!("CARGO_PKG_VERSION"));

/// Why a single probe did not yield a response.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid health check URL: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connect(#[source] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Result of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    /// Requests issued, including the successful one.
    pub attempts: u32,
}

/// Polls a URL until it answers 200 or the attempts run out.
#[derive(Debug, Clone)]
pub struct HealthVerifier {
    timeout: Duration,
    retries: u32,
    interval: Duration,
}

impl HealthVerifier {
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self {
            timeout,
            retries,
            interval: RETRY_INTERVAL,
        }
    }

    pub fn from_config(config: &HealthCheckConfig) -> Self {
        Self::new(config.timeout, config.retries)
    }

    /// Override the pause between attempts.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub async fn check(&self, url: &str) -> bool {
        self.verify(url).await.passed
    }

    pub async fn verify(&self, url: &str) -> Verdict {
        tracing::info!(%url, retries = self.retries, "running health check");

        for attempt in 1..=self.retries {
            match fetch(url, self.timeout).await {
                Ok(response) if response.status() == StatusCode::OK => {
                    tracing::info!(attempt, "health check passed");
                    return Verdict {
                        passed: true,
                        attempts: attempt,
                    };
                }
                Ok(response) => {
                    tracing::warn!(
                        attempt,
                        status = response.status().as_u16(),
                        "health check returned unexpected status"
                    );
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "health check attempt failed");
                }
            }

            if attempt < self.retries {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::error!(attempts = self.retries, "health check failed");
        Verdict {
            passed: false,
            attempts: self.retries,
        }
    }
}

/// Up to `retries` GETs against `url`; true as soon as one returns exactly 200.
pub async fn check(url: &str, timeout: Duration, retries: u32) -> bool {
    HealthVerifier::new(timeout, retries).check(url).await
}

/// URL a local client uses to reach `endpoint` on a server bound to `host:port`.
pub fn health_url(host: &str, port: Port, endpoint: &str) -> String {
    let host = client_host(host);
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("http://{host}:{port}/{endpoint}")
}

/// Issue a single HTTP/1.1 GET, bounded by `timeout`, and collect the body.
pub async fn fetch(url: &str, timeout: Duration) -> Result<Response<Bytes>, ProbeError> {
    let uri: Uri = url
        .parse()
        .map_err(|_| ProbeError::InvalidUrl(url.to_string()))?;

    if uri.scheme_str() != Some("http") {
        return Err(ProbeError::InvalidUrl(url.to_string()));
    }
    let authority = uri
        .authority()
        .ok_or_else(|| ProbeError::InvalidUrl(url.to_string()))?
        .clone();
    let host = authority
        .host()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = authority.port_u16().unwrap_or(80);

    let exchange = async {
        let stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(ProbeError::Connect)?;
        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "health probe connection error");
            }
        });

        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();
        let req = Request::get(path)
            .header(hyper::header::HOST, authority.as_str())
            .header(hyper::header::USER_AGENT, USER_AGENT)
            .body(Empty::<Bytes>::new())
            .map_err(|e| ProbeError::InvalidUrl(format!("{url}: {e}")))?;

        let response = sender.send_request(req).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok::<_, ProbeError>(Response::from_parts(parts, body))
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ProbeError::Timeout(timeout))?
}
