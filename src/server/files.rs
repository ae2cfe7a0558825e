// ABOUTME: Static file request handling over the content root.
// ABOUTME: Resolves request paths safely and builds responses with default and configured headers.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const SERVER_NAME: &str = concat!("webroll/", env!("CARGO_PKG_VERSION"));
const INDEX_FILE: &str = "index.html";

/// Outcome of mapping a request path onto the content root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    /// Directory requested without a trailing slash.
    Redirect,
    NotFound,
}

/// The content root plus the headers every response must carry.
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    extra_headers: HeaderMap,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>, extra_headers: HeaderMap) -> Self {
        Self {
            root: root.into(),
            extra_headers,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn respond<B>(&self, req: Request<B>, peer: SocketAddr) -> Response<Full<Bytes>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        drop(req);

        let response = self.dispatch(&method, &path, query.as_deref()).await;

        tracing::info!(
            %peer,
            %method,
            path = %path,
            status = response.status().as_u16(),
            "request"
        );
        response
    }

    async fn dispatch(
        &self,
        method: &Method,
        raw_path: &str,
        query: Option<&str>,
    ) -> Response<Full<Bytes>> {
        let head_only = match *method {
            Method::GET => false,
            Method::HEAD => true,
            _ => {
                let mut response = self.plain(StatusCode::METHOD_NOT_ALLOWED);
                response
                    .headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
                return self.finish(response);
            }
        };

        let decoded = match urlencoding::decode(raw_path) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => return self.finish(self.plain(StatusCode::BAD_REQUEST)),
        };

        let response = match resolve(&self.root, &decoded).await {
            Resolved::File(path) => match self.file(&path, head_only).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read file");
                    self.plain(StatusCode::NOT_FOUND)
                }
            },
            Resolved::Redirect => {
                let mut location = format!("{raw_path}/");
                if let Some(query) = query {
                    location.push('?');
                    location.push_str(query);
                }
                let mut response = self.plain(StatusCode::MOVED_PERMANENTLY);
                if let Ok(value) = HeaderValue::from_str(&location) {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                response
            }
            Resolved::NotFound => self.plain(StatusCode::NOT_FOUND),
        };

        self.finish(response)
    }

    async fn file(&self, path: &Path, head_only: bool) -> std::io::Result<Response<Full<Bytes>>> {
        let metadata = tokio::fs::metadata(path).await?;
        let body = if head_only {
            Bytes::new()
        } else {
            Bytes::from(tokio::fs::read(path).await?)
        };

        let mut response = Response::new(Full::new(body));
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type(path)),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        if let Ok(modified) = metadata.modified()
            && let Ok(value) = HeaderValue::from_str(&http_date(modified))
        {
            headers.insert(header::LAST_MODIFIED, value);
        }
        Ok(response)
    }

    /// Short text response for errors and redirects.
    fn plain(&self, status: StatusCode) -> Response<Full<Bytes>> {
        let text = format!(
            "{} {}\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        let mut response = Response::new(Full::new(Bytes::from(text.clone())));
        *response.status_mut() = status;
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(text.len()));
        response
    }

    /// Add the default headers, then the configured ones, which win on collision.
    fn finish(&self, mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
        let headers = response.headers_mut();
        headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
        if let Ok(date) = HeaderValue::from_str(&http_date(SystemTime::now())) {
            headers.insert(header::DATE, date);
        }
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }
        response
    }
}

/// Map a decoded request path onto a file below `root`.
///
/// `..` segments are refused outright rather than normalized.
pub async fn resolve(root: &Path, request_path: &str) -> Resolved {
    let mut candidate = root.to_path_buf();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Resolved::NotFound,
            s if s.contains('\\') || s.contains('\0') => return Resolved::NotFound,
            s => candidate.push(s),
        }
    }

    let Ok(metadata) = tokio::fs::metadata(&candidate).await else {
        return Resolved::NotFound;
    };

    if metadata.is_file() {
        return Resolved::File(candidate);
    }

    if !request_path.ends_with('/') {
        return Resolved::Redirect;
    }

    let index = candidate.join(INDEX_FILE);
    match tokio::fs::metadata(&index).await {
        Ok(m) if m.is_file() => Resolved::File(index),
        _ => Resolved::NotFound,
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
