// ABOUTME: Minimal HTTP/1.1 GET client for health pages.
// ABOUTME: Connects over TCP with hyper and buffers the whole response body.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::Uri;
use hyper::header::{CACHE_CONTROL, HOST, USER_AGENT};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use super::HealthError;

/// Status and decoded body of a health page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Fetches a path from a host. `host` may carry an explicit `:port`.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, host: &str, path: &str) -> Result<HttpResponse, HealthError>;
}

/// Plain HTTP client built on hyper's connection API.
#[derive(Debug, Clone, Default)]
pub struct HyperClient;

impl HyperClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HttpGet for HyperClient {
    async fn get(&self, host: &str, path: &str) -> Result<HttpResponse, HealthError> {
        let uri: Uri = format!("http://{host}{path}")
            .parse()
            .map_err(|e| HealthError::InvalidUrl(format!("http://{host}{path}: {e}")))?;
        let authority = uri
            .authority()
            .ok_or_else(|| HealthError::InvalidUrl(format!("missing host in {uri}")))?
            .clone();
        let port = authority.port_u16().unwrap_or(80);

        let stream = TcpStream::connect((authority.host(), port))
            .await
            .map_err(|e| HealthError::Transport(format!("failed to connect to {authority}: {e}")))?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| HealthError::Transport(format!("HTTP handshake failed: {e}")))?;

        // Drive the connection until the response is read
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("health page connection error: {}", e);
            }
        });

        let path_and_query = uri
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/")
            .to_string();

        let req = hyper::Request::builder()
            .method("GET")
            .uri(path_and_query)
            .header(HOST, authority.as_str())
            .header(CACHE_CONTROL, "no-cache")
            .header(USER_AGENT, concat!("ebdeploy/", env!("CARGO_PKG_VERSION")))
            .body(Empty::<Bytes>::new())
            .map_err(|e| HealthError::InvalidUrl(format!("failed to build request: {e}")))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| HealthError::Transport(format!("request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| HealthError::Transport(format!("failed to read response: {e}")))?
            .to_bytes();

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}
