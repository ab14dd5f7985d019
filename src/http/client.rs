use std::time::{Duration, Instant};

use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;

/// Performs one HTTP exchange.
///
/// Any well-formed response is `Ok`, whatever its status code; only
/// transport-level failures are errors.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Per-request timeout used by [`HttpClient::new`]
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Client with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Transport for HttpClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.into(), request.url)
            .headers(request.headers);

        if !request.body.is_empty() {
            req = req.body(request.body);
        }

        let start = Instant::now();
        let response = req.send().await?;
        let duration = start.elapsed();

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Response::new(status, headers, body, duration)
    }
}
