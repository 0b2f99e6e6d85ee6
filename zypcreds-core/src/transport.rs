use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use crate::error::{ZypCredsError, ZypCredsResult};
use crate::request::PreparedRequest;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, untouched.
    pub body: Vec<u8>,
}

/// Executes prepared requests.
///
/// The default implementation is [`HttpTransport`]. Implementations must map a
/// timeout to [`ZypCredsError::Timeout`] and any other failure to
/// [`ZypCredsError::Transport`]. A non-success status is not a failure at this
/// level: the body is returned so the service's error fields can be decoded.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw reply.
    async fn execute(&self, request: PreparedRequest) -> ZypCredsResult<RawResponse>;
}

/// A simple wrapper on an HTTP client. Sets sensible defaults such as the
/// connect timeout and user-agent.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Initializes a transport whose connections time out after `connect_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Configuration`] if the HTTP client cannot be created.
    pub fn new(connect_timeout: Duration) -> ZypCredsResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                ZypCredsError::configuration(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: PreparedRequest) -> ZypCredsResult<RawResponse> {
        let url = request.endpoint();

        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(request.timeout)
            .headers(request.headers)
            .header(
                USER_AGENT,
                format!("zypcreds-core/{}", env!("CARGO_PKG_VERSION")),
            );
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| request_error(&url, &err))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| request_error(&url, &err))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn request_error(url: &str, err: &reqwest::Error) -> ZypCredsError {
    if err.is_timeout() {
        return ZypCredsError::Timeout {
            url: url.to_string(),
        };
    }

    let error = if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    };
    ZypCredsError::Transport {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        error,
    }
}
