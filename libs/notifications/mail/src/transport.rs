//! HTTP transport used by the HTTP-based providers.

use crate::error::{MailError, MailResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Raw response from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

/// Just the POST call a provider needs, so tests can swap the transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a POST to `url` with the given content type and body.
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> MailResult<HttpResponse>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> MailResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> MailResult<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                e
            })?;

        let status = response.status().as_u16();
        // The status is already known; a broken body must not hide it
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                warn!(url = %url, status, error = %e, "Failed to read response body");
                Vec::new()
            }
        };

        Ok(HttpResponse { status, body })
    }
}
