//! Mandrill mail provider
//!
//! Sends emails via the Mandrill HTTP API.

mod options;

pub use options::{MandrillOptions, MergeVar, MergeVars, RecipientMetadata};

use crate::config::MandrillConfig;
use crate::error::{MailError, MailResult};
use crate::models::{Headers, Message, ProviderOptions};
use crate::provider::Mailer;
use crate::transport::{HttpClient, HttpResponse, ReqwestHttpClient};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Public Mandrill API endpoint
pub const DEFAULT_BASE_URL: &str = "https://mandrillapp.com/api/1.0";

const SEND_PATH: &str = "/messages/send.json";
const PING_PATH: &str = "/users/ping.json";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Mandrill mail provider
#[derive(Clone)]
pub struct Mandrill {
    key: String,
    base_url: Url,
    client: Arc<dyn HttpClient>,
    send_endpoint: String,
    ping_endpoint: String,
}

impl Mandrill {
    /// Create a new Mandrill provider talking to `base_url` with its own
    /// reqwest transport.
    pub fn new(base_url: &str, key: impl Into<String>) -> MailResult<Self> {
        Self::with_client(base_url, key, Arc::new(ReqwestHttpClient::new()))
    }

    /// Create a new Mandrill provider using the given transport.
    pub fn with_client(
        base_url: &str,
        key: impl Into<String>,
        client: Arc<dyn HttpClient>,
    ) -> MailResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MailError::ConfigError(format!("invalid base URL '{}': {}", base_url, e)))?;

        // Url always serializes at least a trailing '/', which must not be doubled
        let root = base_url.as_str().trim_end_matches('/');
        let send_endpoint = format!("{}{}", root, SEND_PATH);
        let ping_endpoint = format!("{}{}", root, PING_PATH);

        Ok(Self {
            key: key.into(),
            base_url,
            client,
            send_endpoint,
            ping_endpoint,
        })
    }

    /// Create a new Mandrill provider or panic.
    ///
    /// Intended for process startup only.
    pub fn must_new(base_url: &str, key: impl Into<String>) -> Self {
        match Self::new(base_url, key) {
            Ok(mailer) => mailer,
            Err(e) => panic!("failed to create Mandrill mailer: {}", e),
        }
    }

    /// Create a provider from a loaded configuration
    pub fn from_config(config: &MandrillConfig) -> MailResult<Self> {
        let client = match config.timeout {
            Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
            None => ReqwestHttpClient::new(),
        };

        Self::with_client(&config.base_url, config.api_key.clone(), Arc::new(client))
    }

    /// Create from environment variables
    ///
    /// See [`MandrillConfig::from_env`] for the variables read.
    pub fn from_env() -> MailResult<Self> {
        Self::from_config(&MandrillConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn send_endpoint(&self) -> &str {
        &self.send_endpoint
    }

    pub fn ping_endpoint(&self) -> &str {
        &self.ping_endpoint
    }

    async fn send_payload<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> MailResult<HttpResponse> {
        let body = encode_payload(data)?;

        let response = self
            .client
            .post(endpoint, CONTENT_TYPE_JSON, body)
            .await
            .inspect_err(|e| error!(endpoint = %endpoint, error = %e, "Mandrill request failed"))?;

        if response.status != 200 {
            error!(
                endpoint = %endpoint,
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "Mandrill API error"
            );
            return Err(MailError::HttpStatus(response.status));
        }

        Ok(response)
    }
}

impl fmt::Debug for Mandrill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mandrill")
            .field("base_url", &self.base_url.as_str())
            .field("send_endpoint", &self.send_endpoint)
            .field("ping_endpoint", &self.ping_endpoint)
            .finish_non_exhaustive()
    }
}

/// JSON body followed by a newline.
fn encode_payload<T: Serialize + ?Sized>(data: &T) -> MailResult<Vec<u8>> {
    let mut body = serde_json::to_vec(data)?;
    body.push(b'\n');
    Ok(body)
}

// Mandrill API request structures

#[derive(Debug, Serialize)]
struct Payload<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    #[serde(flatten)]
    options: Option<&'a MandrillOptions>,
    html: &'a str,
    text: &'a str,
    subject: &'a str,
    from_email: &'a str,
    from_name: &'a str,
    to: Vec<Recipient<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<&'a Headers>,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    #[serde(skip_serializing_if = "is_blank")]
    email: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

impl<'a> WireMessage<'a> {
    fn from_message(message: &'a Message) -> Self {
        let options = match &message.options {
            Some(ProviderOptions::Mandrill(options)) => Some(options),
            None => None,
        };

        let to = message
            .to
            .iter()
            .map(|r| Recipient {
                email: &r.email,
                name: &r.name,
                kind: "to",
            })
            .collect();

        Self {
            options,
            html: &message.html,
            text: &message.text,
            subject: &message.subject,
            from_email: &message.from.email,
            from_name: &message.from.name,
            to,
            headers: (!message.headers.is_empty()).then_some(&message.headers),
        }
    }
}

#[async_trait]
impl Mailer for Mandrill {
    async fn send(&self, message: &Message) -> MailResult<()> {
        let payload = Payload {
            key: &self.key,
            message: Some(WireMessage::from_message(message)),
        };

        debug!(
            endpoint = %self.send_endpoint,
            recipients = message.to.len(),
            subject = %message.subject,
            "Sending email via Mandrill"
        );

        // The response body is not inspected; dropping it releases it
        self.send_payload(&self.send_endpoint, &payload).await?;

        info!(
            recipients = message.to.len(),
            subject = %message.subject,
            "Email accepted by Mandrill"
        );

        Ok(())
    }

    async fn ping(&self) -> MailResult<()> {
        let payload = Payload {
            key: &self.key,
            message: None,
        };

        debug!(endpoint = %self.ping_endpoint, "Pinging Mandrill");
        self.send_payload(&self.ping_endpoint, &payload).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "mandrill"
    }
}
