//! Provider-agnostic mail model.

use crate::provider::mandrill::MandrillOptions;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Standard email headers. Values are restricted to JSON values so a
/// payload can always be encoded.
pub type Headers = BTreeMap<String, Value>;

/// Variables made available to templates.
pub type TemplateData = BTreeMap<String, Value>;

/// An email/name combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub name: String,
    pub email: String,
}

impl Address {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

/// Provider-specific option sets that can ride along with a message.
///
/// Each adapter serializes only the variant it understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOptions {
    Mandrill(MandrillOptions),
}

impl From<MandrillOptions> for ProviderOptions {
    fn from(options: MandrillOptions) -> Self {
        ProviderOptions::Mandrill(options)
    }
}

/// The configurable, non-body part of an email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageConfig {
    /// Sender of the email.
    pub from: Address,
    /// One or more recipients, in delivery order.
    pub to: Vec<Address>,
    pub subject: String,
    /// Standard email headers.
    pub headers: Headers,
    /// Options understood by the mailer implementation.
    pub options: Option<ProviderOptions>,
}

/// A fully resolved email ready to hand to a [`Mailer`](crate::Mailer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub from: Address,
    pub to: Vec<Address>,
    pub subject: String,
    pub headers: Headers,
    /// Displayed as HTML in the email.
    pub html: String,
    /// Displayed as plain text in the email.
    pub text: String,
    pub options: Option<ProviderOptions>,
}

impl Message {
    /// Create a message with a sender and subject
    pub fn new(from: Address, subject: impl Into<String>) -> Self {
        Self {
            from,
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Merge a config with rendered bodies.
    pub fn from_config(config: MessageConfig, html: String, text: String) -> Self {
        Self {
            from: config.from,
            to: config.to,
            subject: config.subject,
            headers: config.headers,
            html,
            text,
            options: config.options,
        }
    }

    /// Add a recipient
    pub fn to(mut self, recipient: Address) -> Self {
        self.to.push(recipient);
        self
    }

    /// Set plain text body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set HTML body
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: impl Into<ProviderOptions>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// Everything needed to render the bodies of one email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRequest {
    pub data: TemplateData,
    /// Name of the plain text template.
    pub text_template_name: String,
    /// Name of the HTML template.
    pub html_template_name: String,
}

impl TemplateRequest {
    pub fn new(text_template_name: impl Into<String>, html_template_name: impl Into<String>) -> Self {
        Self {
            data: TemplateData::new(),
            text_template_name: text_template_name.into(),
            html_template_name: html_template_name.into(),
        }
    }

    /// Add a template variable
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// A file attached to a message.
///
/// Content is base64 encoded on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(serialize_with = "encode_content", skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Build an attachment by draining `reader`. The reader is consumed and
    /// dropped once its content has been read.
    pub fn from_reader<R: Read>(
        mime_type: impl Into<String>,
        name: impl Into<String>,
        mut reader: R,
    ) -> std::io::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(Self::new(mime_type, name, content))
    }
}

fn encode_content<S: Serializer>(content: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    use base64::Engine;
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(content))
}
