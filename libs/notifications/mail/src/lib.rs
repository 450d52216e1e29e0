//! Transactional mail with interchangeable backends
//!
//! This library provides a small provider-agnostic mail contract, a Mandrill
//! implementation of it, and an optional template layer that renders the
//! message bodies before delegating to a provider.
//!
//! ## Components
//!
//! - **Mail Model**: `Address`, `Message`, `MessageConfig`, `TemplateRequest`, `Attachment`
//! - **Providers**: `Mailer` trait, `Mandrill` (HTTP API) and `MockMailer`
//! - **Templates**: `TemplateMailer` trait and the Handlebars-based `StandardTemplateMailer`
//! - **Transport**: `HttpClient` seam with a reqwest-backed default
//!
//! ## Usage
//!
//! ```ignore
//! use mail::{Address, Mailer, Mandrill, MandrillOptions, Message};
//!
//! let client = Mandrill::must_new("https://mandrillapp.com/api/1.0/", "my-token");
//! client.ping().await?;
//!
//! let message = Message::new(Address::new("FastBill GmbH", "no-reply@fastbill.com"), "Hello world")
//!     .to(Address::new("Info", "info@fastbill.com"))
//!     .with_html("<h1>Hello</h1>")
//!     .with_text("Hello")
//!     .with_options(MandrillOptions {
//!         important: true,
//!         ..Default::default()
//!     });
//!
//! client.send(&message).await?;
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod templates;
pub mod transport;

// Re-export main types
pub use config::MandrillConfig;
pub use error::{MailError, MailResult};
pub use models::{
    Address, Attachment, Headers, Message, MessageConfig, ProviderOptions, TemplateData,
    TemplateRequest,
};
pub use provider::{Mailer, Mandrill, MandrillOptions, MockMailer, MockTemplateMailer};
pub use templates::{StandardTemplateMailer, TemplateMailer};
pub use transport::{HttpClient, HttpResponse, ReqwestHttpClient};
