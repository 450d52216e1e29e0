//! Mail provider contract and implementations

pub mod mandrill;
pub mod mock;

pub use mandrill::{Mandrill, MandrillOptions};
pub use mock::{MockMailer, MockTemplateMailer};

use crate::error::MailResult;
use crate::models::Message;
use async_trait::async_trait;

/// Trait for mail providers.
///
/// Implementations hold only immutable state after construction and can be
/// shared between concurrent callers.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an email
    async fn send(&self, message: &Message) -> MailResult<()>;

    /// Fails if the endpoint or the credentials are wrong
    async fn ping(&self) -> MailResult<()>;

    /// Get provider name
    fn name(&self) -> &'static str;
}
