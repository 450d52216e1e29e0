//! Mock mailers for testing

use super::Mailer;
use crate::error::{MailError, MailResult};
use crate::models::{Message, MessageConfig, TemplateRequest};
use crate::templates::TemplateMailer;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock mailer that captures sent messages
#[derive(Debug, Default)]
pub struct MockMailer {
    sent_messages: Arc<Mutex<Vec<Message>>>,
    pings: AtomicUsize,
    failure: Option<MailError>,
}

impl MockMailer {
    /// Create a new mock mailer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer whose calls all fail with `error`
    pub fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Get all sent messages
    pub async fn sent_messages(&self) -> Vec<Message> {
        self.sent_messages.lock().await.clone()
    }

    /// Get the count of sent messages
    pub async fn sent_count(&self) -> usize {
        self.sent_messages.lock().await.len()
    }

    /// Number of pings received
    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    /// Clear all sent messages
    pub async fn clear(&self) {
        self.sent_messages.lock().await.clear();
    }

    /// Check if a message was sent to a specific address
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_messages
            .lock()
            .await
            .iter()
            .any(|m| m.to.iter().any(|a| a.email == email))
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: &Message) -> MailResult<()> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        self.sent_messages.lock().await.push(message.clone());
        Ok(())
    }

    async fn ping(&self) -> MailResult<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);

        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Mock template mailer that captures template requests and configs
#[derive(Debug, Default)]
pub struct MockTemplateMailer {
    calls: Arc<Mutex<Vec<(TemplateRequest, MessageConfig)>>>,
    failure: Option<MailError>,
}

impl MockTemplateMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock template mailer that always fails with `error`
    pub fn failing(error: MailError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Get all captured calls
    pub async fn calls(&self) -> Vec<(TemplateRequest, MessageConfig)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TemplateMailer for MockTemplateMailer {
    async fn send(
        &self,
        template: Option<&TemplateRequest>,
        config: Option<&MessageConfig>,
    ) -> MailResult<()> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        self.calls.lock().await.push((
            template.cloned().unwrap_or_default(),
            config.cloned().unwrap_or_default(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn message(to: &str) -> Message {
        Message::new(Address::new("Foo", "foo@example.com"), "Test Subject")
            .to(Address::new("", to))
            .with_text("Test body")
    }

    #[tokio::test]
    async fn test_mock_mailer_sends_message() {
        let mailer = MockMailer::new();

        let result = mailer.send(&message("test@example.com")).await;
        assert!(result.is_ok());

        let sent = mailer.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to[0].email, "test@example.com");
    }

    #[tokio::test]
    async fn test_mock_mailer_fails() {
        let mailer = MockMailer::failing(MailError::HttpStatus(503));

        let err = mailer.send(&message("test@example.com")).await.unwrap_err();
        assert_eq!(err, MailError::HttpStatus(503));
        assert_eq!(mailer.sent_count().await, 0);
        assert!(mailer.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_mailer_was_sent_to() {
        let mailer = MockMailer::new();
        mailer.send(&message("user@example.com")).await.unwrap();

        assert!(mailer.was_sent_to("user@example.com").await);
        assert!(!mailer.was_sent_to("other@example.com").await);

        mailer.clear().await;
        assert_eq!(mailer.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_mock_mailer_counts_pings() {
        let mailer = MockMailer::new();
        mailer.ping().await.unwrap();
        mailer.ping().await.unwrap();
        assert_eq!(mailer.ping_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_template_mailer_captures_calls() {
        let mailer = MockTemplateMailer::new();
        let request = TemplateRequest::new("a.tmpl", "b.tmpl").with_var("name", "Jane");
        let config = MessageConfig {
            subject: "hi".to_string(),
            ..Default::default()
        };

        mailer.send(Some(&request), Some(&config)).await.unwrap();

        assert_eq!(mailer.calls().await, vec![(request, config)]);
    }

    #[tokio::test]
    async fn test_mock_template_mailer_fails() {
        let mailer = MockTemplateMailer::failing(MailError::RenderError("boom".to_string()));

        let err = mailer.send(None, None).await.unwrap_err();
        assert_eq!(err, MailError::RenderError("boom".to_string()));
        assert!(mailer.calls().await.is_empty());
    }
}
