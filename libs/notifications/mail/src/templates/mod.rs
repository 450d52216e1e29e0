//! Template mailer backed by Handlebars
//!
//! This module provides:
//! - `TemplateMailer`: the contract for sending an email from a text/HTML template pair
//! - `StandardTemplateMailer`: renders templates loaded from a glob of files and
//!   delegates the resulting message to a wrapped [`Mailer`]
//!
//! Templates are registered under their file name, e.g. `./templates/*.tmpl`
//! makes `welcome_text.tmpl` available as `"welcome_text.tmpl"`.

use crate::error::{MailError, MailResult};
use crate::models::{Message, MessageConfig, TemplateData, TemplateRequest};
use crate::provider::Mailer;
use async_trait::async_trait;
use handlebars::Handlebars;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Sends emails whose bodies (HTML and plain text) are compiled from templates.
#[async_trait]
pub trait TemplateMailer: Send + Sync {
    /// Render `template` and send it with the envelope from `config`.
    ///
    /// Both arguments are required; a missing one fails with
    /// [`MailError::InvalidInput`].
    async fn send(
        &self,
        template: Option<&TemplateRequest>,
        config: Option<&MessageConfig>,
    ) -> MailResult<()>;
}

/// Default [`TemplateMailer`] implementation.
///
/// The compiled template set is read-only after construction and shared
/// between concurrent sends.
pub struct StandardTemplateMailer<M> {
    mailer: M,
    handlebars: Arc<Handlebars<'static>>,
}

impl<M: Mailer> StandardTemplateMailer<M> {
    /// Compile every template matching `pattern` and wrap `mailer`.
    pub fn new(mailer: M, pattern: &str) -> MailResult<Self> {
        let mut handlebars = Handlebars::new();
        // Bodies are emitted exactly as rendered, for both text and HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut registered = 0usize;
        for entry in glob::glob(pattern)? {
            let path = entry.map_err(|e| MailError::TemplateLoadError(e.to_string()))?;
            if !path.is_file() {
                continue;
            }

            let name = template_name(&path)?;
            handlebars
                .register_template_file(&name, &path)
                .map_err(|e| {
                    MailError::TemplateLoadError(format!(
                        "failed to parse {}: {}",
                        path.display(),
                        e
                    ))
                })?;

            debug!(template = %name, path = %path.display(), "Registered template");
            registered += 1;
        }

        if registered == 0 {
            return Err(MailError::TemplateLoadError(format!(
                "pattern matches no files: `{}`",
                pattern
            )));
        }

        Ok(Self {
            mailer,
            handlebars: Arc::new(handlebars),
        })
    }

    /// Create a new template mailer or panic.
    ///
    /// Intended for process startup only.
    pub fn must_new(mailer: M, pattern: &str) -> Self {
        match Self::new(mailer, pattern) {
            Ok(template_mailer) => template_mailer,
            Err(e) => panic!("failed to create template mailer: {}", e),
        }
    }

    /// Check if a template exists
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// List all registered templates
    pub fn list_templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlebars
            .get_templates()
            .keys()
            .map(|s| s.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// The wrapped mailer
    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    fn render(&self, name: &str, data: &TemplateData) -> MailResult<String> {
        self.handlebars.render(name, data).map_err(MailError::from)
    }
}

fn template_name(path: &Path) -> MailResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            MailError::TemplateLoadError(format!("invalid template file name: {}", path.display()))
        })
}

#[async_trait]
impl<M: Mailer> TemplateMailer for StandardTemplateMailer<M> {
    async fn send(
        &self,
        template: Option<&TemplateRequest>,
        config: Option<&MessageConfig>,
    ) -> MailResult<()> {
        let config = config.ok_or(MailError::InvalidInput("config parameter is required"))?;
        let template = template.ok_or(MailError::InvalidInput("template parameter is required"))?;

        debug!(
            text_template = %template.text_template_name,
            html_template = %template.html_template_name,
            "Rendering email templates"
        );

        let text = self.render(&template.text_template_name, &template.data)?;
        let html = self.render(&template.html_template_name, &template.data)?;

        // Errors from the wrapped mailer are returned untouched
        self.mailer
            .send(&Message::from_config(config.clone(), html, text))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use crate::provider::MockMailer;

    fn pattern() -> String {
        format!("{}/testdata/*.tmpl", env!("CARGO_MANIFEST_DIR"))
    }

    fn template_mailer() -> StandardTemplateMailer<MockMailer> {
        StandardTemplateMailer::must_new(MockMailer::new(), &pattern())
    }

    fn foo_request() -> TemplateRequest {
        TemplateRequest::new("foo_text.tmpl", "foo_html.tmpl").with_var("FooVar", "foo")
    }

    #[test]
    fn test_new_invalid_template_path() {
        let result = StandardTemplateMailer::new(MockMailer::new(), "./invalid/*.tmpl");

        let err = result.err().expect("expected a load error");
        assert_eq!(
            err,
            MailError::TemplateLoadError("pattern matches no files: `./invalid/*.tmpl`".to_string())
        );
    }

    #[test]
    fn test_new_invalid_glob_pattern() {
        let result = StandardTemplateMailer::new(MockMailer::new(), "./testdata/[*.tmpl");
        assert!(matches!(result, Err(MailError::TemplateLoadError(_))));
    }

    #[test]
    fn test_new_template_parse_error() {
        let pattern = format!("{}/testdata/invalid/*.tmpl", env!("CARGO_MANIFEST_DIR"));
        let result = StandardTemplateMailer::new(MockMailer::new(), &pattern);

        match result {
            Err(MailError::TemplateLoadError(msg)) => {
                assert!(msg.starts_with("failed to parse"), "{}", msg);
                assert!(msg.contains("broken.tmpl"), "{}", msg);
            }
            Err(other) => panic!("expected a load error, got {:?}", other),
            Ok(_) => panic!("expected a load error"),
        }
    }

    #[test]
    fn test_new_success() {
        let mailer = template_mailer();
        assert!(mailer.has_template("foo_text.tmpl"));
        assert!(mailer.has_template("foo_html.tmpl"));
        assert_eq!(mailer.list_templates(), ["foo_html.tmpl", "foo_text.tmpl"]);
    }

    #[test]
    #[should_panic(expected = "failed to create template mailer")]
    fn test_must_new_panics() {
        StandardTemplateMailer::must_new(MockMailer::new(), "./invalid/*.tmpl");
    }

    #[tokio::test]
    async fn test_send_config_is_required() {
        let mailer = template_mailer();

        let err = mailer
            .send(Some(&TemplateRequest::default()), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "config parameter is required");
        assert_eq!(mailer.mailer().sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_template_is_required() {
        let mailer = template_mailer();

        let err = mailer
            .send(None, Some(&MessageConfig::default()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "template parameter is required");
    }

    #[tokio::test]
    async fn test_send_missing_text_template() {
        let mailer = template_mailer();
        let request = TemplateRequest::new("foo_txt.tmpl", "foo_html.tmpl");

        let err = mailer
            .send(Some(&request), Some(&MessageConfig::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::RenderError(_)));
        assert!(err.to_string().contains("foo_txt.tmpl"));
        assert_eq!(mailer.mailer().sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_missing_html_template() {
        let mailer = template_mailer();
        let request = TemplateRequest::new("foo_text.tmpl", "foo_htm.tmpl");

        let err = mailer
            .send(Some(&request), Some(&MessageConfig::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::RenderError(_)));
        assert!(err.to_string().contains("foo_htm.tmpl"));
    }

    #[tokio::test]
    async fn test_send_render_fails_mid_template() {
        let pattern = format!("{}/testdata/render_error/*.tmpl", env!("CARGO_MANIFEST_DIR"));
        let mailer = StandardTemplateMailer::must_new(MockMailer::new(), &pattern);
        let request =
            TemplateRequest::new("shout_text.tmpl", "plain_html.tmpl").with_var("FooVar", "foo");

        // Compiles fine; the unknown helper only fails once rendering reaches it
        let err = mailer
            .send(Some(&request), Some(&MessageConfig::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::RenderError(_)));
        assert!(err.to_string().contains("shout"), "{}", err);
        assert_eq!(mailer.mailer().sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_mailer_error_passes_through() {
        let unexpected = MailError::TransportError("unexpected error".to_string());
        let mailer = StandardTemplateMailer::must_new(MockMailer::failing(unexpected.clone()), &pattern());

        let err = mailer
            .send(Some(&foo_request()), Some(&MessageConfig::default()))
            .await
            .unwrap_err();

        assert_eq!(err, unexpected);
    }

    #[tokio::test]
    async fn test_send_success() {
        let mailer = template_mailer();

        let config = MessageConfig {
            from: Address::new("joe", "joedoe@example.com"),
            to: vec![Address::new("jane", "janedoe@example.com")],
            subject: "hello".to_string(),
            ..Default::default()
        };

        mailer.send(Some(&foo_request()), Some(&config)).await.unwrap();

        let expected = Message::from_config(config, "foohtml\n".to_string(), "footext\n".to_string());
        assert_eq!(mailer.mailer().sent_messages().await, vec![expected]);
    }

    #[tokio::test]
    async fn test_concurrent_sends_do_not_interfere() {
        let mailer = Arc::new(template_mailer());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let mailer = Arc::clone(&mailer);
                tokio::spawn(async move {
                    let request = TemplateRequest::new("foo_text.tmpl", "foo_html.tmpl")
                        .with_var("FooVar", format!("user{}", i));
                    let config = MessageConfig {
                        subject: format!("subject {}", i),
                        ..Default::default()
                    };
                    mailer.send(Some(&request), Some(&config)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let sent = mailer.mailer().sent_messages().await;
        assert_eq!(sent.len(), 16);
        for message in sent {
            let i = message.subject.trim_start_matches("subject ");
            assert_eq!(message.text, format!("user{}text\n", i));
            assert_eq!(message.html, format!("user{}html\n", i));
        }
    }
}
