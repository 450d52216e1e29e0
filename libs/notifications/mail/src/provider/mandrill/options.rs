//! Mandrill-specific message options.
//!
//! Field order and names follow the Mandrill `messages/send` documentation.
//! Everything is omitted from the payload when false or empty.

use crate::models::Attachment;
use serde::Serialize;
use serde_json::{Map, Value};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Options flattened into the Mandrill message object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MandrillOptions {
    #[serde(skip_serializing_if = "is_false")]
    pub important: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub track_opens: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub track_clicks: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_text: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_html: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub inline_css: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub url_strip_qs: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub preserve_recipients: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub view_content_link: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bcc_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tracking_domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signing_domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub return_path_domain: String,
    #[serde(skip_serializing_if = "is_false")]
    pub merge: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merge_language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<MergeVar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<MergeVars>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subaccount: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub google_analytics_campaign: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_metadata: Vec<RecipientMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
}

/// Metadata attached to a single recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipientMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rcpt: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub values: Map<String, Value>,
}

/// Merge variables for one recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeVars {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rcpt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<MergeVar>,
}

/// A single merge variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeVar {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub content: Value,
}

impl MergeVar {
    pub fn new(name: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options_serialize_empty() {
        let json = serde_json::to_string(&MandrillOptions::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_options_keep_documented_order() {
        let options = MandrillOptions {
            important: true,
            track_clicks: true,
            tags: vec!["welcome".to_string()],
            global_merge_vars: vec![MergeVar::new("FNAME", "Jane")],
            ..Default::default()
        };

        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(
            json,
            r#"{"important":true,"track_clicks":true,"global_merge_vars":[{"name":"FNAME","content":"Jane"}],"tags":["welcome"]}"#
        );
    }

    #[test]
    fn test_recipient_metadata() {
        let mut values = Map::new();
        values.insert("user_id".to_string(), json!(123));

        let options = MandrillOptions {
            recipient_metadata: vec![RecipientMetadata {
                rcpt: "bar@domain.com".to_string(),
                values,
            }],
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"recipient_metadata": [{"rcpt": "bar@domain.com", "values": {"user_id": 123}}]})
        );
    }
}
