//! Message model
//!
//! Wire messages arrive either as bare strings or as objects carrying
//! `text` / `timestamp` / `sender`. They are resolved once into a canonical
//! [`Message`] before reaching any analyzer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message exactly as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMessage {
    /// Bare text
    Text(String),
    /// Object form
    Object {
        #[serde(default, alias = "content")]
        text: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
        #[serde(default)]
        sender: Option<String>,
    },
    /// Anything else (numbers, arrays, null...) - stringified on resolve
    Other(Value),
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        RawMessage::Text(text.to_string())
    }
}

impl From<String> for RawMessage {
    fn from(text: String) -> Self {
        RawMessage::Text(text)
    }
}

/// Canonical message record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Timestamp label; synthesized as `Message {n}` when absent
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl Message {
    /// Create a message with an explicit timestamp label
    pub fn new(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            sender: None,
        }
    }

    /// Create a message at 0-based `index` with the synthesized label
    pub fn at(index: usize, text: impl Into<String>) -> Self {
        Self::new(text, default_label(index))
    }

    /// Resolve a wire message found at 0-based `index`
    pub fn from_raw(raw: RawMessage, index: usize) -> Self {
        match raw {
            RawMessage::Text(text) => Self::at(index, text),
            RawMessage::Object { text, timestamp, sender } => Self {
                text: text.unwrap_or_default(),
                timestamp: timestamp.unwrap_or_else(|| default_label(index)),
                sender,
            },
            RawMessage::Other(value) => Self::at(index, stringify(&value)),
        }
    }

    /// Resolve a whole wire conversation, preserving order
    pub fn resolve_all(raw: Vec<RawMessage>) -> Vec<Message> {
        raw.into_iter()
            .enumerate()
            .map(|(i, m)| Self::from_raw(m, i))
            .collect()
    }

    /// Build canonical messages from plain texts
    pub fn from_texts<I, S>(texts: I) -> Vec<Message>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| Self::at(i, t))
            .collect()
    }
}

fn default_label(index: usize) -> String {
    format!("Message {}", index + 1)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
