//! Rendering of command results.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Fields holding secret material in serialized models.
const SECRET_FIELDS: &[&str] = &["master_password", "password"];

const REDACTED: &str = "[REDACTED]";

/// Result of a command.
#[derive(Debug)]
pub enum Output {
    /// A resource state, printed as pretty JSON.
    State(Value),
    /// A plain status line.
    Message(String),
}

impl Output {
    pub fn state(model: &impl Serialize) -> Result<Self> {
        Ok(Self::State(serde_json::to_value(model)?))
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Render for the terminal, redacting secrets unless `reveal` is set.
    pub fn render(self, reveal: bool) -> Result<String> {
        match self {
            Self::Message(text) => Ok(text),
            Self::State(mut value) => {
                if !reveal {
                    redact(&mut value);
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }
}

fn redact(value: &mut Value) {
    if let Value::Object(map) = value {
        for field in SECRET_FIELDS {
            if let Some(secret) = map.get_mut(*field).filter(|s| !s.is_null()) {
                *secret = Value::String(REDACTED.to_string());
            }
        }
    }
}
