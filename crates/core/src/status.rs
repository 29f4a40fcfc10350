use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Discriminator carried by every tool response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
    NotFound,
    Estimate,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Success => write!(f, "success"),
            ToolStatus::Error => write!(f, "error"),
            ToolStatus::NotFound => write!(f, "not_found"),
            ToolStatus::Estimate => write!(f, "estimate"),
        }
    }
}

impl std::str::FromStr for ToolStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ToolStatus::Success),
            "error" => Ok(ToolStatus::Error),
            "not_found" => Ok(ToolStatus::NotFound),
            "estimate" => Ok(ToolStatus::Estimate),
            other => Err(format!("Unknown tool status: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// Empty or missing required field.
    #[error("{0}")]
    Input(String),
    /// Storage or remote API failure.
    #[error("{0}")]
    Upstream(String),
    /// Valid request, no matching data.
    #[error("{0}")]
    NotFound(String),
}

impl ToolError {
    pub fn status(&self) -> ToolStatus {
        match self {
            ToolError::Input(_) | ToolError::Upstream(_) => ToolStatus::Error,
            ToolError::NotFound(_) => ToolStatus::NotFound,
        }
    }
}

/// Render a tool result as a JSON object with a `status` field.
///
/// `Ok` payloads must serialize to objects; their fields are merged next to the
/// status. Errors become `{status, message}`.
pub fn envelope<T: Serialize>(status: ToolStatus, result: Result<T, ToolError>) -> Value {
    let mut body = Map::new();
    match result {
        Ok(payload) => {
            body.insert("status".into(), Value::String(status.to_string()));
            match serde_json::to_value(payload) {
                Ok(Value::Object(fields)) => body.extend(fields),
                Ok(Value::Null) => {}
                Ok(other) => {
                    body.insert("result".into(), other);
                }
                Err(e) => {
                    body.insert("status".into(), Value::String(ToolStatus::Error.to_string()));
                    body.insert("message".into(), Value::String(format!("Failed to encode result: {e}")));
                }
            }
        }
        Err(err) => {
            body.insert("status".into(), Value::String(err.status().to_string()));
            body.insert("message".into(), Value::String(err.to_string()));
        }
    }
    Value::Object(body)
}

/// Shorthand for the common `status: "success"` case.
pub fn success_or_error<T: Serialize>(result: Result<T, ToolError>) -> Value {
    envelope(ToolStatus::Success, result)
}
