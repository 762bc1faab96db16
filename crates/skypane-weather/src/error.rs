//! Weather pipeline error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Content of the `error` object WeatherAPI returns instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteApiError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl RemoteApiError {
    /// Builds the error from whatever the API put in the `error` field.
    /// A non-object value is kept as its JSON text.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => {
                serde_json::from_value(value.clone()).unwrap_or_else(|_| Self {
                    code: None,
                    message: value.to_string(),
                })
            }
            serde_json::Value::String(s) => Self {
                code: None,
                message: s.clone(),
            },
            other => Self {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for RemoteApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

/// Coarse failure class, used to pick user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API answered with an `error` object
    Remote,
    /// Transport failure or a body that is not JSON
    Network,
    /// JSON arrived but not in the expected shape
    Shape,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API error: {0}")]
    Remote(RemoteApiError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

impl WeatherError {
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(_) => ErrorKind::Remote,
            Self::Network(_) | Self::Endpoint(_) | Self::Parse(_) => ErrorKind::Network,
            Self::Shape(_) => ErrorKind::Shape,
        }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(err) if err.message.is_empty() => {
                "The weather service rejected the request.".to_string()
            }
            Self::Remote(err) => err.message.clone(),
            Self::Network(_) | Self::Endpoint(_) => {
                "Network error. Check your connection.".to_string()
            }
            Self::Parse(_) => "The weather service sent an unreadable response.".to_string(),
            Self::Shape(_) => "The weather service sent incomplete data.".to_string(),
        }
    }
}
