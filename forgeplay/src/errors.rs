//! Error types for the forgeplay engine.
//!
//! Playback itself cannot fail once started; every error here is raised while
//! building a stage table, loading configuration or submitting a request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for forgeplay operations.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A stage table was built without any stages.
    #[error("Stage table must contain at least one stage")]
    EmptyStageTable,

    /// A stage was defined without log lines.
    #[error("Stage '{label}' has no log lines")]
    EmptyStage {
        /// Label of the offending stage.
        label: String,
    },

    /// A configuration value was rejected.
    #[error("{0}")]
    InvalidConfig(#[from] ConfigError),

    /// A submitted proof request was malformed.
    #[error("Invalid proof request: {0}")]
    InvalidRequest(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error raised when a configuration value fails validation.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigError {
    /// The offending field, dotted for nested values (e.g. "jitter.min").
    pub field: String,
    /// What is wrong with the value.
    pub message: String,
    /// Hint for fixing the value.
    pub fix_hint: Option<String>,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("field".to_string(), serde_json::Value::String(self.field.clone()));
        map.insert("message".to_string(), serde_json::Value::String(self.message.clone()));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        map
    }
}

/// Convenience alias used by constructors and loaders.
pub type Result<T> = std::result::Result<T, PlaybackError>;
