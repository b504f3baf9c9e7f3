//! Structured error types shared across decaygen crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DecayError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (selectors, values, indices, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the decaygen sampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DecayError {
    /// Unknown selectors or inconsistent settings detected at configuration time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ErrorInfo),
    /// A bias function produced a negative value.
    #[error("invalid bias: {0}")]
    InvalidBias(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
    /// Collective reduction errors.
    #[error("reduction error: {0}")]
    Reduction(ErrorInfo),
    /// Serialization and file errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl DecayError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DecayError::InvalidConfiguration(info)
            | DecayError::InvalidBias(info)
            | DecayError::Rng(info)
            | DecayError::Reduction(info)
            | DecayError::Serde(info) => info,
        }
    }

    /// Builds the error returned when a selector string names no known entry.
    pub fn unknown_selector(kind: &str, value: &str, known: &[&str]) -> Self {
        DecayError::InvalidConfiguration(
            ErrorInfo::new("unknown-selector", format!("unknown {kind} selector"))
                .with_context("kind", kind)
                .with_context("value", value)
                .with_hint(format!("expected one of: {}", known.join(", "))),
        )
    }

    /// Builds the error returned when a bias function yields a negative value.
    pub fn negative_bias(value: f64) -> Self {
        DecayError::InvalidBias(
            ErrorInfo::new("negative-bias", "bias function returned a negative value")
                .with_context("value", value.to_string())
                .with_hint("bias functions must be non-negative everywhere"),
        )
    }
}
