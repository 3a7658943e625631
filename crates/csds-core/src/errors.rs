//! Error types for csds-core.
//!
//! Every failure the core can produce is a `CsdsError`. Malformed snapshot
//! input always carries the xDS category that was being processed so the
//! caller can tell the user which part of the dump is broken.

use thiserror::Error;

use crate::model::XdsKind;

pub type CsdsResult<T> = Result<T, CsdsError>;

#[derive(Debug, Error)]
pub enum CsdsError {
    /// A config entry is missing a required field or has the wrong shape.
    #[error("malformed {kind} config: {message}")]
    Malformed { kind: XdsKind, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CsdsError {
    pub fn malformed(kind: XdsKind, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Category of the config entry that failed, if any.
    pub fn kind(&self) -> Option<XdsKind> {
        match self {
            Self::Malformed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
