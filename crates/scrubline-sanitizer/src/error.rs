//! Error types for the sanitization engine

use crate::registry::SecretKind;
use thiserror::Error;

/// Errors raised while building a pattern registry.
///
/// Scanning and redaction are total over any input text, so every variant here
/// is a construction-time failure.
#[derive(Debug, Error)]
pub enum SanitizerError {
    #[error("Invalid pattern for {kind}: {source}")]
    InvalidPattern {
        kind: SecretKind,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern for {0} can match the empty string")]
    ZeroWidthPattern(SecretKind),

    #[error("Pattern kind registered twice: {0}")]
    DuplicateKind(SecretKind),
}

pub type Result<T> = std::result::Result<T, SanitizerError>;
