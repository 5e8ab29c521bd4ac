//! Residual-match validation
//!
//! Re-scans text (typically redactor output) and reports anything still
//! detectable. Used as a self-check on sanitized output and as a
//! "scan before send" gate.

use crate::registry::Severity;
use crate::scanner::{CanonicalMatchSet, Scanner};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub ok: bool,
    pub residual: CanonicalMatchSet,
}

pub fn validate(scanner: &Scanner, text: &str) -> Validation {
    validate_at_least(scanner, text, Severity::Low)
}

/// Validate against detectors at or above `min_severity` only
pub fn validate_at_least(scanner: &Scanner, text: &str, min_severity: Severity) -> Validation {
    let residual = scanner.scan_at_least(text, min_severity);
    Validation {
        ok: residual.is_empty(),
        residual,
    }
}
