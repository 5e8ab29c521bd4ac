//! Scrubline sanitization engine
//!
//! Finds sensitive substrings in free-form text and produces a redacted copy:
//! - Ordered registry of detectors (API keys, tokens, connection strings, PII)
//! - Scanner that resolves cross-detector overlaps into a disjoint match set
//! - Redactor with mask, strip, hash-label and tagged-label modes
//! - Reports with per-severity stats, and a residual-match validator
//!
//! The engine is a best-effort heuristic. It reduces accidental leakage and
//! makes no guarantee against deliberately obfuscated input.

pub mod error;
pub mod redactor;
pub mod registry;
pub mod report;
pub mod sanitizer;
pub mod scanner;
pub mod validator;

pub use error::{Result, SanitizerError};
pub use redactor::{RedactionMode, SanitizationConfig};
pub use registry::{PatternDef, PatternInfo, PatternRegistry, PatternSpec, SecretKind, Severity};
pub use report::{SanitizationResult, SeverityStats, NO_SECRETS_LINE};
pub use sanitizer::Sanitizer;
pub use scanner::{CanonicalMatchSet, Match, Scanner};
pub use validator::Validation;
