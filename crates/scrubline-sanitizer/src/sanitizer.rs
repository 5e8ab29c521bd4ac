//! Sanitizer facade
//!
//! Bundles a shared registry with a default [`SanitizationConfig`] and runs
//! the scan → redact → summarize pipeline.

use crate::error::Result;
use crate::redactor::{self, SanitizationConfig};
use crate::registry::PatternRegistry;
use crate::report::{self, SanitizationResult};
use crate::scanner::{CanonicalMatchSet, Scanner};
use crate::validator::{self, Validation};
use std::sync::Arc;
use tracing::debug;

/// Sanitization engine entry point.
///
/// Cheap to clone; clones share the compiled registry.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    scanner: Scanner,
    config: SanitizationConfig,
}

impl Sanitizer {
    pub fn new(registry: Arc<PatternRegistry>, config: SanitizationConfig) -> Self {
        Self {
            scanner: Scanner::new(registry),
            config,
        }
    }

    /// Built-in detectors with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            Arc::new(PatternRegistry::builtin()?),
            SanitizationConfig::default(),
        ))
    }

    pub fn config(&self) -> &SanitizationConfig {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        self.scanner.registry()
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Canonical matches using the default severity threshold
    pub fn scan(&self, text: &str) -> CanonicalMatchSet {
        self.scanner.scan_at_least(text, self.config.min_severity)
    }

    pub fn sanitize(&self, text: &str) -> SanitizationResult {
        self.sanitize_with(text, &self.config)
    }

    pub fn sanitize_with(&self, text: &str, config: &SanitizationConfig) -> SanitizationResult {
        let matches = self.scanner.scan_at_least(text, config.min_severity);
        let sanitized = redactor::apply(text, &matches, config);

        debug!(
            matches = matches.len(),
            kinds = ?matches.kinds(),
            mode = %config.redaction_mode,
            input_len = text.len(),
            output_len = sanitized.len(),
            "Sanitized text"
        );

        report::summarize(text, sanitized, matches)
    }

    /// Re-scan with every detector
    pub fn validate(&self, text: &str) -> Validation {
        validator::validate(&self.scanner, text)
    }

    /// Re-scan with the detectors `config` enables
    pub fn validate_with(&self, text: &str, config: &SanitizationConfig) -> Validation {
        validator::validate_at_least(&self.scanner, text, config.min_severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redactor::RedactionMode;
    use crate::registry::{SecretKind, Severity};

    #[test]
    fn test_sanitize_uses_default_config() {
        let sanitizer = Sanitizer::with_defaults().unwrap();
        let result = sanitizer.sanitize("mail bob@example.com");

        assert_eq!(result.sanitized_text, "mail [REDACTED_EMAIL]");
        assert!(result.was_modified);
    }

    #[test]
    fn test_sanitize_with_override() {
        let sanitizer = Sanitizer::with_defaults().unwrap();
        let config = sanitizer.config().clone().with_mode(RedactionMode::Mask);
        let result = sanitizer.sanitize_with("mail bob@example.com", &config);

        assert_eq!(result.sanitized_text, "mail [********]");
        // Default is untouched
        assert_eq!(sanitizer.config().redaction_mode, RedactionMode::TaggedLabel);
    }

    #[test]
    fn test_min_severity_leaves_low_matches() {
        let sanitizer = Sanitizer::with_defaults().unwrap();
        let config = SanitizationConfig::default().with_min_severity(Severity::Medium);
        let result = sanitizer.sanitize_with("host 10.0.0.1 mail bob@example.com", &config);

        assert_eq!(result.matches.kinds(), vec![SecretKind::Email]);
        assert_eq!(result.sanitized_text, "host 10.0.0.1 mail [REDACTED_EMAIL]");
        assert!(sanitizer.validate_with(&result.sanitized_text, &config).ok);
        assert!(!sanitizer.validate(&result.sanitized_text).ok);
    }

    #[test]
    fn test_clones_share_registry() {
        let sanitizer = Sanitizer::with_defaults().unwrap();
        let clone = sanitizer.clone();
        assert_eq!(clone.registry().len(), sanitizer.registry().len());
    }

    #[test]
    fn test_concurrent_sanitize() {
        let sanitizer = Sanitizer::with_defaults().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sanitizer = sanitizer.clone();
                std::thread::spawn(move || {
                    let text = format!("user{}@example.com", i);
                    sanitizer.sanitize(&text).sanitized_text
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "[REDACTED_EMAIL]");
        }
    }
}
