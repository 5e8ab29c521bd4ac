//! Sanitization results and reporting

use crate::registry::Severity;
use crate::scanner::CanonicalMatchSet;
use serde::{Deserialize, Serialize};

/// Log line emitted when nothing was found
pub const NO_SECRETS_LINE: &str = "No secrets detected";

/// Outcome of one sanitize call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizationResult {
    pub original_text: String,
    pub sanitized_text: String,
    pub matches: CanonicalMatchSet,
    pub log_lines: Vec<String>,
    pub was_modified: bool,
}

impl SanitizationResult {
    /// Match counts per severity
    pub fn stats(&self) -> SeverityStats {
        SeverityStats::from_matches(&self.matches)
    }
}

/// Match counts per severity bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityStats {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityStats {
    pub fn from_matches(matches: &CanonicalMatchSet) -> Self {
        let mut stats = Self::default();
        for m in matches {
            *stats.bucket_mut(m.severity) += 1;
        }
        stats
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Low => &mut self.low,
            Severity::Medium => &mut self.medium,
            Severity::High => &mut self.high,
            Severity::Critical => &mut self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }

    /// Highest severity with at least one match
    pub fn highest(&self) -> Option<Severity> {
        Severity::ALL
            .iter()
            .rev()
            .copied()
            .find(|&severity| self.get(severity) > 0)
    }
}

/// One line per match in detection order, or the sentinel line
pub fn log_lines(matches: &CanonicalMatchSet) -> Vec<String> {
    if matches.is_empty() {
        return vec![NO_SECRETS_LINE.to_string()];
    }

    matches
        .in_detection_order()
        .map(|m| format!("{}: {} - {}", m.severity.label(), m.kind, m.description))
        .collect()
}

pub fn summarize(original: &str, sanitized: String, matches: CanonicalMatchSet) -> SanitizationResult {
    SanitizationResult {
        original_text: original.to_string(),
        sanitized_text: sanitized,
        log_lines: log_lines(&matches),
        was_modified: !matches.is_empty(),
        matches,
    }
}
