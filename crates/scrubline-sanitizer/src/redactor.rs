//! Redaction
//!
//! The redactor rebuilds the output in a single left-to-right pass over a
//! [`CanonicalMatchSet`], copying the gaps verbatim and substituting each span.
//! Spans are disjoint and sorted, so no offset ever needs adjusting.

use crate::registry::{SecretKind, Severity};
use crate::scanner::CanonicalMatchSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the number of mask characters emitted per span
pub const MAX_MASK_LEN: usize = 8;

/// How a matched span is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RedactionMode {
    /// `[****]`, one mask char per matched char, at most eight
    Mask,

    /// Remove the span entirely
    Strip,

    /// `[HASHED_<KIND>]`; a fixed per-kind label, not derived from the content
    HashLabel,

    /// `[REDACTED_<KIND>]`
    #[default]
    TaggedLabel,
}

impl RedactionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Strip => "strip",
            Self::HashLabel => "hash_label",
            Self::TaggedLabel => "tagged_label",
        }
    }
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "mask" => Ok(Self::Mask),
            "strip" => Ok(Self::Strip),
            "hash_label" | "hash" => Ok(Self::HashLabel),
            "tagged_label" | "tagged" => Ok(Self::TaggedLabel),
            other => Err(format!("unknown redaction mode '{}'", other)),
        }
    }
}

/// Redaction settings for one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationConfig {
    #[serde(default)]
    pub redaction_mode: RedactionMode,

    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    /// Detectors below this severity are not run
    #[serde(default)]
    pub min_severity: Severity,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            redaction_mode: RedactionMode::default(),
            mask_char: default_mask_char(),
            min_severity: Severity::Low,
        }
    }
}

impl SanitizationConfig {
    pub fn with_mode(mut self, mode: RedactionMode) -> Self {
        self.redaction_mode = mode;
        self
    }

    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    pub fn with_min_severity(mut self, min_severity: Severity) -> Self {
        self.min_severity = min_severity;
        self
    }
}

fn default_mask_char() -> char {
    '*'
}

/// Replacement text for one span
pub fn replacement(kind: SecretKind, matched: &str, config: &SanitizationConfig) -> String {
    match config.redaction_mode {
        RedactionMode::Mask => {
            let width = matched.chars().count().min(MAX_MASK_LEN);
            let mut out = String::with_capacity(width + 2);
            out.push('[');
            out.extend(std::iter::repeat_n(config.mask_char, width));
            out.push(']');
            out
        }
        RedactionMode::Strip => String::new(),
        RedactionMode::HashLabel => format!("[HASHED_{}]", kind.label()),
        RedactionMode::TaggedLabel => format!("[REDACTED_{}]", kind.label()),
    }
}

/// Rebuild `text` with every span of `matches` replaced.
///
/// `matches` must come from scanning this same `text`.
pub fn apply(text: &str, matches: &CanonicalMatchSet, config: &SanitizationConfig) -> String {
    if matches.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for m in matches {
        result.push_str(&text[last_end..m.start]);
        result.push_str(&replacement(m.kind, &m.text, config));
        last_end = m.end;
    }

    result.push_str(&text[last_end..]);
    result
}
