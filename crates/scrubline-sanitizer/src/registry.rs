//! Pattern registry
//!
//! The registry owns the ordered list of detectors. It is built once at
//! startup, never mutated afterwards, and shared read-only by every scan.
//! Registration order is significant: it is the last tie-breaker when two
//! detectors fire on overlapping text (see [`crate::scanner`]).

mod builtin;

pub use builtin::BUILTIN_PATTERNS;

use crate::error::{Result, SanitizerError};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Severity of a detector, ordered `Low < Medium < High < Critical`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Upper-case label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Category of sensitive data recognised by a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    /// PEM private key block
    PrivateKeyBlock,

    /// Anthropic API key
    AnthropicKey,

    /// OpenAI API key
    OpenaiKey,

    /// GitHub personal access or app token
    GithubToken,

    /// AWS access key id or Google API key
    CloudAccessKey,

    /// Database connection string
    DatabaseUrl,

    /// JSON Web Token
    JwtToken,

    /// Password or secret assignment
    Password,

    /// Credit card number
    CreditCard,

    /// Social Security Number
    Ssn,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// IP address
    IpAddress,

    /// Local filesystem path
    FilePath,

    /// Long opaque token
    GenericToken,
}

impl SecretKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrivateKeyBlock => "private_key_block",
            Self::AnthropicKey => "anthropic_key",
            Self::OpenaiKey => "openai_key",
            Self::GithubToken => "github_token",
            Self::CloudAccessKey => "cloud_access_key",
            Self::DatabaseUrl => "database_url",
            Self::JwtToken => "jwt_token",
            Self::Password => "password",
            Self::CreditCard => "credit_card",
            Self::Ssn => "ssn",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::IpAddress => "ip_address",
            Self::FilePath => "file_path",
            Self::GenericToken => "generic_token",
        }
    }

    /// Upper-case form used in redaction labels, e.g. `OPENAI_KEY`
    pub fn label(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-match check applied to each candidate before it is reported
pub type MatchValidator = fn(&str) -> bool;

/// Uncompiled detector definition
#[derive(Debug, Clone, Copy)]
pub struct PatternDef {
    pub kind: SecretKind,
    pub regex: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub validator: Option<MatchValidator>,
}

/// Compiled detector
#[derive(Debug, Clone)]
pub struct PatternSpec {
    kind: SecretKind,
    matcher: Regex,
    severity: Severity,
    description: &'static str,
    validator: Option<MatchValidator>,
}

// Inputs that exercise word boundaries, line anchors and separators. A matcher
// that yields an empty match on any of them is rejected at construction.
const ZERO_WIDTH_SAMPLES: &[&str] = &["", " ", "a", "0", "a b\nc-d_e", "\n\n"];

impl PatternSpec {
    fn compile(def: PatternDef) -> Result<Self> {
        let matcher = RegexBuilder::new(def.regex)
            .case_insensitive(true)
            .build()
            .map_err(|source| SanitizerError::InvalidPattern {
                kind: def.kind,
                source,
            })?;

        let zero_width = ZERO_WIDTH_SAMPLES
            .iter()
            .any(|sample| matcher.find_iter(sample).any(|m| m.is_empty()));
        if zero_width {
            return Err(SanitizerError::ZeroWidthPattern(def.kind));
        }

        Ok(Self {
            kind: def.kind,
            matcher,
            severity: def.severity,
            description: def.description,
            validator: def.validator,
        })
    }

    pub fn kind(&self) -> SecretKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// All non-overlapping matches of this detector that pass its validator
    pub fn find_all<'t>(&self, text: &'t str) -> impl Iterator<Item = regex::Match<'t>> {
        self.matcher
            .find_iter(text)
            .filter(move |m| self.validator.is_none_or(|check| check(m.as_str())))
    }
}

/// Serializable detector metadata for catalogues and UIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub kind: SecretKind,
    pub severity: Severity,
    pub description: String,
}

/// Ordered, immutable set of detectors, unique by kind
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<PatternSpec>,
}

impl PatternRegistry {
    /// Compile a registry from definitions, in the given order
    pub fn new(defs: impl IntoIterator<Item = PatternDef>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::new();

        for def in defs {
            if !seen.insert(def.kind) {
                return Err(SanitizerError::DuplicateKind(def.kind));
            }
            patterns.push(PatternSpec::compile(def)?);
        }

        Ok(Self { patterns })
    }

    /// Registry holding every built-in detector
    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_PATTERNS.iter().copied())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternSpec> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, kind: SecretKind) -> Option<&PatternSpec> {
        self.patterns.iter().find(|p| p.kind == kind)
    }

    /// Metadata for every detector, in registration order
    pub fn catalogue(&self) -> Vec<PatternInfo> {
        self.patterns
            .iter()
            .map(|p| PatternInfo {
                kind: p.kind,
                severity: p.severity,
                description: p.description.to_string(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a PatternRegistry {
    type Item = &'a PatternSpec;
    type IntoIter = std::slice::Iter<'a, PatternSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

#[cfg(test)]
mod tests;
