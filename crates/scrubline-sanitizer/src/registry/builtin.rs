//! Built-in detector definitions and their post-match validators

use super::{PatternDef, SecretKind, Severity};

/// Built-in detectors in registration order.
///
/// Patterns use `[0-9]` rather than `\d` so that validators only ever see
/// ASCII digits. All patterns are compiled case-insensitively.
pub static BUILTIN_PATTERNS: &[PatternDef] = &[
    PatternDef {
        kind: SecretKind::PrivateKeyBlock,
        regex: r"-----BEGIN (?:[A-Z0-9]+ )*PRIVATE KEY-----[\s\S]*?-----END (?:[A-Z0-9]+ )*PRIVATE KEY-----|-----BEGIN (?:[A-Z0-9]+ )*PRIVATE KEY-----",
        severity: Severity::Critical,
        description: "PEM private key block",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::AnthropicKey,
        regex: r"\bsk-ant-[a-z0-9_-]{20,}",
        severity: Severity::Critical,
        description: "Anthropic API key",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::OpenaiKey,
        regex: r"\bsk-(?:proj-|svcacct-)?[a-z0-9][a-z0-9_-]{19,}",
        severity: Severity::Critical,
        description: "OpenAI API key",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::GithubToken,
        regex: r"\b(?:gh[pousr]_[a-z0-9]{36,255}|github_pat_[a-z0-9_]{22,255})\b",
        severity: Severity::Critical,
        description: "GitHub access token",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::CloudAccessKey,
        regex: r"\b(?:(?:AKIA|ASIA|ABIA|ACCA)[A-Z0-9]{16}\b|AIza[0-9A-Z_-]{35})",
        severity: Severity::Critical,
        description: "Cloud provider access key",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::DatabaseUrl,
        regex: r#"\b(?:postgres(?:ql)?|mysql|mariadb|mongodb(?:\+srv)?|rediss?|amqps?|mssql|sqlserver)://[^\s'"<>]+"#,
        severity: Severity::Critical,
        description: "Database connection string",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::JwtToken,
        regex: r"\beyJ[a-z0-9_-]{8,}\.eyJ[a-z0-9_-]{8,}\.[a-z0-9_-]{8,}",
        severity: Severity::High,
        description: "JSON Web Token",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::Password,
        regex: r#"\b(?:password|passwd|pwd|passphrase|(?:client[_-]?)?secret|api[_-]?key|access[_-]?token|auth[_-]?token)\s*[:=]\s*["']?[^\s"',;\[][^\s"',;]{3,}["']?"#,
        severity: Severity::High,
        description: "Password or secret assignment",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::CreditCard,
        regex: r"\b(?:[0-9]{4}[- ]?){3}[0-9]{1,7}\b",
        severity: Severity::High,
        description: "Credit card number",
        validator: Some(luhn_valid),
    },
    PatternDef {
        kind: SecretKind::Ssn,
        regex: r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b",
        severity: Severity::High,
        description: "US Social Security Number",
        validator: Some(plausible_ssn),
    },
    PatternDef {
        kind: SecretKind::Email,
        regex: r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b",
        severity: Severity::Medium,
        description: "Email address",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::Phone,
        regex: r"(?:\+?[0-9]{1,3}[ .-]?)?(?:\([0-9]{3}\)|\b[0-9]{3})[ .-]?[0-9]{3}[ .-]?[0-9]{4}\b",
        severity: Severity::Medium,
        description: "Phone number",
        validator: Some(plausible_phone),
    },
    PatternDef {
        kind: SecretKind::IpAddress,
        regex: r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b|\b(?:[0-9a-f]{1,4}:){7}[0-9a-f]{1,4}\b",
        severity: Severity::Low,
        description: "IP address",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::FilePath,
        regex: r#"(?:~|\b[a-z]:)?[/\\](?:home|users|etc|var|root|opt|usr|tmp|private|srv|mnt)(?:[/\\][^\s"'<>|]+)+"#,
        severity: Severity::Low,
        description: "Local filesystem path",
        validator: None,
    },
    PatternDef {
        kind: SecretKind::GenericToken,
        regex: r"\b[a-z0-9_-]{32,}",
        severity: Severity::Low,
        description: "Long opaque token",
        validator: Some(mixed_alphanumeric),
    },
];

fn ascii_digits(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Luhn checksum over the digits of a 13-19 digit card number
pub(crate) fn luhn_valid(candidate: &str) -> bool {
    let digits = ascii_digits(candidate);

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    checksum.is_multiple_of(10)
}

/// Rejects area/group/serial numbers that are never issued
pub(crate) fn plausible_ssn(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 9 {
        return false;
    }

    if digits.starts_with("000") || &digits[3..5] == "00" || &digits[5..9] == "0000" {
        return false;
    }

    // 666 is never assigned; 9xx is reserved for ITINs
    !(digits.starts_with("666") || digits.starts_with('9'))
}

/// 10-15 digits; an 11 digit number must carry the NANP country code
pub(crate) fn plausible_phone(candidate: &str) -> bool {
    let digits = ascii_digits(candidate);

    if digits.len() < 10 || digits.len() > 15 {
        return false;
    }

    !(digits.len() == 11 && digits[0] != 1)
}

/// Opaque tokens mix letters and digits; plain words and numbers do not qualify
pub(crate) fn mixed_alphanumeric(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit()) && candidate.chars().any(|c| c.is_ascii_alphabetic())
}
