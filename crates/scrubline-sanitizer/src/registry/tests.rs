//! Tests for the pattern registry

use super::builtin::{luhn_valid, mixed_alphanumeric, plausible_phone, plausible_ssn};
use super::*;

fn def(kind: SecretKind, regex: &'static str) -> PatternDef {
    PatternDef {
        kind,
        regex,
        severity: Severity::Low,
        description: "test pattern",
        validator: None,
    }
}

#[test]
fn test_builtin_registry_compiles() {
    let registry = PatternRegistry::builtin().unwrap();
    assert_eq!(registry.len(), BUILTIN_PATTERNS.len());
    assert!(!registry.is_empty());
}

#[test]
fn test_builtin_kinds_are_unique() {
    let kinds: HashSet<SecretKind> = BUILTIN_PATTERNS.iter().map(|d| d.kind).collect();
    assert_eq!(kinds.len(), BUILTIN_PATTERNS.len());
}

#[test]
fn test_registration_order_is_preserved() {
    let registry = PatternRegistry::builtin().unwrap();
    let kinds: Vec<SecretKind> = registry.iter().map(|p| p.kind()).collect();
    let expected: Vec<SecretKind> = BUILTIN_PATTERNS.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn test_invalid_regex_is_rejected() {
    let err = PatternRegistry::new([def(SecretKind::Email, r"([a-z")]).unwrap_err();
    assert!(matches!(
        err,
        SanitizerError::InvalidPattern {
            kind: SecretKind::Email,
            ..
        }
    ));
}

#[test]
fn test_zero_width_pattern_is_rejected() {
    let err = PatternRegistry::new([def(SecretKind::Phone, r"[0-9]*")]).unwrap_err();
    assert!(matches!(err, SanitizerError::ZeroWidthPattern(SecretKind::Phone)));

    let err = PatternRegistry::new([def(SecretKind::Phone, r"\b")]).unwrap_err();
    assert!(matches!(err, SanitizerError::ZeroWidthPattern(SecretKind::Phone)));
}

#[test]
fn test_duplicate_kind_is_rejected() {
    let err = PatternRegistry::new([
        def(SecretKind::Email, r"a+"),
        def(SecretKind::Email, r"b+"),
    ])
    .unwrap_err();
    assert!(matches!(err, SanitizerError::DuplicateKind(SecretKind::Email)));
}

#[test]
fn test_patterns_are_case_insensitive() {
    let registry = PatternRegistry::builtin().unwrap();
    let email = registry.get(SecretKind::Email).unwrap();
    assert_eq!(email.find_all("MAIL: JOHN@EXAMPLE.COM").count(), 1);

    let password = registry.get(SecretKind::Password).unwrap();
    assert_eq!(password.find_all("PASSWORD=hunter22").count(), 1);
}

#[test]
fn test_validator_filters_candidates() {
    let registry = PatternRegistry::builtin().unwrap();
    let card = registry.get(SecretKind::CreditCard).unwrap();

    assert_eq!(card.find_all("Card: 4532-0151-1283-0366").count(), 1);
    assert_eq!(card.find_all("Bad card: 4532-0151-1283-0367").count(), 0);
}

#[test]
fn test_catalogue_matches_registry() {
    let registry = PatternRegistry::builtin().unwrap();
    let catalogue = registry.catalogue();

    assert_eq!(catalogue.len(), registry.len());
    assert_eq!(catalogue[0].kind, SecretKind::PrivateKeyBlock);
    assert_eq!(catalogue[0].severity, Severity::Critical);
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
    assert!(Severity::High < Severity::Critical);
    assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
}

#[test]
fn test_severity_from_str() {
    assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
    assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
    assert!("severe".parse::<Severity>().is_err());
}

#[test]
fn test_kind_serialization_matches_as_str() {
    for def in BUILTIN_PATTERNS {
        let json = serde_json::to_string(&def.kind).unwrap();
        assert_eq!(json, format!("\"{}\"", def.kind.as_str()));
    }
}

#[test]
fn test_kind_label() {
    assert_eq!(SecretKind::OpenaiKey.label(), "OPENAI_KEY");
    assert_eq!(SecretKind::PrivateKeyBlock.label(), "PRIVATE_KEY_BLOCK");
}

#[test]
fn test_luhn() {
    assert!(luhn_valid("4532015112830366"));
    assert!(luhn_valid("4532-0151-1283-0366"));
    assert!(!luhn_valid("4532015112830367"));
    assert!(!luhn_valid("1234"));
}

#[test]
fn test_ssn_plausibility() {
    assert!(plausible_ssn("123-45-6789"));
    assert!(!plausible_ssn("000-12-3456"));
    assert!(!plausible_ssn("123-00-4567"));
    assert!(!plausible_ssn("123-45-0000"));
    assert!(!plausible_ssn("666-12-3456"));
    assert!(!plausible_ssn("912-34-5678"));
}

#[test]
fn test_phone_plausibility() {
    assert!(plausible_phone("(555) 123-4567"));
    assert!(plausible_phone("+1 555 123 4567"));
    assert!(!plausible_phone("123-4567"));
    assert!(!plausible_phone("25551234567"));
}

#[test]
fn test_mixed_alphanumeric() {
    assert!(mixed_alphanumeric("a1"));
    assert!(!mixed_alphanumeric("abcdefghijklmnopqrstuvwxyzabcdefgh"));
    assert!(!mixed_alphanumeric("12345678901234567890123456789012"));
}
