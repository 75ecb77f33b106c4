mod domain;
mod local;
mod types;

pub use types::{EmailParts, ValidationMode, ValidationReport};

use domain::{check_domain, normalize_domain};
use local::{is_local_relaxed, is_local_strict};

/// Grammar check used by the verification pipeline. Never fails: malformed
/// input simply yields `false`.
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email, ValidationMode::Strict).ok
}

pub fn validate_email(email: &str, mode: ValidationMode) -> ValidationReport {
    let input = email.trim();

    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    let parts: Vec<&str> = input.split('@').collect();
    if parts.len() != 2 {
        reasons.push("must contain exactly one '@'".to_string());
        return ValidationReport { ok: false, reasons };
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    }

    check_domain(domain, &mut reasons);

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local.is_empty() && !local_ok {
        reasons.push(match mode {
            ValidationMode::Strict => "invalid local part (strict rules)".into(),
            ValidationMode::Relaxed => "invalid local part (relaxed rules)".into(),
        });
    }

    let ok = reasons.is_empty();
    ValidationReport { ok, reasons }
}

/// Splits an address on its single `@`. Returns `None` unless there is
/// exactly one `@` with text on both sides; call after validation.
pub fn split_address(email: &str) -> Option<EmailParts> {
    let input = email.trim();
    let (local, domain) = input.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    let (domain, ascii_domain) = normalize_domain(domain);
    Some(EmailParts {
        local: local.to_string(),
        domain,
        ascii_domain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com", ValidationMode::Strict);
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn accepts_subdomain_and_plus_addressing() {
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b", ValidationMode::Strict);
        assert!(!r.ok);
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn rejects_malformed_tld() {
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user@example.c0m"));
        assert!(!is_valid_email("user@example"));
    }

    #[test]
    fn relaxed_accepts_quoted_local() {
        assert!(!validate_email("\"john doe\"@example.com", ValidationMode::Strict).ok);
        assert!(validate_email("\"john doe\"@example.com", ValidationMode::Relaxed).ok);
    }

    #[test]
    fn split_lowercases_domain() {
        let parts = split_address(" John@Example.COM ").expect("parts");
        assert_eq!(parts.local, "John");
        assert_eq!(parts.domain, "example.com");
        assert_eq!(parts.ascii_domain, "example.com");
    }

    #[test]
    fn split_rejects_without_single_at() {
        assert!(split_address("no-at").is_none());
        assert!(split_address("a@b@c").is_none());
    }

    proptest! {
        #[test]
        fn never_panics(input in "\\PC{0,300}") {
            let _ = validate_email(&input, ValidationMode::Strict);
            let _ = validate_email(&input, ValidationMode::Relaxed);
        }

        #[test]
        fn inputs_without_at_are_invalid(input in "[^@]{0,80}") {
            prop_assert!(!is_valid_email(&input));
        }
    }
}
