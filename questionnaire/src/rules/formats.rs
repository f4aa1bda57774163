//! Text format patterns.

use std::sync::LazyLock;

use regex::Regex;

type Pattern = LazyLock<Option<Regex>>;

static EMAIL: Pattern = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE: Pattern = LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9()\-.\s]{6,19}$").ok());
static COUNTRY: Pattern = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").ok());
static SSN: Pattern = LazyLock::new(|| Regex::new(r"^\d{3}-?\d{2}-?\d{4}$").ok());
static EIN: Pattern = LazyLock::new(|| Regex::new(r"^\d{2}-?\d{7}$").ok());
static DATE: Pattern = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());
static PO_BOX: Pattern = LazyLock::new(|| {
    Regex::new(r"(?i)\bp\.?\s*o\.?\s*box\b|\bpost\s+office\s+box\b").ok()
});

fn matches(pattern: &Pattern, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

pub fn is_email(text: &str) -> bool {
    matches(&EMAIL, text)
}

pub fn is_phone(text: &str) -> bool {
    matches(&PHONE, text) && text.chars().filter(char::is_ascii_digit).count() >= 7
}

/// Exactly two uppercase ASCII letters.
pub fn is_country_code(text: &str) -> bool {
    matches(&COUNTRY, text)
}

pub fn is_ssn(text: &str) -> bool {
    matches(&SSN, text)
}

pub fn is_ein(text: &str) -> bool {
    matches(&EIN, text)
}

/// `YYYY-MM-DD` shape only; calendar validity is checked separately.
pub fn is_date_shape(text: &str) -> bool {
    matches(&DATE, text)
}

pub fn mentions_po_box(text: &str) -> bool {
    matches(&PO_BOX, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_email("client@example.com"));
        assert!(!is_email("client@example"));
        assert!(!is_email("client example.com"));
    }

    #[test]
    fn test_phone() {
        assert!(is_phone("+1 (212) 555-0100"));
        assert!(is_phone("212.555.0100"));
        assert!(!is_phone("555-01"));
        assert!(!is_phone("call me"));
    }

    #[test]
    fn test_country_code() {
        assert!(is_country_code("US"));
        assert!(!is_country_code("us"));
        assert!(!is_country_code("USA"));
    }

    #[test]
    fn test_tax_ids() {
        assert!(is_ssn("123-45-6789"));
        assert!(is_ssn("123456789"));
        assert!(!is_ssn("12-345-6789"));
        assert!(is_ein("12-3456789"));
        assert!(!is_ein("123-456789"));
    }

    #[test]
    fn test_po_box() {
        assert!(mentions_po_box("P.O. Box 123"));
        assert!(mentions_po_box("po box 9"));
        assert!(mentions_po_box("Post Office Box 4"));
        assert!(!mentions_po_box("12 Boxwood Lane"));
        assert!(!mentions_po_box("1 Pool Road"));
    }

    #[test]
    fn test_date_shape() {
        assert!(is_date_shape("2025-02-30"));
        assert!(!is_date_shape("2025-2-3"));
    }
}
