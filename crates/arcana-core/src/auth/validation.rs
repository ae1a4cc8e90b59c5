use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest password accepted when setting a new one.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10,15}$").expect("valid phone regex"));

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_RE.is_match(input)
}

/// 10 to 15 digits, no separators.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("luna@tarot.app"));
        assert!(!is_valid_email("luna@tarot"));
        assert!(!is_valid_email("lu na@tarot.app"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("13800138000"));
        assert!(is_valid_phone("861380013800012"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("1380013800a"));
        assert!(!is_valid_phone("+8613800138000"));
    }
}
