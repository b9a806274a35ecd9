//! Input validation for API requests.
//!
//! Validators return `Result<(), String>`; collect them into an `ApiError`
//! with the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

/// Column width of `users.email`
const MAX_EMAIL_LEN: usize = 120;
/// Upper bound on password input, keeps hashing cost bounded
const MAX_PASSWORD_LEN: usize = 1024;
/// Column width of catalog text attributes
const MAX_TEXT_LEN: usize = 250;

lazy_static! {
    /// local-part@domain.tld, where the domain has at least one dot and the
    /// top-level label is 2+ letters
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$"
    ).unwrap();
}

/// Validate a required email address
pub fn validate_email(email: Option<&str>) -> Result<(), String> {
    let email = match email {
        Some(e) if !e.trim().is_empty() => e,
        _ => return Err("Email is required".to_string()),
    };

    if email.len() > MAX_EMAIL_LEN {
        return Err(format!(
            "Email is too long (max {} characters)",
            MAX_EMAIL_LEN
        ));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Presence check for a required string field
pub fn validate_required(value: Option<&str>, label: &str) -> Result<(), String> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(format!("{} is required", label)),
    }
}

/// Validate a required password. Any non-empty password is accepted.
pub fn validate_password(password: Option<&str>) -> Result<(), String> {
    match password {
        None => Err("Password is required".to_string()),
        Some("") => Err("Password is required".to_string()),
        Some(p) if p.len() > MAX_PASSWORD_LEN => Err(format!(
            "Password is too long (max {} characters)",
            MAX_PASSWORD_LEN
        )),
        Some(_) => Ok(()),
    }
}

/// Validate an optional catalog text attribute
pub fn validate_text(value: &Option<String>) -> Result<(), String> {
    if let Some(v) = value {
        if v.chars().count() > MAX_TEXT_LEN {
            return Err(format!("Value is too long (max {} characters)", MAX_TEXT_LEN));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("a@b.com")).is_ok());
        assert!(validate_email(Some("luke.skywalker+jedi@rebels.co.uk")).is_ok());
        assert!(validate_email(Some("han_solo@falcon-crew.io")).is_ok());

        assert!(validate_email(None).is_err());
        assert!(validate_email(Some("")).is_err());
        assert!(validate_email(Some("   ")).is_err());
        assert!(validate_email(Some("bad-email")).is_err());
        assert!(validate_email(Some("a@b")).is_err()); // no dot in domain
        assert!(validate_email(Some("a@b.c")).is_err()); // 1-letter TLD
        assert!(validate_email(Some("a@b.c0m")).is_err()); // digit in TLD
        assert!(validate_email(Some("@b.com")).is_err());
        assert!(validate_email(Some("a b@c.com")).is_err());
    }

    #[test]
    fn test_validate_email_length() {
        let long = format!("{}@b.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(validate_email(Some(&long)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(Some("x")).is_ok());
        assert!(validate_password(None).is_err());
        assert!(validate_password(Some("")).is_err());
        assert!(validate_password(Some(&"p".repeat(MAX_PASSWORD_LEN + 1))).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required(Some("nobody"), "Email").is_ok());
        assert_eq!(
            validate_required(None, "Email"),
            Err("Email is required".to_string())
        );
        assert!(validate_required(Some(""), "Password").is_err());
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text(&None).is_ok());
        assert!(validate_text(&Some("Tatooine".to_string())).is_ok());
        assert!(validate_text(&Some("x".repeat(MAX_TEXT_LEN + 1))).is_err());
    }
}
