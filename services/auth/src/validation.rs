//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Canonical form used for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
///
/// Only presence and an upper bound are enforced; strength rules are left
/// to the client.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@X.com "), "a@x.com");
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(validate_email(""), Err("Email is required".to_string()));
        assert_eq!(
            validate_email("not-an-email"),
            Err("Invalid email format".to_string())
        );

        let long = format!("{}@x.com", "a".repeat(250));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn email_needs_a_dotted_domain() {
        assert_eq!(
            validate_email("a@localhost"),
            Err("Invalid email format".to_string())
        );
        assert!(validate_email("a@mail.localhost.dev").is_ok());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("A").is_ok());
        assert_eq!(validate_name("   "), Err("Name is required".to_string()));
        assert!(validate_name(&"n".repeat(101)).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret1").is_ok());
        assert_eq!(
            validate_password(""),
            Err("Password is required".to_string())
        );
        assert!(validate_password(&"p".repeat(129)).is_err());
    }
}
