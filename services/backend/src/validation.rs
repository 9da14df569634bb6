//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Symbols that satisfy the special-character requirement
pub const SPECIAL_CHARACTERS: &str = "@$!%*?#&";

/// Message returned for any password that fails the strength policy
pub const WEAK_PASSWORD: &str = "Password must be at least 8 characters and include uppercase, lowercase, number, and special character.";

/// Message returned when name or email is missing
pub const MISSING_FIELDS: &str = "Name, email and password are required.";

/// Validate password strength
///
/// At least 8 characters drawn only from ASCII letters, digits and
/// [`SPECIAL_CHARACTERS`], with at least one of each class.
pub fn validate_password(password: &str) -> Result<(), String> {
    static PASSWORD_CHARSET: OnceLock<Regex> = OnceLock::new();
    let regex = PASSWORD_CHARSET.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9@$!%*?#&]{8,}$").expect("Failed to compile password regex")
    });

    if !regex.is_match(password) {
        return Err(WEAK_PASSWORD.to_string());
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if SPECIAL_CHARACTERS.contains(c) {
            has_special = true;
        }
    }

    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(WEAK_PASSWORD.to_string())
    }
}

/// Validate that the registration fields besides the password are present
pub fn validate_required(name: &str, email: &str) -> Result<(), String> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(MISSING_FIELDS.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strong_passwords() {
        for password in ["Strong1!", "Abcdefg1@", "xY9#xY9#xY9#", "P4ssw0rd&&"] {
            assert!(validate_password(password).is_ok(), "{password} should pass");
        }
    }

    #[test]
    fn rejects_weak_passwords() {
        let weak = [
            "",
            "Weak1!",       // too short
            "alllower1!",   // no uppercase
            "ALLUPPER1!",   // no lowercase
            "NoDigits!!",   // no digit
            "NoSymbol12",   // no symbol
            "Spaced Out1!", // space is outside the allowed set
            "Caret1^^^",    // ^ is not one of the accepted symbols
            "Ünïcode1!",    // non-ASCII letters
        ];

        for password in weak {
            assert_eq!(
                validate_password(password),
                Err(WEAK_PASSWORD.to_string()),
                "{password:?} should fail"
            );
        }
    }

    #[test]
    fn required_fields() {
        assert!(validate_required("A", "a@x.com").is_ok());
        assert_eq!(
            validate_required("", "a@x.com"),
            Err(MISSING_FIELDS.to_string())
        );
        assert_eq!(validate_required("A", "   "), Err(MISSING_FIELDS.to_string()));
    }
}
