use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use super::{Credentials, Registration};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚÀÈÌÒÙÄËÏÖÜÑáéíóúàèìòùäëïöüñ ]+$").unwrap());

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{7,}$").unwrap());

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// A rejected input field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn validate_name(field: &'static str, label: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_NAME_CHARS || !NAME_RE.is_match(value) {
        return Err(ValidationError::new(
            field,
            format!(
                "Invalid {} (at least {} characters, letters only)",
                label, MIN_NAME_CHARS
            ),
        ));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::new("email", "Invalid email"));
    }
    Ok(())
}

/// Keep the digits of a phone number, plus a leading `+` if there is one.
fn normalize_phone(raw: &str) -> String {
    let raw = raw.trim();
    let digits = raw.chars().filter(char::is_ascii_digit);
    if raw.starts_with('+') {
        std::iter::once('+').chain(digits).collect()
    } else {
        digits.collect()
    }
}

/// Check a registration and return it normalized: names trimmed, email
/// trimmed and lowercased, phone reduced to its digits.
pub fn validate_registration(input: &Registration) -> Result<Registration, ValidationError> {
    let first_name = input.first_name.trim();
    let last_name = input.last_name.trim();
    let email = input.email.trim().to_lowercase();
    let phone = normalize_phone(&input.phone);

    if first_name.is_empty()
        || last_name.is_empty()
        || email.is_empty()
        || input.phone.trim().is_empty()
        || input.password.is_empty()
    {
        return Err(ValidationError::new("body", "All fields are required"));
    }

    validate_name("firstName", "first name", first_name)?;
    validate_name("lastName", "last name", last_name)?;
    validate_email(&email)?;

    if !PHONE_RE.is_match(&phone) {
        return Err(ValidationError::new(
            "phone",
            "Invalid phone (at least 7 digits)",
        ));
    }

    if input.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::new(
            "password",
            format!(
                "Password too short (at least {} characters)",
                MIN_PASSWORD_CHARS
            ),
        ));
    }

    Ok(Registration {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        phone,
        password: input.password.clone(),
    })
}

/// Check login input and return the normalized email.
pub fn validate_credentials(input: &Credentials) -> Result<String, ValidationError> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() || input.password.is_empty() {
        return Err(ValidationError::new(
            "body",
            "Email and password are required",
        ));
    }
    validate_email(&email)?;
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Registration {
        Registration {
            first_name: "María José".to_string(),
            last_name: "Núñez".to_string(),
            email: "  Maria@Example.com ".to_string(),
            phone: "600 123-456".to_string(),
            password: "supersecret".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_is_normalized() {
        let normalized = validate_registration(&valid()).unwrap();
        assert_eq!(normalized.first_name, "María José");
        assert_eq!(normalized.email, "maria@example.com");
        assert_eq!(normalized.phone, "600123456");
    }

    #[test]
    fn test_missing_field() {
        let mut input = valid();
        input.phone = "   ".to_string();
        assert_eq!(validate_registration(&input).unwrap_err().field, "body");
    }

    #[test]
    fn test_short_or_non_letter_names() {
        let mut input = valid();
        input.first_name = "A".to_string();
        assert_eq!(
            validate_registration(&input).unwrap_err().field,
            "firstName"
        );

        let mut input = valid();
        input.last_name = "R2D2".to_string();
        assert_eq!(validate_registration(&input).unwrap_err().field, "lastName");
    }

    #[test]
    fn test_invalid_email() {
        for email in ["plain", "a@b", "a b@c.d", "@c.d"] {
            let mut input = valid();
            input.email = email.to_string();
            assert_eq!(
                validate_registration(&input).unwrap_err().field,
                "email",
                "{}",
                email
            );
        }
    }

    #[test]
    fn test_invalid_phone() {
        for phone in ["12345", "phone123", "+", "(55) 12-34"] {
            let mut input = valid();
            input.phone = phone.to_string();
            assert_eq!(validate_registration(&input).unwrap_err().field, "phone");
        }
    }

    #[test]
    fn test_phone_punctuation_is_ignored() {
        for (raw, normalized) in [
            ("(555) 123-4567", "5551234567"),
            ("+34 600.123.456", "+34600123456"),
            ("1234567890123456789", "1234567890123456789"),
        ] {
            let mut input = valid();
            input.phone = raw.to_string();
            assert_eq!(validate_registration(&input).unwrap().phone, normalized);
        }
    }

    #[test]
    fn test_short_password() {
        let mut input = valid();
        input.password = "short".to_string();
        let err = validate_registration(&input).unwrap_err();
        assert_eq!(err.field, "password");
        assert!(err.message.contains("8"));
    }

    #[test]
    fn test_credentials() {
        let ok = Credentials {
            email: "Ana@Example.com".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(validate_credentials(&ok).unwrap(), "ana@example.com");

        let missing = Credentials {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert!(validate_credentials(&missing).is_err());
    }
}
