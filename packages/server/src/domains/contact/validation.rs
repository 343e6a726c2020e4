//! Contact form sanitizing and validation

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::ContactError;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^[\p{L} '-]+$").expect("name pattern is valid");
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@<>]+@[^\s@<>]+\.[^\s@<>]+$").expect("email pattern is valid");
}

/// Raw form fields as submitted. `website` is the honeypot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub website: Option<String>,
}

/// A submission that passed the honeypot and every field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ValidatedContact {
    /// Key used for the per-email rate limit
    pub fn rate_limit_email(&self) -> String {
        self.email.to_lowercase()
    }
}

impl ContactForm {
    /// Hidden from humans; anything in it marks the submission as automated
    pub fn is_honeypot_filled(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.is_empty())
    }

    pub fn validate(&self) -> Result<ValidatedContact, ContactError> {
        if self.is_honeypot_filled() {
            return Err(ContactError::InvalidSubmission);
        }

        Ok(ValidatedContact {
            name: validate_name(self.name.as_deref().unwrap_or_default())?,
            email: validate_email(self.email.as_deref().unwrap_or_default())?,
            message: validate_message(self.message.as_deref().unwrap_or_default())?,
        })
    }
}

/// Trim, drop angle brackets and cap at `max_chars` characters
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();
    stripped.trim().chars().take(max_chars).collect()
}

fn validate_name(raw: &str) -> Result<String, ContactError> {
    let name = sanitize_text(raw, NAME_MAX_CHARS);
    if name.is_empty() {
        return Err(ContactError::validation("name", "Name is required"));
    }
    if !NAME_PATTERN.is_match(&name) {
        return Err(ContactError::validation(
            "name",
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        ));
    }
    Ok(name)
}

fn validate_email(raw: &str) -> Result<String, ContactError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ContactError::validation("email", "Email is required"));
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(ContactError::validation(
            "email",
            format!("Email must be less than {} characters", EMAIL_MAX_CHARS),
        ));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ContactError::validation("email", "Invalid email address"));
    }
    Ok(email.to_string())
}

fn validate_message(raw: &str) -> Result<String, ContactError> {
    let message = sanitize_text(raw, MESSAGE_MAX_CHARS);
    if message.is_empty() {
        return Err(ContactError::validation("message", "Message is required"));
    }
    if message.chars().count() < MESSAGE_MIN_CHARS {
        return Err(ContactError::validation(
            "message",
            format!("Message must be at least {} characters", MESSAGE_MIN_CHARS),
        ));
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
            website: None,
        }
    }

    fn field_of(err: ContactError) -> &'static str {
        match err {
            ContactError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission() {
        let contact = form("Ann Lee", "ann@example.com", "Hello there!").validate().unwrap();

        assert_eq!(contact.name, "Ann Lee");
        assert_eq!(contact.email, "ann@example.com");
        assert_eq!(contact.message, "Hello there!");
    }

    #[test]
    fn test_honeypot_rejected_before_fields() {
        let mut bot = form("", "not-an-email", "x");
        bot.website = Some("http://spam.example".to_string());

        assert!(matches!(bot.validate(), Err(ContactError::InvalidSubmission)));
    }

    #[test]
    fn test_empty_honeypot_ignored() {
        let mut human = form("Ann Lee", "ann@example.com", "Hello there!");
        human.website = Some(String::new());

        assert!(human.validate().is_ok());
    }

    #[test]
    fn test_sanitize_strips_brackets_and_trims() {
        assert_eq!(sanitize_text("  <b>Hi</b>  ", 100), "bHi/b");
        assert_eq!(sanitize_text("abc <", 100), "abc");
    }

    #[test]
    fn test_sanitize_truncates_by_chars() {
        let long = "é".repeat(150);
        assert_eq!(sanitize_text(&long, NAME_MAX_CHARS).chars().count(), 100);
    }

    #[test]
    fn test_name_rules() {
        assert!(form("Mary-Jane O'Neil", "a@b.co", "Hello there!").validate().is_ok());
        assert!(form("José Núñez", "a@b.co", "Hello there!").validate().is_ok());

        assert_eq!(field_of(form("   ", "a@b.co", "Hello there!").validate().unwrap_err()), "name");
        assert_eq!(field_of(form("R2D2", "a@b.co", "Hello there!").validate().unwrap_err()), "name");
        assert_eq!(field_of(form("<>", "a@b.co", "Hello there!").validate().unwrap_err()), "name");
    }

    #[test]
    fn test_name_rejects_control_whitespace() {
        for name in ["Ann\tLee", "Ann\nLee", "Ann\r\nLee"] {
            let err = form(name, "a@b.co", "Hello there!").validate().unwrap_err();
            assert_eq!(field_of(err), "name", "accepted {:?}", name);
        }
    }

    #[test]
    fn test_overlong_name_truncated_not_rejected() {
        let contact = form(&"a".repeat(140), "a@b.co", "Hello there!").validate().unwrap();
        assert_eq!(contact.name.len(), NAME_MAX_CHARS);
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(field_of(form("Ann", "", "Hello there!").validate().unwrap_err()), "email");
        assert_eq!(field_of(form("Ann", "ann", "Hello there!").validate().unwrap_err()), "email");
        assert_eq!(field_of(form("Ann", "ann@example", "Hello there!").validate().unwrap_err()), "email");
        assert_eq!(field_of(form("Ann", "a nn@example.com", "Hello there!").validate().unwrap_err()), "email");

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(field_of(form("Ann", &long, "Hello there!").validate().unwrap_err()), "email");

        let trimmed = form("Ann", "  ann@example.com ", "Hello there!").validate().unwrap();
        assert_eq!(trimmed.email, "ann@example.com");
    }

    #[test]
    fn test_message_rules() {
        assert_eq!(field_of(form("Ann", "a@b.co", "").validate().unwrap_err()), "message");
        assert_eq!(field_of(form("Ann", "a@b.co", "too short").validate().unwrap_err()), "message");
        // Brackets are stripped before the length check
        assert_eq!(field_of(form("Ann", "a@b.co", "<<<<<hi>>>>>").validate().unwrap_err()), "message");

        let contact = form("Ann", "a@b.co", &"m".repeat(2500)).validate().unwrap();
        assert_eq!(contact.message.len(), MESSAGE_MAX_CHARS);
    }

    #[test]
    fn test_missing_fields() {
        let err = ContactForm::default().validate().unwrap_err();
        assert_eq!(field_of(err), "name");
    }

    #[test]
    fn test_rate_limit_email_is_case_insensitive() {
        let contact = form("Ann", "Ann@Example.com", "Hello there!").validate().unwrap();
        assert_eq!(contact.rate_limit_email(), "ann@example.com");
    }
}
