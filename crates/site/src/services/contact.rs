//! Contact form and newsletter signup.
//!
//! Submissions are validated and logged; delivery to an inbox or mailing
//! list is up to the host.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use stagefront_core::Email;

/// Loose shape check: something, `@`, something, `.`, something.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

const INVALID_EMAIL: &str = "Please enter a valid email address";

/// A contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation messages. Only invalid fields have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct ValidationErrors(BTreeMap<Field, String>);

fn summary(errors: &BTreeMap<Field, String>) -> String {
    errors.values().cloned().collect::<Vec<_>>().join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// The contact form as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub reply_to: Email,
    pub subject: String,
    pub received_at: DateTime<Utc>,
}

/// Acknowledgement of a newsletter signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterReceipt {
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
}

impl ContactForm {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the message for each invalid field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (field, value) in [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Subject, &self.subject),
            (Field::Message, &self.message),
        ] {
            if value.trim().is_empty() {
                errors.insert(field, format!("{field} is required"));
            }
        }
        if errors.get(Field::Email).is_none() && parse_email(&self.email).is_none() {
            errors.insert(Field::Email, INVALID_EMAIL);
        }
        errors.into_result()
    }

    /// Validate and accept the submission, clearing the form on success.
    ///
    /// On failure the form keeps what was typed.
    ///
    /// # Errors
    ///
    /// Returns the message for each invalid field.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Result<ContactReceipt, ValidationErrors> {
        self.validate()?;

        let Some(reply_to) = parse_email(&self.email) else {
            let mut errors = ValidationErrors::default();
            errors.insert(Field::Email, INVALID_EMAIL);
            return Err(errors);
        };

        let form = std::mem::take(self);
        tracing::info!(
            reply_to = %reply_to,
            subject = %form.subject.trim(),
            length = form.message.trim().len(),
            "Contact form submitted"
        );

        Ok(ContactReceipt {
            reply_to,
            subject: form.subject.trim().to_string(),
            received_at: Utc::now(),
        })
    }
}

/// Validate a newsletter signup.
///
/// # Errors
///
/// Returns a message for [`Field::Email`] if the address is blank or malformed.
#[instrument]
pub fn subscribe_newsletter(email: &str) -> Result<NewsletterReceipt, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
        return Err(errors);
    }
    let Some(email) = parse_email(email) else {
        errors.insert(Field::Email, INVALID_EMAIL);
        return Err(errors);
    };

    tracing::info!(email = %email, "Newsletter signup");
    Ok(NewsletterReceipt {
        email,
        subscribed_at: Utc::now(),
    })
}

/// The pattern check first, then the stricter [`Email`] rules.
fn parse_email(raw: &str) -> Option<Email> {
    let raw = raw.trim();
    let pattern = EMAIL_PATTERN.as_ref()?;
    if !pattern.is_match(raw) {
        return None;
    }
    Email::parse(raw).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Booking".to_string(),
            message: "Are you free in June?".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_required_fields() {
        let errors = ContactForm::default().validate().unwrap_err();

        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Subject), Some("Subject is required"));
        assert_eq!(errors.get(Field::Message), Some("Message is required"));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let form = ContactForm {
            subject: "   ".to_string(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.iter().count(), 1);
        assert_eq!(errors.get(Field::Subject), Some("Subject is required"));
    }

    #[test]
    fn test_malformed_email() {
        for email in ["ada", "ada@example", "ada @example.com", "@example.com"] {
            let form = ContactForm {
                email: email.to_string(),
                ..filled()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL), "{email}");
        }
    }

    #[test]
    fn test_submit_clears_form() {
        let mut form = filled();
        let receipt = form.submit().unwrap();

        assert_eq!(receipt.reply_to.as_str(), "ada@example.com");
        assert_eq!(receipt.subject, "Booking");
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_failed_submit_keeps_input() {
        let mut form = ContactForm {
            message: String::new(),
            ..filled()
        };
        assert!(form.submit().is_err());
        assert_eq!(form.name, "Ada");
    }

    #[test]
    fn test_newsletter() {
        assert!(subscribe_newsletter("fan@example.com").is_ok());
        assert_eq!(
            subscribe_newsletter("").unwrap_err().get(Field::Email),
            Some("Email is required")
        );
        assert_eq!(
            subscribe_newsletter("fan").unwrap_err().get(Field::Email),
            Some(INVALID_EMAIL)
        );
    }

    #[test]
    fn test_error_display_joins_messages() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Name is required; Email is required; Subject is required; Message is required"
        );
    }
}
