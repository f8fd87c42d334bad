//! Contact and newsletter form validation.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studio_core::{Error, Result};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Shown when any contact field is missing.
pub const FIELDS_REQUIRED: &str = "All fields are required.";
/// Shown for a short name.
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters.";
/// Shown for an unusable email address.
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
/// Shown for a blank subject.
pub const SUBJECT_REQUIRED: &str = "Please select a subject.";
/// Shown for a short message.
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters.";

/// Whether `email` looks like an address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

fn normalise_email(email: &str) -> Result<String> {
    if is_valid_email(email) {
        Ok(email.trim().to_lowercase())
    } else {
        Err(Error::invalid_input(INVALID_EMAIL))
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Contact form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Sender name.
    pub name: Option<String>,
    /// Reply address.
    pub email: Option<String>,
    /// Chosen subject.
    pub subject: Option<String>,
    /// Message text.
    pub message: Option<String>,
}

/// A validated contact message, ready to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Record id.
    pub id: Uuid,
    /// Trimmed name.
    pub name: String,
    /// Trimmed, lowercased email.
    pub email: String,
    /// Trimmed subject.
    pub subject: String,
    /// Trimmed message.
    pub message: String,
    /// When the message was accepted.
    pub received_at: DateTime<Utc>,
}

impl ContactForm {
    /// Check every field, reporting the first problem.
    pub fn validate(&self) -> Result<ContactMessage> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            present(&self.name),
            present(&self.email),
            present(&self.subject),
            present(&self.message),
        ) else {
            return Err(Error::invalid_input(FIELDS_REQUIRED));
        };

        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(Error::invalid_input(NAME_TOO_SHORT));
        }
        let email = normalise_email(email)?;
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(Error::invalid_input(SUBJECT_REQUIRED));
        }
        let message = message.trim();
        if message.chars().count() < 10 {
            return Err(Error::invalid_input(MESSAGE_TOO_SHORT));
        }

        Ok(ContactMessage {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email,
            subject: subject.to_string(),
            message: message.to_string(),
            received_at: Utc::now(),
        })
    }
}

/// Newsletter signup as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterForm {
    /// Address to subscribe.
    pub email: Option<String>,
}

/// A validated subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Lowercased address.
    pub email: String,
    /// When the signup was accepted.
    pub subscribed_at: DateTime<Utc>,
}

impl NewsletterForm {
    /// Check the address.
    pub fn validate(&self) -> Result<Subscriber> {
        let email = self.email.as_deref().unwrap_or_default();
        Ok(Subscriber {
            email: normalise_email(email)?,
            subscribed_at: Utc::now(),
        })
    }
}
