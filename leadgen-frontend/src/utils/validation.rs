//! Well-formedness checks for the two forms.
//!
//! Credential rules are hand-written because messages must come out in a
//! fixed order with at most one message per field. The lead request rules
//! live on [`LeadGenerationRequest`] as `validator` derives.

use crate::models::lead::LeadGenerationRequest;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Email is invalid";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// `local@domain.tld` shaped, nothing stricter.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email shape pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

pub fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !EMAIL_SHAPE.is_match(email) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

/// Error for a single field, regardless of whether it was touched.
pub fn field_error(field: Field, email: &str, password: &str) -> Option<&'static str> {
    match field {
        Field::Email => email_error(email),
        Field::Password => password_error(password),
    }
}

/// Whole-form validation, email messages before password messages.
/// An empty result means the credentials are well formed.
pub fn validate_credentials(email: &str, password: &str) -> Vec<String> {
    [email_error(email), password_error(password)]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect()
}

/// Validate a lead request, niche messages before page messages.
pub fn validate_lead_request(request: &LeadGenerationRequest) -> Vec<String> {
    let Err(errors) = request.validate() else {
        return Vec::new();
    };

    let fields = errors.field_errors();
    ["niche", "pages"]
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errors| errors.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string())
        })
        .collect()
}

pub fn join_messages(messages: &[String]) -> String {
    messages.join(". ")
}
