use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Local input problems. Never involve the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose a city first.")]
    MissingCity,

    #[error("Please choose a city from the suggestions first.")]
    CityNotConfirmed,

    #[error("Please enter an email address.")]
    MissingEmail,

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && email_regex().is_match(trimmed)
}

/// Subscribe is enabled only for a confirmed city and a well-formed email.
pub fn can_subscribe(city_confirmed: bool, email: &str) -> bool {
    city_confirmed && is_valid_email(email)
}

/// Check a subscribe request, returning the trimmed address on success.
pub fn validate_subscription(city_confirmed: bool, email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    if !city_confirmed {
        return Err(ValidationError::CityNotConfirmed);
    }
    Ok(trimmed.to_string())
}
