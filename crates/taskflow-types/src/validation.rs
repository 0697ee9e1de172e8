//! Client-side form checks, run before any request is issued.

use std::sync::OnceLock;
use regex::Regex;

use crate::user::{Credentials, Registration};
use crate::{Result, TaskflowError};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const PASSWORD_MIN: usize = 8;

fn email_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskflowError::validation("title", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(TaskflowError::validation(
            "title",
            format!("Title must be less than {} characters", TITLE_MAX),
        ));
    }
    Ok(title.to_string())
}

/// Returns the trimmed description, `None` when blank.
pub fn validate_description(description: &str) -> Result<Option<String>> {
    let description = description.trim();
    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(TaskflowError::validation(
            "description",
            format!("Description must be less than {} characters", DESCRIPTION_MAX),
        ));
    }
    Ok(Some(description.to_string()))
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(TaskflowError::validation("email", "Email is required"));
    }
    if !email_regex().is_some_and(|re| re.is_match(email.trim())) {
        return Err(TaskflowError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(TaskflowError::validation(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN),
        ));
    }
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(TaskflowError::validation(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }
    Ok(())
}

pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    if credentials.username.trim().is_empty() {
        return Err(TaskflowError::validation("username", "Username is required"));
    }
    if credentials.password.is_empty() {
        return Err(TaskflowError::validation("password", "Password is required"));
    }
    Ok(())
}

pub fn validate_registration(registration: &Registration) -> Result<()> {
    if registration.username.trim().is_empty() {
        return Err(TaskflowError::validation("username", "Username is required"));
    }
    validate_email(&registration.email)?;
    validate_password(&registration.password)
}
