//! Client-side form validation.
//!
//! Validation errors are shown inline next to the form and never reach the
//! backend.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PROJECT_NAME_MAX_LEN: usize = 50;
pub const PROJECT_DESCRIPTION_MAX_LEN: usize = 255;
pub const CHAT_MESSAGE_MAX_LEN: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error(
        "Password must be at least 8 characters and include an uppercase letter, a lowercase letter, a number, and a symbol"
    )]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Enter a valid email address")]
    InvalidEmail,
}

/// Trimmed `value`, or [`ValidationError::Required`] naming `field`.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank input.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed)
}

/// # Errors
///
/// Returns [`ValidationError::TooLong`] past `max` characters.
pub fn within_limit(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Characters left before `max`; negative once over the limit.
pub fn remaining_chars(value: &str, max: usize) -> i64 {
    let used = i64::try_from(value.chars().count()).unwrap_or(i64::MAX);
    i64::try_from(max).unwrap_or(i64::MAX) - used
}

/// Password policy: minimum length plus one of each character class.
///
/// # Errors
///
/// Returns [`ValidationError::WeakPassword`] when any rule fails.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let upper = password.chars().any(char::is_uppercase);
    let lower = password.chars().any(char::is_lowercase);
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if long_enough && upper && lower && digit && symbol {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// # Errors
///
/// Returns [`ValidationError::PasswordMismatch`] when the two differ.
pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Shape check only; the backend owns deliverability.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] for input without a
/// `local@domain.tld` shape.
pub fn check_email(email: &str) -> Result<(), ValidationError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && domain.contains('.')
            && !email.contains(char::is_whitespace)
    });
    if valid { Ok(()) } else { Err(ValidationError::InvalidEmail) }
}

/// Validated sign-in form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = require("Email", email)?;
        check_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(Self { email: email.to_owned(), password: password.to_owned() })
    }
}

/// Validated registration form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(username: &str, email: &str, password: &str, confirmation: &str) -> Result<Self, ValidationError> {
        let username = require("Username", username)?;
        let email = require("Email", email)?;
        check_email(email)?;
        check_password(password)?;
        check_confirmation(password, confirmation)?;
        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }
}

/// Validated new-project form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
}

impl ProjectForm {
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(name: &str, description: &str) -> Result<Self, ValidationError> {
        let name = require("Project name", name)?;
        within_limit("Project name", name, PROJECT_NAME_MAX_LEN)?;
        let description = description.trim();
        within_limit("Description", description, PROJECT_DESCRIPTION_MAX_LEN)?;
        Ok(Self { name: name.to_owned(), description: description.to_owned() })
    }
}
