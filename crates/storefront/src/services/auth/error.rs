//! Authentication error types.

use thiserror::Error;

use crate::store_api::StoreApiError;

/// Message shown for any failed login.
pub const LOGIN_FAILED: &str = "Invalid email or password";

/// Message shown when registration fails without an API explanation.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopsmart_core::EmailError),

    /// A required form field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The store API rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The store API rejected a registration with a reason.
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The store API could not be reached or misbehaved.
    #[error("store API error: {0}")]
    StoreApi(#[from] StoreApiError),
}

impl AuthError {
    /// Message for the login form.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::MissingField(_) | Self::InvalidEmail(_) => self.form_message(),
            _ => LOGIN_FAILED.to_string(),
        }
    }

    /// Message for the registration form.
    #[must_use]
    pub fn registration_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::MissingField(_) | Self::InvalidEmail(_) => self.form_message(),
            _ => REGISTRATION_FAILED.to_string(),
        }
    }

    fn form_message(&self) -> String {
        match self {
            Self::MissingField(field) => {
                let mut chars = field.chars();
                chars.next().map_or_else(String::new, |first| {
                    format!("{}{} is required", first.to_uppercase(), chars.as_str())
                })
            }
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            _ => self.to_string(),
        }
    }
}
