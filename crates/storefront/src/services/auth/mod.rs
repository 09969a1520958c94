//! Authentication service.
//!
//! Credentials are checked by the store API; the storefront only keeps the
//! resulting tokens and profile in the session.

mod error;

pub use error::{AuthError, LOGIN_FAILED, REGISTRATION_FAILED};

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use shopsmart_core::Email;

use crate::models::CurrentCustomer;
use crate::store_api::{AccountClient, NewAccount, RegisteredUser};

/// Authentication service.
///
/// Handles login and registration against the store API.
pub struct AuthService<'a> {
    accounts: &'a AccountClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(accounts: &'a AccountClient) -> Self {
        Self { accounts }
    }

    /// Log in with email and password.
    ///
    /// Exchanges the credentials for tokens, then loads the profile so the
    /// session can show the customer's name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingField` for
    /// unusable input, `AuthError::InvalidCredentials` if the API rejects the
    /// credentials, and `AuthError::StoreApi` for any other API failure.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<CurrentCustomer, AuthError> {
        let email = Email::parse(email)?;
        require(password.expose_secret(), "password")?;

        let tokens = self
            .accounts
            .login(&email, password)
            .await
            .map_err(|e| match e.status() {
                Some(400 | 401) => AuthError::InvalidCredentials,
                _ => AuthError::StoreApi(e),
            })?;

        let profile = self.accounts.profile(&tokens.access()).await?;

        // Trust the profile's address; fall back to what was typed.
        let email = Email::parse(&profile.email).unwrap_or(email);

        info!(email = %email, "Customer logged in");

        Ok(CurrentCustomer {
            email,
            name: profile.name,
            tokens,
        })
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingField` for
    /// unusable input, `AuthError::Rejected` with the API's explanation when
    /// the account is refused, and `AuthError::StoreApi` otherwise.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<RegisteredUser, AuthError> {
        let name = require(name, "name")?;
        let email = Email::parse(email)?;
        require(password.expose_secret(), "password")?;

        let account = NewAccount {
            name: name.to_string(),
            email,
            password,
        };

        let user = self
            .accounts
            .register(&account)
            .await
            .map_err(|e| match e.user_message() {
                Some(message) => AuthError::Rejected(message.to_string()),
                None => {
                    warn!(error = %e, "Registration failed");
                    AuthError::StoreApi(e)
                }
            })?;

        info!(user_id = %user.id, "Customer registered");
        Ok(user)
    }
}

/// Trimmed value of a required field.
fn require<'v>(value: &'v str, field: &'static str) -> Result<&'v str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trims() {
        assert_eq!(require("  Nico ", "name").ok(), Some("Nico"));
        assert!(matches!(
            require("   ", "name"),
            Err(AuthError::MissingField("name"))
        ));
    }
}
