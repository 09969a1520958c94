//! Account client: login, profile and registration.
//!
//! Nothing here is cached. Passwords stay wrapped in [`SecretString`] until
//! the moment they are serialized into a request body.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use shopsmart_core::Email;

use super::types::{AuthTokens, NewAccount, Profile, RegisteredUser};
use super::{StoreApiError, Transport};
use crate::config::StoreApiConfig;

/// Client for the account half of the store API.
#[derive(Debug, Clone)]
pub struct AccountClient {
    transport: Transport,
    avatar_url: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    avatar: &'a str,
}

impl AccountClient {
    /// Create a new account client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// cannot hold path segments.
    pub fn new(config: &StoreApiConfig) -> Result<Self, StoreApiError> {
        Ok(Self {
            transport: Transport::new(config)?,
            avatar_url: config.register_avatar_url.clone(),
        })
    }

    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    ///
    /// Returns [`StoreApiError::Status`] with status 401 for bad credentials,
    /// or another error if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthTokens, StoreApiError> {
        let url = self.transport.endpoint(&["auth", "login"])?;
        let request = self.transport.client().post(url).json(&LoginBody {
            email: email.as_str(),
            password: password.expose_secret(),
        });
        self.transport.send_json(request).await
    }

    /// Fetch the profile for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn profile(&self, access_token: &SecretString) -> Result<Profile, StoreApiError> {
        let url = self.transport.endpoint(&["auth", "profile"])?;
        let request = self
            .transport
            .client()
            .get(url)
            .bearer_auth(access_token.expose_secret());
        self.transport.send_json(request).await
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreApiError::Status`] carrying the API's validation
    /// messages when the account is rejected, or another error if the
    /// request fails.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: &NewAccount) -> Result<RegisteredUser, StoreApiError> {
        let url = self.transport.endpoint(&["users", ""])?;
        let request = self.transport.client().post(url).json(&RegisterBody {
            name: &account.name,
            email: account.email.as_str(),
            password: account.password.expose_secret(),
            avatar: &self.avatar_url,
        });
        self.transport.send_json(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_body_shape() {
        let body = RegisterBody {
            name: "Nico",
            email: "nico@gmail.com",
            password: "1234",
            avatar: "https://picsum.photos/800",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Nico",
                "email": "nico@gmail.com",
                "password": "1234",
                "avatar": "https://picsum.photos/800",
            })
        );
    }

    #[test]
    fn test_account_client_keeps_avatar() {
        let client = AccountClient::new(&StoreApiConfig::default()).unwrap();
        assert_eq!(client.avatar_url, crate::config::DEFAULT_AVATAR_URL);
    }
}
