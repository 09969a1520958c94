//! Authentication extractors and session helpers.
//!
//! The session holds a single [`AuthState`]; a visitor is logged in exactly
//! when that state is `Authenticated`.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{AuthState, CurrentCustomer, session_keys};

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in customer.
///
/// If the visitor is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(customer): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", customer.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentCustomer);

/// Error returned when authentication is required but the visitor is anonymous.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        load_auth_state(parts)
            .await
            .into_customer()
            .map(Self)
            .ok_or(AuthRejection)
    }
}

/// Extractor for the visitor's authentication state.
///
/// Never rejects; visitors without a session are `Anonymous`.
pub struct OptionalAuth(pub AuthState);

impl OptionalAuth {
    #[must_use]
    pub const fn customer(&self) -> Option<&CurrentCustomer> {
        self.0.customer()
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(load_auth_state(parts).await))
    }
}

async fn load_auth_state(parts: &Parts) -> AuthState {
    match parts.extensions.get::<Session>() {
        Some(session) => session
            .get::<AuthState>(session_keys::AUTH_STATE)
            .await
            .ok()
            .flatten()
            .unwrap_or_default(),
        None => AuthState::Anonymous,
    }
}

/// Log a customer in.
///
/// Cycles the session id so a session fixed before login cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &Session,
    customer: CurrentCustomer,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    set_sentry_user(customer.email.as_str());
    session
        .insert(session_keys::AUTH_STATE, AuthState::Authenticated(customer))
        .await
}

/// Log the customer out.
///
/// Tokens, email, and name are dropped together. The cart is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthState>(session_keys::AUTH_STATE)
        .await?;
    session.cycle_id().await?;
    clear_sentry_user();
    Ok(())
}
