//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the store API's account
//! endpoints. Failures re-render the form with a message; nothing about the
//! cause is shown beyond what the API itself reports for registrations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use super::NavView;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, sign_in, sign_out};
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Set after a successful registration.
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub success: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(auth: OptionalAuth, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        nav: NavView::from(&auth),
        error: None,
        success: query
            .registered
            .map(|_| "Registration successful. Please log in.".to_string()),
        email: String::new(),
    }
}

/// Handle login form submission.
///
/// On success the session is cycled and marked authenticated.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let password = SecretString::from(form.password);

    match AuthService::new(state.accounts())
        .login(&form.email, &password)
        .await
    {
        Ok(customer) => {
            sign_in(&session, customer).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            warn!(error = %e, "Login failed");
            Ok(LoginTemplate {
                nav: NavView::default(),
                error: Some(e.login_message()),
                success: None,
                email: form.email,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(auth: OptionalAuth) -> impl IntoResponse {
    RegisterTemplate {
        nav: NavView::from(&auth),
        error: None,
        name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// A new account is not logged in; the visitor is sent to the login page.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Form(form): Form<RegisterForm>,
) -> Response {
    let password = SecretString::from(form.password);

    match AuthService::new(state.accounts())
        .register(&form.name, &form.email, password)
        .await
    {
        Ok(_) => Redirect::to("/login?registered=1").into_response(),
        Err(e) => RegisterTemplate {
            nav: NavView::from(&auth),
            error: Some(e.registration_message()),
            name: form.name,
            email: form.email,
        }
        .into_response(),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout. The cart survives.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    sign_out(&session).await?;
    Ok(Redirect::to("/login"))
}
