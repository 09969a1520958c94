//! Fallback for unknown routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};

use super::NavView;
use crate::filters;
use crate::middleware::OptionalAuth;

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub nav: NavView,
}

/// Render the 404 page.
pub async fn not_found(auth: OptionalAuth) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            nav: NavView::from(&auth),
        },
    )
}
