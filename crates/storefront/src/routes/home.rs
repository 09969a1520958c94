//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use super::NavView;
use crate::filters;
use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
}

/// Display the home page.
pub async fn home(auth: OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        nav: NavView::from(&auth),
    }
}
