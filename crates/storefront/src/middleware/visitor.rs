//! Visitor extractor.
//!
//! Resolves the [`Visitor`] owning the current session's cart and catalog
//! query, assigning a fresh visitor id on first contact.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::Visitor;
use crate::state::AppState;

/// The current visitor's state.
pub struct CurrentVisitor(pub Arc<Visitor>);

impl std::ops::Deref for CurrentVisitor {
    type Target = Visitor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentVisitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = match session.get::<Uuid>(session_keys::VISITOR_ID).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session.insert(session_keys::VISITOR_ID, id).await?;
                tracing::debug!(
                    visitor_id = %id,
                    live_visitors = state.visitors().len(),
                    "New visitor"
                );
                id
            }
        };

        Ok(Self(state.visitors().get_or_create(id).await))
    }
}
