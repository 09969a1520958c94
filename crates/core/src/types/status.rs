//! Status enums shared by the storefront views.

use serde::{Deserialize, Serialize};

/// State of an asynchronous remote query.
///
/// Exactly one state is current at render time. `Loading` holds until the
/// request concludes; it only comes back when a new request starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum QueryState<T> {
    /// No request has been issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded(T),
    /// The last request failed; holds a user-facing message.
    Failed(String),
}

impl<T> QueryState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(QueryState::<u8>::default(), QueryState::Idle);
    }

    #[test]
    fn test_accessors_are_exclusive() {
        let loaded = QueryState::Loaded(3);
        assert_eq!(loaded.value(), Some(&3));
        assert!(loaded.error().is_none());
        assert!(!loaded.is_loading());

        let failed: QueryState<u8> = QueryState::Failed("Error fetching products".to_string());
        assert_eq!(failed.error(), Some("Error fetching products"));
        assert!(failed.value().is_none());

        assert!(QueryState::<u8>::Loading.is_loading());
    }
}
