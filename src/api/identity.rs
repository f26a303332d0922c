use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::core::{security, state::AppState};

/// Resolved caller identity, produced once per request and passed into every
/// service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Identity {
    User(String),
    Anonymous,
}

impl Identity {
    /// Picks the first usable identity source: the verified bearer subject,
    /// then the request-supplied user id.
    pub(crate) fn resolve(verified: Option<String>, fallback: Option<&str>) -> Self {
        let candidate = [verified.as_deref(), fallback]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty());

        match candidate {
            Some(user_id) => Identity::User(user_id.to_string()),
            None => Identity::Anonymous,
        }
    }

    pub(crate) fn user_id(&self) -> Option<&str> {
        match self {
            Identity::User(user_id) => Some(user_id),
            Identity::Anonymous => None,
        }
    }

    pub(crate) fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// Bearer subject extracted from the Authorization header, when a valid
/// token is present. Never rejects; an absent or invalid token simply
/// yields no verified subject.
pub(crate) struct Caller(pub(crate) Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Ok(Caller(None));
        };

        match security::verify_token(token, state.settings()) {
            Ok(claims) => Ok(Caller(Some(claims.sub))),
            Err(_) => {
                tracing::debug!("Rejected bearer token; falling back to request-supplied identity");
                Ok(Caller(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_subject_wins_over_fallback() {
        let identity = Identity::resolve(Some("token-user".to_string()), Some("body-user"));
        assert_eq!(identity.user_id(), Some("token-user"));
    }

    #[test]
    fn fallback_is_used_without_a_verified_subject() {
        let identity = Identity::resolve(None, Some("body-user"));
        assert_eq!(identity.user_id(), Some("body-user"));
    }

    #[test]
    fn blank_sources_resolve_to_anonymous() {
        assert!(Identity::resolve(None, None).is_anonymous());
        assert!(Identity::resolve(Some("  ".to_string()), Some("")).is_anonymous());
    }

    #[test]
    fn blank_verified_subject_falls_through() {
        let identity = Identity::resolve(Some(String::new()), Some("body-user"));
        assert_eq!(identity.user_id(), Some("body-user"));
    }
}
