use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use uuid::Uuid;

use service::identity::{Actor, Role};

use crate::errors::JsonApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Caller identity from the gateway-injected headers. The auth proxy in
/// front of this service verifies credentials and forwards the verified
/// id/role; requests without them are rejected here with 401.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Actor);

fn unauthorized(detail: String) -> JsonApiError {
    JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail))
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| unauthorized(format!("missing or invalid {} header", ACTOR_ID_HEADER)))?;

        // Absent role means a regular user; anything else must match exactly.
        let role = match parts.headers.get(ACTOR_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            None => Role::User,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "user" => Role::User,
                "admin" => Role::Admin,
                _ => return Err(unauthorized(format!("invalid {} header", ACTOR_ROLE_HEADER))),
            },
        };

        Ok(Caller(Actor::new(id, role)))
    }
}
