//! Bearer-token extractor for signed-in operators.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rocketlab_core::error::CoreError;
use rocketlab_core::types::SessionId;
use rocketlab_db::models::operator::Operator;
use rocketlab_db::repositories::SessionRepo;

use crate::auth::token;
use crate::error::AppError;
use crate::state::AppState;

/// The operator behind a request, re-read from the database on every call.
///
/// A token is honoured only while its session is open and its operator is
/// active, so sign-out, deactivation and role changes apply to the very next
/// request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub operator: Operator,
    pub session_id: SessionId,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = bearer_token(parts).ok_or_else(|| unauthorized("Bearer token required"))?;

        let claims = token::verify(raw, &state.config.token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let operator = SessionRepo::live_operator(&state.pool, claims.sid)
            .await?
            .filter(|op| op.id == claims.sub)
            .ok_or_else(|| {
                tracing::debug!(session_id = %claims.sid, operator_id = claims.sub, "Token refers to a closed session");
                unauthorized("Session has ended")
            })?;

        Ok(AuthUser {
            operator,
            session_id: claims.sid,
        })
    }
}
