//! Sign-in, sign-out and the capability the auth gate asks for.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rocketlab_core::auth_gate::CurrentUser;
use rocketlab_core::error::CoreError;
use rocketlab_core::types::Timestamp;
use rocketlab_db::models::operator::Operator;
use rocketlab_db::repositories::{OperatorRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::auth::token::{self, SessionClaims};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Who is signed in and whether the triage board is open to them.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: CurrentUser,
    pub is_admin: bool,
}

impl From<&Operator> for SessionView {
    fn from(operator: &Operator) -> Self {
        Self {
            user: operator.current_user(),
            is_admin: operator.role.is_admin(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub access_token: String,
    pub expires_at: Timestamp,
    #[serde(flatten)]
    pub session: SessionView,
}

/// Unknown usernames, deactivated accounts and wrong passwords all look the same.
fn bad_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<SignedIn>>> {
    let operator = OperatorRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .filter(|op| op.is_active)
        .ok_or_else(bad_credentials)?;

    let password_ok = verify_password(&input.password, &operator.password_hash)
        .map_err(|e| AppError::Internal(format!("unreadable password hash for operator {}: {e}", operator.id)))?;
    if !password_ok {
        tracing::info!(operator_id = operator.id, "Sign-in refused");
        return Err(bad_credentials());
    }

    let expires_at = Utc::now() + state.config.token.session_ttl();
    let session = SessionRepo::open(&state.pool, operator.id, expires_at).await?;
    OperatorRepo::record_sign_in(&state.pool, operator.id).await?;

    let access_token = token::sign(&SessionClaims::for_session(&session), &state.config.token)
        .map_err(|e| AppError::Internal(format!("failed to sign access token: {e}")))?;

    tracing::info!(
        operator_id = operator.id,
        session_id = %session.id,
        role = %operator.role,
        "Operator signed in"
    );

    Ok(Json(DataResponse {
        data: SignedIn {
            access_token,
            expires_at: session.expires_at,
            session: SessionView::from(&operator),
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Ends the session the token belongs to. Other sessions of the same
/// operator stay open.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::end(&state.pool, user.session_id).await?;
    tracing::info!(operator_id = user.operator.id, session_id = %user.session_id, "Operator signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Role and active flag come from the operator row, not the token.
pub async fn me(user: AuthUser) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView::from(&user.operator),
    })
}
