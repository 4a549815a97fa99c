use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rocketlab_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose current role is `admin`.
///
/// Signed-in non-admins get 403; missing or dead sessions get the 401 from
/// [`AuthUser`].
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.operator.role.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Lead triage is limited to admins".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
