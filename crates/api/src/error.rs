use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rocketlab_core::error::CoreError;
use serde::Serialize;
use sqlx::error::ErrorKind;

/// Error returned by every handler and extractor.
///
/// Renders as `{ "error": <message>, "code": <CODE> }`. Internal details are
/// logged and replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

const HIDDEN: &str = "An internal error occurred";

impl AppError {
    fn status_code_and_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Database(err) => database_failure(err),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", HIDDEN.into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.status_code_and_message();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

/// Constraint names carry the `uq_`/`ck_` prefix used in the migrations, so a
/// violation can be reported without leaking the rest of the driver message.
fn database_failure(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".into());
    }

    if let Some(db_err) = err.as_database_error() {
        let constraint = db_err.constraint().unwrap_or_default();
        match db_err.kind() {
            ErrorKind::UniqueViolation if constraint.starts_with("uq_") => {
                return (StatusCode::CONFLICT, "CONFLICT", format!("{constraint} already in use"));
            }
            ErrorKind::CheckViolation if constraint.starts_with("ck_") => {
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value rejected by {constraint}"),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", HIDDEN.into())
}
