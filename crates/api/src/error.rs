use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booksummary_core::error::CoreError;
use booksummary_core::generation::GENERATION_FAILED_MESSAGE;
use booksummary_core::interaction::RecordError;
use serde_json::json;

/// Shown for every backend failure the caller cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "요청을 처리하는 중 오류가 발생했습니다.";

/// Shown when a signed-in session is required.
pub const LOGIN_REQUIRED_MESSAGE: &str = "로그인이 필요합니다.";

/// Where unauthenticated callers are sent.
pub const LOGIN_URL: &str = "/login";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// The text-generation upstream failed. The detail is logged only.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RecordError<sqlx::Error>> for AppError {
    fn from(err: RecordError<sqlx::Error>) -> Self {
        match err {
            RecordError::LoginRequired => {
                AppError::Core(CoreError::Unauthorized(LOGIN_REQUIRED_MESSAGE.into()))
            }
            RecordError::WorkNotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Work",
                id,
            }),
            RecordError::Store(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    let body = json!({
                        "error": msg,
                        "code": "UNAUTHORIZED",
                        "login_url": LOGIN_URL,
                    });
                    return (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response();
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::GenerationFailed(msg) => {
                tracing::error!(error = %msg, "Novel generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    GENERATION_FAILED_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        GENERIC_ERROR_MESSAGE.to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with the generic message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        conflict_message(constraint),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_profiles_email" => "이미 가입된 이메일입니다.".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}
