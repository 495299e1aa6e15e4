//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no server or database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use booksummary_api::error::{AppError, GENERIC_ERROR_MESSAGE, LOGIN_REQUIRED_MESSAGE, LOGIN_URL};
use booksummary_core::error::CoreError;
use booksummary_core::generation::GENERATION_FAILED_MESSAGE;
use booksummary_core::interaction::RecordError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Work",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Work with id 42 not found");
}

#[tokio::test]
async fn validation_error_keeps_message() {
    let err = AppError::Core(CoreError::Validation("댓글 내용을 입력해주세요.".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "댓글 내용을 입력해주세요.");
}

#[tokio::test]
async fn unauthorized_carries_login_url() {
    let err = AppError::Core(CoreError::Unauthorized(LOGIN_REQUIRED_MESSAGE.into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["login_url"], LOGIN_URL);
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("관리자 권한이 필요합니다.".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(json.get("login_url").is_none());
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("disk full at /var/lib/covers".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn core_internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("counter overflow".into()));

    let (_, json) = error_to_response(err).await;

    assert_eq!(json["error"], GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn generation_failure_hides_upstream_detail() {
    let err = AppError::GenerationFailed("API error (status 429): rate limited".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_eq!(json["error"], GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn other_database_errors_are_sanitized() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], GENERIC_ERROR_MESSAGE);
}

// ---------------------------------------------------------------------------
// RecordError conversions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_login_required_becomes_401() {
    let err: AppError = RecordError::<sqlx::Error>::LoginRequired.into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], LOGIN_REQUIRED_MESSAGE);
    assert_eq!(json["login_url"], "/login");
}

#[tokio::test]
async fn record_missing_work_becomes_404() {
    let err: AppError = RecordError::<sqlx::Error>::WorkNotFound(7).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Work with id 7 not found");
}

#[tokio::test]
async fn record_store_failure_is_sanitized() {
    let err: AppError = RecordError::Store(sqlx::Error::PoolClosed).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], GENERIC_ERROR_MESSAGE);
}
