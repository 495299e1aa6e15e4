//! Handlers for signup, login and the caller's own profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use booksummary_core::account::{
    normalize_email, LoginRequest, SignupRequest, INVALID_CREDENTIALS_MESSAGE,
};
use booksummary_core::error::CoreError;
use booksummary_core::types::DbId;
use booksummary_db::models::profile::{CreateProfile, ProfileResponse, UpdateProfile};
use booksummary_db::repositories::ProfileRepo;
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: ProfileResponse,
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.check()?;

    let email = normalize_email(&input.email);
    if ProfileRepo::find_by_email(&state.pool, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "이미 가입된 이메일입니다.".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            email,
            password_hash,
            full_name: Some(input.full_name.trim().to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, "Profile created");

    let (id, role) = (profile.id, profile.role.clone());
    let response = auth_response(&state, id, &role, profile.into())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into()));

    let profile = ProfileRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let valid = verify_password(&input.password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = profile.id, "Login rejected");
        return Err(invalid());
    }

    let (id, role) = (profile.id, profile.role.clone());
    let response = auth_response(&state, id, &role, profile.into())?;
    Ok(Json(response))
}

/// GET /api/v1/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: profile.into(),
    }))
}

/// PUT /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let input = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        bio: input.bio,
    };
    if input.full_name.as_deref() == Some("") {
        return Err(AppError::Core(CoreError::Validation(
            "이름을 입력해주세요.".into(),
        )));
    }

    let profile = ProfileRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: profile.into(),
    }))
}

fn auth_response(
    state: &AppState,
    user_id: DbId,
    role: &str,
    user: ProfileResponse,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user_id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    })
}
