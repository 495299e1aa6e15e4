//! Signup and login input rules.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Minimum password length, in characters. Mirrored in the `length`
/// validator on [`SignupRequest::password`].
pub const MIN_PASSWORD_LEN: usize = 8;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "비밀번호가 일치하지 않습니다.";
pub const AGREEMENT_REQUIRED_MESSAGE: &str = "필수 약관에 동의해주세요.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "이메일 또는 비밀번호가 올바르지 않습니다.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "올바른 이메일 주소를 입력해주세요."))]
    pub email: String,
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다."))]
    pub password: String,
    pub password_confirm: String,
    #[validate(length(min = 1, max = 50, message = "이름을 입력해주세요."))]
    pub full_name: String,
    #[serde(default)]
    pub terms_agreed: bool,
    #[serde(default)]
    pub privacy_agreed: bool,
}

impl SignupRequest {
    /// Field validation plus the cross-field checks the derive cannot express.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_message)?;
        if self.password != self.password_confirm {
            return Err(CoreError::Validation(PASSWORD_MISMATCH_MESSAGE.into()));
        }
        if !self.terms_agreed || !self.privacy_agreed {
            return Err(CoreError::Validation(AGREEMENT_REQUIRED_MESSAGE.into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sortable columns on the admin users screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    CreatedAt,
    FullName,
}

impl UserSortField {
    pub fn column(self) -> &'static str {
        match self {
            UserSortField::CreatedAt => "created_at",
            UserSortField::FullName => "full_name",
        }
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collapse validator output into one message, picking the first field in
/// name order so the result is stable.
fn validation_message(errors: ValidationErrors) -> CoreError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    let message = fields
        .first()
        .and_then(|f| field_errors.get(*f))
        .and_then(|errs| errs.first())
        .map(|e| match &e.message {
            Some(m) => m.to_string(),
            None => format!("Invalid value for '{}'", e.code),
        })
        .unwrap_or_else(|| "Invalid input".to_string());

    CoreError::Validation(message)
}
