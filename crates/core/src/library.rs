//! User library defaults and settings validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const DEFAULT_LIBRARY_NAME: &str = "나의 도서관";
pub const DEFAULT_LIBRARY_DESCRIPTION: &str = "내 작품들을 모아두는 공간입니다.";
pub const DEFAULT_LIBRARY_THEME: &str = "default";

pub const MAX_LIBRARY_NAME_LEN: usize = 100;
pub const MAX_LIBRARY_DESCRIPTION_LEN: usize = 1000;

/// Presentation themes a library can use.
pub const LIBRARY_THEMES: &[&str] = &["default", "dark", "light", "vintage", "modern"];

/// Aggregates over the works a library owns. Pushed on `library_{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryStats {
    pub library_id: DbId,
    pub total_works: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

/// Validated library settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySettings {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub theme: String,
}

impl LibrarySettings {
    pub fn validate(
        name: &str,
        description: Option<&str>,
        is_public: bool,
        theme: Option<&str>,
    ) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("도서관 이름을 입력해주세요.".into()));
        }
        if name.chars().count() > MAX_LIBRARY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Library name must be at most {MAX_LIBRARY_NAME_LEN} characters"
            )));
        }

        let description = description.map(str::trim).filter(|d| !d.is_empty());
        if description.is_some_and(|d| d.chars().count() > MAX_LIBRARY_DESCRIPTION_LEN) {
            return Err(CoreError::Validation(format!(
                "Library description must be at most {MAX_LIBRARY_DESCRIPTION_LEN} characters"
            )));
        }

        let theme = theme.unwrap_or(DEFAULT_LIBRARY_THEME);
        if !LIBRARY_THEMES.contains(&theme) {
            return Err(CoreError::Validation(format!(
                "Invalid theme '{theme}'. Must be one of: {}",
                LIBRARY_THEMES.join(", ")
            )));
        }

        Ok(Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            is_public,
            theme: theme.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_trimmed_and_defaulted() {
        let s = LibrarySettings::validate(" 서재 ", Some("  "), true, None).unwrap();
        assert_eq!(s.name, "서재");
        assert_eq!(s.description, None);
        assert_eq!(s.theme, DEFAULT_LIBRARY_THEME);
    }

    #[test]
    fn empty_name_rejected() {
        assert!(LibrarySettings::validate("", None, false, None).is_err());
    }

    #[test]
    fn unknown_theme_rejected() {
        assert!(LibrarySettings::validate("a", None, false, Some("neon")).is_err());
        assert!(LibrarySettings::validate("a", None, false, Some("vintage")).is_ok());
    }
}
