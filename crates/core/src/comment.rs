//! Comment content rules. Comments are immutable once written.

use crate::error::CoreError;

/// Maximum comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 2000;

/// Display name used when the author profile has no name.
pub const ANONYMOUS_AUTHOR: &str = "익명";

/// Trim and validate comment content.
pub fn validate_comment(content: &str) -> Result<String, CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("댓글 내용을 입력해주세요.".into()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comment_rejected() {
        assert!(validate_comment(" \n\t").is_err());
    }

    #[test]
    fn comment_trimmed() {
        assert_eq!(validate_comment("  재밌어요 ").unwrap(), "재밌어요");
    }

    #[test]
    fn length_counted_in_characters() {
        assert!(validate_comment(&"가".repeat(MAX_COMMENT_LEN)).is_ok());
        assert!(validate_comment(&"가".repeat(MAX_COMMENT_LEN + 1)).is_err());
    }
}
