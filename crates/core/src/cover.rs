//! Cover image validation and object key naming.
//!
//! Everything here runs before the storage backend is touched: a rejected
//! file never reaches an upload call.

use crate::error::CoreError;
use crate::types::DbId;

/// Bucket that holds work covers.
pub const COVER_BUCKET: &str = "covers";

/// Largest accepted cover file.
pub const MAX_COVER_BYTES: usize = 5 * 1024 * 1024;

pub const COVER_TOO_LARGE_MESSAGE: &str = "파일 크기는 5MB를 초과할 수 없습니다.";
pub const COVER_NOT_IMAGE_MESSAGE: &str = "이미지 파일만 업로드 가능합니다.";

/// A cover upload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCover {
    pub content_type: String,
    pub extension: String,
}

/// Reject oversized files, declared non-images, and bytes that do not
/// decode as a supported image format.
pub fn validate_cover(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ValidatedCover, CoreError> {
    validate_cover_size(bytes.len())?;

    let content_type = content_type.unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(CoreError::Validation(COVER_NOT_IMAGE_MESSAGE.into()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation(COVER_NOT_IMAGE_MESSAGE.into()))?;

    let extension = file_name
        .and_then(extension_of)
        .or_else(|| format.extensions_str().first().map(|e| e.to_string()))
        .unwrap_or_else(|| "img".to_string());

    Ok(ValidatedCover {
        content_type: content_type.to_string(),
        extension,
    })
}

/// Size check alone, usable before the body is fully buffered.
pub fn validate_cover_size(len: usize) -> Result<(), CoreError> {
    if len > MAX_COVER_BYTES {
        return Err(CoreError::Validation(COVER_TOO_LARGE_MESSAGE.into()));
    }
    Ok(())
}

/// Object key for a new cover: `{work_id}_{unix_millis}.{ext}`.
pub fn cover_key(work_id: DbId, unix_millis: i64, extension: &str) -> String {
    format!("{work_id}_{unix_millis}.{extension}")
}

/// Key of a stored cover, taken from the last path segment of its public URL.
pub fn key_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|k| !k.is_empty())
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.trim();
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn png_accepted_with_name_extension() {
        let v = validate_cover(Some("Cover.PNG"), Some("image/png"), PNG_HEADER).unwrap();
        assert_eq!(v.extension, "png");
        assert_eq!(v.content_type, "image/png");
    }

    #[test]
    fn extension_falls_back_to_sniffed_format() {
        let v = validate_cover(Some("cover"), Some("image/png"), PNG_HEADER).unwrap();
        assert_eq!(v.extension, "png");
    }

    #[test]
    fn oversized_rejected() {
        let big = vec![0u8; MAX_COVER_BYTES + 1];
        assert_matches!(
            validate_cover(Some("a.png"), Some("image/png"), &big),
            Err(CoreError::Validation(m)) if m == COVER_TOO_LARGE_MESSAGE
        );
    }

    #[test]
    fn exactly_five_megabytes_passes_size_check() {
        assert!(validate_cover_size(MAX_COVER_BYTES).is_ok());
    }

    #[test]
    fn non_image_content_type_rejected() {
        assert_matches!(
            validate_cover(Some("a.pdf"), Some("application/pdf"), PNG_HEADER),
            Err(CoreError::Validation(m)) if m == COVER_NOT_IMAGE_MESSAGE
        );
        assert!(validate_cover(Some("a.png"), None, PNG_HEADER).is_err());
    }

    #[test]
    fn bytes_that_are_not_an_image_rejected() {
        assert!(validate_cover(Some("a.png"), Some("image/png"), b"hello world").is_err());
    }

    #[test]
    fn key_uses_work_id_and_millis() {
        assert_eq!(cover_key(12, 1_700_000_000_000, "jpg"), "12_1700000000000.jpg");
    }

    #[test]
    fn key_from_public_url() {
        assert_eq!(
            key_from_url("http://localhost:3000/storage/covers/12_1.png?v=2"),
            Some("12_1.png")
        );
        assert_eq!(key_from_url("http://host/storage/covers/"), None);
    }
}
