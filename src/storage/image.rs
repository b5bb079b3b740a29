//! Featured-image validation and storage path naming.

use uuid::Uuid;

use super::StorageError;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        // WebP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn original_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Check extension, size and content of an upload; returns its MIME type.
pub fn validate(file: &ImageFile) -> Result<&'static str, StorageError> {
    if !ALLOWED_EXTENSIONS.contains(&original_extension(&file.file_name).as_str()) {
        return Err(StorageError::Rejected(
            "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.".to_string(),
        ));
    }
    if file.bytes.is_empty() {
        return Err(StorageError::Rejected("Empty file".to_string()));
    }
    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(StorageError::Rejected(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }
    detect_mime(&file.bytes).ok_or_else(|| {
        StorageError::Rejected("File content does not match an allowed image type.".to_string())
    })
}

/// `<user>/<unix millis>.<ext>`, one folder per uploading user.
pub fn object_path(user_id: Uuid, timestamp_millis: i64, mime: &str) -> String {
    format!(
        "{}/{}.{}",
        user_id,
        timestamp_millis,
        extension_for_mime(mime)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn file(name: &str, bytes: &[u8]) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_validate_accepts_png() {
        assert_eq!(validate(&file("cover.PNG", PNG)).unwrap(), "image/png");
    }

    #[test]
    fn test_validate_rejects_bad_uploads() {
        assert!(validate(&file("cover.exe", PNG)).is_err());
        assert!(validate(&file("cover.png", b"")).is_err());
        assert!(validate(&file("cover.png", b"not an image")).is_err());
        assert!(validate(&file("cover", PNG)).is_err());
    }

    #[test]
    fn test_object_path_uses_user_and_timestamp() {
        let user = Uuid::nil();
        assert_eq!(
            object_path(user, 1_700_000_000_000, "image/jpeg"),
            "00000000-0000-0000-0000-000000000000/1700000000000.jpg"
        );
    }
}
