//! Validation helpers for ingestion

use crate::domain::DomainError;

/// Maximum length for an uploaded filename
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Fallback name for uploads that carry no filename
pub const DEFAULT_UPLOAD_FILENAME: &str = "upload.txt";

/// Validate the filename supplied alongside a raw text body.
///
/// Returns the trimmed filename.
pub fn validate_text_filename(filename: Option<&str>) -> Result<String, DomainError> {
    let trimmed = filename.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Err(DomainError::bad_request("filename is required"));
    }

    if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        return Err(DomainError::bad_request(format!(
            "filename cannot exceed {} characters",
            MAX_FILENAME_LENGTH
        )));
    }

    if !trimmed.to_ascii_lowercase().ends_with(".txt") {
        return Err(DomainError::bad_request("filename must end with .txt"));
    }

    Ok(trimmed.to_string())
}

/// Guess the MIME type of a file from its name
pub fn detect_mime_from_filename(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Reject raw text bodies that carry no content
pub fn validate_text_body(body: &str) -> Result<(), DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::bad_request("text body must not be blank"));
    }

    Ok(())
}
