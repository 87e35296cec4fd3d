use crate::error::ValidationError;
use crate::models::SourceFile;

/// True when the declared MIME type is an image type (`image/*`).
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some((top, sub)) => top == "image" && !sub.is_empty(),
        None => false,
    }
}

/// Validate a selected file before it becomes an upload job.
pub fn validate_image(file: &SourceFile) -> Result<(), ValidationError> {
    if !is_image_content_type(&file.content_type) {
        return Err(ValidationError::UnsupportedType(file.content_type.clone()));
    }

    if file.data.is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    Ok(())
}
