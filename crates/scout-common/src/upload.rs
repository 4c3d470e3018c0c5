//! Validated image uploads.

use thiserror::Error;

/// MIME types the classification service accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Unsupported file type. Please upload a JPEG or PNG image.")]
    UnsupportedType(String),
    #[error("Uploaded file is empty")]
    Empty,
}

/// An image that passed MIME validation and can be sent upstream.
///
/// The only constructor is [`ImageUpload::new`], so holding one means the
/// content type is one of [`ALLOWED_IMAGE_TYPES`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !is_allowed_image_type(&content_type) {
            return Err(UploadError::UnsupportedType(content_type));
        }
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        Ok(Self { file_name: file_name.into(), content_type, bytes })
    }

    pub fn file_name(&self) -> &str { &self.file_name }
    pub fn content_type(&self) -> &str { &self.content_type }

    pub fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.file_name, self.content_type, self.bytes)
    }
}

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}
