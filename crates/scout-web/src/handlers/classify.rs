//! Image classification proxy.
//!
//! Accepts a multipart upload with a `file` part, checks the image type
//! before anything leaves the process, and relays it to the classification
//! service.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use scout_common::{upload::is_allowed_image_type, Identification, ImageUpload, UploadError};
use crate::error::ApiError;
use crate::state::SharedState;

/// POST /api/classify - identify the bird in an uploaded photo
pub async fn classify(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Identification>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let upload = read_upload(&mut multipart, state.max_upload_bytes).await?;

    let file_name = upload.file_name().to_string();
    let result = state.classifier.classify(upload).await.map_err(|e| {
        tracing::error!(
            endpoint = state.classifier.endpoint(),
            file = %file_name,
            error = %e,
            "classification upstream failed"
        );
        ApiError::ClassificationFailed
    })?;

    Ok(Json(Identification::from(result)))
}

async fn read_upload(multipart: &mut Multipart, limit: usize) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        if field.name() == Some("file") {
            return read_file_field(field, limit).await;
        }
    }
    Err(ApiError::BadRequest("missing `file` field".to_string()))
}

async fn read_file_field(field: Field<'_>, limit: usize) -> Result<ImageUpload, ApiError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().unwrap_or_default().trim().to_ascii_lowercase();

    // Reject before reading the body.
    if !is_allowed_image_type(&content_type) {
        tracing::debug!(file = %file_name, content_type = %content_type, "rejected upload type");
        return Err(UploadError::UnsupportedType(content_type).into());
    }

    let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
    if bytes.len() > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }
    Ok(ImageUpload::new(file_name, &content_type, bytes.to_vec())?)
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
