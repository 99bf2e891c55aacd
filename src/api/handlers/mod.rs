mod admin;
mod auth;
mod content;
mod reviews;
mod static_files;

use axum::extract::multipart::Field;
use bytes::Bytes;
use serde::Deserialize;

use crate::api::response::ApiError;
use crate::media::MediaError;
use crate::storage::models::ValidationError;
use crate::storage::DatabaseError;

pub use admin::{admin_purge, health};
pub use auth::login;
pub use content::{
    create_achievement, create_slide, delete_achievement, delete_slide, get_profile,
    list_achievements, list_slides, update_achievement, update_profile,
};
pub use reviews::{
    approve_review, decline_review, delete_approved_review, list_approved_reviews,
    list_pending_reviews, list_public_reviews, submit_review, toggle_review_visibility,
};
pub use static_files::serve_static;

/// Confirmation guard for destructive admin actions. The frontend shows a
/// blocking confirm prompt; the API refuses the action unless it was taken.
#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

fn require_confirmed(params: &ConfirmParams, action: &str) -> Result<(), ApiError> {
    if params.confirm {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "{action} requires explicit confirmation -- pass confirm=true"
        )))
    }
}

/// Map a DatabaseError to an ApiError
fn store_error(e: DatabaseError) -> ApiError {
    ApiError::internal(format!("Document store unavailable: {e}"))
}

/// Map a MediaError to an ApiError
fn media_error(e: MediaError) -> ApiError {
    match e {
        MediaError::NotAnImage(_) => ApiError::bad_request(e.to_string()),
        MediaError::Upload(_) => ApiError::internal(e.to_string()),
    }
}

fn validation_error(e: ValidationError) -> ApiError {
    ApiError::bad_request(e.to_string())
}

/// An image part read out of a multipart request
struct UploadedImage {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_image_field(
    field: Field<'_>,
    max_upload_size: u64,
) -> Result<UploadedImage, ApiError> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(|s| s.to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

    if data.len() as u64 > max_upload_size {
        return Err(ApiError::payload_too_large(format!(
            "File exceeds maximum upload size of {max_upload_size} bytes"
        )));
    }

    Ok(UploadedImage {
        filename,
        content_type,
        data,
    })
}

async fn text_field(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid {name}: {e}")))
}
