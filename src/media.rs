//! Image blob lifecycle helpers shared by the content and review workflows.
//!
//! The ordering contract lives with the callers: upload before writing the
//! referencing document, and only delete a replaced blob after the new
//! reference is durably written.

use bytes::Bytes;
use thiserror::Error;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::ImageRef;

/// Blob path prefixes (external storage layout contract)
pub const ACHIEVEMENT_PICTURES: &str = "AchievementPictures";
pub const PROFILE_IMAGES: &str = "ProfileImages";
pub const SLIDESHOW_PICTURES: &str = "SlideShowPic";
pub const REVIEW_PHOTOS: &str = "ReviewPhotos";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Unsupported upload type: {0}")]
    NotAnImage(String),
    #[error("Upload failed: {0}")]
    Upload(#[from] ObjectStoreError),
}

/// Strip anything that is not safe inside a flat storage key segment.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Collision-free storage key: `<prefix>/<uuid>_<filename>`.
/// Independent of wall-clock time, so identically-named uploads in the same
/// instant cannot collide.
pub fn blob_key(prefix: &str, filename: &str) -> String {
    format!(
        "{prefix}/{}_{}",
        uuid::Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

fn is_image(content_type: Option<&str>, filename: &str) -> bool {
    match content_type {
        Some(ct) if ct != "application/octet-stream" => ct.starts_with("image/"),
        _ => mime_guess::from_path(filename)
            .first()
            .map(|m| m.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false),
    }
}

/// Upload an image under a fresh collision-free key and return its reference.
/// The caller writes the reference into a document afterward; if that write
/// fails, it should hand the blob back to `delete_image`.
pub async fn store_image(
    store: &dyn ObjectStore,
    prefix: &str,
    filename: &str,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<ImageRef, MediaError> {
    if !is_image(content_type, filename) {
        return Err(MediaError::NotAnImage(
            content_type.unwrap_or("unknown").to_string(),
        ));
    }

    let key = blob_key(prefix, filename);
    store.put(&key, data).await?;

    Ok(ImageRef {
        url: store.public_url(&key),
        path: key,
    })
}

/// Best-effort blob removal for cleanup paths. A failed or missing delete is
/// logged and never blocks the surrounding operation.
pub async fn delete_image(store: &dyn ObjectStore, path: &str) {
    if path.is_empty() {
        return;
    }
    if let Err(e) = store.delete(path).await {
        tracing::warn!(path = %path, error = %e, "Failed to delete image from object storage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_strips_unsafe_characters() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("my photo.png"), "my_photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("   "), "upload");
    }

    #[test]
    fn blob_key_is_unique_per_call() {
        let a = blob_key(ACHIEVEMENT_PICTURES, "same.png");
        let b = blob_key(ACHIEVEMENT_PICTURES, "same.png");
        assert_ne!(a, b);
        assert!(a.starts_with("AchievementPictures/"));
        assert!(a.ends_with("_same.png"));
    }

    #[test]
    fn is_image_prefers_declared_content_type() {
        assert!(is_image(Some("image/png"), "whatever.bin"));
        assert!(!is_image(Some("text/html"), "photo.png"));
        assert!(is_image(Some("application/octet-stream"), "photo.png"));
        assert!(is_image(None, "photo.jpg"));
        assert!(!is_image(None, "notes.txt"));
    }
}
