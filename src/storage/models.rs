use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on review quote length, in characters
pub const MAX_QUOTE_CHARS: usize = 320;

/// Upper bound on photos attached to one review
pub const MAX_REVIEW_PHOTOS: usize = 3;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Upper bound on achievement description length, in characters
pub const MAX_ACHIEVEMENT_DESCRIPTION_CHARS: usize = 1000;

/// Upper bound on the combined word count of the profile paragraphs
pub const MAX_PROFILE_WORDS: usize = 256;

/// A field-level check failed before any store call was made.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Moderation state of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Pending,
}

/// A user-submitted review. The document id is the storage key, not a field
/// of the body, so a review moves between collections without rewriting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub quote: String,
    pub rating: u8,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub status: ReviewStatus,
    /// Only meaningful once approved
    #[serde(default)]
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// Public URL plus blob storage path of an uploaded image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub image: ImageRef,
}

/// The profile singleton. Seeded empty at database open and only ever updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Ordered paragraphs
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub image: ImageRef,
}

/// The slideshow singleton: an unordered set of slide images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideshowDoc {
    #[serde(default)]
    pub slides: Vec<ImageRef>,
}

// ============================================================================
// Field validation (runs before any store or blob call)
// ============================================================================

/// Collapse line breaks to spaces; quotes are single-line by contract.
pub fn sanitize_quote(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

pub fn validate_quote(quote: &str) -> Result<(), ValidationError> {
    if quote.is_empty() {
        return Err(ValidationError("quote must not be empty".to_string()));
    }
    if quote.chars().count() > MAX_QUOTE_CHARS {
        return Err(ValidationError(format!(
            "quote exceeds the maximum length of {MAX_QUOTE_CHARS} characters"
        )));
    }
    Ok(())
}

/// Enforce the photo cap in place, returning how many entries were dropped.
pub fn cap_photos<T>(photos: &mut Vec<T>) -> usize {
    if photos.len() > MAX_REVIEW_PHOTOS {
        let dropped = photos.len() - MAX_REVIEW_PHOTOS;
        photos.truncate(MAX_REVIEW_PHOTOS);
        dropped
    } else {
        0
    }
}

pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError(format!(
            "rating must be an integer between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

pub fn validate_achievement(title: &str, description: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError("title must not be empty".to_string()));
    }
    if description.trim().is_empty() {
        return Err(ValidationError("description must not be empty".to_string()));
    }
    if description.chars().count() > MAX_ACHIEVEMENT_DESCRIPTION_CHARS {
        return Err(ValidationError(format!(
            "description exceeds the maximum length of {MAX_ACHIEVEMENT_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(())
}

/// Combined word count across profile paragraphs
pub fn profile_word_count(paragraphs: &[String]) -> usize {
    paragraphs.iter().map(|p| p.split_whitespace().count()).sum()
}

pub fn validate_profile(
    name: &str,
    title: &str,
    description: &[String],
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError("name must not be empty".to_string()));
    }
    if title.trim().is_empty() {
        return Err(ValidationError("title must not be empty".to_string()));
    }
    if !description.iter().any(|p| !p.trim().is_empty()) {
        return Err(ValidationError(
            "at least one description paragraph is required".to_string(),
        ));
    }
    let words = profile_word_count(description);
    if words > MAX_PROFILE_WORDS {
        return Err(ValidationError(format!(
            "description exceeds the {MAX_PROFILE_WORDS}-word limit by {} words",
            words - MAX_PROFILE_WORDS
        )));
    }
    Ok(())
}
