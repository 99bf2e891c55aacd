use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::{
    media_error, read_image_field, require_confirmed, store_error, text_field, validation_error,
    ConfirmParams, UploadedImage,
};
use crate::api::response::{ApiError, AppQuery, JSend};
use crate::auth::AdminUser;
use crate::media;
use crate::storage::models::{
    cap_photos, sanitize_quote, validate_quote, validate_rating, Review, ReviewStatus,
    MAX_REVIEW_PHOTOS,
};
use crate::AppState;

/// Used when a reviewer submits no profile image
const DEFAULT_PROFILE_IMAGE: &str = "https://via.placeholder.com/50";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub name: String,
    pub title: String,
    pub quote: String,
    pub rating: u8,
    pub profile_image_url: String,
    pub photos: Vec<String>,
    pub status: ReviewStatus,
    pub is_hidden: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub review: ReviewResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Public handlers
// ============================================================================

/// Accept a review submission into the pending set.
/// All field validation happens before any upload or document write.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<JSend<SubmitReviewResponse>>, ApiError> {
    let mut name: Option<String> = None;
    let mut title: Option<String> = None;
    let mut quote: Option<String> = None;
    let mut rating: Option<String> = None;
    let mut profile_image: Option<UploadedImage> = None;
    let mut photos: Vec<UploadedImage> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => name = Some(text_field(field, "name").await?),
            "title" => title = Some(text_field(field, "title").await?),
            "quote" => quote = Some(text_field(field, "quote").await?),
            "rating" => rating = Some(text_field(field, "rating").await?),
            "profile_image" => {
                profile_image = Some(read_image_field(field, state.config.max_upload_size).await?)
            }
            "photos" => photos.push(read_image_field(field, state.config.max_upload_size).await?),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let name = name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(ApiError::bad_request("name field is required"));
    }
    let title = title.unwrap_or_default().trim().to_string();

    let quote = sanitize_quote(&quote.ok_or_else(|| ApiError::bad_request("quote field is required"))?);
    validate_quote(&quote).map_err(validation_error)?;

    let rating: u8 = rating
        .ok_or_else(|| ApiError::bad_request("rating field is required"))?
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("rating must be an integer"))?;
    validate_rating(rating).map_err(validation_error)?;

    // Photos beyond the cap are dropped, with a warning in the response
    let dropped = cap_photos(&mut photos);
    let warning = if dropped > 0 {
        tracing::warn!(dropped, "Review submission exceeded the photo cap");
        Some(format!(
            "Up to {MAX_REVIEW_PHOTOS} photos are allowed; {dropped} extra photo(s) were ignored"
        ))
    } else {
        None
    };

    let mut photo_urls = Vec::with_capacity(photos.len());
    for photo in photos {
        let stored = media::store_image(
            state.object_store.as_ref(),
            media::REVIEW_PHOTOS,
            &photo.filename,
            photo.content_type.as_deref(),
            photo.data,
        )
        .await
        .map_err(media_error)?;
        photo_urls.push(stored.url);
    }

    let profile_image_url = match profile_image {
        Some(image) => {
            media::store_image(
                state.object_store.as_ref(),
                media::PROFILE_IMAGES,
                &image.filename,
                image.content_type.as_deref(),
                image.data,
            )
            .await
            .map_err(media_error)?
            .url
        }
        None => DEFAULT_PROFILE_IMAGE.to_string(),
    };

    let review = Review {
        name,
        title,
        quote,
        rating,
        profile_image_url,
        photos: photo_urls,
        status: ReviewStatus::Pending,
        is_hidden: false,
        created_at: Utc::now(),
    };

    let id = state.db.add_pending_review(&review).map_err(store_error)?;

    tracing::debug!(review_id = %id, "Review submitted for moderation");

    Ok(JSend::success(SubmitReviewResponse {
        review: review_to_response(&id, &review),
        warning,
    }))
}

/// Approved, non-hidden reviews -- what the homepage shows.
pub async fn list_public_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<ReviewResponse>>>, ApiError> {
    let reviews = state.db.list_visible_reviews().map_err(store_error)?;
    Ok(JSend::success(
        reviews
            .iter()
            .map(|(id, r)| review_to_response(id, r))
            .collect(),
    ))
}

// ============================================================================
// Admin handlers
// ============================================================================

pub async fn list_pending_reviews(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<JSend<Vec<ReviewResponse>>>, ApiError> {
    let reviews = state.db.list_pending_reviews().map_err(store_error)?;
    Ok(JSend::success(
        reviews
            .iter()
            .map(|(id, r)| review_to_response(id, r))
            .collect(),
    ))
}

pub async fn list_approved_reviews(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<JSend<Vec<ReviewResponse>>>, ApiError> {
    let reviews = state.db.list_approved_reviews().map_err(store_error)?;
    Ok(JSend::success(
        reviews
            .iter()
            .map(|(id, r)| review_to_response(id, r))
            .collect(),
    ))
}

/// Move a pending review into the approved set, visible by default.
pub async fn approve_review(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<ConfirmParams>,
) -> Result<Json<JSend<ReviewResponse>>, ApiError> {
    require_confirmed(&params, "Approving a review")?;

    let review = state
        .db
        .approve_review(&id)
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Review not found in the pending set"))?;

    tracing::info!(review_id = %id, admin = %admin.email, "Review approved");
    Ok(JSend::success(review_to_response(&id, &review)))
}

/// Remove a pending review without approving it.
pub async fn decline_review(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<ConfirmParams>,
) -> Result<Json<JSend<()>>, ApiError> {
    require_confirmed(&params, "Declining a review")?;

    let deleted = state.db.decline_review(&id).map_err(store_error)?;
    if !deleted {
        return Err(ApiError::not_found("Review not found in the pending set"));
    }

    tracing::info!(review_id = %id, admin = %admin.email, "Review declined");
    Ok(JSend::success(()))
}

/// Flip an approved review between visible and hidden.
pub async fn toggle_review_visibility(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<ReviewResponse>>, ApiError> {
    let current = state
        .db
        .get_approved_review(&id)
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Review not found in the approved set"))?;

    let review = state
        .db
        .set_review_hidden(&id, !current.is_hidden)
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Review not found in the approved set"))?;

    tracing::info!(
        review_id = %id,
        hidden = review.is_hidden,
        admin = %admin.email,
        "Review visibility toggled"
    );
    Ok(JSend::success(review_to_response(&id, &review)))
}

/// Permanently delete a review from the approved set.
pub async fn delete_approved_review(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<ConfirmParams>,
) -> Result<Json<JSend<()>>, ApiError> {
    require_confirmed(&params, "Deleting an approved review")?;

    let deleted = state.db.delete_approved_review(&id).map_err(store_error)?;
    if !deleted {
        return Err(ApiError::not_found("Review not found in the approved set"));
    }

    tracing::info!(review_id = %id, admin = %admin.email, "Approved review deleted");
    Ok(JSend::success(()))
}

// ============================================================================
// Helpers
// ============================================================================

fn review_to_response(id: &str, review: &Review) -> ReviewResponse {
    ReviewResponse {
        id: id.to_string(),
        name: review.name.clone(),
        title: review.title.clone(),
        quote: review.quote.clone(),
        rating: review.rating,
        profile_image_url: review.profile_image_url.clone(),
        photos: review.photos.clone(),
        status: review.status,
        is_hidden: review.is_hidden,
        created_at: review.created_at.to_rfc3339(),
    }
}
