use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{
    media_error, read_image_field, require_confirmed, store_error, text_field, validation_error,
    ConfirmParams, UploadedImage,
};
use crate::api::response::{ApiError, AppJson, AppQuery, JSend};
use crate::auth::AdminUser;
use crate::media;
use crate::storage::models::{
    validate_achievement, validate_profile, Achievement, ImageRef, Profile,
};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ImageRef,
}

// ============================================================================
// Achievements
// ============================================================================

pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<AchievementResponse>>>, ApiError> {
    Ok(JSend::success(achievements_response(&state)?))
}

/// Create an achievement with its image.
/// Phase 1 uploads the blob; phase 2 writes the document. A failed document
/// write hands the fresh blob straight back for cleanup.
pub async fn create_achievement(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<JSend<Vec<AchievementResponse>>>, ApiError> {
    let (title, description, image) = read_achievement_fields(&state, &mut multipart).await?;
    validate_achievement(&title, &description).map_err(validation_error)?;
    let image = image.ok_or_else(|| ApiError::bad_request("image field is required"))?;

    let stored = media::store_image(
        state.object_store.as_ref(),
        media::ACHIEVEMENT_PICTURES,
        &image.filename,
        image.content_type.as_deref(),
        image.data,
    )
    .await
    .map_err(media_error)?;

    let achievement = Achievement {
        title,
        description,
        image: stored.clone(),
    };

    let id = match state.db.add_achievement(&achievement) {
        Ok(id) => id,
        Err(e) => {
            media::delete_image(state.object_store.as_ref(), &stored.path).await;
            return Err(store_error(e));
        }
    };

    tracing::debug!(achievement_id = %id, admin = %admin.email, "Created achievement");
    Ok(JSend::success(achievements_response(&state)?))
}

/// Update an achievement, optionally replacing its image.
/// A replacement is uploaded first; the old blob is deleted only after the
/// document references the new one.
pub async fn update_achievement(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<JSend<Vec<AchievementResponse>>>, ApiError> {
    let (title, description, new_image) = read_achievement_fields(&state, &mut multipart).await?;
    validate_achievement(&title, &description).map_err(validation_error)?;

    let existing = state
        .db
        .get_achievement(&id)
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Achievement not found"))?;

    match new_image {
        Some(image) => {
            let stored = media::store_image(
                state.object_store.as_ref(),
                media::ACHIEVEMENT_PICTURES,
                &image.filename,
                image.content_type.as_deref(),
                image.data,
            )
            .await
            .map_err(media_error)?;

            let updated =
                match state
                    .db
                    .update_achievement(&id, &title, &description, Some(&stored))
                {
                    Ok(updated) => updated,
                    Err(e) => {
                        media::delete_image(state.object_store.as_ref(), &stored.path).await;
                        return Err(store_error(e));
                    }
                };
            if !updated {
                media::delete_image(state.object_store.as_ref(), &stored.path).await;
                return Err(ApiError::not_found("Achievement not found"));
            }

            media::delete_image(state.object_store.as_ref(), &existing.image.path).await;
        }
        None => {
            let updated = state
                .db
                .update_achievement(&id, &title, &description, None)
                .map_err(store_error)?;
            if !updated {
                return Err(ApiError::not_found("Achievement not found"));
            }
        }
    }

    tracing::debug!(achievement_id = %id, admin = %admin.email, "Updated achievement");
    Ok(JSend::success(achievements_response(&state)?))
}

/// Delete an achievement and its image blob.
/// The blob goes first; a failed blob delete never blocks document removal.
pub async fn delete_achievement(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<ConfirmParams>,
) -> Result<Json<JSend<Vec<AchievementResponse>>>, ApiError> {
    require_confirmed(&params, "Deleting an achievement")?;

    let existing = state
        .db
        .get_achievement(&id)
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Achievement not found"))?;

    media::delete_image(state.object_store.as_ref(), &existing.image.path).await;

    let deleted = state.db.delete_achievement(&id).map_err(store_error)?;
    if !deleted {
        return Err(ApiError::not_found("Achievement not found"));
    }

    tracing::debug!(achievement_id = %id, admin = %admin.email, "Deleted achievement");
    Ok(JSend::success(achievements_response(&state)?))
}

// ============================================================================
// Profile
// ============================================================================

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Profile>>, ApiError> {
    let profile = state
        .db
        .get_profile()
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(JSend::success(profile))
}

/// Update the profile singleton, optionally replacing its image.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<JSend<Profile>>, ApiError> {
    let mut name: Option<String> = None;
    let mut title: Option<String> = None;
    let mut description: Vec<String> = Vec::new();
    let mut new_image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => name = Some(text_field(field, "name").await?),
            "title" => title = Some(text_field(field, "title").await?),
            "description" => description.push(text_field(field, "description").await?),
            "image" => {
                new_image = Some(read_image_field(field, state.config.max_upload_size).await?)
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let name = name.unwrap_or_default().trim().to_string();
    let title = title.unwrap_or_default().trim().to_string();
    validate_profile(&name, &title, &description).map_err(validation_error)?;

    let existing = state
        .db
        .get_profile()
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let (image, replaced_path) = match new_image {
        Some(image) => {
            let stored = media::store_image(
                state.object_store.as_ref(),
                media::PROFILE_IMAGES,
                &image.filename,
                image.content_type.as_deref(),
                image.data,
            )
            .await
            .map_err(media_error)?;
            (stored, Some(existing.image.path.clone()))
        }
        None => (existing.image.clone(), None),
    };

    let profile = Profile {
        name,
        title,
        description,
        image: image.clone(),
    };

    let updated = match state.db.update_profile(&profile) {
        Ok(updated) => updated,
        Err(e) => {
            if replaced_path.is_some() {
                media::delete_image(state.object_store.as_ref(), &image.path).await;
            }
            return Err(store_error(e));
        }
    };
    if !updated {
        if replaced_path.is_some() {
            media::delete_image(state.object_store.as_ref(), &image.path).await;
        }
        return Err(ApiError::not_found("Profile not found"));
    }

    // The new reference is durably written; now the old blob can go
    if let Some(old_path) = replaced_path {
        media::delete_image(state.object_store.as_ref(), &old_path).await;
    }

    let profile = state
        .db
        .get_profile()
        .map_err(store_error)?
        .ok_or_else(|| ApiError::internal("Profile not found after update"))?;

    tracing::debug!(admin = %admin.email, "Updated profile");
    Ok(JSend::success(profile))
}

// ============================================================================
// Slideshow
// ============================================================================

pub async fn list_slides(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<ImageRef>>>, ApiError> {
    let slides = state.db.list_slides().map_err(store_error)?;
    Ok(JSend::success(slides))
}

/// Upload a slide image and add it to the slideshow set.
pub async fn create_slide(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<JSend<Vec<ImageRef>>>, ApiError> {
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        if field.name().unwrap_or("") == "image" {
            image = Some(read_image_field(field, state.config.max_upload_size).await?);
        }
    }

    let image = image.ok_or_else(|| ApiError::bad_request("image field is required"))?;

    let stored = media::store_image(
        state.object_store.as_ref(),
        media::SLIDESHOW_PICTURES,
        &image.filename,
        image.content_type.as_deref(),
        image.data,
    )
    .await
    .map_err(media_error)?;

    match state.db.add_slide(&stored) {
        Ok(true) => {}
        Ok(false) => {
            media::delete_image(state.object_store.as_ref(), &stored.path).await;
            return Err(ApiError::internal("Slideshow document missing"));
        }
        Err(e) => {
            media::delete_image(state.object_store.as_ref(), &stored.path).await;
            return Err(store_error(e));
        }
    }

    tracing::debug!(path = %stored.path, admin = %admin.email, "Added slide");

    let slides = state.db.list_slides().map_err(store_error)?;
    Ok(JSend::success(slides))
}

/// Remove a slide, matching the stored entry by full structural equality.
pub async fn delete_slide(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    AppQuery(params): AppQuery<ConfirmParams>,
    AppJson(slide): AppJson<ImageRef>,
) -> Result<Json<JSend<Vec<ImageRef>>>, ApiError> {
    require_confirmed(&params, "Deleting a slide")?;

    if slide.path.is_empty() {
        return Err(ApiError::bad_request("slide path is required"));
    }

    media::delete_image(state.object_store.as_ref(), &slide.path).await;

    let removed = state.db.remove_slide(&slide).map_err(store_error)?;
    if !removed {
        return Err(ApiError::not_found("Slide not found"));
    }

    tracing::debug!(path = %slide.path, admin = %admin.email, "Removed slide");

    let slides = state.db.list_slides().map_err(store_error)?;
    Ok(JSend::success(slides))
}

// ============================================================================
// Helpers
// ============================================================================

async fn read_achievement_fields(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<(String, String, Option<UploadedImage>), ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "title" => title = Some(text_field(field, "title").await?),
            "description" => description = Some(text_field(field, "description").await?),
            "image" => image = Some(read_image_field(field, state.config.max_upload_size).await?),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok((
        title.unwrap_or_default().trim().to_string(),
        description.unwrap_or_default().trim().to_string(),
        image,
    ))
}

fn achievements_response(state: &AppState) -> Result<Vec<AchievementResponse>, ApiError> {
    let achievements = state.db.list_achievements().map_err(store_error)?;
    Ok(achievements
        .into_iter()
        .map(|(id, a)| AchievementResponse {
            id,
            title: a.title,
            description: a.description,
            image: a.image,
        })
        .collect())
}
