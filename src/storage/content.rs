use serde_json::Value;

use super::db::{Database, DatabaseError};
use super::models::{Achievement, ImageRef, Profile, SlideshowDoc};
use super::tables::{ACHIEVEMENTS, MAIN_PROFILE, MAIN_SLIDES, PROFILE_SECTION, SLIDESHOW_MAIN};

impl Database {
    // ========================================================================
    // Achievement operations
    // ========================================================================

    pub fn add_achievement(&self, achievement: &Achievement) -> Result<String, DatabaseError> {
        self.add_document(ACHIEVEMENTS, achievement)
    }

    pub fn get_achievement(&self, id: &str) -> Result<Option<Achievement>, DatabaseError> {
        self.get_document(ACHIEVEMENTS, id)
    }

    pub fn list_achievements(&self) -> Result<Vec<(String, Achievement)>, DatabaseError> {
        self.list_documents(ACHIEVEMENTS)
    }

    /// Merge-update title and description and, when the image was replaced,
    /// the image reference. Returns false when the achievement is absent.
    pub fn update_achievement(
        &self,
        id: &str,
        title: &str,
        description: &str,
        image: Option<&ImageRef>,
    ) -> Result<bool, DatabaseError> {
        let mut fields = serde_json::Map::new();
        fields.insert("title".to_string(), Value::from(title));
        fields.insert("description".to_string(), Value::from(description));
        if let Some(image) = image {
            fields.insert("image".to_string(), serde_json::to_value(image)?);
        }
        self.merge_document(ACHIEVEMENTS, id, &fields)
    }

    pub fn delete_achievement(&self, id: &str) -> Result<bool, DatabaseError> {
        self.delete_document(ACHIEVEMENTS, id)
    }

    // ========================================================================
    // Profile operations
    // ========================================================================

    pub fn get_profile(&self) -> Result<Option<Profile>, DatabaseError> {
        self.get_document(PROFILE_SECTION, MAIN_PROFILE)
    }

    /// Merge the full profile into the seeded singleton document
    pub fn update_profile(&self, profile: &Profile) -> Result<bool, DatabaseError> {
        let fields = match serde_json::to_value(profile)? {
            Value::Object(map) => map,
            _ => return Ok(false),
        };
        self.merge_document(PROFILE_SECTION, MAIN_PROFILE, &fields)
    }

    // ========================================================================
    // Slideshow operations
    // ========================================================================

    pub fn list_slides(&self) -> Result<Vec<ImageRef>, DatabaseError> {
        let doc: Option<SlideshowDoc> = self.get_document(SLIDESHOW_MAIN, MAIN_SLIDES)?;
        Ok(doc.map(|d| d.slides).unwrap_or_default())
    }

    pub fn add_slide(&self, slide: &ImageRef) -> Result<bool, DatabaseError> {
        let value = serde_json::to_value(slide)?;
        self.add_to_set(SLIDESHOW_MAIN, MAIN_SLIDES, "slides", &value)
    }

    /// Removal matches the stored entry by full structural equality
    pub fn remove_slide(&self, slide: &ImageRef) -> Result<bool, DatabaseError> {
        let value = serde_json::to_value(slide)?;
        self.remove_from_set(SLIDESHOW_MAIN, MAIN_SLIDES, "slides", &value)
    }
}
