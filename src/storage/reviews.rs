use serde_json::Value;

use super::db::{Database, DatabaseError};
use super::models::Review;
use super::tables::{APPROVED_REVIEWS, PENDING_REVIEWS};

impl Database {
    // ========================================================================
    // Review moderation operations
    // ========================================================================

    /// Store a newly submitted review in the pending set
    pub fn add_pending_review(&self, review: &Review) -> Result<String, DatabaseError> {
        self.add_document(PENDING_REVIEWS, review)
    }

    pub fn get_pending_review(&self, id: &str) -> Result<Option<Review>, DatabaseError> {
        self.get_document(PENDING_REVIEWS, id)
    }

    pub fn get_approved_review(&self, id: &str) -> Result<Option<Review>, DatabaseError> {
        self.get_document(APPROVED_REVIEWS, id)
    }

    pub fn list_pending_reviews(&self) -> Result<Vec<(String, Review)>, DatabaseError> {
        self.list_documents(PENDING_REVIEWS)
    }

    pub fn list_approved_reviews(&self) -> Result<Vec<(String, Review)>, DatabaseError> {
        self.list_documents(APPROVED_REVIEWS)
    }

    /// Approved reviews that are not hidden -- the public listing
    pub fn list_visible_reviews(&self) -> Result<Vec<(String, Review)>, DatabaseError> {
        let approved = self.list_approved_reviews()?;
        Ok(approved.into_iter().filter(|(_, r)| !r.is_hidden).collect())
    }

    /// Move a review from the pending set to the approved set, marking it
    /// approved and visible. The move is a single transaction: the review is
    /// never present in both sets, even across a crash.
    /// Returns None when no pending review has the given id.
    pub fn approve_review(&self, id: &str) -> Result<Option<Review>, DatabaseError> {
        let moved = self.move_document(PENDING_REVIEWS, APPROVED_REVIEWS, id, |mut doc| {
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("status".to_string(), Value::from("approved"));
                obj.insert("is_hidden".to_string(), Value::from(false));
            }
            doc
        })?;

        match moved {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Remove a review from the pending set without approving it
    pub fn decline_review(&self, id: &str) -> Result<bool, DatabaseError> {
        self.delete_document(PENDING_REVIEWS, id)
    }

    /// Flip visibility of an approved review via a merge-write.
    /// Returns the updated review, or None when it does not exist.
    pub fn set_review_hidden(
        &self,
        id: &str,
        hidden: bool,
    ) -> Result<Option<Review>, DatabaseError> {
        let mut fields = serde_json::Map::new();
        fields.insert("is_hidden".to_string(), Value::from(hidden));

        if !self.merge_document(APPROVED_REVIEWS, id, &fields)? {
            return Ok(None);
        }
        self.get_approved_review(id)
    }

    /// Permanently remove a review from the approved set
    pub fn delete_approved_review(&self, id: &str) -> Result<bool, DatabaseError> {
        self.delete_document(APPROVED_REVIEWS, id)
    }
}
