//! portfolio-backend - Content and review management API for a personal portfolio site
//!
//! This crate provides the admin-managed backend behind a portfolio frontend:
//! - Review moderation (pending -> approved, hide/show, decline/delete)
//! - Media-backed content management (achievements, profile, slideshow)
//! - Swappable object storage backends (local filesystem, GCS)
//! - redb embedded database for documents (ACID, MVCC, crash-safe)
//! - Token-gated admin REST API with multipart upload support

pub mod api;
pub mod auth;
pub mod config;
pub mod media;
pub mod object_store;
pub mod storage;

use std::sync::Arc;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub object_store: Arc<dyn object_store::ObjectStore>,
}
