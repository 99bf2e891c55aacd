use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    let mut router = Router::new()
        // Public content
        .route("/reviews", get(handlers::list_public_reviews))
        .route(
            "/reviews",
            post(handlers::submit_review).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/achievements", get(handlers::list_achievements))
        .route("/profile", get(handlers::get_profile))
        .route("/slides", get(handlers::list_slides))
        // Blob content (public URLs of the local backend resolve here)
        .route("/static/*path", get(handlers::serve_static))
        // Admin session
        .route("/admin/login", post(handlers::login))
        // Review moderation
        .route("/admin/reviews/pending", get(handlers::list_pending_reviews))
        .route(
            "/admin/reviews/approved",
            get(handlers::list_approved_reviews),
        )
        .route(
            "/admin/reviews/pending/:id/approve",
            post(handlers::approve_review),
        )
        .route(
            "/admin/reviews/pending/:id",
            delete(handlers::decline_review),
        )
        .route(
            "/admin/reviews/approved/:id/visibility",
            post(handlers::toggle_review_visibility),
        )
        .route(
            "/admin/reviews/approved/:id",
            delete(handlers::delete_approved_review),
        )
        // Media management
        .route(
            "/admin/achievements",
            post(handlers::create_achievement).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/admin/achievements/:id",
            put(handlers::update_achievement).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/admin/achievements/:id",
            delete(handlers::delete_achievement),
        )
        .route(
            "/admin/profile",
            put(handlers::update_profile).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/admin/slides",
            post(handlers::create_slide).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/slides", delete(handlers::delete_slide))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled -- purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
