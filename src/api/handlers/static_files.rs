use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::AppState;

/// Serve blob content by storage path.
/// Route: GET /static/*path
pub async fn serve_static(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(path): axum::extract::Path<String>,
) -> Result<Response, ApiError> {
    if path.split('/').any(|segment| segment == "..") {
        return Err(ApiError::bad_request("Invalid path"));
    }

    let data = state.object_store.get(&path).await.map_err(|e| match e {
        crate::object_store::ObjectStoreError::NotFound(_) => {
            ApiError::not_found("Image not found")
        }
        _ => ApiError::internal(format!("Failed to retrieve image: {e}")),
    })?;

    let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
    let byte_size = data.len() as u64;

    // Build response with appropriate headers
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        mime_type
            .as_ref()
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));

    // Cache for 1 hour (blob keys are never rewritten in place)
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}
