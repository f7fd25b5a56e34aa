use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::CreateBookmarkRequest;
use crate::model::Bookmark;
use crate::service::BookmarkService;
use crate::{bad_request, not_found, server_error, unpack_error};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn BookmarkService>,
}

impl AppState {
    pub fn new(service: Arc<dyn BookmarkService>) -> Self {
        AppState { service }
    }
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Response {
    let bookmarks = match state.service.list() {
        Ok(bookmarks) => bookmarks,
        Err(e) => {
            let msg = unpack_error(&e);
            tracing::error!(error = %msg, "failed to list bookmarks");
            return server_error(&msg);
        }
    };

    let body: Vec<&Bookmark> = bookmarks.iter().map(|b| b.as_ref()).collect();
    (StatusCode::OK, Json(body)).into_response()
}

// The body is decoded whatever the Content-Type header says.
pub async fn create_bookmark(State(state): State<AppState>, body: Bytes) -> Response {
    let input = match serde_json::from_slice::<CreateBookmarkRequest>(&body) {
        Ok(input) => input,
        Err(e) => {
            tracing::info!(error = %e, "rejected create bookmark request body");
            return bad_request("Invalid request body");
        }
    };

    let mut bookmark = input.into_bookmark();
    if let Err(e) = state.service.create(&mut bookmark) {
        let msg = unpack_error(&e);
        tracing::error!(error = %msg, "failed to create bookmark");
        return server_error(&msg);
    }

    tracing::info!(id = %bookmark.id, "created bookmark");
    (StatusCode::CREATED, Json(bookmark)).into_response()
}

// Any lookup failure is reported as 404.
pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.get_by_id(&id) {
        Ok(bookmark) => (StatusCode::OK, Json(bookmark.as_ref())).into_response(),
        Err(e) => {
            tracing::info!(error = %unpack_error(&e), id = %id, "failed to get bookmark");
            not_found("Bookmark not found")
        }
    }
}

// Any failure, including an unknown id, is reported as 500.
pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Err(e) = state.service.delete(&id) {
        tracing::error!(error = %unpack_error(&e), id = %id, "failed to delete bookmark");
        return server_error("Delete failed");
    }

    tracing::info!(id = %id, "deleted bookmark");
    StatusCode::NO_CONTENT.into_response()
}
