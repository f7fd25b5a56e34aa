use crate::model::Bookmark;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CreateBookmarkRequest {
    pub fn into_bookmark(self) -> Bookmark {
        Bookmark::new(
            &self.url,
            &self.title,
            self.description.as_deref().unwrap_or_default(),
            self.tags.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        ErrorResponse {
            error: msg.to_owned(),
        }
    }
}
