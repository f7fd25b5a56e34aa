use axum::http::Uri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const MIN_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(
        default,
        serialize_with = "serialize_tags",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Builds an unsaved bookmark. The id and timestamps are assigned by the
    /// service on create.
    pub fn new(url: &str, title: &str, description: &str, tags: Vec<String>) -> Self {
        Bookmark {
            url: url.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            tags,
            ..Default::default()
        }
    }

    /// Title is checked before the URL, so a short title is reported even
    /// when the URL is also bad.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            return Err(ValidationError::TitleTooShort);
        }

        if !is_absolute_uri(&self.url) {
            return Err(ValidationError::InvalidUrl);
        }

        Ok(())
    }
}

fn is_absolute_uri(raw: &str) -> bool {
    match raw.parse::<Uri>() {
        Ok(uri) => uri.scheme().is_some() && uri.host().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

// empty tags go out as `null`
fn serialize_tags<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    if tags.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.collect_seq(tags)
    }
}

fn deserialize_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
