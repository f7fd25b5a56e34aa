use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::model::Bookmark;
use crate::repository::BookmarkRepository;

pub trait BookmarkService: Send + Sync + 'static {
    /// Assigns id and timestamps on `bookmark`, validates it and stores it.
    fn create(&self, bookmark: &mut Bookmark) -> Result<(), ServiceError>;
    fn get_by_id(&self, id: &str) -> Result<Arc<Bookmark>, ServiceError>;
    fn list(&self) -> Result<Vec<Arc<Bookmark>>, ServiceError>;
    fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

pub struct DefaultBookmarkService<R> {
    repo: R,
}

impl<R: BookmarkRepository> DefaultBookmarkService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: BookmarkRepository> BookmarkService for DefaultBookmarkService<R> {
    fn create(&self, bookmark: &mut Bookmark) -> Result<(), ServiceError> {
        const OP: &str = "service.Create";

        let now = Utc::now();
        bookmark.id = Uuid::new_v4().to_string();
        bookmark.created_at = now;
        bookmark.updated_at = now;

        bookmark
            .validate()
            .map_err(|source| ServiceError::Validation { op: OP, source })?;

        self.repo
            .create(Arc::new(bookmark.clone()))
            .map_err(|source| ServiceError::Save { op: OP, source })?;

        tracing::debug!(id = %bookmark.id, "bookmark created");
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Arc<Bookmark>, ServiceError> {
        const OP: &str = "service.GetByID";

        if id.is_empty() {
            return Err(ServiceError::InvalidArgument { op: OP });
        }

        self.repo
            .get_by_id(id)
            .map_err(|source| ServiceError::Repository { op: OP, source })
    }

    fn list(&self) -> Result<Vec<Arc<Bookmark>>, ServiceError> {
        self.repo
            .get_all()
            .map_err(|source| ServiceError::Repository { op: "service.List", source })
    }

    fn delete(&self, id: &str) -> Result<(), ServiceError> {
        const OP: &str = "service.Delete";

        if id.is_empty() {
            return Err(ServiceError::InvalidArgument { op: OP });
        }

        self.repo
            .delete(id)
            .map_err(|source| ServiceError::Repository { op: OP, source })?;

        tracing::debug!(id = %id, "bookmark deleted");
        Ok(())
    }
}
