use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use crate::error::RepositoryError;
use crate::model::Bookmark;

pub trait BookmarkRepository: Send + Sync + 'static {
    /// Inserts a bookmark. Fails with `AlreadyExists` if the id is taken.
    fn create(&self, bookmark: Arc<Bookmark>) -> Result<(), RepositoryError>;

    /// Returns the stored bookmark itself, not a copy.
    fn get_by_id(&self, id: &str) -> Result<Arc<Bookmark>, RepositoryError>;

    /// Order is unspecified.
    fn get_all(&self) -> Result<Vec<Arc<Bookmark>>, RepositoryError>;

    fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

/// Volatile store keyed by bookmark id. One lock guards the whole map.
#[derive(Default)]
pub struct InMemoryBookmarkRepository {
    bookmarks: RwLock<HashMap<String, Arc<Bookmark>>>,
}

impl InMemoryBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarkRepository for InMemoryBookmarkRepository {
    fn create(&self, bookmark: Arc<Bookmark>) -> Result<(), RepositoryError> {
        let mut bookmarks = self
            .bookmarks
            .write()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;

        match bookmarks.entry(bookmark.id.clone()) {
            Entry::Occupied(entry) => Err(RepositoryError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(bookmark);
                Ok(())
            }
        }
    }

    fn get_by_id(&self, id: &str) -> Result<Arc<Bookmark>, RepositoryError> {
        let bookmarks = self
            .bookmarks
            .read()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;

        bookmarks.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    fn get_all(&self) -> Result<Vec<Arc<Bookmark>>, RepositoryError> {
        let bookmarks = self
            .bookmarks
            .read()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;

        Ok(bookmarks.values().cloned().collect())
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut bookmarks = self
            .bookmarks
            .write()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;

        bookmarks.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::thread;

    fn bookmark(id: &str, url: &str, title: &str) -> Arc<Bookmark> {
        Arc::new(Bookmark {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ..Default::default()
        })
    }

    fn repo_with(bookmarks: &[Arc<Bookmark>]) -> InMemoryBookmarkRepository {
        let repo = InMemoryBookmarkRepository::new();
        for b in bookmarks {
            repo.create(b.clone()).unwrap();
        }
        repo
    }

    #[test]
    fn test_create() {
        let repo = repo_with(&[]);
        let b = bookmark("new-id", "https://example.com/new", "New Bookmark");

        repo.create(b.clone()).unwrap();

        let found = repo.get_by_id("new-id").unwrap();
        assert_eq!(found.id, "new-id");
    }

    #[test]
    fn test_create_after_one_exists() {
        let repo = repo_with(&[bookmark("first-id", "https://example.com/first", "First")]);

        repo.create(bookmark("second-id", "https://example.com/second", "Second"))
            .unwrap();

        assert_eq!(repo.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_create_duplicate_keeps_existing_entry() {
        let existing = bookmark("existing-id", "https://example.com/existing", "Existing");
        let repo = repo_with(&[existing.clone()]);

        let err = repo
            .create(bookmark("existing-id", "https://example.com/duplicate", "Duplicate"))
            .unwrap_err();

        assert_eq!(err, RepositoryError::AlreadyExists("existing-id".to_string()));
        assert_eq!(
            err.to_string(),
            "bookmark with ID existing-id already exists"
        );
        let stored = repo.get_by_id("existing-id").unwrap();
        assert!(Arc::ptr_eq(&stored, &existing));
        assert_eq!(stored.title, "Existing");
    }

    #[test]
    fn test_get_by_id() {
        let b1 = bookmark("id-1", "https://example.com/1", "Bookmark 1");
        let b2 = bookmark("id-2", "https://example.com/2", "Bookmark 2");

        let repo = repo_with(&[b1.clone(), b2]);
        let got = repo.get_by_id("id-1").unwrap();
        assert!(Arc::ptr_eq(&got, &b1));

        let repo = repo_with(&[b1]);
        assert_eq!(
            repo.get_by_id("non-existent-id").unwrap_err(),
            RepositoryError::NotFound
        );

        let repo = repo_with(&[]);
        assert_eq!(repo.get_by_id("any-id").unwrap_err(), RepositoryError::NotFound);
    }

    #[test]
    fn test_get_all() {
        let b1 = bookmark("id-1", "url1", "title1");
        let b2 = bookmark("id-2", "url2", "title2");
        let b3 = bookmark("id-3", "url3", "title3");

        for (pre, want) in [
            (vec![], 0),
            (vec![b1.clone()], 1),
            (vec![b1.clone(), b2.clone(), b3.clone()], 3),
        ] {
            let repo = repo_with(&pre);
            let got = repo.get_all().unwrap();
            assert_eq!(got.len(), want);

            let got_ids: HashSet<_> = got.iter().map(|b| b.id.clone()).collect();
            let want_ids: HashSet<_> = pre.iter().map(|b| b.id.clone()).collect();
            assert_eq!(got_ids, want_ids);
        }
    }

    #[test]
    fn test_delete() {
        let b1 = bookmark("id-1", "https://example.com/1", "Bookmark 1");
        let b2 = bookmark("id-2", "https://example.com/2", "Bookmark 2");

        let cases = [
            ("delete existing", vec![b1.clone(), b2.clone()], "id-1", Ok(()), 1),
            ("delete missing", vec![b1.clone()], "non-existent-id", Err(RepositoryError::NotFound), 1),
            ("delete from empty", vec![], "any-id", Err(RepositoryError::NotFound), 0),
            ("delete last", vec![b1.clone()], "id-1", Ok(()), 0),
        ];

        for (name, pre, id, want, remaining) in cases {
            let repo = repo_with(&pre);
            let got = repo.delete(id);
            assert_eq!(got, want, "case: {name}");

            if want.is_ok() {
                assert_eq!(repo.get_by_id(id).unwrap_err(), RepositoryError::NotFound);
            }
            assert_eq!(repo.get_all().unwrap().len(), remaining, "case: {name}");
        }
    }

    #[test]
    fn test_concurrent_creates_and_deletes() {
        let repo = Arc::new(InMemoryBookmarkRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let repo = repo.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let id = format!("{worker}-{i}");
                        repo.create(bookmark(&id, "https://example.com", "title"))
                            .unwrap();
                        if i % 2 == 0 {
                            repo.delete(&id).unwrap();
                        }
                        repo.get_all().unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.get_all().unwrap().len(), 8 * 25);
    }
}
