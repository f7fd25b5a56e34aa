use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be at least 3 characters")]
    TitleTooShort,
    #[error("the provided URL is invalid")]
    InvalidUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("bookmark not found")]
    NotFound,
    #[error("bookmark with ID {0} already exists")]
    AlreadyExists(String),
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Errors returned by the service layer. `op` is the call-site context,
/// e.g. `service.Create`; the cause is only reachable through `source()`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{op}")]
    Validation {
        op: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("{op}")]
    Repository {
        op: &'static str,
        #[source]
        source: RepositoryError,
    },
    #[error("{op}: failed to save")]
    Save {
        op: &'static str,
        #[source]
        source: RepositoryError,
    },
    #[error("{op}: id is required")]
    InvalidArgument { op: &'static str },
}

impl ServiceError {
    pub fn op(&self) -> &'static str {
        use ServiceError::*;
        match self {
            Validation { op, .. } | Repository { op, .. } | Save { op, .. } | InvalidArgument { op } => {
                *op
            }
        }
    }

    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            ServiceError::Validation { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn repository(&self) -> Option<&RepositoryError> {
        match self {
            ServiceError::Repository { source, .. } | ServiceError::Save { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.repository(), Some(RepositoryError::NotFound))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ServiceError::InvalidArgument { .. })
    }
}
