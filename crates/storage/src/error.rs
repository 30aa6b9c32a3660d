use std::fmt;

use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("{kind} '{name}' not found")]
    ReferenceNotFound { kind: ReferenceKind, name: String },

    #[error("An athlete with {key} {value} already exists")]
    DuplicateKey { key: UniqueKey, value: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Reference tables an athlete points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Category,
    TrainingCenter,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "Category"),
            Self::TrainingCenter => write!(f, "Training center"),
        }
    }
}

/// Unique keys of the athletes table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    Cpf,
    PublicId,
    Other(String),
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpf => write!(f, "cpf"),
            Self::PublicId => write!(f, "id"),
            Self::Other(constraint) => write!(f, "{}", constraint),
        }
    }
}

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        self.has_sqlstate(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.has_sqlstate(FOREIGN_KEY_VIOLATION)
    }

    /// Name of the violated constraint, when the database reported one
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.constraint(),
            _ => None,
        }
    }

    fn has_sqlstate(&self, code: &str) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(code)
        )
    }
}
