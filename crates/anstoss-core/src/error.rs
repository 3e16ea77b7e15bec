use std::path::PathBuf;
use thiserror::Error;

/// Fehler beim Lesen oder Schreiben des persistierten Zustands.
///
/// Der Store versucht nichts erneut; die Retry-Strategie liegt beim Aufrufer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt record in {} at line {line}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Duplicate suggestion id: {id}")]
    DuplicateId { id: String },
    #[error("Weight {weight} of suggestion {id} is outside [-1.0, 1.0]")]
    WeightOutOfBounds { id: String, weight: f64 },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
