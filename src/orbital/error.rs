use thiserror::Error;

/// The kind of entity a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Space,
    Collection,
    Link,
    OpenTab,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Space => "space",
            EntityKind::Collection => "collection",
            EntityKind::Link => "link",
            EntityKind::OpenTab => "open tab",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum OrbitalError {
    /// The operation would break a model invariant and was refused.
    #[error("Refused: {0}")]
    InvariantViolation(String),

    /// An id did not resolve to a live entity. Callers treat this as a no-op.
    #[error("Unknown {kind}: {id}")]
    DanglingReference { kind: EntityKind, id: String },

    #[error("Invalid backup format: {0}")]
    InvalidBackupFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl OrbitalError {
    pub fn dangling(kind: EntityKind, id: impl Into<String>) -> Self {
        OrbitalError::DanglingReference {
            kind,
            id: id.into(),
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, OrbitalError::DanglingReference { .. })
    }
}

pub type Result<T> = std::result::Result<T, OrbitalError>;
