use std::fmt;
use std::path::PathBuf;

use vb_import::ImportError;

#[derive(Debug)]
pub enum StoreError {
    /// No record of `kind` with `id` for this owner.
    NotFound { kind: &'static str, id: String },
    /// A line with this key already exists for the owner.
    DuplicateKey { external_key: String },
    /// Hand-entered fields failed the same checks imports run.
    InvalidFields(ImportError),
    /// Taking `requested` bottles off a line when only `on_hand` remain.
    InsufficientQuantity {
        id: String,
        on_hand: i64,
        requested: i64,
    },
    /// Opened quantity must be at least one; adjustments must be non-zero.
    InvalidQuantity(i64),
    /// Ratings are on a 0..=100 scale.
    InvalidRating(i64),
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            StoreError::DuplicateKey { external_key } => {
                write!(f, "a bottle with external_key '{external_key}' already exists")
            }
            StoreError::InvalidFields(e) => write!(f, "{e}"),
            StoreError::InsufficientQuantity {
                id,
                on_hand,
                requested,
            } => write!(
                f,
                "cannot take {requested} from bottle {id}: only {on_hand} on hand"
            ),
            StoreError::InvalidQuantity(q) => write!(f, "invalid quantity change: {q}"),
            StoreError::InvalidRating(r) => write!(f, "rating must be within 0..=100, got {r}"),
            StoreError::Io { path, source } => {
                write!(f, "cellar file io failed: {}: {source}", path.display())
            }
            StoreError::Decode { path, source } => {
                write!(f, "cellar file decode failed: {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Decode { source, .. } => Some(source),
            StoreError::InvalidFields(e) => Some(e),
            _ => None,
        }
    }
}
