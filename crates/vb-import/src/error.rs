use std::fmt;

/// Why a single import item was rejected.
///
/// Never propagated past the item: the batch runner turns it into an
/// `{external_key, reason}` row and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The item is not a JSON object.
    NotAnObject,
    /// `external_key` is absent, null, blank, or not a scalar.
    MissingExternalKey,
    /// A field holds a value that cannot be coerced to its target type.
    InvalidField { field: &'static str, detail: String },
    /// The storage collaborator failed during lookup or write.
    Store(String),
}

impl ImportError {
    pub(crate) fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        ImportError::InvalidField {
            field,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NotAnObject => write!(f, "import item must be a JSON object"),
            ImportError::MissingExternalKey => write!(f, "external_key is required"),
            ImportError::InvalidField { field, detail } => {
                write!(f, "field '{field}' is invalid: {detail}")
            }
            ImportError::Store(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ImportError {}
