use serde::Serialize;
use thiserror::Error;

use crate::field::ValueKind;

/// Fatal errors raised while serializing a genotype table.
///
/// Every variant is reported before any output line is produced, except
/// `UnsupportedValueKind`, which the probe and renderer can also raise
/// when called directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error(
        "field arity mismatch: {names} field names, {arrays} genotype arrays, {depths} depths"
    )]
    ArityMismatch {
        names: usize,
        arrays: usize,
        depths: usize,
    },
    #[error("expected {expected} fixed lines (one per variant), found {found}")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("field '{field}' holds {found} cells, expected {expected} (rows x samples x depth)")]
    ShapeMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("{cells} cells do not fill a matrix of {rows} rows")]
    RaggedMatrix { rows: usize, cells: usize },
    #[error("unsupported genotype value kind: {kind}")]
    UnsupportedValueKind { kind: String },
}

impl SerializeError {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedValueKind { kind: kind.into() }
    }
}

pub type Result<T> = std::result::Result<T, SerializeError>;

/// Recoverable problems; the affected field is rendered empty.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SerializeWarning {
    #[error("field '{field}': '{value_kind}' is not a valid FORMAT data type")]
    InvalidFieldKind { field: String, value_kind: ValueKind },
}
