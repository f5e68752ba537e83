#![doc = include_str!("../README.md")]

pub mod activation;
pub mod cli;
pub mod collapse;
pub mod emission;
pub mod error;
pub mod field;
pub mod output;
pub mod probe;
pub mod render;
pub mod report;
pub mod table;
pub mod writer;

pub use collapse::{TextMatrix, collapse_rows};
pub use error::{Result, SerializeError, SerializeWarning};
pub use field::{Depth, Dims, FieldValues, GenotypeField, ValueKind};
pub use report::RunReport;
pub use table::GenotypeTable;
pub use writer::{
    GenotypeSerializer, SerializeOptions, SerializeSummary, Separators, Serialized,
    serialize_genotypes,
};
