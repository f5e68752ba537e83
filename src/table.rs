use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Result as SerializeResult;
use crate::field::{Dims, FieldRef, FieldSet, GenotypeField};

/// A complete genotype dataset: one fixed prefix per variant, sample names,
/// and the genotype fields in FORMAT order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenotypeTable {
    #[serde(default)]
    pub samples: Vec<String>,
    pub fixed: Vec<String>,
    #[serde(default)]
    pub fields: Vec<GenotypeField>,
}

impl GenotypeTable {
    pub fn dims(&self) -> Dims {
        Dims::new(self.fixed.len(), self.samples.len())
    }

    pub fn field_set(&self) -> SerializeResult<FieldSet<'_>> {
        let refs: Vec<FieldRef<'_>> = self.fields.iter().map(GenotypeField::view).collect();
        FieldSet::from_refs(refs, self.dims())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("failed to parse genotype table JSON")
    }

    /// Load a table from a JSON file; `.gz` files are decompressed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open genotype table {}", path.display()))?;

        let reader: Box<dyn BufRead> = if path.to_string_lossy().ends_with(".gz") {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let table = Self::from_reader(reader)
            .with_context(|| format!("invalid genotype table {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            variants = table.fixed.len(),
            samples = table.samples.len(),
            fields = table.fields.len(),
            "loaded genotype table",
        );
        Ok(table)
    }
}
