//! Genotype field model.
//!
//! A field is a named column of typed cells laid out variant-major within
//! each sample slab and each depth plane: the cell for variant `i`, sample
//! `j` and depth `z` lives at `i + j * rows + z * rows * samples`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SerializeError};

/// Declared kind of a genotype array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Absent,
    Logical,
    Integer,
    Float,
    Text,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::Logical => "logical",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// Typed cells of one genotype field. `None` is the missing marker.
///
/// A `List` holds one nested `FieldValues` per cell. Only one level of
/// nesting is accepted; a list inside a list is rejected when probed or
/// rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValues {
    Absent,
    Logical(Vec<Option<bool>>),
    Integer(Vec<Option<i32>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    List(Vec<FieldValues>),
}

impl FieldValues {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Logical(_) => ValueKind::Logical,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Number of cells, or `None` for an absent field which has no storage.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Absent => None,
            Self::Logical(v) => Some(v.len()),
            Self::Integer(v) => Some(v.len()),
            Self::Float(v) => Some(v.len()),
            Self::Text(v) => Some(v.len()),
            Self::List(v) => Some(v.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len().is_none_or(|n| n == 0)
    }

    /// Kind shared by the nested cells of a list, ignoring absent cells.
    /// Returns `None` for non-list fields and for lists without typed cells.
    pub fn nested_kind(&self) -> Option<ValueKind> {
        let Self::List(cells) = self else {
            return None;
        };
        cells
            .iter()
            .map(FieldValues::kind)
            .find(|kind| *kind != ValueKind::Absent)
    }

    /// Reject a list cell that is itself a list.
    pub fn check_nesting(&self) -> Result<()> {
        if let Self::List(cells) = self
            && cells.iter().any(|cell| matches!(cell, Self::List(_)))
        {
            return Err(SerializeError::unsupported("list of lists"));
        }
        Ok(())
    }
}

/// Number of values a field holds per (variant, sample) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum Depth {
    #[default]
    Scalar,
    Fixed(usize),
}

impl Depth {
    pub fn z_max(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Fixed(n) => n,
        }
    }
}

impl From<Option<usize>> for Depth {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Scalar, Self::Fixed)
    }
}

impl From<Depth> for Option<usize> {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Scalar => None,
            Depth::Fixed(n) => Some(n),
        }
    }
}

/// Row (variant) and column (sample) counts of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub rows: usize,
    pub samples: usize,
}

impl Dims {
    pub fn new(rows: usize, samples: usize) -> Self {
        Self { rows, samples }
    }

    #[inline]
    pub fn index(&self, variant: usize, sample: usize, z: usize) -> usize {
        variant + sample * self.rows + z * self.rows * self.samples
    }

    /// Cells a field of `depth` must hold; saturates instead of overflowing.
    pub fn cells(&self, depth: Depth) -> usize {
        self.rows
            .saturating_mul(self.samples)
            .saturating_mul(depth.z_max())
    }
}

/// An owned, named genotype field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeField {
    pub name: String,
    #[serde(default)]
    pub depth: Depth,
    pub values: FieldValues,
}

impl GenotypeField {
    pub fn new(name: impl Into<String>, depth: Depth, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            depth,
            values,
        }
    }

    pub fn view(&self) -> FieldRef<'_> {
        FieldRef {
            name: &self.name,
            values: &self.values,
            depth: self.depth,
        }
    }
}

/// Borrowed view of one field as seen by the serialization passes.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub name: &'a str,
    pub values: &'a FieldValues,
    pub depth: Depth,
}

/// Validated set of fields sharing one table shape.
#[derive(Debug, Clone)]
pub struct FieldSet<'a> {
    fields: Vec<FieldRef<'a>>,
    dims: Dims,
}

impl<'a> FieldSet<'a> {
    /// Pair names, arrays and depths positionally and check every array
    /// against the table shape.
    pub fn new<S>(
        names: &'a [S],
        arrays: &'a [FieldValues],
        depths: &[Depth],
        dims: Dims,
    ) -> Result<Self>
    where
        S: AsRef<str>,
    {
        if names.len() != arrays.len() || depths.len() != arrays.len() {
            return Err(SerializeError::ArityMismatch {
                names: names.len(),
                arrays: arrays.len(),
                depths: depths.len(),
            });
        }

        let fields = names
            .iter()
            .zip(arrays)
            .zip(depths)
            .map(|((name, values), depth)| FieldRef {
                name: name.as_ref(),
                values,
                depth: *depth,
            })
            .collect();

        Self::from_refs(fields, dims)
    }

    pub fn from_refs(fields: Vec<FieldRef<'a>>, dims: Dims) -> Result<Self> {
        for field in &fields {
            if let Some(found) = field.values.len() {
                let expected = dims.cells(field.depth);
                if found != expected {
                    return Err(SerializeError::ShapeMismatch {
                        field: field.name.to_string(),
                        expected,
                        found,
                    });
                }
            }
            field.values.check_nesting()?;
        }
        Ok(Self { fields, dims })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, k: usize) -> FieldRef<'a> {
        self.fields[k]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRef<'a>> {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_index_is_variant_major() {
        let dims = Dims::new(3, 2);
        assert_eq!(dims.index(0, 0, 0), 0);
        assert_eq!(dims.index(2, 0, 0), 2);
        assert_eq!(dims.index(1, 1, 0), 4);
        assert_eq!(dims.index(1, 1, 1), 10);
        assert_eq!(dims.cells(Depth::Fixed(2)), 12);
        assert_eq!(dims.cells(Depth::Scalar), 6);
    }

    #[test]
    fn depth_deserializes_from_null_or_count() {
        let depths: Vec<Depth> = serde_json::from_str("[null, 3]").unwrap();
        assert_eq!(depths, vec![Depth::Scalar, Depth::Fixed(3)]);
        assert_eq!(serde_json::to_string(&depths).unwrap(), "[null,3]");
    }

    #[test]
    fn field_values_use_lowercase_tags() {
        let values: FieldValues =
            serde_json::from_str(r#"{"list":[{"integer":[null,7]},"absent"]}"#).unwrap();
        assert_eq!(
            values,
            FieldValues::List(vec![
                FieldValues::Integer(vec![None, Some(7)]),
                FieldValues::Absent,
            ])
        );
        assert_eq!(values.nested_kind(), Some(ValueKind::Integer));
    }

    #[test]
    fn field_set_rejects_arity_mismatch() {
        let names = ["GT", "DP"];
        let arrays = [FieldValues::Absent];
        let err = FieldSet::new(&names, &arrays, &[Depth::Scalar], Dims::new(1, 1)).unwrap_err();
        assert_eq!(
            err,
            SerializeError::ArityMismatch {
                names: 2,
                arrays: 1,
                depths: 1,
            }
        );
    }

    #[test]
    fn field_set_rejects_short_arrays() {
        let names = ["AD"];
        let arrays = [FieldValues::Integer(vec![Some(1), Some(2), Some(3)])];
        let err = FieldSet::new(&names, &arrays, &[Depth::Fixed(2)], Dims::new(2, 1)).unwrap_err();
        assert_eq!(
            err,
            SerializeError::ShapeMismatch {
                field: "AD".to_string(),
                expected: 4,
                found: 3,
            }
        );
    }

    #[test]
    fn field_set_rejects_nested_lists() {
        let names = ["XX"];
        let arrays = [FieldValues::List(vec![FieldValues::List(vec![])])];
        let err = FieldSet::new(&names, &arrays, &[Depth::Scalar], Dims::new(1, 1)).unwrap_err();
        assert!(matches!(err, SerializeError::UnsupportedValueKind { .. }));
    }

    #[test]
    fn absent_fields_skip_shape_check() {
        let names = ["GT"];
        let arrays = [FieldValues::Absent];
        let set = FieldSet::new(&names, &arrays, &[Depth::Fixed(4)], Dims::new(10, 3)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).name, "GT");
    }
}
