//! Assembly of VCF record lines from fixed text and genotype fields.
//!
//! Each line is `<fixed>\t<FORMAT>\t<sample 1>\t...\t<sample S>`, where the
//! FORMAT column lists only the fields that carry a value for that variant.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activation::{self, ActiveFields};
use crate::emission;
use crate::error::{Result, SerializeError, SerializeWarning};
use crate::field::{Depth, Dims, FieldSet, FieldValues, ValueKind};
use crate::table::GenotypeTable;

const COLUMN_SEPARATOR: char = '\t';

/// Join strings for field boundaries and for multiple values in one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Separators {
    pub field: String,
    pub multi_value: String,
}

impl Separators {
    pub fn new(field: impl Into<String>, multi_value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            multi_value: multi_value.into(),
        }
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::new(":", ",")
    }
}

/// Options controlling a serialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    pub separators: Separators,
    /// Process variants on the current rayon pool, one buffer per worker.
    pub parallel: bool,
}

/// Number of variants in which a field was active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldActivity {
    pub name: String,
    pub active_variants: usize,
}

/// Counters collected over a serialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SerializeSummary {
    pub variants: usize,
    pub samples: usize,
    pub fields: usize,
    /// Variants whose FORMAT column is empty.
    pub empty_format_variants: usize,
    /// Sum over variants of the number of active fields.
    pub active_field_emissions: usize,
    pub field_activity: Vec<FieldActivity>,
    pub warnings: Vec<SerializeWarning>,
}

impl SerializeSummary {
    fn new(fields: &FieldSet<'_>) -> Self {
        Self {
            samples: fields.dims().samples,
            fields: fields.len(),
            field_activity: fields
                .iter()
                .map(|field| FieldActivity {
                    name: field.name.to_string(),
                    active_variants: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    fn record_variant(&mut self, fields: &FieldSet<'_>, outcome: &VariantOutcome) {
        self.variants += 1;
        let active = outcome.active.count();
        if active == 0 {
            self.empty_format_variants += 1;
        }
        self.active_field_emissions += active;
        for (k, is_active) in outcome.active.mask().iter().enumerate() {
            if *is_active {
                self.field_activity[k].active_variants += 1;
            }
        }

        for &(k, value_kind) in &outcome.rejected {
            let field = fields.get(k);
            let already_reported = self.warnings.iter().any(|warning| {
                matches!(warning, SerializeWarning::InvalidFieldKind { field: name, .. } if name == field.name)
            });
            if already_reported {
                continue;
            }
            let warning = SerializeWarning::InvalidFieldKind {
                field: field.name.to_string(),
                value_kind,
            };
            tracing::warn!(field = field.name, "{warning}");
            self.warnings.push(warning);
        }
    }
}

/// Lines produced by a run, indexed by variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized {
    pub lines: Vec<String>,
    pub summary: SerializeSummary,
}

#[derive(Debug)]
struct VariantOutcome {
    active: ActiveFields,
    rejected: Vec<(usize, ValueKind)>,
}

/// Build one line into `buf`, which is cleared first.
fn assemble_line(
    fixed: &str,
    fields: &FieldSet<'_>,
    variant: usize,
    separators: &Separators,
    buf: &mut String,
) -> Result<VariantOutcome> {
    buf.clear();
    buf.push_str(fixed);
    buf.push(COLUMN_SEPARATOR);

    let active = activation::activate(fields, variant, &separators.field, buf)?;
    buf.push(COLUMN_SEPARATOR);

    let mut rejected = Vec::new();
    let samples = fields.dims().samples;
    for j in 0..samples {
        emission::emit_sample(fields, &active, variant, j, separators, buf, &mut rejected)?;
        if j + 1 < samples {
            buf.push(COLUMN_SEPARATOR);
        }
    }

    Ok(VariantOutcome { active, rejected })
}

/// Serializes genotype tables into VCF record lines.
#[derive(Debug, Clone, Default)]
pub struct GenotypeSerializer {
    options: SerializeOptions,
}

impl GenotypeSerializer {
    pub fn new(options: SerializeOptions) -> Self {
        Self { options }
    }

    pub fn serialize(&self, table: &GenotypeTable) -> Result<Serialized> {
        let fields = table.field_set()?;
        self.serialize_fields(&table.fixed, &fields)
    }

    /// Serialize pre-validated fields; `fixed` holds one prefix per variant.
    pub fn serialize_fields<S>(&self, fixed: &[S], fields: &FieldSet<'_>) -> Result<Serialized>
    where
        S: AsRef<str> + Sync,
    {
        let dims = fields.dims();
        if fixed.len() != dims.rows {
            return Err(SerializeError::RowCountMismatch {
                expected: dims.rows,
                found: fixed.len(),
            });
        }

        tracing::info!(
            variants = dims.rows,
            samples = dims.samples,
            fields = fields.len(),
            parallel = self.options.parallel,
            "serializing genotypes",
        );

        let separators = &self.options.separators;
        let results: Vec<(String, VariantOutcome)> = if self.options.parallel {
            (0..dims.rows)
                .into_par_iter()
                .map_init(String::new, |buf, i| {
                    assemble_line(fixed[i].as_ref(), fields, i, separators, buf)
                        .map(|outcome| (buf.clone(), outcome))
                })
                .collect::<Result<_>>()?
        } else {
            let mut buf = String::new();
            let mut results = Vec::with_capacity(dims.rows);
            for (i, prefix) in fixed.iter().enumerate() {
                let outcome = assemble_line(prefix.as_ref(), fields, i, separators, &mut buf)?;
                results.push((buf.clone(), outcome));
            }
            results
        };

        let mut summary = SerializeSummary::new(fields);
        let mut lines = Vec::with_capacity(results.len());
        for (line, outcome) in results {
            summary.record_variant(fields, &outcome);
            lines.push(line);
        }

        for activity in &summary.field_activity {
            tracing::debug!(
                field = %activity.name,
                active_variants = activity.active_variants,
                "field activity",
            );
        }
        tracing::info!(
            variants = summary.variants,
            empty_format_variants = summary.empty_format_variants,
            warnings = summary.warnings.len(),
            "serialization complete",
        );

        Ok(Serialized { lines, summary })
    }
}

/// Serialize genotype arrays into one VCF line per variant.
///
/// `field_names`, `field_arrays` and `z_dims` are positional and must have
/// equal lengths; this is checked before any line is built.
pub fn serialize_genotypes<F, N>(
    fixed_lines: &[F],
    field_names: &[N],
    field_arrays: &[FieldValues],
    field_separator: &str,
    multi_value_separator: &str,
    dims: Dims,
    z_dims: &[Depth],
) -> Result<Vec<String>>
where
    F: AsRef<str> + Sync,
    N: AsRef<str>,
{
    let fields = FieldSet::new(field_names, field_arrays, z_dims, dims)?;
    let serializer = GenotypeSerializer::new(SerializeOptions {
        separators: Separators::new(field_separator, multi_value_separator),
        parallel: false,
    });
    Ok(serializer.serialize_fields(fixed_lines, &fields)?.lines)
}
