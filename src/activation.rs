use crate::error::Result;
use crate::field::{FieldSet, FieldValues};
use crate::probe;

/// Fields carrying at least one value for a single variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFields {
    mask: Vec<bool>,
    last: Option<usize>,
}

impl ActiveFields {
    /// Scan every sample and depth of each field, in field order, stopping
    /// at the first valid cell.
    pub fn scan(fields: &FieldSet<'_>, variant: usize) -> Result<Self> {
        let dims = fields.dims();
        let mut mask = vec![false; fields.len()];
        let mut last = None;

        for (k, field) in fields.iter().enumerate() {
            // Absent fields carry no cells, so their depth is unbounded.
            if let FieldValues::Absent = field.values {
                continue;
            }
            let z_max = field.depth.z_max();
            'samples: for j in 0..dims.samples {
                for z in 0..z_max {
                    if probe::is_valid(field.values, dims.index(variant, j, z))? {
                        mask[k] = true;
                        last = Some(k);
                        break 'samples;
                    }
                }
            }
        }

        Ok(Self { mask, last })
    }

    pub fn is_active(&self, k: usize) -> bool {
        self.mask[k]
    }

    /// Index of the last active field.
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|active| **active).count()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Whether a field separator follows field `k` in a sample block.
    ///
    /// Only active fields before the last active one are followed by a
    /// separator, so skipped fields never leave a dangling one.
    pub fn separator_after(&self, k: usize) -> bool {
        k + 1 < self.mask.len() && self.last.is_some_and(|last| k < last)
    }

    /// Write the active field names joined by `f_sep`.
    pub fn write_names(&self, fields: &FieldSet<'_>, f_sep: &str, out: &mut String) {
        let mut first = true;
        for (k, field) in fields.iter().enumerate() {
            if !self.mask[k] {
                continue;
            }
            if !first {
                out.push_str(f_sep);
            }
            out.push_str(field.name);
            first = false;
        }
    }
}

/// Determine the active fields of `variant` and append their names.
pub fn activate(
    fields: &FieldSet<'_>,
    variant: usize,
    f_sep: &str,
    out: &mut String,
) -> Result<ActiveFields> {
    let active = ActiveFields::scan(fields, variant)?;
    active.write_names(fields, f_sep, out);
    Ok(active)
}
