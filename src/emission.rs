use crate::activation::ActiveFields;
use crate::error::Result;
use crate::field::{FieldSet, ValueKind};
use crate::render::{self, Rendered};
use crate::writer::Separators;

/// Append the value block of one sample: active fields joined by the field
/// separator, depth values joined by the multi-value separator.
///
/// Fields whose kind was rejected by the renderer are recorded in `rejected`
/// with the offending kind (once each).
pub fn emit_sample(
    fields: &FieldSet<'_>,
    active: &ActiveFields,
    variant: usize,
    sample: usize,
    separators: &Separators,
    out: &mut String,
    rejected: &mut Vec<(usize, ValueKind)>,
) -> Result<()> {
    let dims = fields.dims();

    for (k, field) in fields.iter().enumerate() {
        if !active.is_active(k) {
            continue;
        }
        let z_max = field.depth.z_max();
        for z in 0..z_max {
            let index = dims.index(variant, sample, z);
            let rendered =
                render::render_cell(field.values, index, &separators.multi_value, out)?;
            if let Rendered::Rejected(kind) = rendered
                && !rejected.iter().any(|(seen, _)| *seen == k)
            {
                rejected.push((k, kind));
            }
            if z + 1 < z_max {
                out.push_str(&separators.multi_value);
            }
        }
        if active.separator_after(k) {
            out.push_str(&separators.field);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Depth, Dims, FieldValues};

    fn block(set: &FieldSet<'_>, variant: usize, sample: usize) -> String {
        let active = ActiveFields::scan(set, variant).unwrap();
        let mut out = String::new();
        let mut rejected = Vec::new();
        emit_sample(
            set,
            &active,
            variant,
            sample,
            &Separators::default(),
            &mut out,
            &mut rejected,
        )
        .unwrap();
        out
    }

    #[test]
    fn depth_values_use_multi_value_separator() {
        let names = ["GT", "AD"];
        let arrays = [
            FieldValues::Text(vec![Some("0/1".to_string())]),
            FieldValues::Integer(vec![Some(3), Some(5)]),
        ];
        let set = FieldSet::new(
            &names,
            &arrays,
            &[Depth::Scalar, Depth::Fixed(2)],
            Dims::new(1, 1),
        )
        .unwrap();
        assert_eq!(block(&set, 0, 0), "0/1:3,5");
    }

    #[test]
    fn missing_depth_values_keep_their_slot() {
        let names = ["AD"];
        let arrays = [FieldValues::Integer(vec![None, Some(5), None])];
        let set = FieldSet::new(&names, &arrays, &[Depth::Fixed(3)], Dims::new(1, 1)).unwrap();
        assert_eq!(block(&set, 0, 0), ".,5,.");
    }

    #[test]
    fn inactive_fields_leave_no_separator() {
        // 2 variants x 1 sample; middle and trailing fields missing for variant 0
        let names = ["GT", "DP", "GQ", "FT"];
        let arrays = [
            FieldValues::Text(vec![Some("0/0".to_string()), None]),
            FieldValues::Integer(vec![None, Some(8)]),
            FieldValues::Integer(vec![Some(99), None]),
            FieldValues::Text(vec![None, Some("PASS".to_string())]),
        ];
        let set = FieldSet::new(&names, &arrays, &[Depth::Scalar; 4], Dims::new(2, 1)).unwrap();
        assert_eq!(block(&set, 0, 0), "0/0:99");
        assert_eq!(block(&set, 1, 0), "8:PASS");
    }

    #[test]
    fn samples_without_values_render_dots_for_active_fields() {
        // 1 variant x 2 samples
        let names = ["GT", "DP"];
        let arrays = [
            FieldValues::Text(vec![Some("0/1".to_string()), None]),
            FieldValues::Integer(vec![None, Some(12)]),
        ];
        let set =
            FieldSet::new(&names, &arrays, &[Depth::Scalar, Depth::Scalar], Dims::new(1, 2))
                .unwrap();
        assert_eq!(block(&set, 0, 0), "0/1:.");
        assert_eq!(block(&set, 0, 1), ".:12");
    }

    #[test]
    fn rejected_fields_are_recorded_once() {
        let names = ["FT", "DP"];
        let arrays = [
            FieldValues::Logical(vec![Some(true), Some(false), Some(true), None]),
            FieldValues::Integer(vec![Some(1), Some(2)]),
        ];
        let set = FieldSet::new(
            &names,
            &arrays,
            &[Depth::Fixed(2), Depth::Scalar],
            Dims::new(1, 2),
        )
        .unwrap();
        let active = ActiveFields::scan(&set, 0).unwrap();
        let mut out = String::new();
        let mut rejected = Vec::new();
        emit_sample(
            &set,
            &active,
            0,
            0,
            &Separators::default(),
            &mut out,
            &mut rejected,
        )
        .unwrap();
        assert_eq!(out, ",:1");
        assert_eq!(rejected, vec![(0, ValueKind::Logical)]);
    }
}
