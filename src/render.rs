//! Text rendering of genotype cells.

use std::fmt::Write as _;

use crate::error::{Result, SerializeError};
use crate::field::{FieldValues, ValueKind};

/// Text written for a missing value.
pub const MISSING: &str = ".";

/// Outcome of rendering one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Value,
    /// The cell's kind is not a legal FORMAT type; nothing was written.
    Rejected(ValueKind),
}

/// Append the cell at `index` to `out`.
///
/// List cells expand to their nested elements joined by `mv_sep`.
pub fn render_cell(
    values: &FieldValues,
    index: usize,
    mv_sep: &str,
    out: &mut String,
) -> Result<Rendered> {
    match values {
        FieldValues::Absent => {}
        FieldValues::Logical(_) => return Ok(Rendered::Rejected(ValueKind::Logical)),
        FieldValues::Integer(cells) => render_integer(cells[index], out),
        FieldValues::Float(cells) => render_float(cells[index], out),
        FieldValues::Text(cells) => render_text(cells[index].as_deref(), out),
        FieldValues::List(cells) => return render_list(&cells[index], mv_sep, out),
    }
    Ok(Rendered::Value)
}

fn render_list(cell: &FieldValues, mv_sep: &str, out: &mut String) -> Result<Rendered> {
    match cell {
        FieldValues::Absent => {}
        FieldValues::Logical(_) => return Ok(Rendered::Rejected(ValueKind::Logical)),
        FieldValues::Integer(items) => join(items, mv_sep, out, |v, out| render_integer(*v, out)),
        FieldValues::Float(items) => join(items, mv_sep, out, |v, out| render_float(*v, out)),
        FieldValues::Text(items) => {
            join(items, mv_sep, out, |v, out| render_text(v.as_deref(), out))
        }
        FieldValues::List(_) => return Err(SerializeError::unsupported("list of lists")),
    }
    Ok(Rendered::Value)
}

fn join<T>(items: &[T], sep: &str, out: &mut String, mut write: impl FnMut(&T, &mut String)) {
    for (v, item) in items.iter().enumerate() {
        if v > 0 {
            out.push_str(sep);
        }
        write(item, out);
    }
}

pub fn render_integer(value: Option<i32>, out: &mut String) {
    match value {
        // Writing into a String cannot fail.
        Some(v) => {
            let _ = write!(out, "{v}");
        }
        None => out.push_str(MISSING),
    }
}

pub fn render_float(value: Option<f64>, out: &mut String) {
    match value {
        Some(v) => format_general(v, out),
        None => out.push_str(MISSING),
    }
}

pub fn render_text(value: Option<&str>, out: &mut String) {
    out.push_str(value.unwrap_or(MISSING));
}

/// Significant digits kept by [`format_general`].
pub const FLOAT_PRECISION: usize = 6;

/// Format like C's `%g`: six significant digits, trailing zeros removed,
/// scientific notation when the exponent is below -4 or at least six.
pub fn format_general(v: f64, out: &mut String) {
    if v.is_nan() {
        out.push_str("nan");
        return;
    }
    if v.is_infinite() {
        out.push_str(if v.is_sign_negative() { "-inf" } else { "inf" });
        return;
    }
    if v == 0.0 {
        out.push_str(if v.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    // Round to the target precision first; rounding can bump the exponent.
    let scientific = format!("{:.*e}", FLOAT_PRECISION - 1, v);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map(|(m, e)| (m, e.parse::<i32>().unwrap_or(0)))
        .unwrap_or((scientific.as_str(), 0));

    if exponent < -4 || exponent >= FLOAT_PRECISION as i32 {
        out.push_str(strip_fraction_zeros(mantissa));
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exponent.unsigned_abs());
    } else {
        let decimals = (FLOAT_PRECISION as i32 - 1 - exponent) as usize;
        let fixed = format!("{v:.decimals$}");
        out.push_str(strip_fraction_zeros(&fixed));
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
