use crate::error::{Result, SerializeError};
use crate::field::FieldValues;

/// Returns `true` when the cell at `index` carries a value.
///
/// List cells are valid when any nested element is valid. Lists are probed
/// one level deep; a nested list is an error.
pub fn is_valid(values: &FieldValues, index: usize) -> Result<bool> {
    let valid = match values {
        FieldValues::Absent => false,
        FieldValues::Logical(cells) => cells[index].is_some(),
        FieldValues::Integer(cells) => cells[index].is_some(),
        FieldValues::Float(cells) => cells[index].is_some(),
        FieldValues::Text(cells) => cells[index].is_some(),
        FieldValues::List(cells) => any_nested_valid(&cells[index])?,
    };
    Ok(valid)
}

fn any_nested_valid(cell: &FieldValues) -> Result<bool> {
    if let FieldValues::List(_) = cell {
        return Err(SerializeError::unsupported("list of lists"));
    }
    for v in 0..cell.len().unwrap_or(0) {
        if is_valid(cell, v)? {
            return Ok(true);
        }
    }
    Ok(false)
}
