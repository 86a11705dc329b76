//! Spreadsheet column labels ("A", "Z", "AA", ...) to numeric positions.
//!
//! Labels are bijective base-26: there is no zero digit, so "Z" is 26
//! and "AA" follows it as 27.

use crate::error::{CaseError, CaseResult};

/// Resolve a column label to its 1-based position. Case-insensitive.
pub fn column_number(label: &str) -> CaseResult<usize> {
    let invalid = || CaseError::InvalidColumnLabel {
        label: label.to_string(),
    };

    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut number: usize = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    Ok(number)
}

/// Resolve a column label to a 0-based index into a row's cells.
pub fn column_index(label: &str) -> CaseResult<usize> {
    column_number(label).map(|n| n - 1)
}

/// Fetch the cell under `label` from `row`, copying it out.
/// A label past the end of the row is a row-level error.
pub fn cell_at(row: &[String], label: &str) -> CaseResult<String> {
    let index = column_index(label)?;
    row.get(index)
        .cloned()
        .ok_or_else(|| CaseError::ColumnOutOfRange {
            label: label.to_string(),
            index,
            width: row.len(),
        })
}
