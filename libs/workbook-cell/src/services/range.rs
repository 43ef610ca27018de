//! A1-notation helpers for the Sheets values API.

use crate::error::WorkbookError;

/// 1-based column index to its letter form: 1 → `A`, 27 → `AA`.
pub fn column_letters(column: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = column;

    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push((b'A' + offset as u8) as char);
        remaining = (remaining - 1) / 26;
    }

    letters.iter().rev().collect()
}

/// Quotes a tab name for use in a range, doubling embedded quotes.
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

pub fn a1_cell(tab: &str, row: usize, column: usize) -> Result<String, WorkbookError> {
    if row == 0 || column == 0 {
        return Err(WorkbookError::InvalidCoordinate { row, column });
    }
    Ok(format!("{}!{}{}", quote_tab(tab), column_letters(column), row))
}

/// Whole-column span covering the first `columns` columns of a tab.
pub fn a1_columns(tab: &str, columns: usize) -> String {
    let last = column_letters(columns.max(1));
    format!("{}!A:{}", quote_tab(tab), last)
}
