use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as read from a provider tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the sheet formats as a time of day.
    Clock(NaiveTime),
}

impl CellValue {
    /// True for empty cells and text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form, trimmed.
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }

    /// `None` when the cell is blank, otherwise its display form.
    pub fn non_blank(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Clock(t) => write!(f, "{}:{:02}", t.hour(), t.minute()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(value: NaiveTime) -> Self {
        CellValue::Clock(value)
    }
}

/// The full contents of one tab: row 0 is the header row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Convenience constructor for text-only grids.
    pub fn from_text(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| CellValue::from(*cell)).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows paired with their 1-based sheet row position.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index + 1, row.as_slice()))
    }

    /// Cell at a 1-based (row, column) position; missing cells read as empty.
    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .cloned()
            .unwrap_or_default()
    }

    /// Writes a cell at a 1-based (row, column) position, growing the grid as needed.
    pub fn set_cell(&mut self, row: usize, column: usize, value: CellValue) {
        if row == 0 || column == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < column {
            cells.resize(column, CellValue::Empty);
        }
        cells[column - 1] = value;
    }
}
