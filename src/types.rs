use serde::Serialize;
use std::fmt;

use crate::error::{PainelError, PainelResult};

//==============================================================================
// Cell Values
//==============================================================================

/// A single worksheet cell after import
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell (ints, floats and date serials all land here)
    Number(f64),
    /// Free text
    Text(String),
    /// Boolean cell
    Bool(bool),
    /// Blank or error cell
    Empty,
}

impl CellValue {
    /// Coerce the cell to a number, treating anything non-numeric as missing.
    ///
    /// Text is accepted only when it parses as a plain decimal (`1234.5`).
    /// Comma-decimal text (`1,5`, `1.234,5`) and placeholders such as `"N/A"`
    /// yield `None`.
    pub fn to_numeric(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => parse_numeric_text(s),
            _ => None,
        }
    }

    /// Label used when the cell is a categorical value (city, month)
    ///
    /// Text is returned verbatim, surrounding spaces included.
    pub fn as_label(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

fn parse_numeric_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

static EMPTY_CELL: CellValue = CellValue::Empty;

//==============================================================================
// Sheet Tables
//==============================================================================

/// A worksheet loaded into memory: header row plus record rows
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, compared after trimming
    pub fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = column.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    /// Like [`column_index`](Self::column_index) but a missing column is an error
    pub fn require_column(&self, column: &str) -> PainelResult<usize> {
        self.column_index(column)
            .ok_or_else(|| PainelError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell at (row, col); ragged rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_numeric_accepts_numbers_and_numeric_text() {
        assert_eq!(CellValue::Number(3.5).to_numeric(), Some(3.5));
        assert_eq!(CellValue::Text(" 42 ".to_string()).to_numeric(), Some(42.0));
        assert_eq!(CellValue::Text("1.234".to_string()).to_numeric(), Some(1.234));
    }

    #[test]
    fn test_to_numeric_rejects_comma_text() {
        for raw in ["1.234,0", "1,234", "1.234.567", "1.234,5"] {
            assert_eq!(CellValue::Text(raw.to_string()).to_numeric(), None, "{}", raw);
        }
    }

    #[test]
    fn test_to_numeric_rejects_placeholders() {
        assert_eq!(CellValue::Text("N/A".to_string()).to_numeric(), None);
        assert_eq!(CellValue::Text("NaN".to_string()).to_numeric(), None);
        assert_eq!(CellValue::Text(String::new()).to_numeric(), None);
        assert_eq!(CellValue::Bool(true).to_numeric(), None);
        assert_eq!(CellValue::Empty.to_numeric(), None);
        assert_eq!(CellValue::Number(f64::NAN).to_numeric(), None);
    }

    #[test]
    fn test_as_label_drops_integral_fraction() {
        assert_eq!(CellValue::Number(1001.0).as_label(), "1001");
        assert_eq!(CellValue::Number(2.5).as_label(), "2.5");
        assert_eq!(CellValue::Text("Pelotas ".to_string()).as_label(), "Pelotas ");
    }

    #[test]
    fn test_sheet_table_column_lookup() {
        let mut table = SheetTable::new(
            "BASE",
            vec!["Cidade".to_string(), " Peso ".to_string()],
        );
        table.push_row(vec![CellValue::Text("X".to_string())]);

        assert_eq!(table.column_index("Peso"), Some(1));
        assert!(table.require_column("Nota").is_err());
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
    }
}
