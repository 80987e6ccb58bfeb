use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of leading columns read from each row.
const COLUMNS: usize = 2;

/// One gallery entry read from columns A and B.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetRow {
    pub title: String,
    pub image_url: String,
}

pub trait FromSheetRows: Sized {
    /// Convert a range of rows to records. The first row is always treated as
    /// a header and dropped, whatever it contains.
    fn from_sheet_rows(rows: &[Vec<Value>]) -> Result<Vec<Self>>;
}

impl FromSheetRows for SheetRow {
    fn from_sheet_rows(rows: &[Vec<Value>]) -> Result<Vec<Self>> {
        let mut sheet_rows = Vec::with_capacity(rows.len().saturating_sub(1));

        for (idx, row) in rows.iter().enumerate().skip(1) {
            // Pad short rows with empty strings, ignore anything past column B
            let mut cells: Vec<String> = row.iter().take(COLUMNS).map(cell_to_string).collect();
            cells.resize(COLUMNS, String::new());

            let record = csv::StringRecord::from(cells);
            let sheet_row: SheetRow = record.deserialize(None).map_err(|e| {
                AppError::Other(anyhow::anyhow!("Failed to parse row {}: {}", idx + 1, e))
            })?;

            sheet_rows.push(sheet_row);
        }

        Ok(sheet_rows)
    }
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
