use crate::error::{FiscalPipelineError, Result};
use crate::schema::Metric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exact, case-sensitive name of the required month-label column.
pub const LABEL_COLUMN: &str = "MÊS";

/// One table cell. `Text` inside a numeric column is the malformed-cell case:
/// it contributes 0 to every sum and passes through display unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) if value.fract() == 0.0 => format!("{}", *value as i64),
            Cell::Number(value) => value.to_string(),
            Cell::Text(text) => text.clone(),
        }
    }
}

/// Declared column type, established once when columns are classified.
/// Formatting and summation dispatch on this, never on individual cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// Unresolved dataset: rows in source order, month labels still raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFrame {
    pub columns: Vec<Column>,
    pub rows: Vec<RawRow>,
}

impl RawFrame {
    /// Builds a frame from header names and row cells. The label column must
    /// be present by exact name; it is split out of the cell grid and the
    /// remaining columns are classified. A column named after a recognized
    /// metric is always numeric; an unknown column is numeric only when every
    /// non-empty cell in it is a number.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<RawFrame> {
        let label_idx = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .ok_or(FiscalPipelineError::MissingRequiredColumn(LABEL_COLUMN))?;

        let mut raw_rows = Vec::with_capacity(rows.len());
        for cells in &rows {
            let label = cells
                .get(label_idx)
                .map(Cell::display_text)
                .unwrap_or_default();
            let mut row_cells = Vec::with_capacity(headers.len() - 1);
            for (idx, _) in headers.iter().enumerate() {
                if idx == label_idx {
                    continue;
                }
                row_cells.push(cells.get(idx).cloned().unwrap_or(Cell::Empty));
            }
            raw_rows.push(RawRow {
                label,
                cells: row_cells,
            });
        }

        let data_headers: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != label_idx)
            .map(|(_, name)| name.clone())
            .collect();

        let mut columns = Vec::with_capacity(data_headers.len());
        for (col_idx, name) in data_headers.into_iter().enumerate() {
            let kind = if Metric::from_column_name(&name).is_some() {
                ColumnKind::Numeric
            } else {
                classify_unknown_column(&raw_rows, col_idx)
            };
            columns.push(Column { name, kind });
        }

        Ok(RawFrame {
            columns,
            rows: raw_rows,
        })
    }
}

fn classify_unknown_column(rows: &[RawRow], col_idx: usize) -> ColumnKind {
    let mut saw_number = false;
    for row in rows {
        match row.cells.get(col_idx) {
            Some(Cell::Number(_)) => saw_number = true,
            Some(Cell::Text(_)) => return ColumnKind::Text,
            _ => {}
        }
    }
    if saw_number {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// How the time axis was resolved for a loaded dataset. The classification
/// happens once, globally; mixed axis types are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Every retained row carries a canonical date; rows sort by it.
    Calendar,
    /// No label resolved; raw label text is the axis, sorted lexicographically.
    RawLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    /// First day of the labeled month. `Some` for every row on a calendar
    /// axis, `None` on a raw-label axis.
    pub date: Option<NaiveDate>,
    pub cells: Vec<Cell>,
}

/// Axis-resolved, ordered dataset. All aggregation operates on this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub axis: AxisKind,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Sum of the numeric cells in a column; malformed and empty cells
    /// contribute 0.
    pub fn column_sum(&self, col_idx: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|row| row.cells.get(col_idx).and_then(Cell::as_number))
            .sum()
    }

    /// Axis labels for charts and the display table: `MM/YYYY` on a calendar
    /// axis, the raw label otherwise.
    pub fn axis_labels(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.axis_label()).collect()
    }
}

impl Row {
    pub fn axis_label(&self) -> String {
        match self.date {
            Some(date) => date.format("%m/%Y").to_string(),
            None => self.label.clone(),
        }
    }
}
