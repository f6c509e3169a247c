//! Projection of a dataset into the formatted display table.

use crate::brl;
use crate::frame::{Cell, ColumnKind, Dataset, LABEL_COLUMN};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Marker placed in the label column of the synthetic totals row.
pub const TOTAL_MARKER: &str = "Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum NumberStyle {
    /// "1.234,50"
    #[default]
    Plain,
    /// "R$ 1.234,50"
    Currency,
}

/// Zero handling for numeric cells. Suppression is the primary contract;
/// rendering "0,00" exists as an explicit opt-in. Missing cells are always
/// blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ZeroDisplay {
    #[default]
    Blank,
    Rendered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TableStyle {
    #[serde(default)]
    pub numbers: NumberStyle,
    #[serde(default)]
    pub zeros: ZeroDisplay,
}

impl TableStyle {
    pub fn currency() -> Self {
        TableStyle {
            numbers: NumberStyle::Currency,
            zeros: ZeroDisplay::Blank,
        }
    }
}

/// Formats one numeric cell value under the given style.
pub fn format_number(value: f64, style: &TableStyle) -> String {
    if value == 0.0 && style.zeros == ZeroDisplay::Blank {
        return String::new();
    }
    let formatted = brl::format_decimal(value);
    match style.numbers {
        NumberStyle::Plain => formatted,
        NumberStyle::Currency => format!("R$ {}", formatted),
    }
}

/// Row-and-column table of formatted strings, ready for display. The last
/// row is the synthetic totals row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Projects the dataset to the requested columns (those actually present),
/// label column first, and appends the totals row: column sums for numeric
/// columns, the `Total` marker in the label column, blank elsewhere.
///
/// Formatting dispatches on the declared column kind. In a numeric column a
/// missing or zero value renders blank (unless zeros are opted in) and a
/// malformed text cell passes through unchanged.
pub fn build_display_table(
    dataset: &Dataset,
    columns_to_show: &[&str],
    style: &TableStyle,
) -> DisplayTable {
    let shown: Vec<usize> = columns_to_show
        .iter()
        .filter(|name| **name != LABEL_COLUMN)
        .filter_map(|name| dataset.column_index(name))
        .collect();

    let mut columns = Vec::with_capacity(shown.len() + 1);
    columns.push(LABEL_COLUMN.to_string());
    columns.extend(shown.iter().map(|&idx| dataset.columns[idx].name.clone()));

    let mut rows = Vec::with_capacity(dataset.rows.len() + 1);
    for row in &dataset.rows {
        let mut out = Vec::with_capacity(shown.len() + 1);
        out.push(row.axis_label());
        for &idx in &shown {
            let cell = row.cells.get(idx).unwrap_or(&Cell::Empty);
            out.push(render_cell(cell, dataset.columns[idx].kind, style));
        }
        rows.push(out);
    }

    let mut totals = Vec::with_capacity(shown.len() + 1);
    totals.push(TOTAL_MARKER.to_string());
    for &idx in &shown {
        let formatted = match dataset.columns[idx].kind {
            ColumnKind::Numeric => format_number(dataset.column_sum(idx), style),
            ColumnKind::Text => String::new(),
        };
        totals.push(formatted);
    }
    rows.push(totals);

    DisplayTable { columns, rows }
}

fn render_cell(cell: &Cell, kind: ColumnKind, style: &TableStyle) -> String {
    match kind {
        ColumnKind::Numeric => match cell {
            Cell::Empty => String::new(),
            Cell::Number(value) => format_number(*value, style),
            Cell::Text(text) => text.clone(),
        },
        ColumnKind::Text => cell.display_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::resolve_axis;
    use crate::frame::RawFrame;

    fn sales_dataset(labels: &[&str], values: &[Cell]) -> Dataset {
        let headers = vec!["MÊS".to_string(), "VENDAS".to_string()];
        let rows = labels
            .iter()
            .zip(values)
            .map(|(label, value)| vec![Cell::Text(label.to_string()), value.clone()])
            .collect();
        resolve_axis(RawFrame::from_rows(headers, rows).unwrap()).dataset
    }

    #[test]
    fn test_totals_row_and_zero_suppression() {
        let dataset = sales_dataset(
            &["2023-01", "2023-02", "2023-03"],
            &[Cell::Number(100.5), Cell::Number(0.0), Cell::Number(50.0)],
        );
        let table = build_display_table(&dataset, &["VENDAS"], &TableStyle::default());

        assert_eq!(table.columns, vec!["MÊS", "VENDAS"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0], vec!["01/2023", "100,50"]);
        // Zero renders as empty string, never "0,00".
        assert_eq!(table.rows[1], vec!["02/2023", ""]);
        assert_eq!(table.rows[3], vec!["Total", "150,50"]);
    }

    #[test]
    fn test_currency_style() {
        let dataset = sales_dataset(&["2023-01"], &[Cell::Number(1234.5)]);
        let table = build_display_table(&dataset, &["VENDAS"], &TableStyle::currency());

        assert_eq!(table.rows[0], vec!["01/2023", "R$ 1.234,50"]);
        assert_eq!(table.rows[1], vec!["Total", "R$ 1.234,50"]);
    }

    #[test]
    fn test_rendered_zeros_variant() {
        let style = TableStyle {
            numbers: NumberStyle::Plain,
            zeros: ZeroDisplay::Rendered,
        };
        let dataset = sales_dataset(&["2023-01"], &[Cell::Number(0.0)]);
        let table = build_display_table(&dataset, &["VENDAS"], &style);

        assert_eq!(table.rows[0], vec!["01/2023", "0,00"]);
    }

    #[test]
    fn test_missing_cell_is_blank_even_with_rendered_zeros() {
        let style = TableStyle {
            numbers: NumberStyle::Plain,
            zeros: ZeroDisplay::Rendered,
        };
        let dataset = sales_dataset(&["2023-01"], &[Cell::Empty]);
        let table = build_display_table(&dataset, &["VENDAS"], &style);

        assert_eq!(table.rows[0], vec!["01/2023", ""]);
    }

    #[test]
    fn test_malformed_cell_passes_through() {
        let dataset = sales_dataset(
            &["2023-01", "2023-02"],
            &[Cell::Number(10.0), Cell::Text("aguardando".into())],
        );
        let table = build_display_table(&dataset, &["VENDAS"], &TableStyle::default());

        assert_eq!(table.rows[1], vec!["02/2023", "aguardando"]);
        assert_eq!(table.rows[2], vec!["Total", "10,00"]);
    }

    #[test]
    fn test_raw_label_axis_keeps_labels() {
        let dataset = sales_dataset(&["period b", "period a"], &[Cell::Number(2.0), Cell::Number(1.0)]);
        let table = build_display_table(&dataset, &["VENDAS"], &TableStyle::default());

        assert_eq!(table.rows[0][0], "period a");
        assert_eq!(table.rows[1][0], "period b");
    }

    #[test]
    fn test_projection_skips_unknown_and_duplicate_label_columns() {
        let dataset = sales_dataset(&["2023-01"], &[Cell::Number(1.0)]);
        let table = build_display_table(
            &dataset,
            &["MÊS", "NOPE", "VENDAS"],
            &TableStyle::default(),
        );

        assert_eq!(table.columns, vec!["MÊS", "VENDAS"]);
    }
}
