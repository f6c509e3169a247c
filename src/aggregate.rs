//! Axis resolution, filtering and aggregation over a loaded frame.
//!
//! Every operation is a pure value-returning transformation; the dataset is
//! treated as an immutable snapshot and nothing here touches shared state.

use crate::dates::normalize_month_label;
use crate::frame::{AxisKind, Cell, Column, ColumnKind, Dataset, RawFrame, Row};
use crate::schema::{DateRange, Metric, MetricSelection};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name of the derived per-month expense total.
pub const EXPENSE_TOTAL_COLUMN: &str = "Despesas Totais";

/// Outcome of the one-shot axis classification, with any advisory notices
/// raised along the way.
#[derive(Debug, Clone)]
pub struct AxisResolution {
    pub dataset: Dataset,
    pub advisories: Vec<String>,
}

/// Runs the month-label normalizer over every row and classifies the axis.
///
/// All-or-nothing: if at least one label resolves, rows that did not resolve
/// are dropped and the rest sort ascending by canonical date; if none
/// resolve, the original labels stay as the axis, sorted lexicographically,
/// and an advisory is raised. Mixed axis types are not supported.
pub fn resolve_axis(frame: RawFrame) -> AxisResolution {
    let columns = frame.columns;
    let mut resolved: Vec<Row> = Vec::with_capacity(frame.rows.len());
    let mut any_date = false;

    for raw in frame.rows {
        let date = normalize_month_label(&raw.label);
        any_date |= date.is_some();
        resolved.push(Row {
            label: raw.label,
            date,
            cells: raw.cells,
        });
    }

    let mut advisories = Vec::new();
    let dataset = if any_date {
        let before = resolved.len();
        let mut rows: Vec<Row> = resolved.into_iter().filter(|r| r.date.is_some()).collect();
        rows.sort_by_key(|r| r.date);
        if rows.len() < before {
            debug!(
                "Dropped {} row(s) with unresolvable month labels",
                before - rows.len()
            );
        }
        Dataset {
            axis: AxisKind::Calendar,
            columns,
            rows,
        }
    } else {
        let notice =
            "Month labels could not be resolved to dates; original labels are used as the axis"
                .to_string();
        warn!("{}", notice);
        advisories.push(notice);
        let mut rows = resolved;
        rows.sort_by(|a, b| a.label.cmp(&b.label));
        Dataset {
            axis: AxisKind::RawLabel,
            columns,
            rows,
        }
    };

    AxisResolution {
        dataset,
        advisories,
    }
}

/// Keeps rows whose canonical date falls within the inclusive range.
/// A no-op on a raw-label axis.
pub fn filter_by_range(dataset: Dataset, range: &DateRange) -> Dataset {
    if dataset.axis != AxisKind::Calendar {
        return dataset;
    }

    let rows = dataset
        .rows
        .into_iter()
        .filter(|row| row.date.is_some_and(|date| range.contains(date)))
        .collect();

    Dataset {
        axis: dataset.axis,
        columns: dataset.columns,
        rows,
    }
}

/// The four summary-card totals, always computed over the full filtered
/// dataset regardless of the metric selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadlineSummary {
    pub sales: f64,
    pub purchases: f64,
    pub das: f64,
    pub payroll: f64,
}

pub fn headline_summary(dataset: &Dataset) -> HeadlineSummary {
    HeadlineSummary {
        sales: metric_sum(dataset, Metric::Sales),
        purchases: metric_sum(dataset, Metric::Purchases),
        das: metric_sum(dataset, Metric::Das),
        payroll: metric_sum(dataset, Metric::Payroll),
    }
}

/// Column total for one metric; 0 when the column is absent.
pub fn metric_sum(dataset: &Dataset, metric: Metric) -> f64 {
    dataset
        .column_index(metric.column_name())
        .map(|idx| dataset.column_sum(idx))
        .unwrap_or(0.0)
}

/// Per-record sum over the selected expense metrics.
///
/// `None` when the selection shares no metric with the expense vocabulary:
/// the derived column is omitted entirely rather than zero-filled, which
/// also signals callers not to draw the comparative chart.
pub fn expense_series(dataset: &Dataset, selection: &MetricSelection) -> Option<Vec<f64>> {
    let active = selection.selected_expenses();
    if active.is_empty() {
        return None;
    }

    let indices: Vec<usize> = active
        .iter()
        .filter_map(|metric| dataset.column_index(metric.column_name()))
        .collect();

    let series = dataset
        .rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .filter_map(|&idx| row.cells.get(idx).and_then(Cell::as_number))
                .sum()
        })
        .collect();

    Some(series)
}

/// Rebuilds the derived expense column on the dataset so it can appear in the
/// display table. Any previous derived column is discarded first; the column
/// is only re-added when the expense intersection is non-empty.
pub fn append_expense_total(dataset: Dataset, selection: &MetricSelection) -> Dataset {
    let mut dataset = dataset;
    if let Some(idx) = dataset.column_index(EXPENSE_TOTAL_COLUMN) {
        dataset.columns.remove(idx);
        for row in &mut dataset.rows {
            if idx < row.cells.len() {
                row.cells.remove(idx);
            }
        }
    }

    let Some(series) = expense_series(&dataset, selection) else {
        return dataset;
    };

    dataset.columns.push(Column {
        name: EXPENSE_TOTAL_COLUMN.to_string(),
        kind: ColumnKind::Numeric,
    });
    for (row, total) in dataset.rows.iter_mut().zip(series) {
        row.cells.push(Cell::Number(total));
    }

    dataset
}

/// Chart-ready named series aligned to the resolved axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// One label per row: `MM/YYYY` on a calendar axis, raw text otherwise.
    pub axis: Vec<String>,
    /// One series per selected metric whose column exists, keyed by column
    /// name. Malformed and empty cells contribute 0.
    pub metrics: BTreeMap<String, Vec<f64>>,
    /// The derived expense total, present only when the expense intersection
    /// of the selection is non-empty.
    pub expense_total: Option<Vec<f64>>,
}

pub fn collect_chart_series(dataset: &Dataset, selection: &MetricSelection) -> ChartSeries {
    let mut metrics = BTreeMap::new();
    for metric in selection.iter() {
        let Some(idx) = dataset.column_index(metric.column_name()) else {
            continue;
        };
        let values: Vec<f64> = dataset
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .get(idx)
                    .and_then(Cell::as_number)
                    .unwrap_or(0.0)
            })
            .collect();
        metrics.insert(metric.column_name().to_string(), values);
    }

    ChartSeries {
        axis: dataset.axis_labels(),
        metrics,
        expense_total: expense_series(dataset, selection),
    }
}
