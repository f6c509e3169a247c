//! # Fiscal Dashboard Core
//!
//! Normalization and aggregation pipeline behind a monthly fiscal dashboard:
//! ingest a spreadsheet of accounting figures, resolve the heterogeneous
//! month column into a canonical time axis, filter and aggregate the
//! recognized metrics, and produce summary totals, chart-ready series and a
//! locale-formatted display table.
//!
//! ## Core Concepts
//!
//! - **Month label**: the raw text in the required `MÊS` column, resolved by
//!   a fixed, ordered list of format attempts
//! - **Axis**: one-shot classification of the whole dataset: calendar when
//!   any label resolves (unresolved rows are dropped), raw label otherwise
//! - **Metric vocabulary**: the closed set of 14 recognized columns;
//!   unknown columns pass through display but are never aggregated
//! - **Expense total**: derived per-month sum over the selected expense
//!   metrics, omitted when the selection contains none of them
//!
//! ## Example
//!
//! ```rust,ignore
//! use fiscal_dashboard_core::*;
//! use std::path::Path;
//!
//! let frame = ingestion::read_xlsx(Path::new("movimento.xlsx"))?;
//! let request = DashboardRequest {
//!     metrics: MetricSelection::all(),
//!     range: Some(DateRange::months("2023-01", "2023-06")?),
//!     table: TableStyle::default(),
//! };
//!
//! let dashboard = build_dashboard(frame, &request);
//! println!("total sales: {}", dashboard.summary.sales);
//! ```

pub mod aggregate;
pub mod brl;
pub mod dates;
pub mod error;
pub mod frame;
pub mod ingestion;
pub mod schema;
pub mod table;
pub mod utils;

pub use aggregate::{
    append_expense_total, collect_chart_series, expense_series, filter_by_range,
    headline_summary, metric_sum, resolve_axis, AxisResolution, ChartSeries, HeadlineSummary,
    EXPENSE_TOTAL_COLUMN,
};
pub use dates::{normalize_month_label, parse_month_label, MonthFormat};
pub use error::{FiscalPipelineError, Result};
pub use frame::{
    AxisKind, Cell, Column, ColumnKind, Dataset, RawFrame, RawRow, Row, LABEL_COLUMN,
};
pub use schema::{DashboardRequest, DateRange, Metric, MetricSelection};
pub use table::{
    build_display_table, format_number, DisplayTable, NumberStyle, TableStyle, ZeroDisplay,
    TOTAL_MARKER,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything the presentation layer needs for one dashboard render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub axis: AxisKind,
    pub summary: HeadlineSummary,
    pub charts: ChartSeries,
    pub table: DisplayTable,
    /// Non-fatal, user-visible notices raised by fallback decisions.
    pub advisories: Vec<String>,
}

pub struct DashboardProcessor;

impl DashboardProcessor {
    /// Runs the whole pipeline on one loaded frame. Pure and stateless:
    /// every invocation is an isolated transformation of its inputs.
    pub fn process(frame: RawFrame, request: &DashboardRequest) -> DashboardData {
        info!(
            "Processing fiscal frame: {} row(s), {} data column(s)",
            frame.rows.len(),
            frame.columns.len()
        );

        let AxisResolution {
            dataset,
            advisories,
        } = resolve_axis(frame);

        let dataset = match &request.range {
            Some(range) => filter_by_range(dataset, range),
            None => dataset,
        };
        debug!(
            "Axis {:?}, {} row(s) after filtering",
            dataset.axis,
            dataset.rows.len()
        );

        let summary = headline_summary(&dataset);
        let dataset = append_expense_total(dataset, &request.metrics);
        let charts = collect_chart_series(&dataset, &request.metrics);
        let column_names = dataset.column_names();
        let table = build_display_table(&dataset, &column_names, &request.table);

        DashboardData {
            axis: dataset.axis,
            summary,
            charts,
            table,
            advisories,
        }
    }
}

/// Convenience wrapper over [`DashboardProcessor::process`].
pub fn build_dashboard(frame: RawFrame, request: &DashboardRequest) -> DashboardData {
    DashboardProcessor::process(frame, request)
}
