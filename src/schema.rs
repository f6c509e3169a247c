use crate::error::{FiscalPipelineError, Result};
use crate::table::TableStyle;
use crate::utils::last_day_of_month;
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The closed vocabulary of recognized metric columns. Serialized names match
/// the spreadsheet headers exactly, diacritics included; anything else in the
/// source table is passed through display but never aggregated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Metric {
    #[serde(rename = "VENDAS")]
    #[schemars(description = "Gross sales for the month")]
    Sales,

    #[serde(rename = "COMPRAS")]
    #[schemars(description = "Purchases of goods and inputs")]
    Purchases,

    #[serde(rename = "DAS")]
    #[schemars(description = "Simples Nacional unified tax payment (DAS)")]
    Das,

    #[serde(rename = "FOLHA")]
    #[schemars(description = "Payroll total")]
    Payroll,

    #[serde(rename = "PRO-LABORE")]
    #[schemars(description = "Owner's pro-labore compensation")]
    ProLabore,

    #[serde(rename = "FGTS")]
    #[schemars(description = "FGTS payroll deposit")]
    Fgts,

    #[serde(rename = "MULTA FGTS")]
    #[schemars(description = "FGTS fine on termination")]
    FgtsFine,

    #[serde(rename = "RESCISÃO")]
    #[schemars(description = "Severance payments")]
    Severance,

    #[serde(rename = "FÉRIAS")]
    #[schemars(description = "Vacation pay")]
    VacationPay,

    #[serde(rename = "13 SALARIO")]
    #[schemars(description = "Year-end thirteenth salary")]
    ThirteenthSalary,

    #[serde(rename = "DCTFWEB")]
    #[schemars(description = "DCTFWeb tax declaration payment")]
    Dctfweb,

    #[serde(rename = "Contrib. Assistencial")]
    #[schemars(description = "Union assistance contribution")]
    UnionContribution,

    #[serde(rename = "ISSQN Retido")]
    #[schemars(description = "Withheld municipal service tax (ISSQN)")]
    IssqnWithheld,

    #[serde(rename = "CARTAO E PIX")]
    #[schemars(description = "Card and PIX receipts; excluded from the expense total")]
    CardAndPix,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::Purchases,
        Metric::Sales,
        Metric::Das,
        Metric::Payroll,
        Metric::ProLabore,
        Metric::Fgts,
        Metric::FgtsFine,
        Metric::Severance,
        Metric::VacationPay,
        Metric::ThirteenthSalary,
        Metric::Dctfweb,
        Metric::UnionContribution,
        Metric::IssqnWithheld,
        Metric::CardAndPix,
    ];

    /// The four summary-card totals, computed regardless of metric selection.
    pub const HEADLINE: [Metric; 4] = [
        Metric::Sales,
        Metric::Purchases,
        Metric::Das,
        Metric::Payroll,
    ];

    /// The expense vocabulary summed into the derived total: everything
    /// except sales and card/PIX receipts.
    pub const EXPENSES: [Metric; 12] = [
        Metric::Purchases,
        Metric::Das,
        Metric::Payroll,
        Metric::ProLabore,
        Metric::Fgts,
        Metric::FgtsFine,
        Metric::Severance,
        Metric::VacationPay,
        Metric::ThirteenthSalary,
        Metric::Dctfweb,
        Metric::UnionContribution,
        Metric::IssqnWithheld,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Sales => "VENDAS",
            Metric::Purchases => "COMPRAS",
            Metric::Das => "DAS",
            Metric::Payroll => "FOLHA",
            Metric::ProLabore => "PRO-LABORE",
            Metric::Fgts => "FGTS",
            Metric::FgtsFine => "MULTA FGTS",
            Metric::Severance => "RESCISÃO",
            Metric::VacationPay => "FÉRIAS",
            Metric::ThirteenthSalary => "13 SALARIO",
            Metric::Dctfweb => "DCTFWEB",
            Metric::UnionContribution => "Contrib. Assistencial",
            Metric::IssqnWithheld => "ISSQN Retido",
            Metric::CardAndPix => "CARTAO E PIX",
        }
    }

    /// Exact, case-sensitive lookup against the vocabulary.
    pub fn from_column_name(name: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.column_name() == name)
    }
}

/// The caller-chosen subset of the vocabulary driving chart series and the
/// derived expense total. Headline totals ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct MetricSelection(BTreeSet<Metric>);

impl MetricSelection {
    pub fn all() -> Self {
        MetricSelection(Metric::ALL.into_iter().collect())
    }

    pub fn empty() -> Self {
        MetricSelection(BTreeSet::new())
    }

    pub fn from_metrics<I: IntoIterator<Item = Metric>>(metrics: I) -> Self {
        MetricSelection(metrics.into_iter().collect())
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains(&metric)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected metrics in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(|metric| self.0.contains(metric))
    }

    /// Intersection with the expense vocabulary, in vocabulary order.
    pub fn selected_expenses(&self) -> Vec<Metric> {
        Metric::EXPENSES
            .into_iter()
            .filter(|metric| self.0.contains(metric))
            .collect()
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Inclusive calendar-day range for filtering a calendar-axis dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Builds a range spanning whole months from "YYYY-MM" bounds.
    pub fn months(start: &str, end: &str) -> Result<Self> {
        let start_date = parse_month_arg(start)?;
        let end_start = parse_month_arg(end)?;
        Ok(DateRange {
            start: start_date,
            end: last_day_of_month(end_start.year(), end_start.month()),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

fn parse_month_arg(month: &str) -> Result<NaiveDate> {
    let padded = format!("{}-01", month.trim());
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d")
        .map_err(|_| FiscalPipelineError::InvalidMonth(month.to_string()))
}

/// One dashboard invocation: pure function of (dataset, selection, range),
/// no ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct DashboardRequest {
    #[serde(default)]
    #[schemars(description = "Metrics to chart and to include in the expense total")]
    pub metrics: MetricSelection,

    #[serde(default)]
    #[schemars(description = "Optional inclusive date filter; ignored on a raw-label axis")]
    pub range: Option<DateRange>,

    #[serde(default)]
    #[schemars(description = "Numeric formatting for the display table")]
    pub table: TableStyle,
}
