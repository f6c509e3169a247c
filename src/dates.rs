//! Month-label normalization.
//!
//! Spreadsheets in the wild label months in a handful of ways ("2023-05",
//! "05/2023", "Maio 2023", "mai 2023"). A fixed list of parse attempts is
//! tried in priority order and the first success wins; anything else is
//! reported as unresolved rather than an error, so callers can apply one
//! fallback policy for the whole dataset.

use crate::utils::first_day_of_month;
use chrono::NaiveDate;

/// The recognized month-label formats, in priority order. Numeric `YYYY-MM`
/// is least ambiguous and wins over the locale-dependent month-name forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFormat {
    /// "2023-05"
    YearDashMonth,
    /// "05/2023"
    MonthSlashYear,
    /// "Maio 2023" / "May 2023"
    FullMonthName,
    /// "mai 2023" / "May 2023"
    AbbreviatedMonthName,
}

impl MonthFormat {
    pub const PRIORITY: [MonthFormat; 4] = [
        MonthFormat::YearDashMonth,
        MonthFormat::MonthSlashYear,
        MonthFormat::FullMonthName,
        MonthFormat::AbbreviatedMonthName,
    ];
}

const FULL_MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("janeiro", 1),
    ("fevereiro", 2),
    ("março", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

const ABBREVIATED_MONTH_NAMES: [(&str, u32); 24] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
    ("jan", 1),
    ("fev", 2),
    ("mar", 3),
    ("abr", 4),
    ("mai", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("set", 9),
    ("out", 10),
    ("nov", 11),
    ("dez", 12),
];

/// Resolves a raw month label to the first day of the labeled month, together
/// with the rule that matched. Returns `None` when no known format applies.
pub fn parse_month_label(label: &str) -> Option<(NaiveDate, MonthFormat)> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    for format in MonthFormat::PRIORITY {
        let attempt = match format {
            MonthFormat::YearDashMonth => parse_year_dash_month(label),
            MonthFormat::MonthSlashYear => parse_month_slash_year(label),
            MonthFormat::FullMonthName => parse_month_name(label, &FULL_MONTH_NAMES),
            MonthFormat::AbbreviatedMonthName => {
                parse_month_name(label, &ABBREVIATED_MONTH_NAMES)
            }
        };
        if let Some(date) = attempt {
            return Some((date, format));
        }
    }

    None
}

/// The normalizer contract: canonical month start, or absent.
pub fn normalize_month_label(label: &str) -> Option<NaiveDate> {
    parse_month_label(label).map(|(date, _)| date)
}

fn parse_year_dash_month(label: &str) -> Option<NaiveDate> {
    let (year, month) = label.split_once('-')?;
    let year: i32 = year.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    first_day_of_month(year, month)
}

fn parse_month_slash_year(label: &str) -> Option<NaiveDate> {
    let (month, year) = label.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    first_day_of_month(year, month)
}

fn parse_month_name(label: &str, table: &[(&str, u32)]) -> Option<NaiveDate> {
    let mut parts = label.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let month = table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, month)| *month)?;
    first_day_of_month(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_year_dash_month() {
        assert_eq!(normalize_month_label("2023-05"), Some(ymd(2023, 5, 1)));
        assert_eq!(normalize_month_label(" 2023-5 "), Some(ymd(2023, 5, 1)));
    }

    #[test]
    fn test_month_slash_year() {
        assert_eq!(normalize_month_label("05/2023"), Some(ymd(2023, 5, 1)));
        assert_eq!(normalize_month_label("12/2023"), Some(ymd(2023, 12, 1)));
    }

    #[test]
    fn test_month_names_both_locales() {
        assert_eq!(normalize_month_label("Maio 2023"), Some(ymd(2023, 5, 1)));
        assert_eq!(normalize_month_label("May 2023"), Some(ymd(2023, 5, 1)));
        assert_eq!(normalize_month_label("MARÇO 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(normalize_month_label("fev 2023"), Some(ymd(2023, 2, 1)));
        assert_eq!(normalize_month_label("dez 2022"), Some(ymd(2022, 12, 1)));
    }

    #[test]
    fn test_unresolvable_labels() {
        assert_eq!(normalize_month_label(""), None);
        assert_eq!(normalize_month_label("bad-label"), None);
        assert_eq!(normalize_month_label("13/2023"), None);
        assert_eq!(normalize_month_label("2023-13"), None);
        assert_eq!(normalize_month_label("Smarch 2023"), None);
        // Full dates are outside the closed format list.
        assert_eq!(normalize_month_label("2023-05-01"), None);
    }

    #[test]
    fn test_priority_order_is_observable() {
        // "May 2023" satisfies both month-name rules; the full-name rule
        // comes first in priority order and must win.
        let (date, format) = parse_month_label("May 2023").unwrap();
        assert_eq!(date, ymd(2023, 5, 1));
        assert_eq!(format, MonthFormat::FullMonthName);

        let (_, format) = parse_month_label("mai 2023").unwrap();
        assert_eq!(format, MonthFormat::AbbreviatedMonthName);

        let (_, format) = parse_month_label("2023-05").unwrap();
        assert_eq!(format, MonthFormat::YearDashMonth);
    }

    #[test]
    fn test_first_day_invariant() {
        for label in ["2023-02", "02/2023", "Fevereiro 2023", "feb 2023"] {
            assert_eq!(normalize_month_label(label), Some(ymd(2023, 2, 1)));
        }
    }
}
