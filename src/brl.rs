//! Brazilian numeric convention: `.` groups thousands, `,` marks decimals.

use std::str::FromStr;

/// Parses decimals like "1.234,56" or "123,45" into f64.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.replace('.', "").replace(',', ".");
    f64::from_str(&normalized).ok()
}

/// Formats with two decimal places, "." for thousands and "," for decimals.
/// 1234.5 -> "1.234,50".
pub fn format_decimal(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded
        .split_once('.')
        .unwrap_or((rounded.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{},{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_simple() {
        assert_eq!(parse_decimal("123,45"), Some(123.45));
    }

    #[test]
    fn test_parse_decimal_with_thousands() {
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("600.822.115,84"), Some(600822115.84));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("12,3,4"), None);
    }

    #[test]
    fn test_format_decimal_grouping() {
        assert_eq!(format_decimal(1234.5), "1.234,50");
        assert_eq!(format_decimal(1_000_000.0), "1.000.000,00");
        assert_eq!(format_decimal(150.5), "150,50");
        assert_eq!(format_decimal(0.0), "0,00");
    }

    #[test]
    fn test_format_decimal_negative() {
        assert_eq!(format_decimal(-1234.5), "-1.234,50");
    }

    #[test]
    fn test_round_trip() {
        let formatted = format_decimal(98765.43);
        assert_eq!(parse_decimal(&formatted), Some(98765.43));
    }
}
