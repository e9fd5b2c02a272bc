//! Dates and timestamps
//!
//! Generation timestamps name the output files; session dates are printed
//! under the portfolio's section header.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use crate::error::{Error, Result};

/// File name format for generated portfolios
pub const FILE_NAME_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Default output file name for a generation started at `timestamp`
///
/// Example: "2024-11-20 14-05-09.pdf"
pub fn default_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.pdf", timestamp.format(FILE_NAME_FORMAT))
}

/// Session date expression
#[derive(Debug, Clone, PartialEq)]
pub enum DateExpression {
    /// Use today's date
    Today,
    /// Use yesterday's date
    Yesterday,
    /// Use an explicit date
    Explicit(NaiveDate),
    /// No date (empty/null)
    None,
}

/// Parse a session date expression
///
/// Supported formats:
/// - `""` (empty) → None
/// - `"today"` / `"yesterday"`
/// - `"2024-11-20"` → Explicit date (ISO format)
/// - `"11/20/2024"` → Explicit date (US format)
pub fn parse_date_expression(expr: &str) -> Result<DateExpression> {
    let expr = expr.trim();

    if expr.is_empty() {
        return Ok(DateExpression::None);
    }
    if expr.eq_ignore_ascii_case("today") {
        return Ok(DateExpression::Today);
    }
    if expr.eq_ignore_ascii_case("yesterday") {
        return Ok(DateExpression::Yesterday);
    }

    NaiveDate::parse_from_str(expr, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(expr, "%m/%d/%Y"))
        .map(DateExpression::Explicit)
        .map_err(|_| Error::InvalidDateExpression(format!("Unable to parse date expression: {}", expr)))
}

/// Resolve a DateExpression to an actual date (if applicable)
pub fn resolve_date(expr: &DateExpression) -> Option<NaiveDate> {
    let today = Local::now().date_naive();
    match expr {
        DateExpression::None => None,
        DateExpression::Today => Some(today),
        DateExpression::Yesterday => Some(today - Duration::days(1)),
        DateExpression::Explicit(date) => Some(*date),
    }
}

/// Format a date in the standard format: "Month day, year"
/// Example: "November 20, 2024"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_file_name() {
        let timestamp = Utc.with_ymd_and_hms(2024, 11, 20, 14, 5, 9).unwrap();
        assert_eq!(default_file_name(&timestamp), "2024-11-20 14-05-09.pdf");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_date_expression("").unwrap(), DateExpression::None);
        assert_eq!(parse_date_expression("   ").unwrap(), DateExpression::None);
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_date_expression("today").unwrap(), DateExpression::Today);
        assert_eq!(parse_date_expression("TODAY").unwrap(), DateExpression::Today);
        assert_eq!(parse_date_expression("Yesterday").unwrap(), DateExpression::Yesterday);
    }

    #[test]
    fn test_parse_iso_and_us_dates() {
        let expected = DateExpression::Explicit(NaiveDate::from_ymd_opt(2024, 11, 20).unwrap());
        assert_eq!(parse_date_expression("2024-11-20").unwrap(), expected);
        assert_eq!(parse_date_expression("11/20/2024").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date_expression("someday").is_err());
        assert!(parse_date_expression("2024-13-01").is_err());
    }

    #[test]
    fn test_resolve() {
        let today = Local::now().date_naive();
        assert_eq!(resolve_date(&DateExpression::None), None);
        assert_eq!(resolve_date(&DateExpression::Today), Some(today));

        let yesterday = resolve_date(&DateExpression::Yesterday).unwrap();
        assert_eq!((today - yesterday).num_days(), 1);

        let date = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        assert_eq!(resolve_date(&DateExpression::Explicit(date)), Some(date));
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        assert_eq!(format_date(&date), "November 20, 2024");

        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(format_date(&date), "January 7, 2026");
    }
}
