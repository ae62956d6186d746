//! Parsing of path segments that carry amounts and dates.
//!
//! Failures become `400` responses with a specific error code, so a bad
//! segment never reaches a repository.

use std::str::FromStr;

use axum::{http::StatusCode, response::Response};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;

use crate::error::json_error;

/// Parses a decimal amount such as `1500` or `1500.00`.
pub fn parse_amount(raw: &str) -> Result<Decimal, Response> {
    Decimal::from_str(raw.trim()).map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "Amount must be a decimal number",
        )
    })
}

/// Parses a calendar day. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp,
/// of which only the UTC date is kept.
pub fn parse_date(raw: &str) -> Result<NaiveDate, Response> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.to_utc().date_naive())
        })
        .ok_or_else(|| {
            json_error(
                StatusCode::BAD_REQUEST,
                "invalid_date",
                "Date must be formatted as YYYY-MM-DD",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1500", dec!(1500))]
    #[case("1500.00", dec!(1500.00))]
    #[case(" -42.5 ", dec!(-42.5))]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).ok(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1,500")]
    fn test_parse_amount_rejects(#[case] raw: &str) {
        let response = parse_amount(raw).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_date("2024-03-15").ok(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_parse_timestamp_keeps_utc_date() {
        assert_eq!(
            parse_date("2024-03-15T23:30:00-02:00").ok(),
            NaiveDate::from_ymd_opt(2024, 3, 16)
        );
    }

    #[rstest]
    #[case("15/03/2024")]
    #[case("2024-02-30")]
    #[case("yesterday")]
    fn test_parse_date_rejects(#[case] raw: &str) {
        let response = parse_date(raw).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
