//! Parsing of highlight creation times.
//!
//! Exports are not consistent about how `created_at` is written. Accepted
//! forms, tried in order:
//!
//! - RFC 3339 (`2020-01-02T03:04:05Z`) and RFC 2822 (`Thu, 02 Jan 2020 03:04:05 +0000`)
//! - ISO-ish date-times read as UTC: `2020-01-02 03:04:05`, `2020-01-02T03:04:05.123456`,
//!   `2020/01/02 03:04`
//! - month-name forms: `January 2, 2020`, `Jan 2, 2020 5:57:51 PM`, `2 Jan 2020 10:00`
//! - dates alone, at midnight UTC: `2020-01-02`, `2020/01/02`, `2 January 2020`
//! - a Unix epoch in seconds (`1577923200`)
//!
//! Numeric day/month orders such as `02/01/2020` are ambiguous and rejected.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::{ExcerptaError, Result};

/// Parses a `created_at` value into an absolute instant.
///
/// # Errors
///
/// Returns [`ExcerptaError::TimestampParse`] when no accepted form matches.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime> {
    let trimmed = value.trim();
    let err = || ExcerptaError::TimestampParse { value: value.to_string() };

    if trimmed.is_empty() {
        return Err(err());
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc2822) {
        return Ok(dt);
    }

    let date_times = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]/[month]/[day] [hour]:[minute]:[second]"),
        format_description!("[year]/[month]/[day] [hour]:[minute]"),
        format_description!(
            "[month repr:long case_sensitive:false] [day padding:none], [year] [hour repr:12 padding:none]:[minute]:[second] [period case_sensitive:false]"
        ),
        format_description!(
            "[month repr:short case_sensitive:false] [day padding:none], [year] [hour repr:12 padding:none]:[minute]:[second] [period case_sensitive:false]"
        ),
        format_description!("[day padding:none] [month repr:long case_sensitive:false] [year] [hour]:[minute]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year] [hour]:[minute]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year] [hour]:[minute]:[second]"),
    ];
    for format in date_times {
        if let Ok(dt) = PrimitiveDateTime::parse(trimmed, format) {
            return Ok(dt.assume_utc());
        }
    }

    let dates = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[year]/[month]/[day]"),
        format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]"),
        format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]"),
        format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
    ];
    for format in dates {
        if let Ok(date) = Date::parse(trimmed, format) {
            return Ok(date.midnight().assume_utc());
        }
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = trimmed.parse().map_err(|_| err())?;
        return OffsetDateTime::from_unix_timestamp(secs).map_err(|_| err());
    }

    Err(err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2020-01-02T03:04:05Z", 1577934245)]
    #[case("2020-01-02T05:04:05+02:00", 1577934245)]
    #[case("Thu, 02 Jan 2020 03:04:05 +0000", 1577934245)]
    #[case("2020-01-02 03:04:05", 1577934245)]
    #[case("2020-01-02T03:04:05", 1577934245)]
    #[case("2020-01-02 03:04:05.123456", 1577934245)]
    #[case("2020-01-02T03:04:05.5", 1577934245)]
    #[case("2020-01-02 03:04", 1577934240)]
    #[case("2020/01/02 03:04:05", 1577934245)]
    #[case("2020/01/02 03:04", 1577934240)]
    #[case("Jan 2, 2020 3:04:05 AM", 1577934245)]
    #[case("January 2, 2020 3:04:05 pm", 1577977445)]
    #[case("2 Jan 2020 10:00", 1577959200)]
    #[case("2 January 2020 10:00", 1577959200)]
    #[case("2 Jan 2020 03:04:05", 1577934245)]
    #[case("2020-01-02", 1577923200)]
    #[case("  2020-01-02  ", 1577923200)]
    #[case("2020/01/02", 1577923200)]
    #[case("January 2, 2020", 1577923200)]
    #[case("jan 2, 2020", 1577923200)]
    #[case("2 January 2020", 1577923200)]
    #[case("02 Jan 2020", 1577923200)]
    #[case("1577934245", 1577934245)]
    fn test_accepted_forms(#[case] input: &str, #[case] epoch: i64) {
        assert_eq!(parse_timestamp(input).unwrap().unix_timestamp(), epoch);
    }

    #[test]
    fn test_subsecond_is_kept() {
        let dt = parse_timestamp("2020-01-02 03:04:05.123456").unwrap();
        assert_eq!(dt.microsecond(), 123_456);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2020-13-45")]
    #[case("02/01/2020")]
    #[case("Janvier 2, 2020")]
    #[case("99999999999999999999")]
    fn test_rejected_forms(#[case] input: &str) {
        assert!(matches!(
            parse_timestamp(input),
            Err(ExcerptaError::TimestampParse { value }) if value == input
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = parse_timestamp("2020-01-01").unwrap();
        let later = parse_timestamp("2020-01-01 00:00:01").unwrap();
        assert!(earlier < later);
    }
}
