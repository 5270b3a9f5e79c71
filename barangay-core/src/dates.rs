//! Lenient date parsing for stored string fields.
//!
//! Dates live in the backend as strings in whatever shape the original data
//! entry produced. Aggregation and sorting parse them leniently and skip
//! records that fail, so one bad date never aborts a whole scan.

use chrono::{DateTime, NaiveDate};

/// Parse a stored date string. Accepts RFC 3339 timestamps and the bare
/// date formats observed in legacy records. Returns None when nothing
/// matches; callers decide whether to skip or reject.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Short month name ("Jan".."Dec") for registration histograms.
pub fn short_month_name(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let date = parse_date("2025-03-14T08:30:00+08:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_bare_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        assert_eq!(parse_date("2024-12-05"), Some(expected));
        assert_eq!(parse_date("2024/12/05"), Some(expected));
        assert_eq!(parse_date("12/05/2024"), Some(expected));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn test_short_month_name() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(short_month_name(date), "Jan");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Every date rendered in an accepted legacy format parses back
            /// to itself.
            #[test]
            fn prop_accepted_formats_round_trip(
                year in 1900i32..2100,
                month in 1u32..=12,
                day in 1u32..=28,
            ) {
                let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
                for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
                    let rendered = date.format(format).to_string();
                    prop_assert_eq!(parse_date(&rendered), Some(date));
                }
            }

            /// Surrounding whitespace never changes the parse result.
            #[test]
            fn prop_parse_ignores_surrounding_whitespace(
                value in "[0-9/-]{0,12}",
                pad in "[ \t]{0,3}",
            ) {
                let padded = format!("{pad}{value}{pad}");
                prop_assert_eq!(parse_date(&padded), parse_date(&value));
            }
        }
    }
}
