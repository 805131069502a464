//! Date formatting used by the API.

use chrono::NaiveDateTime;

use crate::error::{Result, WykopError};

/// Format the service expects in query parameters and returns in payloads.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn datetime_to_string(dt: &NaiveDateTime) -> String {
    dt.format(API_DATE_FORMAT).to_string()
}

/// # Errors
///
/// Returns [`WykopError::ParseResponse`] if `value` is not in
/// [`API_DATE_FORMAT`].
pub fn string_to_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), API_DATE_FORMAT)
        .map_err(|e| WykopError::ParseResponse(format!("invalid date '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_without_fraction_or_zone() {
        let dt = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_milli_opt(7, 8, 9, 450)
            .unwrap();
        assert_eq!(datetime_to_string(&dt), "2023-01-05 07:08:09");
    }

    #[test]
    fn parses_api_dates() {
        let dt = string_to_datetime("2024-12-31 23:59:01").unwrap();
        assert_eq!(datetime_to_string(&dt), "2024-12-31 23:59:01");
    }

    #[test]
    fn rejects_other_formats() {
        assert!(matches!(
            string_to_datetime("2024-12-31T23:59:01Z"),
            Err(WykopError::ParseResponse(_))
        ));
    }
}
