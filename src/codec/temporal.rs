use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::error::SqlAdapterError;

/// How a date/time argument is rendered, chosen from the target column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalTarget {
    Time,
    Date,
    DateTime,
}

impl TemporalTarget {
    /// `TIME`/`TIME2` and `DATE`/`NEWDATE` get their short forms; anything else,
    /// including no declared type, is a full datetime.
    #[must_use]
    pub fn for_db_type(db_type: Option<&str>) -> Self {
        match db_type {
            Some("TIME" | "TIME2") => TemporalTarget::Time,
            Some("DATE" | "NEWDATE") => TemporalTarget::Date,
            _ => TemporalTarget::DateTime,
        }
    }

    #[must_use]
    pub fn format(self, value: &DateTime<Utc>) -> String {
        match self {
            TemporalTarget::Time => format_time(value),
            TemporalTarget::Date => format_date(value),
            TemporalTarget::DateTime => format_date_time(value),
        }
    }
}

// Leap seconds carry nanos past 1e9; fold them back into the millisecond range.
fn millis(value: &DateTime<Utc>) -> u32 {
    (value.nanosecond() / 1_000_000) % 1000
}

fn fraction(value: &DateTime<Utc>) -> String {
    match millis(value) {
        0 => String::new(),
        ms => format!(".{ms:03}"),
    }
}

/// `YYYY-MM-DD HH:MM:SS[.mmm]` in UTC.
#[must_use]
pub fn format_date_time(value: &DateTime<Utc>) -> String {
    format!("{}{}", value.format("%Y-%m-%d %H:%M:%S"), fraction(value))
}

/// `YYYY-MM-DD` in UTC.
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// `HH:MM:SS[.mmm]` in UTC.
#[must_use]
pub fn format_time(value: &DateTime<Utc>) -> String {
    format!("{}{}", value.format("%H:%M:%S"), fraction(value))
}

/// Parse the textual datetimes the ORM sends.
///
/// RFC 3339 keeps its offset (converted to UTC); offset-less forms are read as UTC.
///
/// # Errors
/// Returns `SqlAdapterError::ParameterError` if no accepted layout matches.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>, SqlAdapterError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(SqlAdapterError::ParameterError(format!(
        "invalid datetime value: {text:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 4, 5, 6).unwrap() + chrono::Duration::milliseconds(i64::from(ms))
    }

    #[test]
    fn whole_seconds_have_no_fraction() {
        assert_eq!(format_date_time(&at(0)), "2024-03-07 04:05:06");
        assert_eq!(format_time(&at(0)), "04:05:06");
    }

    #[test]
    fn milliseconds_are_three_digits() {
        assert_eq!(format_date_time(&at(7)), "2024-03-07 04:05:06.007");
        assert_eq!(format_time(&at(450)), "04:05:06.450");
    }

    #[test]
    fn sub_millisecond_precision_is_truncated() {
        let value = Utc.with_ymd_and_hms(2024, 3, 7, 4, 5, 6).unwrap()
            + chrono::Duration::microseconds(999);
        assert_eq!(format_date_time(&value), "2024-03-07 04:05:06");
    }

    #[test]
    fn target_selection() {
        assert_eq!(TemporalTarget::for_db_type(Some("TIME2")), TemporalTarget::Time);
        assert_eq!(TemporalTarget::for_db_type(Some("NEWDATE")), TemporalTarget::Date);
        assert_eq!(TemporalTarget::for_db_type(Some("TIMESTAMP")), TemporalTarget::DateTime);
        assert_eq!(TemporalTarget::for_db_type(None), TemporalTarget::DateTime);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = parse_datetime("2024-03-07T06:05:06.120+02:00").unwrap();
        assert_eq!(format_date_time(&parsed), "2024-03-07 04:05:06.120");
    }

    #[test]
    fn date_only_text_is_midnight_utc() {
        let parsed = parse_datetime("1999-12-31").unwrap();
        assert_eq!(format_date_time(&parsed), "1999-12-31 00:00:00");
    }

    #[test]
    fn formatted_forms_parse_back() {
        for ms in [0, 7, 999] {
            let value = at(ms);
            assert_eq!(parse_datetime(&format_date_time(&value)).unwrap(), value);
            let date = parse_datetime(&format_date(&value)).unwrap();
            assert_eq!(date.date_naive(), value.date_naive());
            let time = chrono::NaiveTime::parse_from_str(&format_time(&value), "%H:%M:%S%.f").unwrap();
            assert_eq!(time, value.time());
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(SqlAdapterError::ParameterError(_))
        ));
    }
}
