//! Timestamp parsing and formatting for both sides of the connector

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// Parse a timestamp in any of the shapes the hub or the host emit
///
/// Accepts RFC 3339, minute precision with `Z` (`2019-01-01T00:00Z`), naive date-times
/// (taken as UTC) and bare dates (midnight UTC).
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    let zoned = value
        .strip_suffix('Z')
        .map(|rest| format!("{}+00:00", rest))
        .unwrap_or_else(|| value.to_string());
    if let Ok(parsed) = DateTime::parse_from_str(&zoned, "%Y-%m-%dT%H:%M%:z") {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = value.trim_end_matches('Z');
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Hub-bound form: `2019-01-01T00:00:00Z`, fractional seconds only when present
pub fn to_hub(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Host-bound form: seconds omitted when zero (`2018-02-04T12:34Z`)
pub fn to_engine(value: &DateTime<Utc>) -> String {
    if value.second() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%dT%H:%MZ").to_string()
    } else {
        to_hub(value)
    }
}

/// Reformat a hub timestamp for the host, passing unparseable input through
pub fn hub_to_engine(value: &str) -> String {
    match parse(value) {
        Some(parsed) => to_engine(&parsed),
        None => {
            log::warn!("Unable to parse the timestamp '{}', passing it through", value);
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_shapes() {
        let midnight = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(parse("2019-01-01T00:00Z"), Some(midnight));
        assert_eq!(parse("2019-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse("2019-01-01T01:00:00+01:00"), Some(midnight));
        assert_eq!(parse("2019-01-01T00:00:00"), Some(midnight));
        assert_eq!(parse("2019-01-01"), Some(midnight));
        assert_eq!(parse(""), None);
        assert_eq!(parse("yesterday"), None);
    }

    #[test]
    fn test_to_engine() {
        let whole_minute = Utc.with_ymd_and_hms(2018, 2, 4, 12, 34, 0).unwrap();
        assert_eq!(to_engine(&whole_minute), "2018-02-04T12:34Z");

        let with_seconds = Utc.with_ymd_and_hms(2018, 2, 4, 12, 34, 56).unwrap();
        assert_eq!(to_engine(&with_seconds), "2018-02-04T12:34:56Z");
    }

    #[test]
    fn test_to_hub_normalizes_to_utc() {
        let parsed = parse("2019-06-01T12:00:00+02:00").unwrap();
        assert_eq!(to_hub(&parsed), "2019-06-01T10:00:00Z");
    }

    #[test]
    fn test_hub_to_engine_passes_through_garbage() {
        assert_eq!(hub_to_engine("2018-02-04T12:34:00.000Z"), "2018-02-04T12:34Z");
        assert_eq!(hub_to_engine("not a date"), "not a date");
    }
}
