//! The typed parking session record produced by the loader.

use chrono::FixedOffset;
use serde::Serialize;

use crate::timestamp::parse_arrival;

/// Day bucket label for sessions without an arrival time.
pub const TIME_UNKNOWN: &str = "Time Unknown";

/// NaN and infinities count as 0 wherever a duration is summed or compared.
pub fn finite_or_zero(seconds: f64) -> f64 {
    if seconds.is_finite() { seconds } else { 0.0 }
}

/// One parking session, i.e. one CSV row that survived loading.
///
/// Numeric fields fall back to NaN and text fields to `None` when the source
/// cell is absent, empty or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingRecord {
    pub bay_id: String,
    pub license_plate: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_time: Option<String>,
    pub duration_seconds: f64,
}

impl ParkingRecord {
    /// A plate is invalid when absent, empty, or the literal `null` in any case.
    pub fn has_invalid_plate(&self) -> bool {
        match self.license_plate.as_deref() {
            None => true,
            Some(plate) => plate.is_empty() || plate.eq_ignore_ascii_case("null"),
        }
    }

    /// Duration with NaN and infinities treated as 0.
    pub fn duration_or_zero(&self) -> f64 {
        finite_or_zero(self.duration_seconds)
    }

    fn arrival_text(&self) -> Option<&str> {
        self.arrival_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Calendar day key: the text before the time component, or [`TIME_UNKNOWN`].
    pub fn arrival_day(&self) -> &str {
        match self.arrival_text() {
            Some(text) => text.split(['T', ' ']).next().unwrap_or(text),
            None => TIME_UNKNOWN,
        }
    }

    /// Hour of day in the `zone` display offset, `None` if the arrival time is
    /// missing or cannot be read.
    pub fn arrival_hour(&self, zone: FixedOffset) -> Option<u32> {
        use chrono::Timelike;

        let text = self.arrival_text()?;
        parse_arrival(text, zone).map(|dt| dt.hour())
    }
}

#[cfg(test)]
pub(crate) fn record(
    bay_id: &str,
    plate: Option<&str>,
    arrival: Option<&str>,
    duration: f64,
) -> ParkingRecord {
    ParkingRecord {
        bay_id: bay_id.to_string(),
        license_plate: plate.map(str::to_string),
        latitude: -31.9321,
        longitude: 115.9523,
        arrival_time: arrival.map(str::to_string),
        duration_seconds: duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_invalid_plate_variants() {
        assert!(record("B1", None, None, 0.0).has_invalid_plate());
        assert!(record("B1", Some(""), None, 0.0).has_invalid_plate());
        assert!(record("B1", Some("NULL"), None, 0.0).has_invalid_plate());
        assert!(record("B1", Some("Null"), None, 0.0).has_invalid_plate());
        assert!(!record("B1", Some("ABC123"), None, 0.0).has_invalid_plate());
        assert!(!record("B1", Some("nullx"), None, 0.0).has_invalid_plate());
    }

    #[test]
    fn test_duration_or_zero() {
        assert_eq!(record("B1", None, None, f64::NAN).duration_or_zero(), 0.0);
        assert_eq!(record("B1", None, None, f64::INFINITY).duration_or_zero(), 0.0);
        assert_eq!(record("B1", None, None, 42.0).duration_or_zero(), 42.0);
    }

    #[test]
    fn test_arrival_day() {
        assert_eq!(
            record("B1", None, Some("2024-01-01T10:00:00"), 0.0).arrival_day(),
            "2024-01-01"
        );
        assert_eq!(
            record("B1", None, Some("2024-03-02 08:15:00"), 0.0).arrival_day(),
            "2024-03-02"
        );
        assert_eq!(record("B1", None, Some("2024-03-02"), 0.0).arrival_day(), "2024-03-02");
        assert_eq!(record("B1", None, Some(""), 0.0).arrival_day(), TIME_UNKNOWN);
        assert_eq!(record("B1", None, Some("   "), 0.0).arrival_day(), TIME_UNKNOWN);
        assert_eq!(record("B1", None, None, 0.0).arrival_day(), TIME_UNKNOWN);
    }

    #[test]
    fn test_arrival_day_ignores_surrounding_whitespace() {
        let r = record("B1", None, Some(" 2024-01-01T10:00:00"), 0.0);
        assert_eq!(r.arrival_day(), "2024-01-01");
        assert_eq!(r.arrival_hour(utc()), Some(10));
    }

    #[test]
    fn test_arrival_hour() {
        assert_eq!(
            record("B1", None, Some("2024-01-01T10:00:00"), 0.0).arrival_hour(utc()),
            Some(10)
        );
        assert_eq!(record("B1", None, Some("garbage"), 0.0).arrival_hour(utc()), None);
        assert_eq!(record("B1", None, None, 0.0).arrival_hour(utc()), None);
    }
}
