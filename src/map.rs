//! Map markers for the session map panel.

use serde::Serialize;

use crate::record::{ParkingRecord, finite_or_zero};
use crate::summary::{LONG_THRESHOLD_SECS, SHORT_LIMIT_SECS};

/// Default map centre (latitude, longitude) and zoom.
pub const DEFAULT_CENTER: (f64, f64) = (-31.9321, 115.9523);
pub const DEFAULT_ZOOM: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Orange,
    Green,
}

impl MarkerColor {
    /// Red above a day, orange above an hour, green otherwise. Both bounds are
    /// strict, so exactly 3600s is green and exactly 86400s is orange.
    /// Non-finite durations count as 0.
    pub fn for_duration(seconds: f64) -> Self {
        match finite_or_zero(seconds) {
            s if s > LONG_THRESHOLD_SECS => Self::Red,
            s if s > SHORT_LIMIT_SECS => Self::Orange,
            _ => Self::Green,
        }
    }
}

/// One point on the map. Coordinates are passed through untouched, NaN included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: MarkerColor,
    pub bay_id: String,
    pub license_plate: Option<String>,
    pub duration_seconds: f64,
}

impl From<&ParkingRecord> for MapMarker {
    fn from(r: &ParkingRecord) -> Self {
        MapMarker {
            latitude: r.latitude,
            longitude: r.longitude,
            color: MarkerColor::for_duration(r.duration_seconds),
            bay_id: r.bay_id.clone(),
            license_plate: r.license_plate.clone(),
            duration_seconds: r.duration_seconds,
        }
    }
}

pub fn markers(records: &[ParkingRecord]) -> Vec<MapMarker> {
    records.iter().map(MapMarker::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;

    #[test]
    fn test_marker_color_thresholds() {
        assert_eq!(MarkerColor::for_duration(0.0), MarkerColor::Green);
        assert_eq!(MarkerColor::for_duration(3600.0), MarkerColor::Green);
        assert_eq!(MarkerColor::for_duration(3601.0), MarkerColor::Orange);
        assert_eq!(MarkerColor::for_duration(86400.0), MarkerColor::Orange);
        assert_eq!(MarkerColor::for_duration(86401.0), MarkerColor::Red);
        assert_eq!(MarkerColor::for_duration(f64::NAN), MarkerColor::Green);
        assert_eq!(MarkerColor::for_duration(f64::INFINITY), MarkerColor::Green);
        assert_eq!(MarkerColor::for_duration(f64::NEG_INFINITY), MarkerColor::Green);
    }

    #[test]
    fn test_markers_pass_nan_coordinates_through() {
        let mut r = record("B1", Some("ABC"), None, 90000.0);
        r.latitude = f64::NAN;

        let m = markers(&[r]);
        assert_eq!(m.len(), 1);
        assert!(m[0].latitude.is_nan());
        assert_eq!(m[0].color, MarkerColor::Red);
        assert_eq!(m[0].bay_id, "B1");
    }

    #[test]
    fn test_color_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MarkerColor::Orange).unwrap(), "\"orange\"");
    }
}
