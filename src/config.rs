//! Runtime configuration, read from the environment (and `.env`).
//!
//! | Variable              | Default              |
//! |-----------------------|----------------------|
//! | `PARKING_DATA_SOURCE` | `parking-data.csv`   |
//! | `PARKING_UTC_OFFSET`  | `+00:00`             |
//! | `PARKING_MAP_CENTER`  | `-31.9321,115.9523`  |
//! | `PARKING_MAP_ZOOM`    | `19`                 |

use anyhow::{Context, Result, anyhow};
use chrono::{FixedOffset, Offset, Utc};

use crate::map::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::timestamp::parse_offset;

pub const DEFAULT_SOURCE: &str = "parking-data.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Path or http(s) URL of the CSV resource.
    pub source: String,
    /// Offset in which arrival hours are read.
    pub zone: FixedOffset,
    pub map_center: (f64, f64),
    pub map_zoom: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            zone: Utc.fix(),
            map_center: DEFAULT_CENTER,
            map_zoom: DEFAULT_ZOOM,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys keep defaults;
    /// set but unparsable values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(source) = lookup("PARKING_DATA_SOURCE").filter(|s| !s.is_empty()) {
            cfg.source = source;
        }

        if let Some(offset) = lookup("PARKING_UTC_OFFSET") {
            cfg.zone = parse_offset(&offset)
                .ok_or_else(|| anyhow!("PARKING_UTC_OFFSET: invalid offset '{offset}'"))?;
        }

        if let Some(center) = lookup("PARKING_MAP_CENTER") {
            cfg.map_center = parse_center(&center).context("PARKING_MAP_CENTER")?;
        }

        if let Some(zoom) = lookup("PARKING_MAP_ZOOM") {
            cfg.map_zoom = zoom
                .trim()
                .parse()
                .with_context(|| format!("PARKING_MAP_ZOOM: invalid zoom '{zoom}'"))?;
        }

        Ok(cfg)
    }
}

/// Parses `lat,lon`.
pub fn parse_center(text: &str) -> Result<(f64, f64)> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("expected 'lat,lon', got '{text}'"))?;

    let lat: f64 = lat.trim().parse().context("invalid latitude")?;
    let lon: f64 = lon.trim().parse().context("invalid longitude")?;
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.source, "parking-data.csv");
        assert_eq!(cfg.zone.local_minus_utc(), 0);
    }

    #[test]
    fn test_overrides() {
        let cfg = DashboardConfig::from_lookup(lookup_from(&[
            ("PARKING_DATA_SOURCE", "https://example.com/data.csv"),
            ("PARKING_UTC_OFFSET", "+08:00"),
            ("PARKING_MAP_CENTER", "-32.0, 115.8"),
            ("PARKING_MAP_ZOOM", "17"),
        ]))
        .unwrap();

        assert_eq!(cfg.source, "https://example.com/data.csv");
        assert_eq!(cfg.zone.local_minus_utc(), 8 * 3600);
        assert_eq!(cfg.map_center, (-32.0, 115.8));
        assert_eq!(cfg.map_zoom, 17);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(DashboardConfig::from_lookup(lookup_from(&[("PARKING_UTC_OFFSET", "perth")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup_from(&[("PARKING_MAP_CENTER", "-32.0")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup_from(&[("PARKING_MAP_ZOOM", "high")])).is_err());
    }
}
