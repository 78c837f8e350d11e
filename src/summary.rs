//! Derived dashboard statistics.
//!
//! [`aggregate`] turns the loaded records into every view the dashboard
//! charts: totals, average duration, invalid plate count, sessions per day,
//! arrivals per hour, duration buckets and bay usage ranking. It is a pure
//! function of its input and the pinned display offset.

use std::collections::{BTreeMap, HashMap};

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::record::{ParkingRecord, finite_or_zero};

pub const SHORT_LIMIT_SECS: f64 = 3600.0;
pub const LONG_THRESHOLD_SECS: f64 = 86400.0;

/// Session length class. Bounds are half-open: `[0, 3600)`, `[3600, 86400)`,
/// `[86400, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Classifies a duration in seconds. Non-finite values count as 0 and land
    /// in `Short`, as do negative values.
    pub fn classify(seconds: f64) -> Self {
        match finite_or_zero(seconds) {
            s if s < SHORT_LIMIT_SECS => Self::Short,
            s if s < LONG_THRESHOLD_SECS => Self::Medium,
            _ => Self::Long,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short (<1h)",
            Self::Medium => "Medium (1h–24h)",
            Self::Long => "Long (>24h)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BayCount {
    pub bay_id: String,
    pub count: usize,
}

/// Everything the chart panels need, computed in one go from the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub total: usize,
    /// Mean duration in whole seconds, halves rounded up.
    pub avg: i64,
    pub invalid: usize,
    pub daily: Vec<DayCount>,
    pub hourly: Vec<HourCount>,
    #[serde(rename = "durationBreakdown")]
    pub duration_breakdown: Vec<DurationSlice>,
    #[serde(rename = "bayUsage")]
    pub bay_usage: Vec<BayCount>,
}

impl SummaryView {
    /// Count held by `bucket` in the duration breakdown.
    pub fn bucket_count(&self, bucket: DurationBucket) -> usize {
        self.duration_breakdown
            .iter()
            .find(|s| s.name == bucket.label())
            .map_or(0, |s| s.value)
    }
}

/// Aggregates with hours read in UTC.
pub fn aggregate(records: &[ParkingRecord]) -> Option<SummaryView> {
    aggregate_in(records, Utc.fix())
}

/// Aggregates with hours read in the `zone` display offset. Returns `None` for
/// an empty slice.
pub fn aggregate_in(records: &[ParkingRecord], zone: FixedOffset) -> Option<SummaryView> {
    if records.is_empty() {
        return None;
    }

    let durations: Vec<f64> = records.iter().map(ParkingRecord::duration_or_zero).collect();
    let avg = round_half_up(mean(&durations));
    let invalid = records.iter().filter(|r| r.has_invalid_plate()).count();

    Some(SummaryView {
        total: records.len(),
        avg,
        invalid,
        daily: daily_counts(records),
        hourly: hourly_counts(records, zone),
        duration_breakdown: duration_breakdown(&durations),
        bay_usage: bay_usage(records),
    })
}

fn daily_counts(records: &[ParkingRecord]) -> Vec<DayCount> {
    let mut by_day: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *by_day.entry(r.arrival_day()).or_default() += 1;
    }

    by_day
        .into_iter()
        .map(|(day, count)| DayCount {
            day: day.to_string(),
            count,
        })
        .collect()
}

fn hourly_counts(records: &[ParkingRecord], zone: FixedOffset) -> Vec<HourCount> {
    let mut by_hour = [0usize; 24];
    for hour in records.iter().filter_map(|r| r.arrival_hour(zone)) {
        by_hour[hour as usize] += 1;
    }

    (0u32..)
        .zip(by_hour)
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

fn duration_breakdown(durations: &[f64]) -> Vec<DurationSlice> {
    let mut counts = [0usize; 3];
    for d in durations {
        counts[DurationBucket::classify(*d) as usize] += 1;
    }

    DurationBucket::ALL
        .iter()
        .zip(counts)
        .map(|(bucket, value)| DurationSlice {
            name: bucket.label().to_string(),
            value,
        })
        .collect()
}

/// Sessions per bay, busiest first. Ties keep first-appearance order.
fn bay_usage(records: &[ParkingRecord]) -> Vec<BayCount> {
    let mut usage: Vec<BayCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in records {
        match index.get(r.bay_id.as_str()) {
            Some(&i) => usage[i].count += 1,
            None => {
                index.insert(&r.bay_id, usage.len());
                usage.push(BayCount {
                    bay_id: r.bay_id.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to the nearest integer with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
