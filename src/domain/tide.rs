// Tide data domain models
use crate::domain::error::TideError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// One observed water level at a timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtremumKind {
    High,
    Low,
}

impl FromStr for ExtremumKind {
    type Err = TideError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "H" => Ok(ExtremumKind::High),
            "L" => Ok(ExtremumKind::Low),
            other => Err(TideError::Parse {
                field: "type",
                message: format!("unrecognized extremum kind {:?}", other),
            }),
        }
    }
}

impl fmt::Display for ExtremumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremumKind::High => f.write_str("H"),
            ExtremumKind::Low => f.write_str("L"),
        }
    }
}

/// A predicted high or low tide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumEvent {
    pub time: DateTime<Utc>,
    pub value: f64,
    pub kind: ExtremumKind,
}

impl ExtremumEvent {
    pub fn new(time: DateTime<Utc>, value: f64, kind: ExtremumKind) -> Self {
        Self { time, value, kind }
    }
}

/// A fishing window. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Provider product requested for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    WaterLevel,
    Predictions,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::WaterLevel => "water_level",
            Product::Predictions => "predictions",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort a series chronologically. Stable, so equal timestamps keep provider order.
pub fn sort_chronologically(samples: &mut [Sample]) {
    if samples.windows(2).any(|w| w[0].time > w[1].time) {
        samples.sort_by_key(|s| s.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_extremum_kind() {
        assert_eq!("H".parse::<ExtremumKind>().unwrap(), ExtremumKind::High);
        assert_eq!("L".parse::<ExtremumKind>().unwrap(), ExtremumKind::Low);

        let err = "HH".parse::<ExtremumKind>().unwrap_err();
        assert!(matches!(err, TideError::Parse { field: "type", .. }));
    }

    #[test]
    fn test_sort_chronologically() {
        let at = |h| Utc.with_ymd_and_hms(2024, 7, 28, h, 0, 0).unwrap();
        let mut samples = vec![
            Sample::new(at(11), 2.8),
            Sample::new(at(9), 3.0),
            Sample::new(at(10), 3.5),
        ];
        sort_chronologically(&mut samples);

        let hours: Vec<_> = samples.iter().map(|s| s.time).collect();
        assert_eq!(hours, vec![at(9), at(10), at(11)]);
    }
}
