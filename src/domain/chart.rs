// Chart domain model - one immutable output per render cycle
use super::extrema::Extrema;
use super::scale::ChartScales;
use super::station::StationQuery;
use super::tide::{Interval, Sample};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Typed output of one fetch: everything derived from the provider data that
/// does not depend on layout.
#[derive(Debug, Clone)]
pub struct TideDataset {
    pub query: StationQuery,
    /// Chronologically sorted, never empty.
    pub observations: Vec<Sample>,
    pub extrema: Extrema,
    /// Sorted by start.
    pub windows: Vec<Interval>,
}

/// A dataset laid out for one container size.
#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub dataset: Arc<TideDataset>,
    pub scales: ChartScales,
    pub now: DateTime<Utc>,
}

impl ChartFrame {
    /// Current-time indicator position, in inner drawing coordinates.
    pub fn now_x(&self) -> f64 {
        self.scales.time.apply(self.now)
    }
}

/// Nearest-sample readout under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub sample: Sample,
    /// Vertical guide position, in inner drawing coordinates.
    pub guide_x: f64,
    pub label: String,
}

impl Tooltip {
    pub fn new(sample: Sample, guide_x: f64, unit: &str) -> Self {
        let label = format!(
            "Time: {} | Tide: {} {}",
            sample.time.format("%Y-%m-%d %H:%M:%S"),
            sample.value,
            unit
        );
        Self {
            sample,
            guide_x,
            label,
        }
    }
}
