// Fishing windows derived around tide extrema
use crate::domain::extrema::Extrema;
use crate::domain::tide::{ExtremumEvent, Interval};
use chrono::Duration;

/// Window on each side of an extremum. Total window is twice this.
pub const DEFAULT_HALF_WIDTH_MINUTES: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingWindowPolicy {
    half_width: Duration,
}

impl FishingWindowPolicy {
    /// Returns `None` unless `half_width` is strictly positive.
    pub fn new(half_width: Duration) -> Option<Self> {
        (half_width > Duration::zero()).then_some(Self { half_width })
    }

    pub fn half_width(&self) -> Duration {
        self.half_width
    }

    pub fn window_around(&self, event: &ExtremumEvent) -> Interval {
        Interval::new(event.time - self.half_width, event.time + self.half_width)
    }
}

impl Default for FishingWindowPolicy {
    fn default() -> Self {
        Self {
            half_width: Duration::minutes(DEFAULT_HALF_WIDTH_MINUTES),
        }
    }
}

/// One window per high and per low, highs first, then stably sorted by start.
///
/// Overlapping windows stay separate entries.
pub fn derive_fishing_windows(extrema: &Extrema, policy: &FishingWindowPolicy) -> Vec<Interval> {
    let mut windows: Vec<Interval> = extrema
        .highs
        .iter()
        .chain(extrema.lows.iter())
        .map(|event| policy.window_around(event))
        .collect();
    windows.sort_by_key(|window| window.start);
    windows
}
