// Domain/range scales for the tide chart
use crate::domain::error::TideError;
use crate::domain::tide::Sample;
use chrono::{DateTime, Duration, Utc};

/// Share of the value range added above and below the observed extent.
pub const DEFAULT_VALUE_PADDING_RATIO: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Maps `[start, end]` in time onto `[0, width]`, rounding like a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    width: f64,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, width: f64) -> Self {
        Self { start, end, width }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn apply(&self, time: DateTime<Utc>) -> f64 {
        let span = (self.end - self.start).num_milliseconds() as f64;
        if span == 0.0 {
            return (self.width / 2.0).round();
        }
        let offset = (time - self.start).num_milliseconds() as f64;
        (offset / span * self.width).round()
    }

    /// Pixel back to time, clamped to the domain. A collapsed domain inverts to its start.
    pub fn invert(&self, pixel: f64) -> DateTime<Utc> {
        if self.width == 0.0 || !pixel.is_finite() {
            return self.start;
        }
        let span = (self.end - self.start).num_milliseconds() as f64;
        let offset = (pixel.clamp(0.0, self.width) / self.width * span).round() as i64;
        self.start + Duration::milliseconds(offset)
    }
}

/// Linear value scale with an inverted range: `min` maps to `height`, `max` to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    min: f64,
    max: f64,
    height: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64, height: f64) -> Self {
        Self { min, max, height }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn apply(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return (self.height / 2.0).round();
        }
        (self.height - (value - self.min) / span * self.height).round()
    }

    /// Round tick values inside the domain, aiming for roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = (self.min, self.max);
        if count == 0 || !(stop > start) {
            return Vec::new();
        }
        let step = tick_step(start, stop, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Both scales for one layout of one observation series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub size: ContainerSize,
    pub margins: Margins,
    pub time: TimeScale,
    pub value: ValueScale,
    /// Observed (unpadded) value extent.
    pub value_extent: (f64, f64),
}

impl ChartScales {
    pub fn inner_width(&self) -> f64 {
        self.time.width()
    }

    pub fn inner_height(&self) -> f64 {
        self.value.height()
    }

    /// Time under a pointer given in container coordinates.
    pub fn time_at_pointer(&self, pointer_x: f64) -> DateTime<Utc> {
        self.time.invert(pointer_x - self.margins.left)
    }
}

/// Compute the time and value scales for `series` drawn in a container of `size`.
///
/// The value domain is padded by `padding_ratio * (max - min)` on both ends; the
/// time domain is the exact extent.
pub fn compute_scales(
    series: &[Sample],
    size: ContainerSize,
    margins: Margins,
    padding_ratio: f64,
) -> Result<ChartScales, TideError> {
    let first = series
        .first()
        .ok_or(TideError::InsufficientData("observation series is empty"))?;

    let (mut t_min, mut t_max) = (first.time, first.time);
    let (mut v_min, mut v_max) = (first.value, first.value);
    for sample in &series[1..] {
        t_min = t_min.min(sample.time);
        t_max = t_max.max(sample.time);
        v_min = v_min.min(sample.value);
        v_max = v_max.max(sample.value);
    }

    let pad = padding_ratio * (v_max - v_min).abs();
    let inner_width = (size.width - margins.left - margins.right).max(0.0);
    let inner_height = (size.height - margins.top - margins.bottom).max(0.0);

    Ok(ChartScales {
        size,
        margins,
        time: TimeScale::new(t_min, t_max, inner_width),
        value: ValueScale::new(v_min - pad, v_max + pad, inner_height),
        value_extent: (v_min, v_max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 28, h, m, 0).unwrap()
    }

    fn series() -> Vec<Sample> {
        vec![
            Sample::new(at(9, 0), 3.0),
            Sample::new(at(10, 0), 3.5),
            Sample::new(at(11, 0), 2.8),
        ]
    }

    #[test]
    fn test_value_domain_is_padded() {
        let scales = compute_scales(
            &series(),
            ContainerSize::new(270.0, 250.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap();

        let (lo, hi) = scales.value.domain();
        assert!((lo - (2.8 - 0.07)).abs() < 1e-9);
        assert!((hi - (3.5 + 0.07)).abs() < 1e-9);
        assert_eq!(scales.value_extent, (2.8, 3.5));
    }

    #[test]
    fn test_time_domain_is_exact_extent() {
        let scales = compute_scales(
            &series(),
            ContainerSize::new(270.0, 250.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap();

        assert_eq!(scales.time.domain(), (at(9, 0), at(11, 0)));
        assert_eq!(scales.inner_width(), 200.0);
        assert_eq!(scales.inner_height(), 200.0);
        assert_eq!(scales.time.apply(at(9, 0)), 0.0);
        assert_eq!(scales.time.apply(at(10, 0)), 100.0);
        assert_eq!(scales.time.apply(at(11, 0)), 200.0);
    }

    #[test]
    fn test_value_range_is_inverted() {
        let scale = ValueScale::new(0.0, 4.0, 200.0);
        assert_eq!(scale.apply(0.0), 200.0);
        assert_eq!(scale.apply(4.0), 0.0);
        assert_eq!(scale.apply(1.0), 150.0);
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = compute_scales(
            &[],
            ContainerSize::new(400.0, 300.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap_err();
        assert!(matches!(err, TideError::InsufficientData(_)));
    }

    #[test]
    fn test_pointer_inverts_through_left_margin() {
        let scales = compute_scales(
            &series(),
            ContainerSize::new(270.0, 250.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap();

        // 50px margin + 100px of a 200px-wide two hour domain
        assert_eq!(scales.time_at_pointer(150.0), at(10, 0));
        assert_eq!(scales.time_at_pointer(50.0 + 50.0), at(9, 30));
    }

    #[test]
    fn test_pointer_outside_plot_clamps_to_domain() {
        let scales = compute_scales(
            &series(),
            ContainerSize::new(270.0, 250.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap();

        assert_eq!(scales.time_at_pointer(0.0), at(9, 0));
        assert_eq!(scales.time_at_pointer(1e30), at(11, 0));
        assert_eq!(scales.time_at_pointer(-1e30), at(9, 0));
        assert_eq!(scales.time.invert(f64::NAN), at(9, 0));
    }

    #[test]
    fn test_single_sample_collapses_to_midpoint() {
        let scales = compute_scales(
            &[Sample::new(at(9, 0), 1.0)],
            ContainerSize::new(270.0, 250.0),
            Margins::default(),
            DEFAULT_VALUE_PADDING_RATIO,
        )
        .unwrap();

        assert_eq!(scales.time.apply(at(9, 0)), 100.0);
        assert_eq!(scales.value.apply(1.0), 100.0);
        assert_eq!(scales.time.invert(37.0), at(9, 0));
    }

    #[test]
    fn test_ticks() {
        let scale = ValueScale::new(-0.5, 6.2, 400.0);
        assert_eq!(scale.ticks(6), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(scale.ticks(3), vec![0.0, 2.0, 4.0, 6.0]);
        assert!(scale.ticks(0).is_empty());
    }
}
