// Scene renderer - projects a chart frame into pixel geometry
use crate::application::renderer::Renderer;
use crate::domain::chart::ChartFrame;
use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use serde::Serialize;

const X_TICK_SPACING_PX: f64 = 80.0;
const X_TICK_STEPS_HOURS: [i64; 7] = [1, 2, 3, 6, 12, 24, 48];
/// Upper bound on the requested y tick count, whatever the observed max.
const MAX_Y_TICKS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Horizontal highlight span, already clipped to the drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub x: f64,
    pub width: f64,
}

/// Everything a backend needs to draw one frame. Coordinates are relative to
/// the inner drawing area, whose top-left corner sits at `origin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub origin: (f64, f64),
    pub inner_width: f64,
    pub inner_height: f64,
    pub line: Vec<(f64, f64)>,
    pub bands: Vec<Band>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Vertical span of the fill gradient: observed max to observed min.
    pub gradient: (f64, f64),
    /// Present only while "now" falls inside the time domain.
    pub now_x: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SceneRenderer;

impl Renderer for SceneRenderer {
    type Output = Scene;

    fn draw(&self, frame: &ChartFrame) -> Scene {
        let scales = &frame.scales;
        let inner_width = scales.inner_width();
        let inner_height = scales.inner_height();

        let line = frame
            .dataset
            .observations
            .iter()
            .map(|s| (scales.time.apply(s.time), scales.value.apply(s.value)))
            .collect();

        let bands = frame
            .dataset
            .windows
            .iter()
            .filter_map(|window| {
                let x0 = scales.time.apply(window.start).max(0.0);
                let x1 = scales.time.apply(window.end).min(inner_width);
                (x1 > x0).then_some(Band { x: x0, width: x1 - x0 })
            })
            .collect();

        let (v_min, v_max) = scales.value_extent;
        let y_ticks = scales
            .value
            .ticks(v_max.ceil().clamp(1.0, MAX_Y_TICKS) as usize)
            .into_iter()
            .map(|value| Tick {
                position: scales.value.apply(value),
                label: format_tick_value(value),
            })
            .collect();

        let (start, end) = scales.time.domain();
        let x_ticks = time_ticks(start, end, inner_width)
            .into_iter()
            .map(|t| Tick {
                position: scales.time.apply(t),
                label: format_tick_time(t),
            })
            .collect();

        let now_x = (start..=end)
            .contains(&frame.now)
            .then(|| frame.now_x());

        Scene {
            width: scales.size.width,
            height: scales.size.height,
            origin: (scales.margins.left, scales.margins.top),
            inner_width,
            inner_height,
            line,
            bands,
            x_ticks,
            y_ticks,
            gradient: (scales.value.apply(v_max), scales.value.apply(v_min)),
            now_x,
        }
    }
}

/// Whole-hour ticks, stepped so labels stay roughly `X_TICK_SPACING_PX` apart.
fn time_ticks(start: DateTime<Utc>, end: DateTime<Utc>, width: f64) -> Vec<DateTime<Utc>> {
    if end <= start {
        return Vec::new();
    }
    let wanted = (width / X_TICK_SPACING_PX).floor().max(1.0) as i64;
    let span_hours = (end - start).num_minutes() as f64 / 60.0;
    let step_hours = X_TICK_STEPS_HOURS
        .iter()
        .copied()
        .find(|step| span_hours / *step as f64 <= wanted as f64)
        .unwrap_or(X_TICK_STEPS_HOURS[X_TICK_STEPS_HOURS.len() - 1]);
    let step = Duration::hours(step_hours);

    let Ok(mut tick) = start.duration_trunc(step) else {
        return Vec::new();
    };
    if tick < start {
        tick += step;
    }
    let mut ticks = Vec::new();
    while tick <= end {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

fn format_tick_time(t: DateTime<Utc>) -> String {
    if t.hour() == 0 && t.minute() == 0 {
        t.format("%b %d").to_string()
    } else {
        t.format("%H:%M").to_string()
    }
}

fn format_tick_value(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
