// Mapper to convert domain models to JSON payloads
use crate::application::renderer::Renderer;
use crate::application::tide_view::{ViewSnapshot, ViewState};
use crate::domain::chart::{ChartFrame, Tooltip};
use crate::domain::error::TideError;
use crate::domain::station::format_provider_date;
use crate::domain::tide::{ExtremumEvent, Interval, Sample};
use crate::infrastructure::scene_renderer::{Scene, SceneRenderer};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub time_ms: i64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ExtremumDto {
    pub time_ms: i64,
    pub value: f64,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct IntervalDto {
    pub start_ms: i64,
    pub end_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct StationDto {
    pub id: String,
    pub begin_date: String,
    pub end_date: String,
    pub datum: &'static str,
    pub units: &'static str,
    pub time_zone: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChartFrameDto {
    pub station: StationDto,
    pub time_domain: [i64; 2],
    pub value_domain: [f64; 2],
    pub observations: Vec<PointDto>,
    pub highs: Vec<ExtremumDto>,
    pub lows: Vec<ExtremumDto>,
    pub fishing_windows: Vec<IntervalDto>,
    pub now_ms: i64,
    pub scene: Scene,
}

#[derive(Debug, Serialize)]
pub struct TooltipDto {
    pub time_ms: i64,
    pub time: String,
    pub value: f64,
    pub guide_x: f64,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ViewDto {
    pub status: &'static str,
    pub width: f64,
    pub height: f64,
    pub station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<ChartFrameDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<TooltipDto>,
}

pub fn frame_to_json(frame: &ChartFrame) -> ChartFrameDto {
    let dataset = &frame.dataset;
    let query = &dataset.query;
    let (t0, t1) = frame.scales.time.domain();
    let (v0, v1) = frame.scales.value.domain();

    ChartFrameDto {
        station: StationDto {
            id: query.station.clone(),
            begin_date: format_provider_date(query.range.begin),
            end_date: format_provider_date(query.range.end),
            datum: query.datum.as_str(),
            units: query.units.as_str(),
            time_zone: query.time_zone.as_str(),
        },
        time_domain: [t0.timestamp_millis(), t1.timestamp_millis()],
        value_domain: [v0, v1],
        observations: dataset.observations.iter().map(point_to_json).collect(),
        highs: dataset.extrema.highs.iter().map(extremum_to_json).collect(),
        lows: dataset.extrema.lows.iter().map(extremum_to_json).collect(),
        fishing_windows: dataset.windows.iter().map(interval_to_json).collect(),
        now_ms: frame.now.timestamp_millis(),
        scene: SceneRenderer.draw(frame),
    }
}

pub fn tooltip_to_json(tooltip: &Tooltip) -> TooltipDto {
    TooltipDto {
        time_ms: tooltip.sample.time.timestamp_millis(),
        time: tooltip.sample.time.format("%Y-%m-%d %H:%M:%S").to_string(),
        value: tooltip.sample.value,
        guide_x: tooltip.guide_x,
        label: tooltip.label.clone(),
    }
}

pub fn error_to_json(error: &TideError) -> ErrorDto {
    ErrorDto {
        kind: error.kind(),
        message: error.to_string(),
    }
}

pub fn view_to_json(snapshot: &ViewSnapshot) -> ViewDto {
    let (status, error, frame) = match &snapshot.state {
        ViewState::Loading => ("loading", None, None),
        ViewState::Ready(frame) => ("ready", None, Some(frame)),
        ViewState::Empty => ("empty", None, None),
        ViewState::Failed { error, previous } => {
            ("failed", Some(error_to_json(error)), previous.as_ref())
        }
    };

    ViewDto {
        status,
        width: snapshot.size.width,
        height: snapshot.size.height,
        station: snapshot.query.station.clone(),
        error,
        frame: frame.map(frame_to_json),
        hover: snapshot.hover.as_ref().map(tooltip_to_json),
    }
}

fn point_to_json(sample: &Sample) -> PointDto {
    PointDto {
        time_ms: sample.time.timestamp_millis(),
        value: sample.value,
    }
}

fn extremum_to_json(event: &ExtremumEvent) -> ExtremumDto {
    ExtremumDto {
        time_ms: event.time.timestamp_millis(),
        value: event.value,
        kind: event.kind.to_string(),
    }
}

fn interval_to_json(interval: &Interval) -> IntervalDto {
    IntervalDto {
        start_ms: interval.start.timestamp_millis(),
        end_ms: interval.end.timestamp_millis(),
    }
}
