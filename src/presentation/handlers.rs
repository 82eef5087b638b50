// HTTP request handlers
use crate::application::renderer::Renderer;
use crate::application::tide_view::RefreshOutcome;
use crate::domain::error::TideError;
use crate::domain::scale::ContainerSize;
use crate::domain::station::{parse_provider_date, DateRange, StationQuery};
use crate::infrastructure::http_response::{accepts_brotli, json_response, svg_response};
use crate::infrastructure::json_mapper::{
    error_to_json, frame_to_json, tooltip_to_json, view_to_json, ErrorDto,
};
use crate::infrastructure::svg_renderer::SvgRenderer;
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct StationParams {
    pub station: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub station: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub format: Option<String>,
}

impl ChartParams {
    fn station_params(&self) -> StationParams {
        StationParams {
            station: self.station.clone(),
            begin: self.begin.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResizeBody {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
pub struct PointerParams {
    pub x: f64,
}

#[derive(Serialize)]
struct EmptyDto {
    status: &'static str,
    reason: &'static str,
}

fn respond(result: Result<Response<Body>, StatusCode>) -> Response<Body> {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn bad_request(message: String, compress: bool) -> Response<Body> {
    let error = ErrorDto {
        kind: "bad_request",
        message,
    };
    respond(json_response(StatusCode::BAD_REQUEST, &error, compress).await)
}

/// Overlay request parameters on the configured station query
pub fn merge_station_params(
    defaults: &StationQuery,
    params: &StationParams,
) -> Result<StationQuery, String> {
    let mut query = defaults.clone();
    if let Some(station) = params.station.as_deref() {
        if station.trim().is_empty() {
            return Err("station must not be empty".to_string());
        }
        query.station = station.to_string();
    }

    let parse = |raw: &Option<String>, name: &str, fallback| match raw.as_deref() {
        Some(raw) => parse_provider_date(raw).ok_or(format!("{} must be YYYYMMDD, got {:?}", name, raw)),
        None => Ok(fallback),
    };
    let begin = parse(&params.begin, "begin", defaults.range.begin)?;
    let end = parse(&params.end, "end", defaults.range.end)?;
    query.range = DateRange::new(begin, end)
        .ok_or(format!("end {} precedes begin {}", end, begin))?;

    Ok(query)
}

fn parse_size(width: Option<f64>, height: Option<f64>, defaults: ContainerSize) -> Result<ContainerSize, String> {
    let size = ContainerSize::new(
        width.unwrap_or(defaults.width),
        height.unwrap_or(defaults.height),
    );
    if !(size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0) {
        return Err(format!("invalid size {}x{}", size.width, size.height));
    }
    Ok(size)
}

fn error_status(error: &TideError) -> StatusCode {
    match error {
        TideError::Network { .. } | TideError::Parse { .. } => StatusCode::BAD_GATEWAY,
        TideError::InsufficientData(_) => StatusCode::OK,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// One-shot chart for any station, date range and size
pub async fn get_chart(
    Query(params): Query<ChartParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let query = match merge_station_params(&state.default_query, &params.station_params()) {
        Ok(query) => query,
        Err(message) => return bad_request(message, compress).await,
    };
    let size = match parse_size(params.width, params.height, state.default_size) {
        Ok(size) => size,
        Err(message) => return bad_request(message, compress).await,
    };

    match state.chart_service.build_frame(&query, size, Utc::now()).await {
        Ok(frame) => match params.format.as_deref() {
            Some("svg") => respond(svg_response(SvgRenderer.draw(&frame), compress).await),
            None | Some("json") => {
                respond(json_response(StatusCode::OK, &frame_to_json(&frame), compress).await)
            }
            Some(other) => bad_request(format!("unknown format {:?}", other), compress).await,
        },
        Err(TideError::InsufficientData(reason)) => {
            let empty = EmptyDto {
                status: "empty",
                reason,
            };
            respond(json_response(StatusCode::OK, &empty, compress).await)
        }
        Err(error) => {
            tracing::error!("Chart for station {} failed: {}", query.station, error);
            respond(json_response(error_status(&error), &error_to_json(&error), compress).await)
        }
    }
}

/// Current state of the hosted view
pub async fn get_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response<Body> {
    let snapshot = state.view.snapshot().await;
    respond(json_response(StatusCode::OK, &view_to_json(&snapshot), accepts_brotli(&headers)).await)
}

/// SVG of the hosted view's latest chart
pub async fn get_view_svg(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response<Body> {
    let compress = accepts_brotli(&headers);
    let snapshot = state.view.snapshot().await;
    match snapshot.state.frame() {
        Some(frame) => respond(svg_response(SvgRenderer.draw(frame), compress).await),
        None => respond(json_response(StatusCode::NOT_FOUND, &view_to_json(&snapshot), compress).await),
    }
}

/// Re-fetch, optionally switching station or date range
pub async fn refresh_view(
    Query(params): Query<StationParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let retarget = params.station.is_some() || params.begin.is_some() || params.end.is_some();
    let outcome = if retarget {
        let current = state.view.snapshot().await.query;
        match merge_station_params(&current, &params) {
            Ok(query) => state.view.retarget(query).await,
            Err(message) => return bad_request(message, compress).await,
        }
    } else {
        state.view.refresh().await
    };

    let status = match outcome {
        RefreshOutcome::Applied => StatusCode::OK,
        RefreshOutcome::Discarded => StatusCode::CONFLICT,
    };
    let snapshot = state.view.snapshot().await;
    respond(json_response(status, &view_to_json(&snapshot), compress).await)
}

/// Publish a new container size; the view re-lays itself out without fetching
pub async fn resize_view(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResizeBody>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);
    let size = match parse_size(Some(body.width), Some(body.height), state.default_size) {
        Ok(size) => size,
        Err(message) => return bad_request(message, compress).await,
    };

    state.sizes.send_replace(size);
    respond(json_response(StatusCode::ACCEPTED, &body, compress).await)
}

/// Nearest sample under the pointer
pub async fn pointer_move(
    Query(params): Query<PointerParams>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    if !params.x.is_finite() {
        return bad_request(format!("invalid pointer x {}", params.x), accepts_brotli(&headers)).await;
    }
    match state.view.pointer_move(params.x).await {
        Some(tooltip) => respond(
            json_response(StatusCode::OK, &tooltip_to_json(&tooltip), accepts_brotli(&headers)).await,
        ),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn pointer_leave(State(state): State<Arc<AppState>>) -> StatusCode {
    state.view.pointer_leave().await;
    StatusCode::NO_CONTENT
}
