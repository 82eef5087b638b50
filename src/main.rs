// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{routing::get, routing::post, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::tide_service::TideChartService;
use crate::application::tide_view::TideView;
use crate::infrastructure::config::load_tides_config;
use crate::infrastructure::noaa_client::NoaaTidesClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_view, get_view_svg, health_check, pointer_leave, pointer_move, refresh_view,
    resize_view,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let tides = load_tides_config()?;
    let default_query = tides.station.to_query()?;
    let default_size = tides.chart.container_size();

    // Create provider (infrastructure layer)
    let provider = Arc::new(NoaaTidesClient::new(
        tides.provider.base_url.clone(),
        Duration::from_secs(tides.provider.timeout_secs),
        tides.provider.max_retries,
    )?);

    // Create services (application layer)
    let chart_service = TideChartService::new(
        provider,
        tides.chart.fishing_policy()?,
        tides.chart.layout_settings(),
    );
    let view = Arc::new(TideView::new(
        chart_service.clone(),
        default_query.clone(),
        default_size,
    ));
    let (sizes, size_rx) = watch::channel(default_size);
    let resize_subscription = view.observe_resizes(size_rx);

    // First fetch runs in the background; the view reports "loading" until it lands
    let initial = {
        let view = view.clone();
        tokio::spawn(async move {
            view.refresh().await;
        })
    };

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        view: view.clone(),
        sizes,
        default_query,
        default_size,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/view", get(get_view))
        .route("/view.svg", get(get_view_svg))
        .route("/view/refresh", post(refresh_view))
        .route("/view/resize", post(resize_view))
        .route("/view/pointer", get(pointer_move).delete(pointer_leave))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = tides.server.bind.parse()?;
    tracing::info!("Starting tide-windows service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Teardown: unsubscribe from resizes and drop anything still in flight
    drop(resize_subscription);
    view.teardown();
    initial.abort();
    tracing::info!("tide-windows stopped");

    Ok(())
}
