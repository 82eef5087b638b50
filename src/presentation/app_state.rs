// Application state for HTTP handlers
use crate::application::tide_service::TideChartService;
use crate::application::tide_view::TideView;
use crate::domain::scale::ContainerSize;
use crate::domain::station::StationQuery;
use std::sync::Arc;
use tokio::sync::watch;

pub struct AppState {
    pub chart_service: TideChartService,
    pub view: Arc<TideView>,
    /// Publishes container sizes to the view's resize subscription
    pub sizes: watch::Sender<ContainerSize>,
    pub default_query: StationQuery,
    pub default_size: ContainerSize,
}
