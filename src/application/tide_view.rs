// Tide view - the hosted chart component and its event handling
use crate::application::tide_service::TideChartService;
use crate::domain::chart::{ChartFrame, TideDataset, Tooltip};
use crate::domain::error::TideError;
use crate::domain::nearest::nearest_sample;
use crate::domain::scale::ContainerSize;
use crate::domain::station::StationQuery;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

/// What the view currently shows.
#[derive(Debug, Clone)]
pub enum ViewState {
    Loading,
    Ready(ChartFrame),
    /// The provider returned no observations.
    Empty,
    /// The last cycle failed. The previous chart, if any, stays visible.
    Failed {
        error: TideError,
        previous: Option<ChartFrame>,
    },
}

impl ViewState {
    /// The chart currently on screen, including one kept through a failure.
    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            ViewState::Ready(frame) => Some(frame),
            ViewState::Failed { previous, .. } => previous.as_ref(),
            ViewState::Loading | ViewState::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh started, or the view was torn down, before this one finished.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub query: StationQuery,
    pub size: ContainerSize,
    pub state: ViewState,
    pub hover: Option<Tooltip>,
}

struct ViewInner {
    query: StationQuery,
    size: ContainerSize,
    dataset: Option<Arc<TideDataset>>,
    state: ViewState,
    hover: Option<Tooltip>,
}

pub struct TideView {
    service: TideChartService,
    generation: AtomicU64,
    closed: AtomicBool,
    inner: RwLock<ViewInner>,
}

impl TideView {
    pub fn new(service: TideChartService, query: StationQuery, size: ContainerSize) -> Self {
        Self {
            service,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            inner: RwLock::new(ViewInner {
                query,
                size,
                dataset: None,
                state: ViewState::Loading,
                hover: None,
            }),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    /// Re-fetch the current query. Any earlier refresh still in flight becomes stale.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (generation, query) = {
            let inner = self.inner.write().await;
            (self.next_generation(), inner.query.clone())
        };
        self.fetch_and_apply(generation, query).await
    }

    /// Point the view at another station or date range and fetch it.
    ///
    /// The query swap and the generation bump happen under one lock, so a
    /// refresh of the old query can never land after the swap.
    pub async fn retarget(&self, query: StationQuery) -> RefreshOutcome {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.query = query.clone();
            inner.dataset = None;
            inner.state = ViewState::Loading;
            inner.hover = None;
            self.next_generation()
        };
        self.fetch_and_apply(generation, query).await
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch_and_apply(&self, generation: u64, query: StationQuery) -> RefreshOutcome {
        let result = self.service.load(&query).await;

        let mut inner = self.inner.write().await;
        if !self.is_current(generation) {
            tracing::warn!(
                "Discarding stale tide data for station {} (generation {})",
                query.station,
                generation
            );
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(dataset) => {
                inner.dataset = Some(Arc::new(dataset));
                self.relayout(&mut inner);
            }
            Err(TideError::InsufficientData(reason)) => {
                tracing::warn!("No tide data for station {}: {}", query.station, reason);
                inner.dataset = None;
                inner.state = ViewState::Empty;
            }
            Err(error) => {
                tracing::error!("Tide refresh failed for station {}: {}", query.station, error);
                let previous = inner.state.frame().cloned();
                inner.state = ViewState::Failed { error, previous };
            }
        }
        inner.hover = None;
        RefreshOutcome::Applied
    }

    /// Recompute scales for a new container size. Never fetches.
    pub async fn resize(&self, size: ContainerSize) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let mut inner = self.inner.write().await;
        inner.size = size;
        inner.hover = None;
        self.relayout(&mut inner);
    }

    fn relayout(&self, inner: &mut ViewInner) {
        let Some(dataset) = inner.dataset.clone() else {
            return;
        };
        let laid_out = self.service.layout(dataset, inner.size, Utc::now());
        inner.state = match (laid_out, &inner.state) {
            (Ok(frame), ViewState::Failed { error, .. }) => ViewState::Failed {
                error: error.clone(),
                previous: Some(frame),
            },
            (Ok(frame), _) => ViewState::Ready(frame),
            (Err(_), _) => ViewState::Empty,
        };
    }

    /// Resolve the sample nearest to a pointer at `pointer_x` (container coordinates).
    ///
    /// Works on the last laid-out frame only.
    pub async fn pointer_move(&self, pointer_x: f64) -> Option<Tooltip> {
        let mut inner = self.inner.write().await;
        let frame = inner.state.frame()?;

        let t = frame.scales.time_at_pointer(pointer_x);
        let sample = *nearest_sample(&frame.dataset.observations, t).ok()?;
        let tooltip = Tooltip::new(
            sample,
            frame.scales.time.apply(sample.time),
            frame.dataset.query.units.symbol(),
        );
        inner.hover = Some(tooltip.clone());
        Some(tooltip)
    }

    pub async fn pointer_leave(&self) {
        self.inner.write().await.hover = None;
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let inner = self.inner.read().await;
        ViewSnapshot {
            query: inner.query.clone(),
            size: inner.size,
            state: inner.state.clone(),
            hover: inner.hover.clone(),
        }
    }

    /// Stop applying results. Fetches still in flight are discarded on arrival.
    pub fn teardown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Re-layout on every size published to `sizes` until the returned
    /// subscription is dropped.
    pub fn observe_resizes(
        self: &Arc<Self>,
        mut sizes: watch::Receiver<ContainerSize>,
    ) -> ResizeSubscription {
        let view = Arc::clone(self);
        let task = tokio::spawn(async move {
            while sizes.changed().await.is_ok() {
                let size = *sizes.borrow_and_update();
                tracing::debug!("Container resized to {}x{}", size.width, size.height);
                view.resize(size).await;
            }
        });
        ResizeSubscription { task }
    }
}

/// Live resize observation. Dropping it unsubscribes.
pub struct ResizeSubscription {
    task: JoinHandle<()>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tide_service::test_support::*;
    use std::time::Duration;

    fn view(provider: Arc<FakeProvider>) -> Arc<TideView> {
        Arc::new(TideView::new(
            service(provider),
            query("9410170"),
            ContainerSize::new(270.0, 250.0),
        ))
    }

    fn frame(snapshot: &ViewSnapshot) -> &ChartFrame {
        match &snapshot.state {
            ViewState::Ready(frame) => frame,
            other => panic!("expected ready state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_then_pointer_lookup() {
        let view = view(Arc::new(FakeProvider::standard()));
        assert!(matches!(view.snapshot().await.state, ViewState::Loading));

        assert_eq!(view.refresh().await, RefreshOutcome::Applied);

        // 50px margin + 66px of a 200px, two hour axis is roughly 09:40
        let tooltip = view.pointer_move(116.0).await.unwrap();
        assert_eq!(tooltip.sample.time, at(10, 0));
        assert_eq!(tooltip.sample.value, 3.5);
        assert_eq!(tooltip.guide_x, 100.0);
        assert_eq!(tooltip.label, "Time: 2024-07-28 10:00:00 | Tide: 3.5 ft");
        assert!(view.snapshot().await.hover.is_some());

        view.pointer_leave().await;
        assert!(view.snapshot().await.hover.is_none());
    }

    #[tokio::test]
    async fn test_pointer_before_data_is_ignored() {
        let view = view(Arc::new(FakeProvider::standard()));
        assert!(view.pointer_move(120.0).await.is_none());
    }

    #[tokio::test]
    async fn test_resize_relayouts_without_fetching() {
        let provider = Arc::new(FakeProvider::standard());
        let view = view(provider.clone());
        view.refresh().await;

        view.resize(ContainerSize::new(470.0, 450.0)).await;

        let snapshot = view.snapshot().await;
        assert_eq!(frame(&snapshot).scales.inner_width(), 400.0);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_chart() {
        let view = view(Arc::new(FakeProvider::standard()));
        view.refresh().await;

        let failing = TideView {
            service: service(Arc::new(FakeProvider {
                fail_water_level: true,
                ..FakeProvider::standard()
            })),
            generation: AtomicU64::new(view.generation.load(Ordering::SeqCst)),
            closed: AtomicBool::new(false),
            inner: RwLock::new(ViewInner {
                query: query("9410170"),
                size: ContainerSize::new(270.0, 250.0),
                dataset: None,
                state: view.snapshot().await.state,
                hover: None,
            }),
        };
        failing.refresh().await;

        match failing.snapshot().await.state {
            ViewState::Failed { error, previous } => {
                assert!(matches!(error, TideError::Network { .. }));
                assert!(previous.is_some());
            }
            other => panic!("expected failed state, got {:?}", other),
        }
        // The retained chart still answers pointer lookups.
        assert!(failing.pointer_move(140.0).await.is_some());
    }

    #[tokio::test]
    async fn test_failure_without_previous_chart() {
        let view = view(Arc::new(FakeProvider {
            fail_predictions: true,
            ..FakeProvider::standard()
        }));
        view.refresh().await;

        match view.snapshot().await.state {
            ViewState::Failed { previous, .. } => assert!(previous.is_none()),
            other => panic!("expected failed state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_series_shows_empty_state() {
        let view = view(Arc::new(FakeProvider {
            observations: Vec::new(),
            ..FakeProvider::standard()
        }));
        view.refresh().await;
        assert!(matches!(view.snapshot().await.state, ViewState::Empty));
    }

    #[tokio::test]
    async fn test_late_response_after_teardown_is_discarded() {
        let view = view(Arc::new(FakeProvider {
            delay: Some(Duration::from_millis(50)),
            ..FakeProvider::standard()
        }));

        let pending = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        view.teardown();

        assert_eq!(pending.await.unwrap(), RefreshOutcome::Discarded);
        assert!(matches!(view.snapshot().await.state, ViewState::Loading));
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_discarded() {
        let view = view(Arc::new(FakeProvider {
            delay: Some(Duration::from_millis(50)),
            ..FakeProvider::standard()
        }));

        let first = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = view.refresh().await;

        assert_eq!(second, RefreshOutcome::Applied);
        assert_eq!(first.await.unwrap(), RefreshOutcome::Discarded);
        assert!(matches!(view.snapshot().await.state, ViewState::Ready(_)));
    }

    #[tokio::test]
    async fn test_retarget_discards_refresh_of_previous_station() {
        let view = view(Arc::new(FakeProvider {
            delay: Some(Duration::from_millis(50)),
            failing_station: Some("8443970".to_string()),
            ..FakeProvider::standard()
        }));

        let old = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let retargeted = view.retarget(query("8443970")).await;

        assert_eq!(old.await.unwrap(), RefreshOutcome::Discarded);
        assert_eq!(retargeted, RefreshOutcome::Applied);

        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.query.station, "8443970");
        match snapshot.state {
            // Nothing from 9410170 may be kept as the visible chart.
            ViewState::Failed { previous, .. } => assert!(previous.is_none()),
            other => panic!("expected failed state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pointer_far_outside_chart_clamps() {
        let view = view(Arc::new(FakeProvider::standard()));
        view.refresh().await;

        assert_eq!(view.pointer_move(1e30).await.unwrap().sample.time, at(11, 0));
        assert_eq!(view.pointer_move(-1e30).await.unwrap().sample.time, at(9, 0));
        assert_eq!(view.pointer_move(1e15).await.unwrap().sample.time, at(11, 0));
    }

    #[tokio::test]
    async fn test_resize_subscription_until_dropped() {
        let view = view(Arc::new(FakeProvider::standard()));
        view.refresh().await;

        let (sizes, rx) = watch::channel(ContainerSize::new(270.0, 250.0));
        let subscription = view.observe_resizes(rx);

        sizes.send_replace(ContainerSize::new(470.0, 450.0));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(frame(&view.snapshot().await).scales.inner_width(), 400.0);

        drop(subscription);
        tokio::time::sleep(Duration::from_millis(20)).await;
        sizes.send_replace(ContainerSize::new(170.0, 150.0));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(frame(&view.snapshot().await).scales.inner_width(), 400.0);
    }
}
