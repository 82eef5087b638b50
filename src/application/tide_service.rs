// Tide chart service - fetch, join and transform pipeline
use crate::application::tide_provider::TideDataProvider;
use crate::domain::chart::{ChartFrame, TideDataset};
use crate::domain::error::TideError;
use crate::domain::extrema::classify_extrema;
use crate::domain::fishing::{derive_fishing_windows, FishingWindowPolicy};
use crate::domain::scale::{compute_scales, ContainerSize, Margins};
use crate::domain::station::StationQuery;
use crate::domain::tide::sort_chronologically;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct LayoutSettings {
    pub margins: Margins,
    pub padding_ratio: f64,
}

#[derive(Clone)]
pub struct TideChartService {
    provider: Arc<dyn TideDataProvider>,
    policy: FishingWindowPolicy,
    layout: LayoutSettings,
}

impl TideChartService {
    pub fn new(
        provider: Arc<dyn TideDataProvider>,
        policy: FishingWindowPolicy,
        layout: LayoutSettings,
    ) -> Self {
        Self {
            provider,
            policy,
            layout,
        }
    }

    /// Fetch both series concurrently and derive everything layout-independent.
    ///
    /// Either request failing fails the whole load.
    pub async fn load(&self, query: &StationQuery) -> Result<TideDataset, TideError> {
        tracing::debug!(
            "Loading tide data for station {} ({} - {})",
            query.station,
            query.range.begin,
            query.range.end
        );

        let (mut observations, predictions) = futures::future::try_join(
            self.provider.fetch_water_level(query),
            self.provider.fetch_hilo_predictions(query),
        )
        .await?;

        if observations.is_empty() {
            return Err(TideError::InsufficientData("observation series is empty"));
        }
        sort_chronologically(&mut observations);

        let extrema = classify_extrema(&predictions);
        let windows = derive_fishing_windows(&extrema, &self.policy);

        tracing::debug!(
            "Station {}: {} observations, {} highs, {} lows, {} fishing windows",
            query.station,
            observations.len(),
            extrema.highs.len(),
            extrema.lows.len(),
            windows.len()
        );

        Ok(TideDataset {
            query: query.clone(),
            observations,
            extrema,
            windows,
        })
    }

    /// Lay a dataset out for a container size. Never fetches.
    pub fn layout(
        &self,
        dataset: Arc<TideDataset>,
        size: ContainerSize,
        now: DateTime<Utc>,
    ) -> Result<ChartFrame, TideError> {
        let scales = compute_scales(
            &dataset.observations,
            size,
            self.layout.margins,
            self.layout.padding_ratio,
        )?;
        Ok(ChartFrame {
            dataset,
            scales,
            now,
        })
    }

    /// One full cycle: load then lay out.
    pub async fn build_frame(
        &self,
        query: &StationQuery,
        size: ContainerSize,
        now: DateTime<Utc>,
    ) -> Result<ChartFrame, TideError> {
        let dataset = self.load(query).await?;
        self.layout(Arc::new(dataset), size, now)
    }
}
