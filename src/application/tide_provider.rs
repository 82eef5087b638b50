// Provider trait for tide data access
use crate::domain::error::TideError;
use crate::domain::station::StationQuery;
use crate::domain::tide::{ExtremumEvent, Sample};
use async_trait::async_trait;

#[async_trait]
pub trait TideDataProvider: Send + Sync {
    /// Observed water levels for the query's station and date range
    async fn fetch_water_level(&self, query: &StationQuery) -> Result<Vec<Sample>, TideError>;

    /// Predicted highs and lows for the query's station and date range
    async fn fetch_hilo_predictions(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<ExtremumEvent>, TideError>;
}
