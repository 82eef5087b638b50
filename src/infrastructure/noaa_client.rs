// NOAA CO-OPS data getter implementation
use crate::application::tide_provider::TideDataProvider;
use crate::domain::error::TideError;
use crate::domain::station::{format_provider_date, StationQuery};
use crate::domain::tide::{ExtremumEvent, ExtremumKind, Product, Sample};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const NO_DATA_PREFIX: &str = "No data was found";

#[derive(Debug, Clone)]
pub struct NoaaTidesClient {
    base_url: String,
    http: reqwest::Client,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct DataGetterResponse {
    #[serde(default)]
    data: Option<Vec<RawRecord>>,
    #[serde(default)]
    predictions: Option<Vec<RawRecord>>,
    #[serde(default)]
    error: Option<DataGetterError>,
}

#[derive(Debug, Deserialize)]
struct DataGetterError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    t: String,
    v: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl NoaaTidesClient {
    pub fn new(base_url: String, timeout: Duration, max_retries: u32) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            max_retries,
        })
    }

    fn build_query_url(&self, product: Product, query: &StationQuery) -> String {
        let mut url = format!(
            "{}?begin_date={}&end_date={}&station={}&product={}&datum={}&time_zone={}&units={}",
            self.base_url,
            format_provider_date(query.range.begin),
            format_provider_date(query.range.end),
            urlencoding::encode(&query.station),
            product,
            query.datum.as_str(),
            query.time_zone.as_str(),
            query.units.as_str(),
        );
        if product == Product::Predictions {
            url.push_str("&interval=hilo");
        }
        url.push_str("&format=json");
        url
    }

    /// GET one product, retrying network failures up to `max_retries` times.
    async fn fetch_records(
        &self,
        product: Product,
        query: &StationQuery,
    ) -> Result<Vec<RawRecord>, TideError> {
        let url = self.build_query_url(product, query);
        let mut attempt = 0;
        loop {
            match self.execute_query(product, &url).await {
                Err(TideError::Network { message, .. }) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Retrying {} request ({}/{}): {}",
                        product,
                        attempt,
                        self.max_retries,
                        message
                    );
                }
                result => return result,
            }
        }
    }

    async fn execute_query(&self, product: Product, url: &str) -> Result<Vec<RawRecord>, TideError> {
        tracing::debug!("Fetching {} from: {}", product, url);

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TideError::network(product, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TideError::network(
                product,
                format!("provider returned status {}: {}", status, body),
            ));
        }

        let body = response
            .json::<DataGetterResponse>()
            .await
            .map_err(|e| TideError::Parse {
                field: "body",
                message: e.to_string(),
            })?;

        // The data getter reports errors in-band with a 200 status
        if let Some(error) = body.error {
            if error.message.starts_with(NO_DATA_PREFIX) {
                return Err(TideError::InsufficientData("provider reported no data"));
            }
            return Err(TideError::network(product, error.message));
        }

        let records = match product {
            Product::WaterLevel => body.data,
            Product::Predictions => body.predictions,
        };
        let records = records.ok_or_else(|| TideError::Parse {
            field: "body",
            message: format!("response has no {} records", product),
        })?;

        tracing::debug!("Received {} {} records", records.len(), product);
        Ok(records)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TideError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc)))
        .map_err(|_| TideError::Parse {
            field: "t",
            message: format!("malformed timestamp {:?}", raw),
        })
}

fn parse_value(raw: &str) -> Result<f64, TideError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TideError::Parse {
            field: "v",
            message: format!("malformed water level {:?}", raw),
        })
}

fn to_sample(record: &RawRecord) -> Result<Sample, TideError> {
    Ok(Sample::new(parse_timestamp(&record.t)?, parse_value(&record.v)?))
}

fn to_extremum(record: &RawRecord) -> Result<ExtremumEvent, TideError> {
    let kind: ExtremumKind = record
        .kind
        .as_deref()
        .ok_or_else(|| TideError::Parse {
            field: "type",
            message: "prediction record has no type".to_string(),
        })?
        .parse()?;
    Ok(ExtremumEvent::new(
        parse_timestamp(&record.t)?,
        parse_value(&record.v)?,
        kind,
    ))
}

#[async_trait]
impl TideDataProvider for NoaaTidesClient {
    async fn fetch_water_level(&self, query: &StationQuery) -> Result<Vec<Sample>, TideError> {
        let records = self.fetch_records(Product::WaterLevel, query).await?;
        records.iter().map(to_sample).collect()
    }

    async fn fetch_hilo_predictions(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<ExtremumEvent>, TideError> {
        let records = self.fetch_records(Product::Predictions, query).await?;
        records.iter().map(to_extremum).collect()
    }
}
