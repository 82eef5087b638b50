use crate::application::tide_service::LayoutSettings;
use crate::domain::fishing::{FishingWindowPolicy, DEFAULT_HALF_WIDTH_MINUTES};
use crate::domain::scale::{ContainerSize, Margins, DEFAULT_VALUE_PADDING_RATIO};
use crate::domain::station::{
    parse_provider_date, DateRange, Datum, StationQuery, TimeZone, Units,
};
use anyhow::{ensure, Context};
use serde::Deserialize;

pub const NOAA_DATAGETTER_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TidesConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub station: StationSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: NOAA_DATAGETTER_URL.to_string(),
            timeout_secs: 10,
            max_retries: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StationSettings {
    pub id: String,
    pub begin_date: String,
    pub end_date: String,
    pub datum: Datum,
    pub units: Units,
    pub time_zone: TimeZone,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            id: "9410170".to_string(),
            begin_date: "20240728".to_string(),
            end_date: "20240729".to_string(),
            datum: Datum::Mllw,
            units: Units::English,
            time_zone: TimeZone::Gmt,
        }
    }
}

impl StationSettings {
    pub fn to_query(&self) -> anyhow::Result<StationQuery> {
        let begin = parse_provider_date(&self.begin_date)
            .with_context(|| format!("begin_date {:?} is not YYYYMMDD", self.begin_date))?;
        let end = parse_provider_date(&self.end_date)
            .with_context(|| format!("end_date {:?} is not YYYYMMDD", self.end_date))?;
        let range = DateRange::new(begin, end)
            .with_context(|| format!("end_date {} precedes begin_date {}", end, begin))?;
        ensure!(!self.id.trim().is_empty(), "station id must not be empty");

        Ok(StationQuery {
            station: self.id.clone(),
            range,
            datum: self.datum,
            units: self.units,
            time_zone: self.time_zone,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct MarginSettings {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for MarginSettings {
    fn default() -> Self {
        let m = Margins::default();
        Self {
            top: m.top,
            right: m.right,
            bottom: m.bottom,
            left: m.left,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub margins: MarginSettings,
    pub window_half_width_minutes: i64,
    pub value_padding_ratio: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            margins: MarginSettings::default(),
            window_half_width_minutes: DEFAULT_HALF_WIDTH_MINUTES,
            value_padding_ratio: DEFAULT_VALUE_PADDING_RATIO,
        }
    }
}

impl ChartSettings {
    pub fn margins(&self) -> Margins {
        Margins {
            top: self.margins.top,
            right: self.margins.right,
            bottom: self.margins.bottom,
            left: self.margins.left,
        }
    }

    pub fn container_size(&self) -> ContainerSize {
        ContainerSize::new(self.width, self.height)
    }

    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            margins: self.margins(),
            padding_ratio: self.value_padding_ratio,
        }
    }

    pub fn fishing_policy(&self) -> anyhow::Result<FishingWindowPolicy> {
        FishingWindowPolicy::new(chrono::Duration::minutes(self.window_half_width_minutes))
            .context("window_half_width_minutes must be positive")
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl TidesConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.station.to_query()?;
        self.chart.fishing_policy()?;
        ensure!(
            self.chart.value_padding_ratio >= 0.0,
            "value_padding_ratio must not be negative"
        );
        let m = &self.chart.margins;
        ensure!(
            self.chart.width > m.left + m.right && self.chart.height > m.top + m.bottom,
            "chart {}x{} leaves no drawing area inside its margins",
            self.chart.width,
            self.chart.height
        );
        ensure!(self.provider.timeout_secs > 0, "timeout_secs must be positive");
        Ok(())
    }
}

/// `config/tides.{toml,yaml,json}` if present, then `TIDES__SECTION__KEY` overrides.
pub fn load_tides_config() -> anyhow::Result<TidesConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tides").required(false))
        .add_source(
            config::Environment::with_prefix("TIDES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let tides: TidesConfig = settings.try_deserialize()?;
    tides.validate()?;
    Ok(tides)
}
