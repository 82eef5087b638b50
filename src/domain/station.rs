// Station query parameters
use chrono::NaiveDate;
use serde::Deserialize;

/// Water level reference baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Datum {
    Mhhw,
    Mhw,
    Mtl,
    Msl,
    Mlw,
    Mllw,
    Navd,
    Stnd,
}

impl Datum {
    pub fn as_str(&self) -> &'static str {
        match self {
            Datum::Mhhw => "MHHW",
            Datum::Mhw => "MHW",
            Datum::Mtl => "MTL",
            Datum::Msl => "MSL",
            Datum::Mlw => "MLW",
            Datum::Mllw => "MLLW",
            Datum::Navd => "NAVD",
            Datum::Stnd => "STND",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    English,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::English => "english",
            Units::Metric => "metric",
        }
    }

    /// Suffix for displayed water levels.
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::English => "ft",
            Units::Metric => "m",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZone {
    Gmt,
    Lst,
    LstLdt,
}

impl TimeZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeZone::Gmt => "gmt",
            TimeZone::Lst => "lst",
            TimeZone::LstLdt => "lst_ldt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` precedes `begin`.
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Option<Self> {
        (begin <= end).then_some(Self { begin, end })
    }
}

/// Everything needed to ask the provider for one station's series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationQuery {
    pub station: String,
    pub range: DateRange,
    pub datum: Datum,
    pub units: Units,
    pub time_zone: TimeZone,
}

/// Provider date format, `YYYYMMDD`.
pub fn format_provider_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn parse_provider_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}
