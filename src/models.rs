use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative or oversized value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// `{ "id": ..., "value": ... }` pair used throughout the API.
///
/// Either half may be absent in a record; it then reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
}

impl CodeName {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// One country record from the `country` endpoint.
///
/// Aggregates (regions, income groups) come from the same endpoint and are
/// recognizable by an empty `capital_city`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    #[serde(rename = "iso2Code", default)]
    pub iso2_code: String,
    pub name: String,
    pub region: CodeName,
    #[serde(rename = "incomeLevel", default)]
    pub income_level: Option<CodeName>,
    #[serde(rename = "capitalCity", default)]
    pub capital_city: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub latitude: String,
}

impl Country {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        capital_city: impl Into<String>,
    ) -> Self {
        let region = region.into();
        Self {
            id: id.into(),
            iso2_code: String::new(),
            name: name.into(),
            region: CodeName::new("", region),
            income_level: None,
            capital_city: capital_city.into(),
            longitude: String::new(),
            latitude: String::new(),
        }
    }

    /// Regions and income groups have no capital.
    pub fn is_aggregate(&self) -> bool {
        self.capital_city.trim().is_empty()
    }
}

/// One observation (country, indicator, year) as returned by the indicator endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub indicator: CodeName,
    pub country: CodeName,
    #[serde(rename = "countryiso3code", default)]
    pub country_iso3: String,
    pub date: String,
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub obs_status: Option<String>,
    #[serde(default)]
    pub decimal: Option<i32>,
}

impl DataPoint {
    pub fn new(
        indicator_id: impl Into<String>,
        country_id: impl Into<String>,
        date: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        Self {
            indicator: CodeName::new(indicator_id, ""),
            country: CodeName::new(country_id, ""),
            country_iso3: String::new(),
            date: date.into(),
            value,
            unit: None,
            obs_status: None,
            decimal: None,
        }
    }

    /// Numeric year of the observation; `None` for non-numeric dates.
    pub fn year(&self) -> Option<i32> {
        self.date.trim().parse::<i32>().ok()
    }
}

/// Observations keyed by indicator code.
pub type IndicatorSeries = BTreeMap<String, Vec<DataPoint>>;

/// A bookmarked country with free-text notes.
///
/// Serialized as a flat record `{id, name, notes, addedAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub added_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: String::new(),
            added_at: Utc::now(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Lifecycle of one fetch slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
