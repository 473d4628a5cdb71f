use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One entry of the provider's forecast `list`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ForecastEntry {
    /// Unix seconds; missing or zero means the entry cannot be placed in time.
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: Vec<Condition>,
}

/// Treat an explicit `null` list like a missing one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ForecastEntry {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.dt
            .filter(|dt| *dt != 0)
            .and_then(|dt| DateTime::from_timestamp(dt, 0))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Wind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Condition {
    pub description: Option<String>,
}

/// Weather attached to a trajectory point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WeatherSummary {
    pub wind_speed_mps: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub weather_description: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub data_timestamp_utc: DateTime<Utc>,
    pub time_diff_to_actual_seconds: i64,
}
