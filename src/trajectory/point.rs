use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::weather::WeatherSummary;

/// A fix placed in time, with the motion derived from its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TrajectoryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub timestamp_utc: DateTime<Utc>,
    /// Label of the snapshot the fix came from.
    pub source_file: String,
    pub ground_speed_kmh: Option<f64>,
    pub bearing_deg: Option<f64>,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
}
