use serde::Serialize;
use utoipa::ToSchema;

use crate::trajectory::TrajectoryPoint;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PointDetail {
    pub index: usize,
    pub point: TrajectoryPoint,
    /// Angle between the balloon's heading and the wind direction, 0..=180.
    pub bearing_vs_wind_deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

/// Polyline of every point that came from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrackPath {
    pub source_file: String,
    pub coordinates: Vec<LatLon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DatasetSummary {
    pub points: usize,
    pub snapshots: usize,
    pub points_with_weather: usize,
}

/// Read-only view over a saved trajectory document.
pub struct PointStore {
    points: Vec<TrajectoryPoint>,
}

impl PointStore {
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    pub fn filter(
        &self,
        source_file: Option<&str>,
        with_weather: Option<bool>,
    ) -> Vec<TrajectoryPoint> {
        self.points
            .iter()
            .filter(|p| source_file.map_or(true, |s| s == p.source_file))
            .filter(|p| with_weather.map_or(true, |w| w == p.weather.is_some()))
            .cloned()
            .collect()
    }

    pub fn detail(&self, index: usize) -> Option<PointDetail> {
        let point = self.points.get(index)?.clone();
        let bearing_vs_wind_deg = match (
            point.bearing_deg,
            point.weather.as_ref().and_then(|w| w.wind_direction_deg),
        ) {
            (Some(bearing), Some(wind)) => Some(angle_between(bearing, wind)),
            _ => None,
        };
        Some(PointDetail {
            index,
            point,
            bearing_vs_wind_deg,
        })
    }

    /// One path per snapshot with at least two points, in first-seen order.
    pub fn paths(&self) -> Vec<TrackPath> {
        let mut paths: Vec<TrackPath> = Vec::new();
        for point in &self.points {
            let coordinate = LatLon {
                latitude: point.latitude,
                longitude: point.longitude,
            };
            match paths.iter_mut().find(|p| p.source_file == point.source_file) {
                Some(path) => path.coordinates.push(coordinate),
                None => paths.push(TrackPath {
                    source_file: point.source_file.clone(),
                    coordinates: vec![coordinate],
                }),
            }
        }
        paths.retain(|p| p.coordinates.len() > 1);
        paths
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut snapshots: Vec<&str> = self.points.iter().map(|p| p.source_file.as_str()).collect();
        snapshots.sort_unstable();
        snapshots.dedup();

        DatasetSummary {
            points: self.points.len(),
            snapshots: snapshots.len(),
            points_with_weather: self.points.iter().filter(|p| p.weather.is_some()).count(),
        }
    }
}

fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}
