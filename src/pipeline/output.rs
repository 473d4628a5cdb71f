use std::fs;
use std::path::Path;

use log::info;

use crate::pipeline::PipelineResult;
use crate::trajectory::TrajectoryPoint;

/// Write the points as a pretty-printed JSON array.
pub fn write_points(path: &Path, points: &[TrajectoryPoint]) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(points)?)?;
    info!("Saved {} point(s) to {}", points.len(), path.display());
    Ok(())
}

pub fn read_points(path: &Path) -> PipelineResult<Vec<TrajectoryPoint>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Log the first `count` points the way they were saved.
pub fn log_preview(points: &[TrajectoryPoint], count: usize) {
    if count == 0 || points.is_empty() {
        return;
    }
    info!("Sample of the first {} point(s):", count.min(points.len()));
    for point in points.iter().take(count) {
        if let Ok(json) = serde_json::to_string_pretty(point) {
            info!("{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherSummary;
    use chrono::{TimeZone, Utc};

    fn point() -> TrajectoryPoint {
        TrajectoryPoint {
            latitude: 12.5,
            longitude: -3.25,
            altitude: 14.2,
            timestamp_utc: Utc.with_ymd_and_hms(2024, 5, 1, 11, 20, 0).unwrap(),
            source_file: "00.json".into(),
            ground_speed_kmh: Some(42.0),
            bearing_deg: None,
            weather: Some(WeatherSummary {
                wind_speed_mps: Some(3.5),
                wind_direction_deg: Some(180.0),
                wind_gust_mps: None,
                weather_description: Some("clear sky".into()),
                temperature_celsius: Some(-40.0),
                pressure_hpa: Some(250.0),
                data_timestamp_utc: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                time_diff_to_actual_seconds: 2400,
            }),
        }
    }

    #[test]
    fn saved_document_uses_the_viewer_field_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("points.json");

        write_points(&path, &[point()]).expect("written");

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        let first = &doc[0];
        assert_eq!(first["latitude"], 12.5);
        assert_eq!(first["source_file"], "00.json");
        assert_eq!(first["timestamp_utc"], "2024-05-01T11:20:00Z");
        assert_eq!(first["ground_speed_kmh"], 42.0);
        assert!(first["bearing_deg"].is_null());
        assert_eq!(first["weather"]["time_diff_to_actual_seconds"], 2400);
        assert_eq!(first["weather"]["weather_description"], "clear sky");
    }

    #[test]
    fn saved_points_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("points.json");
        write_points(&path, &[point()]).expect("written");

        assert_eq!(read_points(&path).expect("read"), vec![point()]);
    }
}
