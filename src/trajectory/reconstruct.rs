use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::geodesy::{bearing_deg, distance_km, round2};
use crate::snapshot::{RawValue, Snapshot};
use crate::trajectory::TrajectoryPoint;

const SECONDS_PER_HOUR: f64 = 3600.0;
const MIN_ELAPSED_HOURS: f64 = 1e-9;
/// Below this distance consecutive fixes count as stationary.
const STATIONARY_KM: f64 = 0.001;

/// The hour a snapshot covers and how it is sliced between its entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub increment_s: f64,
}

impl Window {
    /// Window ending `hour_offset` hours before `reference`, split into
    /// `slots` equal steps. `None` when the window falls outside the
    /// representable date range.
    pub fn new(reference: DateTime<Utc>, hour_offset: i64, slots: usize) -> Option<Self> {
        let end = reference.checked_sub_signed(Duration::try_hours(hour_offset)?)?;
        let start = end.checked_sub_signed(Duration::hours(1))?;
        let increment_s = if slots > 1 {
            SECONDS_PER_HOUR / slots as f64
        } else {
            0.0
        };
        Some(Self { start, increment_s })
    }

    pub fn timestamp(&self, slot: usize) -> DateTime<Utc> {
        if self.increment_s > 0.0 {
            let micros = (slot as f64 * self.increment_s * 1e6).round() as i64;
            self.start + Duration::microseconds(micros)
        } else {
            self.start
        }
    }
}

/// Turn labeled snapshots into one ordered sequence of trajectory points.
///
/// Snapshots are visited by descending hour offset. Inside a snapshot the
/// raw entries are taken as chronological and spread evenly over its hour;
/// malformed entries are dropped but keep their time slot. Speed and bearing
/// come from the previous usable fix of the same snapshot only.
pub fn reconstruct(snapshots: &[Snapshot], reference: DateTime<Utc>) -> Vec<TrajectoryPoint> {
    let mut points = Vec::new();
    for snapshot in order_snapshots(snapshots) {
        points.extend(reconstruct_snapshot(snapshot, reference));
    }
    points
}

fn order_snapshots(snapshots: &[Snapshot]) -> Vec<&Snapshot> {
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();

    if let Some(unsortable) = ordered.iter().find(|s| s.label.hour_offset().is_none()) {
        warn!(
            "Cannot sort snapshots by hour offset ({} has none), processing in received order",
            unsortable.label
        );
        return ordered;
    }

    ordered.sort_by_key(|s| Reverse(s.label.hour_offset()));
    ordered
}

fn reconstruct_snapshot(snapshot: &Snapshot, reference: DateTime<Utc>) -> Vec<TrajectoryPoint> {
    let label = &snapshot.label;

    let Some(entries) = snapshot.body.as_array() else {
        warn!(
            "Snapshot {} holds a {} instead of a list of fixes, skipping",
            label,
            snapshot.body.kind()
        );
        return Vec::new();
    };
    if entries.is_empty() {
        return Vec::new();
    }

    let Some(hour_offset) = label.hour_offset() else {
        warn!("Could not parse hour offset from {}, skipping", label);
        return Vec::new();
    };

    // Every raw entry owns a slot, usable or not.
    let Some(window) = Window::new(reference, hour_offset, entries.len()) else {
        warn!(
            "Hour offset {} of {} is out of the supported time range, skipping",
            hour_offset, label
        );
        return Vec::new();
    };
    let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(entries.len());

    for (slot, entry) in entries.iter().enumerate() {
        let Some([latitude, longitude, altitude]) = parse_fix(entry) else {
            debug!("Snapshot {}: dropping malformed fix at index {}", label, slot);
            continue;
        };

        let (ground_speed_kmh, bearing_deg) = match points.last() {
            Some(previous) if window.increment_s > 0.0 => {
                motion_from(previous, latitude, longitude, window.increment_s)
            }
            _ => (None, None),
        };

        points.push(TrajectoryPoint {
            latitude,
            longitude,
            altitude,
            timestamp_utc: window.timestamp(slot),
            source_file: label.to_string(),
            ground_speed_kmh,
            bearing_deg,
            weather: None,
        });
    }

    debug!(
        "Snapshot {}: {} of {} fixes usable",
        label,
        points.len(),
        entries.len()
    );
    points
}

/// A fix is exactly three numeric-coercible values.
fn parse_fix(entry: &RawValue) -> Option<[f64; 3]> {
    match entry.as_array()? {
        [lat, lon, alt] => Some([lat.as_coordinate()?, lon.as_coordinate()?, alt.as_coordinate()?]),
        _ => None,
    }
}

fn motion_from(
    previous: &TrajectoryPoint,
    latitude: f64,
    longitude: f64,
    increment_s: f64,
) -> (Option<f64>, Option<f64>) {
    let distance = distance_km(previous.latitude, previous.longitude, latitude, longitude);
    let elapsed_hours = increment_s / SECONDS_PER_HOUR;

    let speed = (elapsed_hours > MIN_ELAPSED_HOURS).then(|| round2(distance / elapsed_hours));
    let bearing = if distance > STATIONARY_KM {
        let raw = bearing_deg(previous.latitude, previous.longitude, latitude, longitude);
        Some(round2(raw) % 360.0)
    } else {
        previous.bearing_deg
    };

    (speed, bearing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotLabel;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn fix(lat: f64, lon: f64, alt: f64) -> RawValue {
        RawValue::Array(vec![
            RawValue::Number(lat),
            RawValue::Number(lon),
            RawValue::Number(alt),
        ])
    }

    fn snapshot(name: &str, entries: Vec<RawValue>) -> Snapshot {
        Snapshot::new(SnapshotLabel::new(name), RawValue::Array(entries))
    }

    #[test]
    fn window_is_the_hour_before_the_offset() {
        let window = Window::new(reference(), 3, 4).expect("in range");
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        assert_eq!(window.increment_s, 900.0);
        assert_eq!(
            window.timestamp(3),
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 45, 0).unwrap()
        );
    }

    #[test]
    fn window_out_of_range_is_none() {
        assert!(Window::new(reference(), 4_000_000_000, 2).is_none());
        assert!(Window::new(reference(), i64::MIN, 2).is_none());
        assert_eq!(
            Window::new(reference(), -1, 1).map(|w| w.start),
            Some(reference())
        );
    }

    #[test]
    fn out_of_range_offset_skips_only_that_snapshot() {
        let points = reconstruct(
            &[
                snapshot("00.json", vec![fix(0.0, 0.0, 1.0), fix(0.0, 1.0, 1.0)]),
                snapshot("4000000000.json", vec![fix(5.0, 5.0, 1.0)]),
            ],
            reference(),
        );
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.source_file == "00.json"));
    }

    #[test]
    fn negative_offset_sorts_after_zero() {
        let points = reconstruct(
            &[
                snapshot("-1.json", vec![fix(9.0, 0.0, 0.0)]),
                snapshot("00.json", vec![fix(0.0, 0.0, 0.0)]),
            ],
            reference(),
        );
        let order: Vec<_> = points.iter().map(|p| p.source_file.as_str()).collect();
        assert_eq!(order, ["00.json", "-1.json"]);
        assert_eq!(points[1].timestamp_utc, reference());
    }

    #[test]
    fn non_finite_components_are_dropped() {
        let entries = vec![
            fix(0.0, 0.0, 1.0),
            RawValue::Array(vec![
                RawValue::String("nan".into()),
                RawValue::Number(1.0),
                RawValue::Number(1.0),
            ]),
            fix(f64::INFINITY, 2.0, 3.0),
            fix(0.0, 1.0, 1.0),
        ];
        let points = reconstruct(&[snapshot("00.json", entries)], reference());

        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.latitude.is_finite()));
        assert_eq!(
            points[1].timestamp_utc,
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 45, 0).unwrap()
        );
        assert!(points[1].ground_speed_kmh.is_some_and(f64::is_finite));
    }

    #[test]
    fn three_fixes_split_the_hour_in_thirds() {
        let points = reconstruct(
            &[snapshot("00.json", vec![fix(0.0, 0.0, 1.0), fix(0.1, 0.0, 1.0), fix(0.2, 0.0, 1.0)])],
            reference(),
        );

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let times: Vec<_> = points.iter().map(|p| p.timestamp_utc).collect();
        assert_eq!(
            times,
            [
                start,
                start + Duration::seconds(1200),
                start + Duration::seconds(2400)
            ]
        );
    }

    #[test]
    fn first_point_of_each_snapshot_has_no_motion() {
        let points = reconstruct(
            &[
                snapshot("01.json", vec![fix(10.0, 10.0, 1.0), fix(10.5, 10.5, 1.0)]),
                snapshot("00.json", vec![fix(20.0, 20.0, 1.0), fix(20.5, 20.5, 1.0)]),
            ],
            reference(),
        );

        assert_eq!(points.len(), 4);
        for first in [&points[0], &points[2]] {
            assert_eq!(first.ground_speed_kmh, None);
            assert_eq!(first.bearing_deg, None);
        }
        assert!(points[1].ground_speed_kmh.is_some());
        assert!(points[3].ground_speed_kmh.is_some());
    }

    #[test]
    fn stationary_fix_carries_bearing_forward() {
        let points = reconstruct(
            &[snapshot("00.json", vec![fix(0.0, 0.0, 1.0), fix(0.0, 1.0, 1.0), fix(0.0, 1.0, 1.0)])],
            reference(),
        );

        let b = &points[1];
        assert_eq!(b.bearing_deg, Some(90.0));
        // 111.19 km covered in a third of an hour
        assert_eq!(b.ground_speed_kmh, Some(round2(distance_km(0.0, 0.0, 0.0, 1.0) * 3.0)));

        let c = &points[2];
        assert_eq!(c.ground_speed_kmh, Some(0.0));
        assert_eq!(c.bearing_deg, Some(90.0));
    }

    #[test]
    fn stationary_fix_without_prior_bearing_stays_empty() {
        let points = reconstruct(
            &[snapshot("00.json", vec![fix(5.0, 5.0, 1.0), fix(5.0, 5.0, 2.0)])],
            reference(),
        );
        assert_eq!(points[1].ground_speed_kmh, Some(0.0));
        assert_eq!(points[1].bearing_deg, None);
    }

    #[test]
    fn malformed_fix_keeps_its_time_slot() {
        let malformed = RawValue::Array(vec![RawValue::Number(1.0), RawValue::Number(2.0)]);
        let points = reconstruct(
            &[snapshot("00.json", vec![fix(0.0, 0.0, 1.0), malformed, fix(0.0, 1.0, 1.0)])],
            reference(),
        );

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp_utc, start);
        assert_eq!(points[1].timestamp_utc, start + Duration::seconds(2400));
        // kinematics are taken against the previous usable fix over one slot
        assert_eq!(points[1].bearing_deg, Some(90.0));
        assert_eq!(
            points[1].ground_speed_kmh,
            Some(round2(distance_km(0.0, 0.0, 0.0, 1.0) * 3.0))
        );
    }

    #[test]
    fn non_numeric_and_null_components_are_dropped() {
        let entries = vec![
            RawValue::Array(vec![
                RawValue::String("12.5".into()),
                RawValue::Number(3.0),
                RawValue::Number(100.0),
            ]),
            RawValue::Array(vec![RawValue::Null, RawValue::Number(3.0), RawValue::Number(100.0)]),
            RawValue::Array(vec![
                RawValue::String("north".into()),
                RawValue::Number(3.0),
                RawValue::Number(100.0),
            ]),
            RawValue::Number(7.0),
            fix(1.0, 2.0, 3.0),
        ];
        let points = reconstruct(&[snapshot("00.json", entries)], reference());

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].latitude, 12.5);
        assert_eq!(points[1].latitude, 1.0);
        assert_eq!(
            points[1].timestamp_utc,
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 48, 0).unwrap()
        );
    }

    #[test]
    fn single_fix_sits_at_window_start() {
        let points = reconstruct(&[snapshot("02.json", vec![fix(1.0, 1.0, 1.0)])], reference());
        assert_eq!(points.len(), 1);
        assert_eq!(
            points[0].timestamp_utc,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(points[0].source_file, "02.json");
    }

    #[test]
    fn snapshots_are_emitted_by_descending_offset() {
        let points = reconstruct(
            &[
                snapshot("00.json", vec![fix(0.0, 0.0, 0.0)]),
                snapshot("02.json", vec![fix(2.0, 0.0, 0.0)]),
                snapshot("01.json", vec![fix(1.0, 0.0, 0.0)]),
            ],
            reference(),
        );
        let order: Vec<_> = points.iter().map(|p| p.source_file.as_str()).collect();
        assert_eq!(order, ["02.json", "01.json", "00.json"]);
    }

    #[test]
    fn unsortable_label_keeps_received_order() {
        let points = reconstruct(
            &[
                snapshot("00.json", vec![fix(0.0, 0.0, 0.0)]),
                snapshot("latest.json", vec![fix(9.0, 0.0, 0.0)]),
                snapshot("01.json", vec![fix(1.0, 0.0, 0.0)]),
            ],
            reference(),
        );
        let order: Vec<_> = points.iter().map(|p| p.source_file.as_str()).collect();
        assert_eq!(order, ["00.json", "01.json"]);
    }

    #[test]
    fn unusable_bodies_contribute_nothing() {
        let points = reconstruct(
            &[
                snapshot("03.json", vec![]),
                Snapshot::new(
                    SnapshotLabel::new("02.json"),
                    RawValue::Object(vec![("error".into(), RawValue::String("gone".into()))]),
                ),
                Snapshot::new(SnapshotLabel::new("01.json"), RawValue::Null),
                snapshot("00.json", vec![fix(0.0, 0.0, 0.0)]),
            ],
            reference(),
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].source_file, "00.json");
    }

    #[test]
    fn timestamps_never_decrease_within_a_snapshot() {
        let entries = (0..7).map(|i| fix(i as f64 * 0.01, 0.0, 0.0)).collect();
        let points = reconstruct(&[snapshot("05.json", entries)], reference());

        assert_eq!(points.len(), 7);
        assert!(points
            .windows(2)
            .all(|w| w[0].timestamp_utc <= w[1].timestamp_utc));
        assert!(points[6].timestamp_utc < Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn bearings_stay_in_range() {
        let entries = vec![
            fix(0.0, 0.0, 0.0),
            fix(0.0, -0.00001, 0.0),
            fix(1.0, -0.000_001, 0.0),
            fix(-1.0, 0.5, 0.0),
        ];
        let points = reconstruct(&[snapshot("00.json", entries)], reference());
        for bearing in points.iter().filter_map(|p| p.bearing_deg) {
            assert!((0.0..360.0).contains(&bearing), "bearing {bearing}");
        }
    }
}
