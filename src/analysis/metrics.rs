use serde::Serialize;

use crate::observations::{ObservationTable, Position};

/// Headline numbers for one satellite's positional history. Missing
/// inputs zero the dependent fields rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryMetrics {
    pub total_distance_km: f64,
    pub duration_hours: f64,
    pub avg_speed_km_h: f64,
    pub min_altitude_km: f64,
    pub max_altitude_km: f64,
    pub alert_count: usize,
}

pub fn trajectory_metrics(table: &ObservationTable) -> TrajectoryMetrics {
    let rows = table.ordered();

    let positions: Vec<Position> = rows.iter().filter_map(|row| row.position()).collect();
    let total_distance_km = positions
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum::<f64>()
        / 1000.0;

    // Ordered rows are ascending in time, so span = last - first.
    let times: Vec<_> = rows.iter().filter_map(|row| row.timestamp).collect();
    let duration_hours = match (times.first(), times.last()) {
        (Some(first), Some(last)) => (*last - *first).num_seconds() as f64 / 3600.0,
        _ => 0.0,
    };

    let avg_speed_km_h = if duration_hours > 0.0 {
        total_distance_km / duration_hours
    } else {
        0.0
    };

    let altitudes: Vec<f64> = rows.iter().filter_map(|row| row.altitude).collect();
    let (min_altitude_km, max_altitude_km) = if altitudes.is_empty() {
        (0.0, 0.0)
    } else {
        (
            altitudes.iter().copied().fold(f64::INFINITY, f64::min) / 1000.0,
            altitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max) / 1000.0,
        )
    };

    TrajectoryMetrics {
        total_distance_km,
        duration_hours,
        avg_speed_km_h,
        min_altitude_km,
        max_altitude_km,
        alert_count: rows.iter().filter(|row| row.is_alert()).count(),
    }
}
