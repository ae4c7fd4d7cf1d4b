use chrono::{DateTime, Duration, Utc};
use std::f64::consts::TAU;

use crate::render::EARTH_RADIUS_M;

use super::{Observation, ObservationTable};

const ORBIT_ALTITUDE_M: f64 = 550_000.0;
const ORBIT_PERIOD_S: f64 = 5_700.0;
const INCLINATION_RAD: f64 = 0.9;
const ALERT_EVERY: usize = 40;

/// Deterministic circular-orbit sample table for demos and tests: full
/// position trio, timestamps, and a sparse sprinkling of alert tags.
///
/// This is parametric sample data, not a propagator.
pub fn synthetic_orbit(rows: usize, step: Duration, start: DateTime<Utc>) -> ObservationTable {
    let radius = EARTH_RADIUS_M + ORBIT_ALTITUDE_M;
    let step_s = step.num_milliseconds() as f64 / 1000.0;

    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let theta = TAU * (step_s * i as f64) / ORBIT_PERIOD_S;
        let alert_type =
            (i % ALERT_EVERY == ALERT_EVERY / 2).then(|| "proximity_warning".to_string());
        out.push(Observation {
            timestamp: Some(start + step * i as i32),
            x: Some(radius * theta.cos()),
            y: Some(radius * theta.sin() * INCLINATION_RAD.cos()),
            z: Some(radius * theta.sin() * INCLINATION_RAD.sin()),
            alert_type,
            ..Observation::default()
        });
    }
    ObservationTable::new(out)
}
