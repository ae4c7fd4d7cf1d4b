mod altitude;
mod config;
mod derive;
mod error;
mod ground_track;
mod series;
mod trajectory;

pub use altitude::{altitude_profile_or_placeholder, render_altitude_profile};
pub use config::{ConfigError, RenderConfig};
pub use derive::{ensure_altitude, AltitudeUnit};
pub use error::RenderError;
pub use ground_track::{ground_track_or_placeholder, render_ground_track};
pub use series::{render_series, series_or_placeholder};
pub use trajectory::{render_trajectory, trajectory_or_placeholder};

use crate::figure::AxisValue;
use crate::observations::Observation;

/// Mean radius of the reference body (Earth), meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Ordering key for a row: its timestamp when the table is timestamped,
/// its position in the ordered sequence otherwise.
fn axis_value(row: &Observation, index: usize, use_time: bool) -> AxisValue {
    match (use_time, row.timestamp) {
        (true, Some(t)) => AxisValue::Time(t),
        _ => AxisValue::Number(index as f64),
    }
}
