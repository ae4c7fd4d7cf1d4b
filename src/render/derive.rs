use log::debug;
use std::f64::consts::{PI, TAU};

use crate::figure::Trace;
use crate::observations::{ObservationTable, Position};

use super::config::RenderConfig;
use super::error::RenderError;

const SPHERE_U_SAMPLES: usize = 20;
const SPHERE_V_SAMPLES: usize = 10;

/// Populate the altitude column from raw Cartesian positions.
///
/// No-op when the table already carries altitudes, so repeated renders of
/// the same table do the work once; the caller keeps and reuses the
/// augmented table. Derived values are clamped at zero: numeric noise
/// near the reference surface must not read as underground.
pub fn ensure_altitude(
    table: &mut ObservationTable,
    config: &RenderConfig,
) -> Result<(), RenderError> {
    if table.has_column("altitude") {
        return Ok(());
    }
    if !table.has_positions() {
        return Err(RenderError::NoAltitudeSource);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in table.rows_mut() {
        if let Some(position) = row.position() {
            let altitude = (position.distance_from_origin() - config.reference_radius_m).max(0.0);
            min = min.min(altitude);
            max = max.max(altitude);
            row.altitude = Some(altitude);
        }
    }
    debug!("derived altitudes from {:.2} to {:.2} m", min, max);
    Ok(())
}

/// Display unit for altitude values, decided per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeUnit {
    Meters,
    Kilometers,
}

impl AltitudeUnit {
    /// Kilometers when the largest rendered value exceeds the configured
    /// threshold, meters otherwise.
    pub fn choose(values_m: &[f64], config: &RenderConfig) -> Self {
        let max = values_m.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > config.kilometers_above_m {
            AltitudeUnit::Kilometers
        } else {
            AltitudeUnit::Meters
        }
    }

    pub fn convert(self, meters: f64) -> f64 {
        match self {
            AltitudeUnit::Meters => meters,
            AltitudeUnit::Kilometers => meters / 1000.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            AltitudeUnit::Meters => "m",
            AltitudeUnit::Kilometers => "km",
        }
    }

    pub fn axis_title(self) -> String {
        format!("Altitude ({})", self.suffix())
    }

    /// The reference-body radius in this unit (6371 km vs 6 371 000 m).
    pub fn reference_radius(self, config: &RenderConfig) -> f64 {
        self.convert(config.reference_radius_m)
    }
}

pub(crate) fn centroid(positions: &[Position]) -> Position {
    let n = positions.len() as f64;
    let mut sum = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    for position in positions {
        sum.x += position.x;
        sum.y += position.y;
        sum.z += position.z;
    }
    Position {
        x: sum.x / n,
        y: sum.y / n,
        z: sum.z / n,
    }
}

pub(crate) fn mean_distance(positions: &[Position], center: Position) -> f64 {
    let total: f64 = positions
        .iter()
        .map(|position| position.distance_to(&center))
        .sum();
    total / positions.len() as f64
}

/// Translucent full-sphere mesh for the reference body, centered at the
/// origin: 20 samples around the equator, 10 pole to pole.
pub(crate) fn reference_sphere(radius: f64) -> Trace {
    let mut x = Vec::with_capacity(SPHERE_U_SAMPLES);
    let mut y = Vec::with_capacity(SPHERE_U_SAMPLES);
    let mut z = Vec::with_capacity(SPHERE_U_SAMPLES);
    for i in 0..SPHERE_U_SAMPLES {
        let u = TAU * i as f64 / (SPHERE_U_SAMPLES - 1) as f64;
        let mut row_x = Vec::with_capacity(SPHERE_V_SAMPLES);
        let mut row_y = Vec::with_capacity(SPHERE_V_SAMPLES);
        let mut row_z = Vec::with_capacity(SPHERE_V_SAMPLES);
        for j in 0..SPHERE_V_SAMPLES {
            let v = PI * j as f64 / (SPHERE_V_SAMPLES - 1) as f64;
            row_x.push(radius * u.cos() * v.sin());
            row_y.push(radius * u.sin() * v.sin());
            row_z.push(radius * v.cos());
        }
        x.push(row_x);
        y.push(row_y);
        z.push(row_z);
    }
    Trace::Surface {
        x,
        y,
        z,
        name: Some("Earth".to_string()),
        opacity: 0.3,
        colorscale: "Blues".to_string(),
        showscale: false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::observations::Observation;
    use rstest::rstest;

    fn positioned(x: f64, y: f64, z: f64) -> Observation {
        Observation {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Observation::default()
        }
    }

    #[test]
    fn derives_altitude_from_positions() {
        let mut table = ObservationTable::new(vec![positioned(7_000_000.0, 0.0, 0.0)]);
        ensure_altitude(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(table.rows()[0].altitude, Some(629_000.0));
    }

    #[test]
    fn derived_altitude_is_clamped_at_zero() {
        // A point just inside the reference radius, i.e. sensor noise.
        let mut table = ObservationTable::new(vec![positioned(6_000_000.0, 0.0, 0.0)]);
        ensure_altitude(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(table.rows()[0].altitude, Some(0.0));
    }

    #[test]
    fn existing_altitude_column_is_left_alone() {
        let mut row = positioned(7_000_000.0, 0.0, 0.0);
        row.altitude = Some(42.0);
        let mut table = ObservationTable::new(vec![row]);
        ensure_altitude(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(table.rows()[0].altitude, Some(42.0));
    }

    #[test]
    fn derivation_is_idempotent() {
        let mut table = ObservationTable::new(vec![
            positioned(7_000_000.0, 0.0, 0.0),
            positioned(0.0, 6_900_000.0, 0.0),
        ]);
        let config = RenderConfig::default();
        ensure_altitude(&mut table, &config).unwrap();
        let first: Vec<Option<f64>> = table.rows().iter().map(|row| row.altitude).collect();
        ensure_altitude(&mut table, &config).unwrap();
        let second: Vec<Option<f64>> = table.rows().iter().map(|row| row.altitude).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_both_sources_is_an_error() {
        let mut table = ObservationTable::new(vec![Observation::default()]);
        assert_eq!(
            ensure_altitude(&mut table, &RenderConfig::default()),
            Err(RenderError::NoAltitudeSource)
        );
    }

    #[rstest]
    #[case(vec![10_000.0, 50_000.0], AltitudeUnit::Meters)]
    #[case(vec![10_000.0, 150_000.0], AltitudeUnit::Kilometers)]
    #[case(vec![100_000.0], AltitudeUnit::Meters)]
    fn unit_follows_the_maximum_value(#[case] values: Vec<f64>, #[case] expected: AltitudeUnit) {
        assert_eq!(
            AltitudeUnit::choose(&values, &RenderConfig::default()),
            expected
        );
    }

    #[test]
    fn unit_conversion_and_reference_radius() {
        let config = RenderConfig::default();
        assert_eq!(AltitudeUnit::Meters.reference_radius(&config), 6_371_000.0);
        assert_eq!(AltitudeUnit::Kilometers.reference_radius(&config), 6_371.0);
        assert_eq!(AltitudeUnit::Kilometers.convert(500.0), 0.5);
    }

    #[test]
    fn sphere_mesh_sits_on_the_radius() {
        let Trace::Surface { x, y, z, .. } = reference_sphere(1000.0) else {
            panic!("expected a surface trace");
        };
        assert_eq!(x.len(), 20);
        assert_eq!(x[0].len(), 10);
        for ((row_x, row_y), row_z) in x.iter().zip(&y).zip(&z) {
            for ((px, py), pz) in row_x.iter().zip(row_y).zip(row_z) {
                let r = (px * px + py * py + pz * pz).sqrt();
                assert!((r - 1000.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn centroid_and_mean_distance() {
        let positions = vec![
            Position {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            Position {
                x: 2.0,
                y: 0.0,
                z: 0.0,
            },
        ];
        let center = centroid(&positions);
        assert_eq!(center, Position { x: 1.0, y: 0.0, z: 0.0 });
        assert_eq!(mean_distance(&positions, center), 1.0);
    }
}
