use crate::figure::{
    AspectMode, Axis, Camera, Figure, Layout, Line, Marker, MarkerColor, Scene, Trace, TraceMode,
};
use crate::observations::{Observation, ObservationTable, Position};

use super::config::RenderConfig;
use super::derive::{centroid, mean_distance, reference_sphere};
use super::error::RenderError;

const PATH_COLOR: &str = "darkblue";
const SEQUENCE_COLORSCALE: &str = "Viridis";
const ENDPOINT_SIZE: f64 = 5.0;
const ALERT_SIZE: f64 = 5.0;

/// Spatial path of the satellite with start/end markers, alert markers,
/// and the reference body when the data is at orbital scale.
pub fn render_trajectory(
    table: &ObservationTable,
    config: &RenderConfig,
) -> Result<Figure, RenderError> {
    if !table.has_column("x") || !table.has_column("y") || !table.has_column("z") {
        return Err(RenderError::MissingCoordinates("x, y, z"));
    }

    let rows: Vec<(&Observation, Position)> = table
        .ordered()
        .into_iter()
        .filter_map(|row| row.position().map(|position| (row, position)))
        .collect();
    let positions: Vec<Position> = rows.iter().map(|(_, position)| *position).collect();

    let mut figure = Figure::new(Layout {
        title: Some("3D Trajectory".to_string()),
        scene: Some(Scene {
            xaxis: Axis::titled("X Position (m)"),
            yaxis: Axis::titled("Y Position (m)"),
            zaxis: Axis::titled("Z Position (m)"),
            aspectmode: AspectMode::Data,
            camera: Camera::default(),
        }),
        height: Some(700),
        ..Layout::default()
    });

    // Colored by sequence index rather than time value, so the gradient
    // stays monotonic even without timestamps.
    let sequence: Vec<f64> = (0..positions.len()).map(|i| i as f64).collect();
    figure.push(Trace::Scatter3d {
        x: positions.iter().map(|p| p.x).collect(),
        y: positions.iter().map(|p| p.y).collect(),
        z: positions.iter().map(|p| p.z).collect(),
        mode: TraceMode::LinesMarkers,
        name: Some("Trajectory".to_string()),
        marker: Some(Marker {
            size: Some(2.0),
            color: Some(MarkerColor::Sequence(sequence)),
            colorscale: Some(SEQUENCE_COLORSCALE.to_string()),
            opacity: Some(0.8),
            ..Marker::default()
        }),
        line: Some(Line::solid(PATH_COLOR, 1.0)),
    });

    if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
        figure.push(endpoint_marker("Start", "green", *first));
        figure.push(endpoint_marker("End", "red", *last));
    }

    let alerts: Vec<Position> = rows
        .iter()
        .filter(|(row, _)| row.is_alert())
        .map(|(_, position)| *position)
        .collect();
    if !alerts.is_empty() {
        figure.push(Trace::Scatter3d {
            x: alerts.iter().map(|p| p.x).collect(),
            y: alerts.iter().map(|p| p.y).collect(),
            z: alerts.iter().map(|p| p.z).collect(),
            mode: TraceMode::Markers,
            name: Some("Alerts".to_string()),
            marker: Some(Marker {
                size: Some(ALERT_SIZE),
                color: Some(MarkerColor::Named("yellow".to_string())),
                symbol: Some("diamond".to_string()),
                line: Some(Line::solid("black", 1.0)),
                ..Marker::default()
            }),
            line: None,
        });
    }

    if !positions.is_empty() {
        // Earth-centered data carries an altitude column; otherwise fall
        // back to the trajectory centroid for the scale test. The sphere
        // itself is always drawn at the origin.
        let center = if table.has_column("altitude") {
            Position {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            }
        } else {
            centroid(&positions)
        };
        if mean_distance(&positions, center) > config.body_overlay_distance_m {
            figure.push(reference_sphere(config.reference_radius_m));
        }
    }

    Ok(figure)
}

fn endpoint_marker(name: &str, color: &str, position: Position) -> Trace {
    Trace::Scatter3d {
        x: vec![position.x],
        y: vec![position.y],
        z: vec![position.z],
        mode: TraceMode::Markers,
        name: Some(name.to_string()),
        marker: Some(Marker::named(color, ENDPOINT_SIZE)),
        line: None,
    }
}

pub fn trajectory_or_placeholder(table: &ObservationTable, config: &RenderConfig) -> Figure {
    match render_trajectory(table, config) {
        Ok(figure) => figure,
        Err(err) => {
            let mut figure = Figure::placeholder(format!("Cannot render 3D trajectory: {}", err));
            figure.layout.scene = Some(Scene {
                xaxis: Axis::titled("X Position"),
                yaxis: Axis::titled("Y Position"),
                zaxis: Axis::titled("Z Position"),
                aspectmode: AspectMode::Auto,
                camera: Camera::default(),
            });
            figure
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::observations::Observation;
    use chrono::{TimeZone, Utc};

    fn orbital(minute: u32, x: f64, y: f64, z: f64) -> Observation {
        Observation {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()),
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Observation::default()
        }
    }

    fn has_surface(figure: &Figure) -> bool {
        figure
            .data
            .iter()
            .any(|trace| matches!(trace, Trace::Surface { .. }))
    }

    fn trace_named<'a>(figure: &'a Figure, wanted: &str) -> Option<&'a Trace> {
        figure.data.iter().find(|trace| match trace {
            Trace::Scatter3d { name: Some(n), .. } => n == wanted,
            _ => false,
        })
    }

    #[test]
    fn missing_coordinates_yield_placeholder() {
        let table = ObservationTable::new(vec![Observation {
            x: Some(1.0),
            y: Some(2.0),
            ..Observation::default()
        }]);
        assert_eq!(
            render_trajectory(&table, &RenderConfig::default()),
            Err(RenderError::MissingCoordinates("x, y, z"))
        );
        let placeholder = trajectory_or_placeholder(&table, &RenderConfig::default());
        assert!(placeholder.data.is_empty());
        assert!(placeholder.layout.scene.is_some());
    }

    #[test]
    fn orbital_scale_data_gets_the_reference_sphere() {
        let table = ObservationTable::new(vec![
            orbital(0, 7_000_000.0, 0.0, 0.0),
            orbital(1, 0.0, 7_000_000.0, 0.0),
            orbital(2, -7_000_000.0, 0.0, 0.0),
        ]);
        let figure = render_trajectory(&table, &RenderConfig::default()).unwrap();
        assert!(has_surface(&figure));
    }

    #[test]
    fn local_scale_data_gets_no_sphere() {
        // All points within 1000 m of the origin; the centroid test keeps
        // an unrelated giant sphere out of locally-scaled scenes.
        let table = ObservationTable::new(vec![
            orbital(0, 100.0, 0.0, 0.0),
            orbital(1, 0.0, 200.0, 0.0),
            orbital(2, 0.0, 0.0, 300.0),
        ]);
        let figure = render_trajectory(&table, &RenderConfig::default()).unwrap();
        assert!(!has_surface(&figure));
    }

    #[test]
    fn altitude_column_forces_origin_centered_scale_test() {
        // A tight cluster far from the origin: centroid-centered mean
        // distance is tiny, origin-centered is huge. The altitude column
        // marks the frame as body-centered.
        let mut rows = vec![
            orbital(0, 7_000_000.0, 0.0, 0.0),
            orbital(1, 7_000_100.0, 0.0, 0.0),
        ];
        let without_altitude = ObservationTable::new(rows.clone());
        let figure = render_trajectory(&without_altitude, &RenderConfig::default()).unwrap();
        assert!(!has_surface(&figure));

        for row in &mut rows {
            row.altitude = Some(629_000.0);
        }
        let with_altitude = ObservationTable::new(rows);
        let figure = render_trajectory(&with_altitude, &RenderConfig::default()).unwrap();
        assert!(has_surface(&figure));
    }

    #[test]
    fn alert_layer_contains_exactly_the_alert_rows() {
        let mut flagged = orbital(1, 0.0, 7_000_000.0, 0.0);
        flagged.alert_type = Some("maneuver".to_string());
        let table = ObservationTable::new(vec![
            orbital(0, 7_000_000.0, 0.0, 0.0),
            flagged,
            orbital(2, -7_000_000.0, 0.0, 0.0),
        ]);
        let figure = render_trajectory(&table, &RenderConfig::default()).unwrap();
        let Some(Trace::Scatter3d { x, y, .. }) = trace_named(&figure, "Alerts") else {
            panic!("expected an alert layer");
        };
        assert_eq!(x, &vec![0.0]);
        assert_eq!(y, &vec![7_000_000.0]);
    }

    #[test]
    fn alert_layer_is_omitted_when_no_alerts() {
        let table = ObservationTable::new(vec![
            orbital(0, 7_000_000.0, 0.0, 0.0),
            orbital(1, 0.0, 7_000_000.0, 0.0),
        ]);
        let figure = render_trajectory(&table, &RenderConfig::default()).unwrap();
        assert!(trace_named(&figure, "Alerts").is_none());
    }

    #[test]
    fn single_row_renders_with_coincident_endpoints() {
        let table = ObservationTable::new(vec![orbital(0, 7_000_000.0, 0.0, 0.0)]);
        let figure = render_trajectory(&table, &RenderConfig::default()).unwrap();
        let start = trace_named(&figure, "Start").cloned();
        let end = trace_named(&figure, "End").cloned();
        let (Some(Trace::Scatter3d { x: sx, .. }), Some(Trace::Scatter3d { x: ex, .. })) =
            (start, end)
        else {
            panic!("expected start and end markers");
        };
        assert_eq!(sx, ex);
    }

    #[test]
    fn path_color_sequence_is_monotonic_without_timestamps() {
        let rows = vec![
            Observation {
                x: Some(1.0),
                y: Some(0.0),
                z: Some(0.0),
                ..Observation::default()
            },
            Observation {
                x: Some(2.0),
                y: Some(0.0),
                z: Some(0.0),
                ..Observation::default()
            },
            Observation {
                x: Some(3.0),
                y: Some(0.0),
                z: Some(0.0),
                ..Observation::default()
            },
        ];
        let figure = render_trajectory(&ObservationTable::new(rows), &RenderConfig::default())
            .unwrap();
        let Some(Trace::Scatter3d {
            marker: Some(marker),
            ..
        }) = trace_named(&figure, "Trajectory")
        else {
            panic!("expected the trajectory trace");
        };
        assert_eq!(
            marker.color,
            Some(MarkerColor::Sequence(vec![0.0, 1.0, 2.0]))
        );
    }
}
