use crate::figure::{Axis, AxisValue, Figure, Layout, Line, Marker, Trace, TraceMode};
use crate::observations::ObservationTable;

use super::error::RenderError;

const ENDPOINT_SIZE: f64 = 10.0;
const START_COLOR: &str = "green";
const END_COLOR: &str = "red";

/// Planar path of the satellite: every observed point, the chronological
/// path through them, and distinguished start/end markers.
pub fn render_ground_track(table: &ObservationTable) -> Result<Figure, RenderError> {
    if !table.has_column("x") || !table.has_column("y") {
        return Err(RenderError::MissingCoordinates("x, y"));
    }

    let points: Vec<(f64, f64)> = table
        .ordered()
        .into_iter()
        .filter_map(|row| match (row.x, row.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    let xs: Vec<AxisValue> = points.iter().map(|&(x, _)| AxisValue::Number(x)).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();

    let mut figure = Figure::new(Layout {
        title: Some("Ground Track".to_string()),
        xaxis: Some(Axis::titled("X Position (m)")),
        yaxis: Some(Axis::titled("Y Position (m)")),
        height: Some(600),
        ..Layout::default()
    });

    figure.push(Trace::Scatter {
        x: xs.clone(),
        y: ys.clone(),
        mode: TraceMode::Markers,
        name: Some("Observations".to_string()),
        marker: None,
        line: None,
    });
    figure.push(Trace::Scatter {
        x: xs,
        y: ys,
        mode: TraceMode::Lines,
        name: Some("Path".to_string()),
        marker: None,
        line: Some(Line::solid("rgba(0,0,0,0.5)", 1.0)),
    });

    // A one-row table gets coincident start and end markers; that is
    // valid output, not an error.
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        figure.push(endpoint_marker("Start", START_COLOR, *first));
        figure.push(endpoint_marker("End", END_COLOR, *last));
    }

    Ok(figure)
}

fn endpoint_marker(name: &str, color: &str, point: (f64, f64)) -> Trace {
    Trace::Scatter {
        x: vec![AxisValue::Number(point.0)],
        y: vec![point.1],
        mode: TraceMode::Markers,
        name: Some(name.to_string()),
        marker: Some(Marker::named(color, ENDPOINT_SIZE)),
        line: None,
    }
}

pub fn ground_track_or_placeholder(table: &ObservationTable) -> Figure {
    match render_ground_track(table) {
        Ok(figure) => figure,
        Err(err) => {
            let mut figure = Figure::placeholder(format!("Cannot render ground track: {}", err));
            figure.layout.xaxis = Some(Axis::titled("X Position"));
            figure.layout.yaxis = Some(Axis::titled("Y Position"));
            figure
        }
    }
}
