use crate::figure::{Axis, AxisValue, Figure, Layout, Marker, MarkerColor, Trace, TraceMode};
use crate::observations::ObservationTable;

use super::axis_value;
use super::error::RenderError;

const ALERT_SIZE: f64 = 10.0;

/// Value-over-time line for any named numeric field, with alert rows
/// overlaid as distinguished markers.
pub fn render_series(table: &ObservationTable, field: &str) -> Result<Figure, RenderError> {
    if !table.has_column(field) {
        return Err(RenderError::ColumnNotFound(field.to_string()));
    }

    let use_time = table.has_timestamps();
    let mut xs: Vec<AxisValue> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    let mut alert_xs: Vec<AxisValue> = Vec::new();
    let mut alert_ys: Vec<f64> = Vec::new();
    for (index, row) in table.ordered().iter().enumerate() {
        let Some(value) = row.field(field) else {
            continue;
        };
        let key = axis_value(row, index, use_time);
        xs.push(key);
        ys.push(value);
        if row.is_alert() {
            alert_xs.push(key);
            alert_ys.push(value);
        }
    }

    let mut figure = Figure::new(Layout {
        title: Some(format!("Time Series of {}", field)),
        xaxis: Some(Axis::titled(if use_time { "Time" } else { "Index" })),
        yaxis: Some(Axis::titled(field)),
        height: Some(600),
        ..Layout::default()
    });

    figure.push(Trace::Scatter {
        x: xs,
        y: ys,
        mode: TraceMode::Lines,
        name: Some(field.to_string()),
        marker: None,
        line: None,
    });

    if !alert_xs.is_empty() {
        figure.push(Trace::Scatter {
            x: alert_xs,
            y: alert_ys,
            mode: TraceMode::Markers,
            name: Some("Alerts".to_string()),
            marker: Some(Marker {
                size: Some(ALERT_SIZE),
                color: Some(MarkerColor::Named("red".to_string())),
                symbol: Some("triangle-up".to_string()),
                ..Marker::default()
            }),
            line: None,
        });
    }

    Ok(figure)
}

pub fn series_or_placeholder(table: &ObservationTable, field: &str) -> Figure {
    match render_series(table, field) {
        Ok(figure) => figure,
        Err(err) => {
            let mut figure = Figure::placeholder(format!("Cannot render series: {}", err));
            figure.layout.xaxis = Some(Axis::titled("Time"));
            figure.layout.yaxis = Some(Axis::titled("Value"));
            figure
        }
    }
}
