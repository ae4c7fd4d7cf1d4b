use serde::Serialize;

use crate::figure::{Axis, AxisValue, Figure, Layout, Line, Marker, MarkerColor, Trace, TraceMode};
use crate::observations::ObservationTable;
use crate::render::RenderError;

const BASE_MARKER_SIZE: f64 = 6.0;
const ANOMALY_MARKER_SIZE: f64 = 10.0;

/// Result of a z-score sweep over one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyScan {
    pub field: String,
    pub threshold: f64,
    /// Table-order indices of the rows whose |z| exceeds the threshold.
    pub indices: Vec<usize>,
}

/// Flag rows whose field value sits more than `threshold` population
/// standard deviations from the column mean. Rows without the field are
/// never flagged; a constant column flags nothing. Runs in table order —
/// this is a detector, not a renderer, so no chronological sort applies.
pub fn detect_anomalies(
    table: &ObservationTable,
    field: &str,
    threshold: f64,
) -> Result<AnomalyScan, RenderError> {
    if !table.has_column(field) {
        return Err(RenderError::ColumnNotFound(field.to_string()));
    }

    let samples: Vec<(usize, f64)> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| row.field(field).map(|value| (index, value)))
        .collect();

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&(_, value)| value).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&(_, value)| (value - mean).powi(2))
        .sum::<f64>()
        / n;
    let std = variance.sqrt();

    let indices = if std > 0.0 {
        samples
            .iter()
            .filter(|&&(_, value)| ((value - mean) / std).abs() > threshold)
            .map(|&(index, _)| index)
            .collect()
    } else {
        Vec::new()
    };

    Ok(AnomalyScan {
        field: field.to_string(),
        threshold,
        indices,
    })
}

/// Base series plus open-circle markers on the flagged rows, x-axis in
/// table-order indices.
pub fn anomaly_figure(table: &ObservationTable, scan: &AnomalyScan) -> Figure {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut anomaly_xs = Vec::new();
    let mut anomaly_ys = Vec::new();
    for (index, row) in table.rows().iter().enumerate() {
        let Some(value) = row.field(&scan.field) else {
            continue;
        };
        xs.push(AxisValue::Number(index as f64));
        ys.push(value);
        if scan.indices.contains(&index) {
            anomaly_xs.push(AxisValue::Number(index as f64));
            anomaly_ys.push(value);
        }
    }

    let mut figure = Figure::new(Layout {
        title: Some(format!(
            "Anomaly Detection for {} (z-score threshold: {})",
            scan.field, scan.threshold
        )),
        xaxis: Some(Axis::titled("Index")),
        yaxis: Some(Axis::titled(scan.field.clone())),
        ..Layout::default()
    });

    figure.push(Trace::Scatter {
        x: xs,
        y: ys,
        mode: TraceMode::LinesMarkers,
        name: Some(scan.field.clone()),
        marker: Some(Marker {
            size: Some(BASE_MARKER_SIZE),
            ..Marker::default()
        }),
        line: None,
    });

    if !anomaly_xs.is_empty() {
        figure.push(Trace::Scatter {
            x: anomaly_xs,
            y: anomaly_ys,
            mode: TraceMode::Markers,
            name: Some("Anomalies".to_string()),
            marker: Some(Marker {
                size: Some(ANOMALY_MARKER_SIZE),
                color: Some(MarkerColor::Named("red".to_string())),
                symbol: Some("circle-open".to_string()),
                line: Some(Line::solid("red", 2.0)),
                ..Marker::default()
            }),
            line: None,
        });
    }

    figure
}
