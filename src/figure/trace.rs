use chrono::{DateTime, Utc};
use serde::Serialize;

/// A point on a chart's x-axis: observation timestamps when the table has
/// them, plain row indices otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Time(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Marker color: one shared named color, or one numeric value per point
/// mapped through the trace's colorscale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Named(String),
    Sequence(Vec<f64>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

impl Marker {
    pub fn named(color: &str, size: f64) -> Self {
        Self {
            size: Some(size),
            color: Some(MarkerColor::Named(color.to_string())),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Line {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: Some(color.to_string()),
            width: Some(width),
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f64) -> Self {
        Self {
            color: Some(color.to_string()),
            width: Some(width),
            dash: Some("dash".to_string()),
        }
    }
}

/// One drawable layer of a figure, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trace {
    Scatter {
        x: Vec<AxisValue>,
        y: Vec<f64>,
        mode: TraceMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<Marker>,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<Line>,
    },
    Scatter3d {
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        mode: TraceMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<Marker>,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<Line>,
    },
    Surface {
        x: Vec<Vec<f64>>,
        y: Vec<Vec<f64>>,
        z: Vec<Vec<f64>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        opacity: f64,
        colorscale: String,
        showscale: bool,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}
