use crate::figure::{Annotation, Axis, Figure, Layout, Line, Shape, ShapeType, Trace, TraceMode};
use crate::observations::ObservationTable;

use super::axis_value;
use super::config::RenderConfig;
use super::derive::{ensure_altitude, AltitudeUnit};
use super::error::RenderError;

const RANGE_BUFFER_RATIO: f64 = 0.1;
const RANGE_FLOOR_KM: f64 = 10.0;
const RANGE_FLOOR_M: f64 = 100.0;

/// Altitude over time with a trailing moving average and, for orbital
/// data, a reference-radius guide line.
///
/// Runs Derivation first, so the caller's table comes back with the
/// altitude column populated.
pub fn render_altitude_profile(
    table: &mut ObservationTable,
    config: &RenderConfig,
) -> Result<Figure, RenderError> {
    ensure_altitude(table, config)?;

    let use_time = table.has_timestamps();
    let mut keys = Vec::new();
    let mut values_m = Vec::new();
    for (index, row) in table.ordered().iter().enumerate() {
        let Some(altitude) = row.altitude else {
            continue;
        };
        keys.push(axis_value(row, index, use_time));
        values_m.push(altitude);
    }

    // Unit choice keys on the maximum; every axis decision below happens
    // in the chosen display unit.
    let unit = AltitudeUnit::choose(&values_m, config);
    let values: Vec<f64> = values_m.iter().map(|&v| unit.convert(v)).collect();
    let y_range = display_range(&values, unit);

    let mut figure = Figure::new(Layout {
        title: Some("Altitude Profile".to_string()),
        xaxis: Some(Axis::titled(if use_time { "Time" } else { "Index" })),
        yaxis: Some(Axis {
            title: Some(unit.axis_title()),
            range: y_range,
            autorange: y_range.is_some().then_some(false),
        }),
        ..Layout::default()
    });

    figure.push(Trace::Scatter {
        x: keys.clone(),
        y: values.clone(),
        mode: TraceMode::Lines,
        name: Some("Altitude".to_string()),
        marker: None,
        line: None,
    });

    if values.len() > config.smoothing_window {
        figure.push(Trace::Scatter {
            x: keys.clone(),
            y: moving_average(&values, config.smoothing_window),
            mode: TraceMode::Lines,
            name: Some(format!("Moving Average ({})", config.smoothing_window)),
            marker: None,
            line: Some(Line::solid("rgba(255,0,0,0.7)", 2.0)),
        });
    }

    // The guide line keys on the raw-meter median, independent of the
    // max-based unit switch.
    let orbital = median(&values_m).is_some_and(|m| m > config.radius_guide_median_m);
    if orbital {
        if let (Some(&first), Some(&last)) = (keys.first(), keys.last()) {
            let radius = unit.reference_radius(config);
            figure.layout.shapes.push(Shape {
                shape_type: ShapeType::Line,
                x0: first,
                y0: radius,
                x1: last,
                y1: radius,
                line: Line::dashed("blue", 1.0),
            });
            figure.layout.annotations.push(Annotation {
                x: first,
                y: radius,
                text: format!("Reference radius ({} {})", radius, unit.suffix()),
                showarrow: false,
                yshift: Some(10.0),
            });
        }
    }

    Ok(figure)
}

/// Fixed y-axis range: a 10% buffer around the data, floored so a
/// near-constant series still gets a readable axis, and never below zero.
fn display_range(values: &[f64], unit: AltitudeUnit) -> Option<[f64; 2]> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let floor = match unit {
        AltitudeUnit::Kilometers => RANGE_FLOOR_KM,
        AltitudeUnit::Meters => RANGE_FLOOR_M,
    };
    let buffer = if max - min < floor {
        floor
    } else {
        RANGE_BUFFER_RATIO * (max - min)
    };
    Some([(min - buffer).max(0.0), max + buffer])
}

/// Trailing mean over the last `window` samples, shrinking to a single
/// sample at the start of the series.
fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

pub fn altitude_profile_or_placeholder(table: &mut ObservationTable, config: &RenderConfig) -> Figure {
    match render_altitude_profile(table, config) {
        Ok(figure) => figure,
        Err(err) => {
            let mut figure =
                Figure::placeholder(format!("Cannot render altitude profile: {}", err));
            figure.layout.xaxis = Some(Axis::titled("Time"));
            figure.layout.yaxis = Some(Axis::titled("Altitude"));
            figure
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::observations::Observation;
    use chrono::{TimeZone, Utc};

    fn at_altitude(minute: u32, altitude: f64) -> Observation {
        Observation {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()),
            altitude: Some(altitude),
            ..Observation::default()
        }
    }

    fn table_of(altitudes: &[f64]) -> ObservationTable {
        ObservationTable::new(
            altitudes
                .iter()
                .enumerate()
                .map(|(i, &a)| at_altitude(i as u32, a))
                .collect(),
        )
    }

    #[test]
    fn no_altitude_and_no_positions_degrades_to_placeholder() {
        let mut table = ObservationTable::new(vec![Observation {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            ..Observation::default()
        }]);
        assert_eq!(
            render_altitude_profile(&mut table, &RenderConfig::default()),
            Err(RenderError::NoAltitudeSource)
        );
        let placeholder = altitude_profile_or_placeholder(&mut table, &RenderConfig::default());
        assert!(placeholder.data.is_empty());
    }

    #[test]
    fn moving_average_uses_a_trailing_window_of_five() {
        let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 5);
        assert_eq!(smoothed[0], 1.0);
        assert_eq!(smoothed[1], 1.5);
        assert_eq!(smoothed[4], 3.0); // mean of rows 0..=4
        assert_eq!(smoothed[5], 4.0); // mean of rows 1..=5
        assert_eq!(smoothed[6], 5.0); // mean of rows 2..=6
    }

    #[test]
    fn smoothing_overlay_needs_more_rows_than_the_window() {
        let config = RenderConfig::default();
        let mut short = table_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let figure = render_altitude_profile(&mut short, &config).unwrap();
        assert_eq!(figure.data.len(), 1);

        let mut long = table_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let figure = render_altitude_profile(&mut long, &config).unwrap();
        assert_eq!(figure.data.len(), 2);
    }

    #[test]
    fn low_altitude_series_stays_in_meters_without_guide_line() {
        let mut table = table_of(&[40_000.0, 50_000.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(
            figure.layout.yaxis.as_ref().unwrap().title.as_deref(),
            Some("Altitude (m)")
        );
        assert!(figure.layout.shapes.is_empty());
    }

    #[test]
    fn orbital_series_converts_to_kilometers_and_draws_the_guide() {
        let mut table = table_of(&[400_000.0, 420_000.0, 410_000.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(
            figure.layout.yaxis.as_ref().unwrap().title.as_deref(),
            Some("Altitude (km)")
        );

        let Trace::Scatter { y, .. } = &figure.data[0] else {
            panic!("expected the altitude trace");
        };
        assert_eq!(y, &vec![400.0, 420.0, 410.0]);

        assert_eq!(figure.layout.shapes.len(), 1);
        assert_eq!(figure.layout.shapes[0].y0, 6371.0);
        assert_eq!(figure.layout.annotations.len(), 1);
    }

    #[test]
    fn guide_line_keys_on_the_median_not_the_maximum() {
        // Max is orbital but the median stays below the guide threshold:
        // kilometers are chosen, the guide line is not drawn.
        let mut table = table_of(&[10_000.0, 20_000.0, 30_000.0, 40_000.0, 150_000.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        assert_eq!(
            figure.layout.yaxis.as_ref().unwrap().title.as_deref(),
            Some("Altitude (km)")
        );
        assert!(figure.layout.shapes.is_empty());
    }

    #[test]
    fn y_range_uses_a_proportional_buffer() {
        let mut table = table_of(&[400_000.0, 500_000.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        // 400..500 km with a 10% buffer.
        assert_eq!(
            figure.layout.yaxis.as_ref().unwrap().range,
            Some([390.0, 510.0])
        );
        assert_eq!(figure.layout.yaxis.as_ref().unwrap().autorange, Some(false));
    }

    #[test]
    fn near_constant_series_gets_the_floor_buffer() {
        let mut table = table_of(&[400_000.0, 400_500.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        // 400.0..400.5 km is narrower than the 10 km floor.
        assert_eq!(
            figure.layout.yaxis.as_ref().unwrap().range,
            Some([390.0, 410.5])
        );
    }

    #[test]
    fn range_never_drops_below_zero() {
        let mut table = table_of(&[10.0, 50.0]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        let range = figure.layout.yaxis.as_ref().unwrap().range.unwrap();
        assert_eq!(range[0], 0.0);
        assert_eq!(range[1], 150.0);
    }

    #[test]
    fn derivation_feeds_the_profile_and_writes_back() {
        let mut table = ObservationTable::new(vec![Observation {
            x: Some(7_000_000.0),
            y: Some(0.0),
            z: Some(0.0),
            ..Observation::default()
        }]);
        let figure = render_altitude_profile(&mut table, &RenderConfig::default()).unwrap();
        assert!(!figure.data.is_empty());
        // The caller's table now carries the derived column.
        assert_eq!(table.rows()[0].altitude, Some(629_000.0));
    }
}
