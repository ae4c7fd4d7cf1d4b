use serde::Serialize;
use std::collections::BTreeSet;

use crate::observations::ObservationTable;

const BUILTIN_COLUMNS: [&str; 4] = ["x", "y", "z", "altitude"];

/// Descriptive statistics for one numeric column, rounded to 4 decimals.
/// Skewness and kurtosis are bias-corrected and need 3 resp. 4 samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Statistics for every numeric column the table carries: the built-in
/// columns first, then extra columns in name order.
pub fn describe(table: &ObservationTable) -> Vec<ColumnStats> {
    let mut columns: Vec<String> = BUILTIN_COLUMNS
        .iter()
        .filter(|column| table.has_column(column))
        .map(|column| column.to_string())
        .collect();
    let extra: BTreeSet<&String> = table.rows().iter().flat_map(|row| row.extra.keys()).collect();
    columns.extend(extra.into_iter().cloned());

    columns
        .into_iter()
        .filter_map(|column| {
            let values: Vec<f64> = table
                .rows()
                .iter()
                .filter_map(|row| row.field(&column))
                .collect();
            if values.is_empty() {
                return None;
            }
            Some(column_stats(column, values))
        })
        .collect()
}

fn column_stats(column: String, mut values: Vec<f64>) -> ColumnStats {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;

    let m2 = central_moment(&values, mean, 2);
    let std = (n >= 2).then(|| (m2 * nf / (nf - 1.0)).sqrt());

    let skewness = (n >= 3 && m2 > 0.0).then(|| {
        let g1 = central_moment(&values, mean, 3) / m2.powf(1.5);
        g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
    });

    let kurtosis = (n >= 4 && m2 > 0.0).then(|| {
        let g2 = central_moment(&values, mean, 4) / (m2 * m2) - 3.0;
        ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
    });

    ColumnStats {
        column,
        count: n,
        mean: round4(mean),
        median: round4(quantile(&values, 0.5)),
        std: std.map(round4),
        min: round4(values[0]),
        q25: round4(quantile(&values, 0.25)),
        q75: round4(quantile(&values, 0.75)),
        max: round4(values[n - 1]),
        skewness: skewness.map(round4),
        kurtosis: kurtosis.map(round4),
    }
}

fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / values.len() as f64
}

/// Linear-interpolation quantile over pre-sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        sorted[low] + (position - low as f64) * (sorted[high] - sorted[low])
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
