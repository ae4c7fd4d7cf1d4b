use std::collections::HashMap;

use crate::figure::{Axis, Figure, Layout, Trace};
use crate::observations::ObservationTable;

/// Alert-type counts, most frequent first (first-seen order for ties).
pub fn alert_distribution(table: &ObservationTable) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in table.rows() {
        let Some(tag) = row.alert_type.as_deref().filter(|tag| !tag.is_empty()) else {
            continue;
        };
        if !counts.contains_key(tag) {
            order.push(tag.to_string());
        }
        *counts.entry(tag.to_string()).or_insert(0) += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts.remove(&tag).unwrap_or(0);
            (tag, count)
        })
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Bar chart of alert counts by type; an alert-free table degrades to the
/// explanatory placeholder.
pub fn alert_distribution_figure(table: &ObservationTable) -> Figure {
    let counts = alert_distribution(table);
    if counts.is_empty() {
        let mut figure = Figure::placeholder("No Alert Data Available");
        figure.layout.xaxis = Some(Axis::titled("Alert Type"));
        figure.layout.yaxis = Some(Axis::titled("Count"));
        return figure;
    }

    let mut figure = Figure::new(Layout {
        title: Some("Distribution of Alert Types".to_string()),
        xaxis: Some(Axis::titled("Alert Type")),
        yaxis: Some(Axis::titled("Count")),
        ..Layout::default()
    });
    figure.push(Trace::Bar {
        x: counts.iter().map(|(tag, _)| tag.clone()).collect(),
        y: counts.iter().map(|&(_, count)| count as f64).collect(),
        name: None,
    });
    figure
}
