use std::cmp::Ordering;

use super::Observation;

/// An ordered collection of observation records for one satellite.
///
/// Tables are sparse: a column "exists" when at least one row populates it.
/// Callers own the table; the only write-back a renderer ever performs is
/// the derived altitude column, through an explicit `&mut` borrow.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Observation] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        match name {
            "timestamp" => self.has_timestamps(),
            "alert_type" => self.rows.iter().any(|row| row.alert_type.is_some()),
            _ => self.rows.iter().any(|row| row.field(name).is_some()),
        }
    }

    pub fn has_positions(&self) -> bool {
        self.rows.iter().any(|row| row.position().is_some())
    }

    pub fn has_timestamps(&self) -> bool {
        self.rows.iter().any(|row| row.timestamp.is_some())
    }

    /// Rows in chronological order: sorted by timestamp ascending when the
    /// column exists (stable, untimed rows last), table order otherwise.
    ///
    /// Renderers call this exactly once per render so a single figure never
    /// mixes orderings.
    pub fn ordered(&self) -> Vec<&Observation> {
        let mut rows: Vec<&Observation> = self.rows.iter().collect();
        if self.has_timestamps() {
            rows.sort_by(|a, b| match (a.timestamp, b.timestamp) {
                (Some(ta), Some(tb)) => ta.cmp(&tb),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        rows
    }
}
