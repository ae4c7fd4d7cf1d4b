use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cartesian position relative to the reference body center, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn distance_from_origin(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A single observed satellite state. Every field is optional: tables come
/// from heterogeneous sources and each renderer decides what it can use.
/// Unknown numeric columns land in `extra` and stay addressable by name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Observation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl Observation {
    /// The position trio is all-or-nothing: a record carrying only some of
    /// x, y, z has no usable position.
    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Some(Position { x, y, z }),
            _ => None,
        }
    }

    /// Look up a numeric field by column name.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "x" => self.x,
            "y" => self.y,
            "z" => self.z,
            "altitude" => self.altitude,
            _ => self.extra.get(name).copied(),
        }
    }

    /// A row counts as an alert only when the tag is present and non-empty.
    pub fn is_alert(&self) -> bool {
        self.alert_type.as_deref().is_some_and(|tag| !tag.is_empty())
    }
}
