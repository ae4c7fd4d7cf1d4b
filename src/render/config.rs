use serde::Deserialize;
use thiserror::Error;

use super::EARTH_RADIUS_M;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Tunable rendering policy.
///
/// The thresholds are display heuristics carried over from operational
/// use, not physically derived quantities; they are kept configurable
/// rather than re-derived for exactly that reason. Note the unit switch
/// keys on the maximum altitude while the guide line keys on the median;
/// the two are deliberately independent.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Radius of the reference body, meters.
    #[serde(default = "default_reference_radius_m")]
    pub reference_radius_m: f64,
    /// Switch altitude displays to kilometers when the maximum rendered
    /// altitude exceeds this many meters.
    #[serde(default = "default_kilometers_above_m")]
    pub kilometers_above_m: f64,
    /// Draw the reference-radius guide line when the median altitude
    /// exceeds this many meters.
    #[serde(default = "default_radius_guide_median_m")]
    pub radius_guide_median_m: f64,
    /// Overlay the reference-body sphere when the mean point-to-center
    /// distance exceeds this many meters.
    #[serde(default = "default_body_overlay_distance_m")]
    pub body_overlay_distance_m: f64,
    /// Trailing moving-average window for the altitude profile.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

fn default_reference_radius_m() -> f64 {
    EARTH_RADIUS_M
}

fn default_kilometers_above_m() -> f64 {
    100_000.0
}

fn default_radius_guide_median_m() -> f64 {
    100_000.0
}

fn default_body_overlay_distance_m() -> f64 {
    1_000_000.0
}

fn default_smoothing_window() -> usize {
    5
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference_radius_m: default_reference_radius_m(),
            kilometers_above_m: default_kilometers_above_m(),
            radius_guide_median_m: default_radius_guide_median_m(),
            body_overlay_distance_m: default_body_overlay_distance_m(),
            smoothing_window: default_smoothing_window(),
        }
    }
}

impl RenderConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
