mod alerts;
mod anomaly;
mod metrics;
mod stats;

pub use alerts::{alert_distribution, alert_distribution_figure};
pub use anomaly::{anomaly_figure, detect_anomalies, AnomalyScan};
pub use metrics::{trajectory_metrics, TrajectoryMetrics};
pub use stats::{describe, ColumnStats};
