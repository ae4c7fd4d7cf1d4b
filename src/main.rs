mod analysis;
mod figure;
mod observations;
mod render;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::analysis::{
    alert_distribution_figure, anomaly_figure, describe, detect_anomalies, trajectory_metrics,
};
use crate::figure::Figure;
use crate::observations::{load_observations, synthetic_orbit, ObservationTable};
use crate::render::{
    altitude_profile_or_placeholder, ensure_altitude, ground_track_or_placeholder,
    series_or_placeholder, trajectory_or_placeholder, ConfigError, RenderConfig,
};

#[derive(Parser)]
#[command(name = "orbitscope")]
#[command(about = "Satellite trajectory visualization and analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the figure set for an observation file
    Render {
        /// Observation table (JSON or YAML array of records)
        input: PathBuf,
        /// Directory the figure JSON files are written to
        #[arg(long, default_value = "figures")]
        output: PathBuf,
        /// Render-policy YAML (defaults apply when omitted)
        #[arg(long)]
        config: Option<String>,
        /// Additional named fields to render as time series
        #[arg(long)]
        series: Vec<String>,
    },
    /// Print trajectory metrics and column statistics
    Summary {
        input: PathBuf,
        #[arg(long)]
        config: Option<String>,
    },
    /// Scan one column for z-score outliers
    Anomalies {
        input: PathBuf,
        #[arg(long)]
        field: String,
        #[arg(long, default_value_t = 3.0)]
        threshold: f64,
        /// Write the scan figure here as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a deterministic sample observation table
    Synthetic {
        output: PathBuf,
        #[arg(long, default_value_t = 240)]
        rows: usize,
        /// Sampling interval, e.g. 30s or 2m
        #[arg(long, default_value = "30s")]
        step: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            series,
        } => render(&input, &output, config.as_deref(), &series),
        Commands::Summary { input, config } => summary(&input, config.as_deref()),
        Commands::Anomalies {
            input,
            field,
            threshold,
            output,
        } => anomalies(&input, &field, threshold, output.as_deref()),
        Commands::Synthetic { output, rows, step } => synthetic(&output, rows, &step),
    }
}

fn load_config(path: Option<&str>) -> Result<RenderConfig, ConfigError> {
    match path {
        Some(path) => RenderConfig::from_file(path),
        None => Ok(RenderConfig::default()),
    }
}

fn load_table(path: &Path) -> Option<ObservationTable> {
    match load_observations(path) {
        Ok(table) => {
            log::info!("Loaded {} observations from {}", table.len(), path.display());
            if table.is_empty() {
                log::warn!("Observation table is empty");
            }
            Some(table)
        }
        Err(e) => {
            eprintln!("Error reading observations: {}", e);
            None
        }
    }
}

fn render(input: &Path, output: &Path, config: Option<&str>, series: &[String]) -> ExitCode {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(mut table) = load_table(input) else {
        return ExitCode::FAILURE;
    };

    if let Err(e) = fs::create_dir_all(output) {
        eprintln!("Error creating {}: {}", output.display(), e);
        return ExitCode::FAILURE;
    }

    let mut figures: Vec<(String, Figure)> = vec![
        (
            "ground_track".to_string(),
            ground_track_or_placeholder(&table),
        ),
        (
            "trajectory".to_string(),
            trajectory_or_placeholder(&table, &config),
        ),
        (
            "altitude_profile".to_string(),
            altitude_profile_or_placeholder(&mut table, &config),
        ),
        (
            "alert_distribution".to_string(),
            alert_distribution_figure(&table),
        ),
    ];
    for field in series {
        figures.push((
            format!("series_{}", field),
            series_or_placeholder(&table, field),
        ));
    }

    for (name, figure) in &figures {
        let path = output.join(format!("{}.json", name));
        if let Err(e) = write_figure(&path, figure) {
            eprintln!("Error writing {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        log::info!("Wrote {} ({} layers)", path.display(), figure.data.len());
    }

    println!("Rendered {} figures to {}", figures.len(), output.display());
    ExitCode::SUCCESS
}

fn summary(input: &Path, config: Option<&str>) -> ExitCode {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(mut table) = load_table(input) else {
        return ExitCode::FAILURE;
    };

    if let Err(e) = ensure_altitude(&mut table, &config) {
        log::debug!("No altitude available for summary: {}", e);
    }

    let metrics = trajectory_metrics(&table);
    println!("Trajectory metrics:");
    println!("  total distance : {:.2} km", metrics.total_distance_km);
    println!("  duration       : {:.2} h", metrics.duration_hours);
    println!("  average speed  : {:.2} km/h", metrics.avg_speed_km_h);
    println!(
        "  altitude range : {:.2} .. {:.2} km",
        metrics.min_altitude_km, metrics.max_altitude_km
    );
    println!("  alert rows     : {}", metrics.alert_count);

    let stats = describe(&table);
    if !stats.is_empty() {
        println!();
        println!(
            "{:<12} {:>6} {:>14} {:>14} {:>12} {:>14} {:>14} {:>14} {:>14} {:>9} {:>9}",
            "column", "count", "mean", "median", "std", "min", "q25", "q75", "max", "skew", "kurt"
        );
        for s in &stats {
            println!(
                "{:<12} {:>6} {:>14.4} {:>14.4} {:>12} {:>14.4} {:>14.4} {:>14.4} {:>14.4} {:>9} {:>9}",
                s.column,
                s.count,
                s.mean,
                s.median,
                optional(s.std),
                s.min,
                s.q25,
                s.q75,
                s.max,
                optional(s.skewness),
                optional(s.kurtosis),
            );
        }
    }

    ExitCode::SUCCESS
}

fn anomalies(input: &Path, field: &str, threshold: f64, output: Option<&Path>) -> ExitCode {
    let Some(table) = load_table(input) else {
        return ExitCode::FAILURE;
    };

    let scan = match detect_anomalies(&table, field, threshold) {
        Ok(scan) => scan,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} anomalies in '{}' (threshold {})",
        scan.indices.len(),
        scan.field,
        scan.threshold
    );
    for &index in &scan.indices {
        if let Some(value) = table.rows().get(index).and_then(|row| row.field(field)) {
            println!("  row {}: {} = {}", index, field, value);
        }
    }

    if let Some(path) = output {
        let figure = anomaly_figure(&table, &scan);
        if let Err(e) = write_figure(path, &figure) {
            eprintln!("Error writing {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("Wrote {}", path.display());
    }

    ExitCode::SUCCESS
}

fn synthetic(output: &Path, rows: usize, step: &str) -> ExitCode {
    let step = match humantime::parse_duration(step) {
        Ok(duration) => match chrono::Duration::from_std(duration) {
            Ok(step) => step,
            Err(e) => {
                eprintln!("Invalid step duration: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            eprintln!("Invalid step duration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let table = synthetic_orbit(rows, step, chrono::Utc::now());
    let json = match serde_json::to_string_pretty(table.rows()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing observations: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::write(output, json) {
        eprintln!("Error writing {}: {}", output.display(), e);
        return ExitCode::FAILURE;
    }

    println!("Wrote {} observations to {}", table.len(), output.display());
    ExitCode::SUCCESS
}

fn write_figure(path: &Path, figure: &Figure) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(figure)?;
    fs::write(path, json)?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
