//! Result sinks for finished sweeps.
//!
//! Writes the result table as CSV, a JSON report with run metadata, and a
//! human-readable text report.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{Config, FailurePolicy, MetricConfig, SweepDimension};
use crate::sweep::SweepResult;

/// Title and axis labels of the result plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Run metadata stored next to the results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    pub simulator: String,
    pub dimension: SweepDimension,
    pub metric: MetricConfig,
    pub repeats: u32,
    pub start_seed: u64,
    /// Last seed handed out during the sweep
    pub last_seed: u64,
    pub failed_trials: FailurePolicy,
    pub capture_margin: f64,
    pub labels: PlotLabels,
}

/// Everything written to `report.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub metadata: ReportMetadata,
    pub result: SweepResult,
}

impl SweepReport {
    pub fn new(
        config: &Config,
        config_path: Option<&Path>,
        last_seed: u64,
        result: SweepResult,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                config_path: config_path.map(Path::to_path_buf),
                simulator: config.simulator.program.clone(),
                dimension: config.sweep.dimension,
                metric: config.metric,
                repeats: config.sweep.repeats,
                start_seed: config.sweep.seed,
                last_seed,
                failed_trials: config.sweep.failed_trials,
                capture_margin: config.evaluation.capture_margin,
                labels: config.plot_labels(),
            },
            result,
        }
    }
}

/// Write the `(value, metric)` table, sorted by value. Points without data
/// get an empty metric cell.
pub fn write_csv(result: &SweepResult, labels: &PlotLabels, output_path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    writer.write_record([
        labels.x_label.as_str(),
        labels.y_label.as_str(),
        "trials",
        "completed",
        "failed",
        "captured",
        "packets",
    ])?;

    let mut points: Vec<_> = result.points.iter().collect();
    points.sort_by(|a, b| a.value.total_cmp(&b.value));
    for point in points {
        writer.write_record([
            point.value.to_string(),
            point.metric.map(|m| m.to_string()).unwrap_or_default(),
            point.attempted.to_string(),
            point.completed.to_string(),
            point.failed.to_string(),
            point.captured.to_string(),
            point.total_packets.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    log::info!("Results table written to {}", output_path.display());
    Ok(())
}

/// Generate JSON report
pub fn generate_json_report(report: &SweepReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn format_metric(metric: Option<f64>) -> String {
    match metric {
        Some(value) => format!("{:.2}", value),
        None => "no data".to_string(),
    }
}

/// Generate human-readable text report
pub fn generate_text_report(report: &SweepReport, output_path: &Path) -> Result<()> {
    let meta = &report.metadata;
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(80));
    lines.push(format!("{:^80}", meta.labels.title.to_uppercase()));
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", meta.generated_at));
    if let Some(ref path) = meta.config_path {
        lines.push(format!("Configuration: {}", path.display()));
    }
    lines.push(format!("Simulator: {}", meta.simulator));
    lines.push(format!("Swept parameter: {}", meta.dimension.label()));
    lines.push(format!("Metric: {}", meta.metric.label()));
    lines.push(format!("Repeats per point: {}", meta.repeats));
    lines.push(format!("Seeds: {}..={}", meta.start_seed + 1, meta.last_seed));
    lines.push(format!("Capture margin: {}s", meta.capture_margin));
    lines.push(format!("Failed trials: {:?}", meta.failed_trials));
    lines.push(String::new());

    lines.push("=".repeat(80));
    lines.push(format!(
        "{:>16} {:>16} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "Value", "Metric", "Trials", "Done", "Failed", "Captured", "Packets"
    ));
    lines.push("-".repeat(80));
    let mut points: Vec<_> = report.result.points.iter().collect();
    points.sort_by(|a, b| a.value.total_cmp(&b.value));
    for point in &points {
        lines.push(format!(
            "{:>16} {:>16} {:>9} {:>9} {:>9} {:>9} {:>9}",
            point.value,
            format_metric(point.metric),
            point.attempted,
            point.completed,
            point.failed,
            point.captured,
            point.total_packets
        ));
    }
    lines.push(String::new());

    let failures: Vec<_> = points
        .iter()
        .flat_map(|p| p.trials.iter())
        .filter(|t| !t.is_success())
        .collect();
    if !failures.is_empty() {
        lines.push(format!("Failed trials ({}):", failures.len()));
        for trial in failures.iter().take(20) {
            lines.push(format!("  seed {}: {:?}", trial.seed, trial.status));
        }
        if failures.len() > 20 {
            lines.push(format!("  ... and {} more", failures.len() - 20));
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(80));

    let content = lines.join("\n");
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &SweepReport) {
    let meta = &report.metadata;
    println!("\n=== {} ===\n", meta.labels.title);
    println!("Points: {}", report.result.len());
    println!("Trials: {}", report.result.total_trials());
    println!();
    println!("{:>12}  {}", meta.labels.x_label, meta.labels.y_label);
    for (value, metric) in report.result.series() {
        println!("{:>12}  {}", value, format_metric(metric));
    }
    println!();
}
