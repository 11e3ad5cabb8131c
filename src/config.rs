use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::CaptureLayout;
use crate::report::PlotLabels;
use crate::simulator::SimulationParams;

/// Top-level sweep configuration that mirrors the YAML file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub simulator: SimulatorConfig,
    /// Fixed simulator parameters; the swept dimension overrides one of them
    pub parameters: SimulationParams,
    pub sweep: SweepConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub metric: MetricConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.simulator.validate()?;
        self.parameters.validate()?;

        let points = self.sweep.validate()?;
        for value in &points {
            self.sweep
                .dimension
                .apply(&self.parameters, *value)
                .validate()
                .map_err(|e| {
                    ValidationError::InvalidSweep(format!(
                        "{} = {} yields invalid parameters: {}",
                        self.sweep.dimension.slug(),
                        value,
                        e
                    ))
                })?;
        }

        let margin = self.evaluation.capture_margin;
        if !margin.is_finite() || margin < 0.0 || margin >= self.parameters.total_time {
            return Err(ValidationError::InvalidEvaluation(format!(
                "capture_margin must be within [0, total_time), got {}",
                margin
            )));
        }

        Ok(())
    }

    /// Axis labels and title for the result sinks
    pub fn plot_labels(&self) -> PlotLabels {
        self.output.plot_labels(self.sweep.dimension, &self.metric)
    }
}

/// How scenario flags are handed to the simulator program
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStyle {
    /// Every flag is its own argument
    Separate,
    /// Scenario name and flags joined into one argument (`waf --run "..."`)
    #[default]
    Joined,
}

/// External simulator program
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Program name (looked up on PATH) or path
    pub program: String,
    /// Arguments placed before the scenario, e.g. `--run`
    #[serde(default)]
    pub prefix_args: Vec<String>,
    /// Scenario name placed before the flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(default)]
    pub argument_style: ArgumentStyle,
    /// Flag used to pass the trial output directory (e.g. `--cwd`). Without
    /// it, the simulator runs inside the trial output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir_flag: Option<String>,
    /// Wall-clock limit per trial (e.g. "30m")
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(3600)
}

impl SimulatorConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.program.trim().is_empty() {
            return Err(ValidationError::InvalidSimulator(
                "program cannot be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ValidationError::InvalidSimulator(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: "./waf".to_string(),
            prefix_args: vec!["--run".to_string()],
            scenario: Some("slp-manet-routing-compare".to_string()),
            argument_style: ArgumentStyle::Joined,
            output_dir_flag: Some("--cwd".to_string()),
            timeout: default_timeout(),
        }
    }
}

/// Parameter varied across the sweep
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweepDimension {
    NodeSpeed,
    NodeCount,
    AdversaryCount,
}

impl SweepDimension {
    pub fn slug(&self) -> &'static str {
        match self {
            SweepDimension::NodeSpeed => "node_speed",
            SweepDimension::NodeCount => "node_count",
            SweepDimension::AdversaryCount => "adversary_count",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SweepDimension::NodeSpeed => "Node speed (m/s)",
            SweepDimension::NodeCount => "Number of adhoc nodes",
            SweepDimension::AdversaryCount => "Number of adversary nodes",
        }
    }

    /// Counts must be whole numbers
    pub fn is_integral(&self) -> bool {
        !matches!(self, SweepDimension::NodeSpeed)
    }

    /// Substitute the swept value into the fixed parameters
    pub fn apply(&self, base: &SimulationParams, value: f64) -> SimulationParams {
        let mut params = base.clone();
        match self {
            SweepDimension::NodeSpeed => params.node_speed = Some(value),
            SweepDimension::NodeCount => params.nodes = value as u32,
            SweepDimension::AdversaryCount => params.adversary_nodes = value as u32,
        }
        params
    }
}

/// Values taken by the swept parameter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SweepValues {
    /// Half-open range `start..stop` advancing by `step`
    Range { start: f64, stop: f64, step: f64 },
    /// Explicit list of values
    List(Vec<f64>),
}

impl SweepValues {
    /// Enumerate the sweep points in order
    pub fn points(&self) -> Vec<f64> {
        match self {
            SweepValues::Range { start, stop, step } => {
                if !(*step > 0.0) || !(stop > start) {
                    return Vec::new();
                }
                // Computed from the index to avoid accumulating rounding error
                let count = ((stop - start) / step - 1e-9).ceil() as usize;
                (0..count)
                    .map(|i| round_point(start + i as f64 * step))
                    .collect()
            }
            SweepValues::List(values) => values.clone(),
        }
    }
}

fn round_point(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Treatment of trials whose simulator run failed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Failed trials use up a repeat and are left out of the aggregate
    #[default]
    Skip,
    /// Failed trials are aggregated as non-captures
    CountAsMiss,
    /// Failed trials are re-run with a fresh seed, up to `max_replacements`
    Replace,
}

/// Sweep definition
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SweepConfig {
    pub dimension: SweepDimension,
    pub values: SweepValues,
    /// Trials per sweep point
    pub repeats: u32,
    /// Starting seed; the first trial uses `seed + 1`
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub failed_trials: FailurePolicy,
    /// Replacement budget per sweep point for the `replace` policy
    #[serde(default)]
    pub max_replacements: u32,
    /// Concurrent trials within a sweep point
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_seed() -> u64 {
    50
}

fn default_workers() -> usize {
    1
}

impl SweepConfig {
    /// Validate and return the sweep points
    fn validate(&self) -> Result<Vec<f64>, ValidationError> {
        let invalid = |msg: String| Err(ValidationError::InvalidSweep(msg));

        if self.repeats == 0 {
            return invalid("repeats must be at least 1".to_string());
        }
        if self.workers == 0 {
            return invalid("workers must be at least 1".to_string());
        }
        if let SweepValues::Range { start, stop, step } = &self.values {
            if !step.is_finite() || *step <= 0.0 {
                return invalid(format!("range step must be positive, got {}", step));
            }
            if !start.is_finite() || !stop.is_finite() || stop <= start {
                return invalid(format!("empty range {}..{}", start, stop));
            }
        }

        let points = self.values.points();
        if points.is_empty() {
            return invalid("sweep has no points".to_string());
        }

        let mut seen = HashSet::new();
        for value in &points {
            if !value.is_finite() || *value <= 0.0 {
                return invalid(format!("sweep values must be positive, got {}", value));
            }
            if self.dimension.is_integral() && value.fract() != 0.0 {
                return invalid(format!(
                    "{} values must be whole numbers, got {}",
                    self.dimension.slug(),
                    value
                ));
            }
            if self.dimension.is_integral() && *value > f64::from(u32::MAX) {
                return invalid(format!(
                    "{} value {} exceeds {}",
                    self.dimension.slug(),
                    value,
                    u32::MAX
                ));
            }
            if !seen.insert(value.to_bits()) {
                return invalid(format!("duplicate sweep value {}", value));
            }
        }

        Ok(points)
    }
}

/// Mean time filter for the `mean_capture_time` metric
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    /// Trials in which the adversary saw at least one packet
    #[default]
    Observed,
    /// Trials that count as a capture
    CapturedOnly,
    /// Every trial, zeros included
    All,
}

/// Reduction applied to the trials of one sweep point
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricConfig {
    /// Percentage of trials with a capture event
    #[default]
    CaptureRatio,
    /// Mean time of the last adversary observation
    MeanCaptureTime {
        #[serde(default)]
        include: TimeFilter,
    },
}

impl MetricConfig {
    pub fn label(&self) -> &'static str {
        match self {
            MetricConfig::CaptureRatio => "Capture ratio (%)",
            MetricConfig::MeanCaptureTime { .. } => "Time to capture (s)",
        }
    }
}

/// Capture detection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Seconds before the end of the simulation after which a packet is no
    /// longer a capture
    #[serde(default = "default_capture_margin")]
    pub capture_margin: f64,
    #[serde(default)]
    pub captures: CaptureLayout,
}

fn default_capture_margin() -> f64 {
    10.0
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            capture_margin: default_capture_margin(),
            captures: CaptureLayout::default(),
        }
    }
}

/// Result destination and presentation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Keep per-trial directories (captures and simulator log) after evaluation
    #[serde(default)]
    pub keep_trial_output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("sweep_output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            keep_trial_output: false,
            title: None,
            x_label: None,
            y_label: None,
        }
    }
}

impl OutputConfig {
    pub fn plot_labels(&self, dimension: SweepDimension, metric: &MetricConfig) -> PlotLabels {
        let x_label = self.x_label.clone().unwrap_or_else(|| dimension.label().to_string());
        let y_label = self.y_label.clone().unwrap_or_else(|| metric.label().to_string());
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("{} vs {}", x_label, y_label));
        PlotLabels {
            title,
            x_label,
            y_label,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid simulator configuration: {0}")]
    InvalidSimulator(String),
    #[error("Invalid simulation parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid sweep configuration: {0}")]
    InvalidSweep(String),
    #[error("Invalid evaluation configuration: {0}")]
    InvalidEvaluation(String),
}
