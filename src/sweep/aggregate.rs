//! Reduction of trial outcomes into one metric per sweep point.
//!
//! Reductions are commutative: values are sorted before summation so the
//! result does not depend on the order trials finished in.

use crate::capture::TrialOutcome;
use crate::config::{MetricConfig, TimeFilter};

/// Percentage of outcomes with a capture event, in [0, 100]
pub fn capture_ratio(outcomes: &[TrialOutcome]) -> Option<f64> {
    if outcomes.is_empty() {
        return None;
    }
    let captured = outcomes.iter().filter(|o| o.captured).count();
    Some(captured as f64 * 100.0 / outcomes.len() as f64)
}

/// Mean of the last observed timestamps over the selected outcomes
pub fn mean_capture_time(outcomes: &[TrialOutcome], include: TimeFilter) -> Option<f64> {
    let values: Vec<f64> = outcomes
        .iter()
        .filter(|o| match include {
            TimeFilter::Observed => o.last_timestamp > 0.0,
            TimeFilter::CapturedOnly => o.captured,
            TimeFilter::All => true,
        })
        .map(|o| o.last_timestamp)
        .collect();
    order_independent_mean(values)
}

/// Apply the configured reduction
pub fn aggregate(outcomes: &[TrialOutcome], metric: &MetricConfig) -> Option<f64> {
    match metric {
        MetricConfig::CaptureRatio => capture_ratio(outcomes),
        MetricConfig::MeanCaptureTime { include } => mean_capture_time(outcomes, *include),
    }
}

fn order_independent_mean(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}
