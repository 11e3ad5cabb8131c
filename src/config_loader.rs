use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load and parse a sweep configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration {}", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration {}", config_path.display()))?;

    info!(
        "Sweeping {} with {} repeats per point",
        config.sweep.dimension.slug(),
        config.sweep.repeats
    );

    config.validate()?;

    Ok(config)
}

/// Command-line arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub repeats: Option<u32>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub timeout: Option<Duration>,
    pub keep_trial_output: bool,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_cli_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(ref output) = overrides.output {
        info!("Output directory overridden: {}", output.display());
        config.output.directory = output.clone();
    }

    if let Some(repeats) = overrides.repeats {
        info!("Repeats per point overridden: {}", repeats);
        config.sweep.repeats = repeats;
    }

    if let Some(seed) = overrides.seed {
        info!("Starting seed overridden: {}", seed);
        config.sweep.seed = seed;
    }

    if let Some(workers) = overrides.workers {
        info!("Concurrent trials overridden: {}", workers);
        config.sweep.workers = workers;
    }

    if let Some(timeout) = overrides.timeout {
        info!("Trial timeout overridden: {}s", timeout.as_secs());
        config.simulator.timeout = timeout;
    }

    if overrides.keep_trial_output {
        config.output.keep_trial_output = true;
    }

    if config.sweep.workers > 1 && config.output.keep_trial_output {
        warn!(
            "Keeping output of {} concurrent trials; disk usage grows with every trial",
            config.sweep.workers
        );
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
