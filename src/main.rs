use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use slpsweep::capture::{self, CaptureLayout, CaptureWindow};
use slpsweep::config_loader::{self, CliOverrides};
use slpsweep::report::{self, SweepReport};
use slpsweep::simulator::ProcessSimulator;
use slpsweep::sweep::{run_sweep, SweepContext};
use slpsweep::utils::parse_timeout;

/// Parameter sweeps of source-location-privacy MANET simulations
#[derive(Parser, Debug)]
#[command(name = "slpsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a full sweep and write results.csv, report.json and report.txt
    Run {
        /// Path to the sweep configuration YAML file
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for results and trial directories
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Trials per sweep point
        #[arg(long)]
        repeats: Option<u32>,

        /// Starting seed; the first trial uses seed + 1
        #[arg(long)]
        seed: Option<u64>,

        /// Concurrent trials within a sweep point
        #[arg(short = 'j', long)]
        workers: Option<usize>,

        /// Wall-clock limit per trial (e.g. 90s, 1h 30m, 500ms)
        #[arg(long, value_parser = parse_timeout)]
        timeout: Option<Duration>,

        /// Keep per-trial capture files and simulator logs
        #[arg(long)]
        keep_trial_output: bool,
    },

    /// Show packet counts and time span of every capture file in a directory
    Inspect {
        /// Directory holding the capture files
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(long, default_value = "adhocNode")]
        adhoc_prefix: String,

        #[arg(long, default_value = "advNode")]
        adversary_prefix: String,
    },

    /// Evaluate the adversary captures of one finished trial
    Evaluate {
        /// Trial directory holding the capture files
        #[arg(short, long)]
        dir: PathBuf,

        /// Index of the first adversary node (the number of adhoc nodes)
        #[arg(long)]
        base_index: u32,

        #[arg(long)]
        adversary_nodes: u32,

        /// Simulated duration in seconds
        #[arg(long)]
        total_time: f64,

        /// Seconds before the end after which traffic is not a capture
        #[arg(long, default_value = "10")]
        margin: f64,

        #[arg(long, default_value = "advNode")]
        adversary_prefix: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Run {
            config,
            output,
            repeats,
            seed,
            workers,
            timeout,
            keep_trial_output,
        } => {
            let overrides = CliOverrides {
                output,
                repeats,
                seed,
                workers,
                timeout,
                keep_trial_output,
            };
            run(config, &overrides)
        }
        Commands::Inspect {
            dir,
            adhoc_prefix,
            adversary_prefix,
        } => {
            let layout = CaptureLayout {
                adhoc_prefix,
                adversary_prefix,
                ..CaptureLayout::default()
            };
            inspect(dir, &layout)
        }
        Commands::Evaluate {
            dir,
            base_index,
            adversary_nodes,
            total_time,
            margin,
            adversary_prefix,
        } => {
            check_evaluate_args(base_index, adversary_nodes, total_time, margin)?;
            let layout = CaptureLayout {
                adversary_prefix,
                ..CaptureLayout::default()
            };
            let window = CaptureWindow::new(total_time, margin);
            let outcome = capture::evaluate(&dir, &layout, base_index, adversary_nodes, window);

            println!("Adversary packets: {}", outcome.total_packets);
            println!("Last observation: {:.6}s", outcome.last_timestamp);
            println!("Capture deadline: {:.6}s", window.deadline());
            println!("Captured: {}", if outcome.captured { "yes" } else { "no" });
            if outcome.missing_files > 0 || outcome.corrupt_files > 0 {
                println!(
                    "Missing files: {}, corrupt files: {}",
                    outcome.missing_files, outcome.corrupt_files
                );
            }
            Ok(())
        }
    }
}

fn check_evaluate_args(base_index: u32, adversary_nodes: u32, total_time: f64, margin: f64) -> Result<()> {
    if !(total_time > 0.0) || !(margin >= 0.0) || margin >= total_time {
        bail!("margin must be within [0, total_time)");
    }
    if base_index.checked_add(adversary_nodes).is_none() {
        bail!(
            "adversary indices {} + {} exceed {}",
            base_index,
            adversary_nodes,
            u32::MAX
        );
    }
    Ok(())
}

fn run(config_path: PathBuf, overrides: &CliOverrides) -> Result<()> {
    info!("Configuration file: {:?}", config_path);

    let mut config = config_loader::load_config(&config_path)?;
    config_loader::apply_cli_overrides(&mut config, overrides)?;

    let simulator = ProcessSimulator::new(&config.simulator)
        .wrap_err_with(|| format!("Cannot use simulator '{}'", config.simulator.program))?;

    let output_dir = config.output.directory.clone();
    fs::create_dir_all(&output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    info!("Output directory: {:?}", output_dir);

    let mut ctx = SweepContext::new(config.sweep.seed);
    let result = run_sweep(&config, &simulator, &mut ctx)?;

    report::write_csv(&result, &config.plot_labels(), &output_dir.join("results.csv"))?;
    let sweep_report = SweepReport::new(&config, Some(&config_path), ctx.current_seed(), result);
    report::generate_json_report(&sweep_report, &output_dir.join("report.json"))?;
    report::generate_text_report(&sweep_report, &output_dir.join("report.txt"))?;
    report::print_summary(&sweep_report);

    info!("Sweep completed successfully");
    Ok(())
}

fn inspect(dir: PathBuf, layout: &CaptureLayout) -> Result<()> {
    let nodes = capture::inspect(&dir, layout)
        .wrap_err_with(|| format!("Failed to list capture files in {}", dir.display()))?;
    if nodes.is_empty() {
        bail!("No capture files found in {}", dir.display());
    }

    println!(
        "{:<10} {:>6} {:>4} {:>10} {:>10} {:>14} {:>14}",
        "Role", "Node", "Dev", "Packets", "UDP", "First (s)", "Last (s)"
    );
    let fmt_ts = |ts: Option<f64>| ts.map(|t| format!("{:.6}", t)).unwrap_or_else(|| "-".to_string());
    for node in &nodes {
        let role = node.file.role.to_string();
        match &node.summary {
            Ok(summary) => println!(
                "{:<10} {:>6} {:>4} {:>10} {:>10} {:>14} {:>14}",
                role,
                node.file.index,
                node.file.device,
                summary.packets,
                summary.udp_packets,
                fmt_ts(summary.first_timestamp),
                fmt_ts(summary.last_timestamp)
            ),
            Err(e) => println!(
                "{:<10} {:>6} {:>4} unreadable: {}",
                role, node.file.index, node.file.device, e
            ),
        }
    }
    Ok(())
}
