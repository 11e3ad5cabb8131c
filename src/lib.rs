//! # slpsweep - parameter sweeps of source-location-privacy MANET simulations
//!
//! This library drives an external packet-level network simulator through
//! repeated trials, reads the packet captures each trial leaves behind, and
//! reduces them to a privacy metric per value of one swept parameter.
//!
//! ## Overview
//!
//! A scenario places adhoc nodes, one source, and a set of adversary nodes
//! in a mobile ad-hoc network. The adversary "captures" the source when it
//! observes traffic early enough before the end of the simulation. Sweeping
//! node speed, node count or adversary count, and repeating every point with
//! fresh seeds, yields a capture ratio (or mean time to capture) curve.
//!
//! ## Architecture
//!
//! - `config`: Typed sweep configuration and validation
//! - `config_loader`: YAML loading and command-line overrides
//! - `simulator`: Simulator parameters, command construction, process runner
//! - `capture`: pcap reading, UDP decoding, trial evaluation, inventories
//! - `sweep`: Sweep driver, trial bookkeeping and aggregation
//! - `report`: CSV, JSON and text result sinks
//! - `utils`: Program lookup and duration parsing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use slpsweep::{config_loader, report, simulator::ProcessSimulator, sweep};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("sweep.yaml"))?;
//! let simulator = ProcessSimulator::new(&config.simulator)?;
//! let mut ctx = sweep::SweepContext::new(config.sweep.seed);
//! let result = sweep::run_sweep(&config, &simulator, &mut ctx)?;
//!
//! report::write_csv(&result, &config.plot_labels(), Path::new("results.csv"))?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! simulator:
//!   program: ./waf
//!   prefix_args: ["--run"]
//!   scenario: slp-manet-routing-compare
//!   output_dir_flag: "--cwd"
//!   timeout: 30m
//!
//! parameters:
//!   protocol: flooding
//!   nodes: 100
//!   adversary_nodes: 2
//!   total_time: 200
//!   send_start: 10
//!   transmit_power: -4
//!   deltax: 25
//!   deltay: 25
//!   mobility_model: mobile
//!
//! sweep:
//!   dimension: node_speed
//!   values: { start: 0.5, stop: 4, step: 0.5 }
//!   repeats: 50
//!   seed: 50
//! ```
//!
//! ## Error Handling
//!
//! Module-level failures are typed (`thiserror`); the command-line layer and
//! the result sinks report through `color_eyre` with context.

pub mod capture;
pub mod config;
pub mod config_loader;
pub mod report;
pub mod simulator;
pub mod sweep;
pub mod utils;
