//! Simulator argument vector construction.
//!
//! Arguments are produced as an explicit vector and never pass through a
//! shell. The flag order is fixed so that logged command lines are stable
//! across runs.

use std::path::Path;

use crate::config::{ArgumentStyle, SimulatorConfig};

use super::params::SimulationParams;

/// Scenario flags for one run, in the simulator's documented order
pub fn scenario_flags(params: &SimulationParams, seed: u64) -> Vec<String> {
    let mut flags = vec![
        format!("--protocol={}", params.protocol.code()),
        format!("--nodes={}", params.nodes),
        format!("--adversary-nodes={}", params.adversary_nodes),
        format!("--total-time={}", params.total_time),
        format!("--send-start={}", params.send_start),
        format!("--transmit-power={}", params.transmit_power),
    ];
    if let Some(deltax) = params.deltax {
        flags.push(format!("--deltax={}", deltax));
    }
    if let Some(deltay) = params.deltay {
        flags.push(format!("--deltay={}", deltay));
    }
    flags.push(format!("--seed={}", seed));
    if let Some(speed) = params.node_speed {
        flags.push(format!("--node-speed={}", speed));
    }
    flags.push(format!("--Mobility-Model={}", params.mobility_model.code()));
    flags
}

/// Full argument vector (excluding the program itself)
pub fn build_args(
    config: &SimulatorConfig,
    params: &SimulationParams,
    seed: u64,
    output_dir: &Path,
) -> Vec<String> {
    let mut args = config.prefix_args.clone();

    let mut scenario: Vec<String> = config.scenario.iter().cloned().collect();
    scenario.extend(scenario_flags(params, seed));

    match config.argument_style {
        ArgumentStyle::Separate => args.extend(scenario),
        ArgumentStyle::Joined => args.push(scenario.join(" ")),
    }

    if let Some(flag) = &config.output_dir_flag {
        args.push(format!("{}={}", flag, output_dir.display()));
    }

    args
}
