//! Typed simulator parameters.

use serde::{Deserialize, Serialize};

use crate::config::ValidationError;

/// Routing protocol selector understood by the simulator
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProtocol {
    Olsr,
    Aodv,
    Dsdv,
    Flooding,
    Dsr,
}

impl RoutingProtocol {
    /// Value passed as `--protocol`
    pub fn code(&self) -> u8 {
        match self {
            RoutingProtocol::Olsr => 1,
            RoutingProtocol::Aodv => 2,
            RoutingProtocol::Dsdv => 3,
            RoutingProtocol::Flooding => 4,
            RoutingProtocol::Dsr => 5,
        }
    }
}

/// Mobility model for the ad-hoc nodes
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MobilityModel {
    Stationary,
    Mobile,
}

impl MobilityModel {
    /// Value passed as `--Mobility-Model`
    pub fn code(&self) -> u8 {
        match self {
            MobilityModel::Stationary => 1,
            MobilityModel::Mobile => 2,
        }
    }
}

/// Fixed parameters of one simulator run (everything except the seed)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationParams {
    pub protocol: RoutingProtocol,
    /// Number of ad-hoc nodes; adversary nodes are numbered after them
    pub nodes: u32,
    pub adversary_nodes: u32,
    /// Simulation duration in seconds
    pub total_time: f64,
    /// Time at which the source starts sending, in seconds
    pub send_start: f64,
    /// Transmit power in dBm
    pub transmit_power: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltay: Option<f64>,
    /// Node speed in m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_speed: Option<f64>,
    pub mobility_model: MobilityModel,
}

impl SimulationParams {
    /// Range and type checks performed before any invocation
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |msg: String| Err(ValidationError::InvalidParameters(msg));

        if self.nodes == 0 {
            return invalid("nodes must be at least 1".to_string());
        }
        if self.adversary_nodes == 0 {
            return invalid("adversary_nodes must be at least 1".to_string());
        }
        if self.nodes.checked_add(self.adversary_nodes).is_none() {
            return invalid(format!(
                "nodes + adversary_nodes must not exceed {}, got {} + {}",
                u32::MAX,
                self.nodes,
                self.adversary_nodes
            ));
        }
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return invalid(format!("total_time must be positive, got {}", self.total_time));
        }
        if !self.send_start.is_finite() || self.send_start < 0.0 || self.send_start >= self.total_time {
            return invalid(format!(
                "send_start must be within [0, total_time), got {}",
                self.send_start
            ));
        }
        if !self.transmit_power.is_finite() {
            return invalid("transmit_power must be a finite number".to_string());
        }
        for (name, value) in [("deltax", self.deltax), ("deltay", self.deltay)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return invalid(format!("{} must be positive, got {}", name, v));
                }
            }
        }
        if let Some(speed) = self.node_speed {
            if !speed.is_finite() || speed <= 0.0 {
                return invalid(format!("node_speed must be positive, got {}", speed));
            }
        }

        Ok(())
    }

    /// Index of the first adversary capture file
    pub fn adversary_base_index(&self) -> u32 {
        self.nodes
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            protocol: RoutingProtocol::Flooding,
            nodes: 100,
            adversary_nodes: 2,
            total_time: 200.0,
            send_start: 10.0,
            transmit_power: -4.0,
            deltax: Some(25.0),
            deltay: Some(25.0),
            node_speed: Some(4.0),
            mobility_model: MobilityModel::Mobile,
        }
    }
}
