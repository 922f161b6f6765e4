// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ihc_synapse.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Noise variant names accepted in `model.noise_type`
pub const NOISE_TYPE_NAMES: [&str; 4] = ["ones", "fixed_matlab", "fixed_seed", "random"];

/// Power-law variant names accepted in `model.power_law`
pub const POWER_LAW_NAMES: [&str; 2] = ["approximated", "actual"];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseConfig {
    pub model: ModelConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

/// Fiber and model-variant parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Characteristic frequency (Hz)
    pub cf: f64,
    /// Spontaneous firing rate (spikes/s)
    pub spontaneous_rate: f64,
    /// Absolute refractory period (s)
    pub abs_refractory_period: f64,
    /// Baseline mean relative refractory period (s)
    pub rel_refractory_period: f64,
    pub noise_type: String,
    pub power_law: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cf: 5_000.0,
            spontaneous_rate: 100.0,
            abs_refractory_period: 0.6e-3,
            rel_refractory_period: 0.6e-3,
            noise_type: "random".to_string(),
            power_law: "approximated".to_string(),
        }
    }
}

/// Time base and run control
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation time resolution `tdres` (s)
    pub time_resolution: f64,
    /// Stimulus repetitions `nrep`
    pub repetitions: usize,
    /// Seed for the simulation random source
    pub seed: u64,
    /// Compute the analytic mean-rate and variance estimates
    pub analytic_estimates: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_resolution: 1e-5,
            repetitions: 1,
            seed: 42,
            analytic_estimates: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
    /// Root directory for per-run log folders; console only when unset
    pub log_dir: Option<PathBuf>,
    pub retention_days: u32,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: None,
            retention_days: 7,
            retention_runs: 10,
        }
    }
}
