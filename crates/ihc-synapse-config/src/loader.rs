// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SynapseConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "ihc_synapse.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "IHC_SYNAPSE_CONFIG_PATH";

/// Find the synapse configuration file
///
/// Search order:
/// 1. `IHC_SYNAPSE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ihc_synapse.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides (`"model.cf" -> "4000"`)
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Value ranges are checked separately by [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SynapseConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    debug!("[CONFIG] Loading {}", config_file.display());

    let content = fs::read_to_string(&config_file)?;
    let mut config: SynapseConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn set_parsed<T: FromStr>(target: &mut T, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    }
}

/// Route one `section.key` override onto the configuration
///
/// Returns `false` for unknown keys. Unparseable values leave the field unchanged.
fn apply_override(config: &mut SynapseConfig, key: &str, value: &str) -> bool {
    match key {
        "model.cf" => set_parsed(&mut config.model.cf, value),
        "model.spontaneous_rate" => set_parsed(&mut config.model.spontaneous_rate, value),
        "model.abs_refractory_period" => {
            set_parsed(&mut config.model.abs_refractory_period, value)
        }
        "model.rel_refractory_period" => {
            set_parsed(&mut config.model.rel_refractory_period, value)
        }
        "model.noise_type" => config.model.noise_type = value.to_lowercase(),
        "model.power_law" => config.model.power_law = value.to_lowercase(),
        "simulation.time_resolution" => set_parsed(&mut config.simulation.time_resolution, value),
        "simulation.repetitions" => set_parsed(&mut config.simulation.repetitions, value),
        "simulation.seed" => set_parsed(&mut config.simulation.seed, value),
        "simulation.analytic_estimates" => {
            let value = value.trim().to_lowercase();
            config.simulation.analytic_estimates = value == "true" || value == "1" || value == "yes";
        }
        "logging.level" => config.logging.level = value.to_string(),
        "logging.format" => config.logging.format = value.to_lowercase(),
        "logging.log_dir" => config.logging.log_dir = Some(PathBuf::from(value)),
        _ => return false,
    }
    true
}

/// Environment variable to configuration key table
const ENV_OVERRIDES: [(&str, &str); 10] = [
    ("IHC_SYNAPSE_CF", "model.cf"),
    ("IHC_SYNAPSE_SPONT", "model.spontaneous_rate"),
    ("IHC_SYNAPSE_TABS", "model.abs_refractory_period"),
    ("IHC_SYNAPSE_TREL", "model.rel_refractory_period"),
    ("IHC_SYNAPSE_NOISE_TYPE", "model.noise_type"),
    ("IHC_SYNAPSE_POWER_LAW", "model.power_law"),
    ("IHC_SYNAPSE_TDRES", "simulation.time_resolution"),
    ("IHC_SYNAPSE_NREP", "simulation.repetitions"),
    ("IHC_SYNAPSE_SEED", "simulation.seed"),
    ("IHC_SYNAPSE_LOG_LEVEL", "logging.level"),
];

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `IHC_SYNAPSE_CF` -> `model.cf`
/// - `IHC_SYNAPSE_SPONT` -> `model.spontaneous_rate`
/// - `IHC_SYNAPSE_TABS` -> `model.abs_refractory_period`
/// - `IHC_SYNAPSE_TREL` -> `model.rel_refractory_period`
/// - `IHC_SYNAPSE_NOISE_TYPE` -> `model.noise_type`
/// - `IHC_SYNAPSE_POWER_LAW` -> `model.power_law`
/// - `IHC_SYNAPSE_TDRES` -> `simulation.time_resolution`
/// - `IHC_SYNAPSE_NREP` -> `simulation.repetitions`
/// - `IHC_SYNAPSE_SEED` -> `simulation.seed`
/// - `IHC_SYNAPSE_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SynapseConfig) {
    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            debug!("[CONFIG] {} overrides {}", var, key);
            apply_override(config, key, &value);
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of dotted keys to values (e.g., `{"model.cf": "4000", "simulation.seed": "7"}`)
pub fn apply_cli_overrides(config: &mut SynapseConfig, cli_args: &HashMap<String, String>) {
    for (key, value) in cli_args {
        if !apply_override(config, key, value) {
            debug!("[CONFIG] Ignoring unknown CLI override '{}'", key);
        }
    }
}
