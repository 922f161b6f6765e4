// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module checks that model parameters lie in their physiological ranges and
//! that variant names are recognized. Every violation is collected before failing.

use crate::{ConfigError, ConfigResult, SynapseConfig, NOISE_TYPE_NAMES, POWER_LAW_NAMES};

/// Spontaneous rate bounds (spikes/s)
pub const SPONT_RANGE: (f64, f64) = (1e-4, 180.0);

/// Absolute and relative refractory period bounds (s)
pub const REFRACTORY_RANGE: (f64, f64) = (0.0, 20e-3);

/// Largest supported time resolution; the simulation rate must reach the 10 kHz
/// power-law rate
pub const MAX_TIME_RESOLUTION: f64 = 1e-4;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange {
        field: String,
        value: f64,
        lower: f64,
        upper: f64,
    },
    UnknownVariant {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                lower,
                upper,
            } => write!(
                f,
                "{} = {} is outside valid range [{}, {}]",
                field, value, lower, upper
            ),
            Self::UnknownVariant {
                field,
                value,
                allowed,
            } => write!(
                f,
                "{} = '{}' is not one of: {}",
                field,
                value,
                allowed.join(", ")
            ),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - `model.spontaneous_rate` in [1e-4, 180]
/// - refractory periods in [0, 20e-3]
/// - `model.cf > 0` and `0 < simulation.time_resolution <= 1e-4`
/// - recognized `noise_type`, `power_law` and `logging.format` names
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &SynapseConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_model_ranges(config, &mut errors);
    validate_simulation(config, &mut errors);
    validate_variants(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn check_range(
    field: &str,
    value: f64,
    lower: f64,
    upper: f64,
    errors: &mut Vec<ConfigValidationError>,
) {
    // NaN fails both comparisons
    if !(value >= lower && value <= upper) {
        errors.push(ConfigValidationError::OutOfRange {
            field: field.to_string(),
            value,
            lower,
            upper,
        });
    }
}

fn validate_model_ranges(config: &SynapseConfig, errors: &mut Vec<ConfigValidationError>) {
    let model = &config.model;
    let (spont_lo, spont_hi) = SPONT_RANGE;
    let (refr_lo, refr_hi) = REFRACTORY_RANGE;
    check_range("model.spontaneous_rate", model.spontaneous_rate, spont_lo, spont_hi, errors);
    check_range("model.abs_refractory_period", model.abs_refractory_period, refr_lo, refr_hi, errors);
    check_range("model.rel_refractory_period", model.rel_refractory_period, refr_lo, refr_hi, errors);

    if !(model.cf > 0.0 && model.cf.is_finite()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "model.cf".to_string(),
            reason: format!("characteristic frequency must be positive, got {}", model.cf),
        });
    }
}

fn validate_simulation(config: &SynapseConfig, errors: &mut Vec<ConfigValidationError>) {
    let tdres = config.simulation.time_resolution;
    if !(tdres > 0.0 && tdres <= MAX_TIME_RESOLUTION) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.time_resolution".to_string(),
            reason: format!("must lie in (0, {}], got {}", MAX_TIME_RESOLUTION, tdres),
        });
    }
}

fn validate_variants(config: &SynapseConfig, errors: &mut Vec<ConfigValidationError>) {
    let checks: [(&str, &str, &[&'static str]); 3] = [
        ("model.noise_type", &config.model.noise_type, &NOISE_TYPE_NAMES),
        ("model.power_law", &config.model.power_law, &POWER_LAW_NAMES),
        ("logging.format", &config.logging.format, &["text", "json"]),
    ];
    for (field, value, allowed) in checks {
        if !allowed.iter().any(|name| name.eq_ignore_ascii_case(value)) {
            errors.push(ConfigValidationError::UnknownVariant {
                field: field.to_string(),
                value: value.to_string(),
                allowed: allowed.to_vec(),
            });
        }
    }
}
