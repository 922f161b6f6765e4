// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Model parameters and algorithm variants

use core::str::FromStr;

use ihc_synapse_config::SynapseConfig;
pub use ihc_synapse_config::{MAX_TIME_RESOLUTION, REFRACTORY_RANGE, SPONT_RANGE};
use ihc_synapse_dsp::NoiseType;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynapseError};

/// Sampling frequency of the power-law adaptation stage (Hz)
pub const POWER_LAW_SAMPLING_FREQUENCY: f64 = 10e3;

/// Number of synaptic release sites
pub const N_SITES: usize = 4;

/// Integration scheme for power-law adaptation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerLaw {
    /// O(n) cascaded IIR filters approximating the fractional kernels
    #[default]
    Approximated,
    /// O(n²) direct convolution with the fractional kernels
    Actual,
}

impl PowerLaw {
    pub fn name(&self) -> &'static str {
        match self {
            PowerLaw::Approximated => "approximated",
            PowerLaw::Actual => "actual",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "approximated" => Some(PowerLaw::Approximated),
            "actual" => Some(PowerLaw::Actual),
            _ => None,
        }
    }
}

impl FromStr for PowerLaw {
    type Err = SynapseError;

    fn from_str(s: &str) -> Result<Self> {
        PowerLaw::from_name(s).ok_or_else(|| SynapseError::UnknownVariant {
            kind: "power law",
            value: s.to_string(),
        })
    }
}

/// Parse a noise variant name (`ones`, `fixed_matlab`, `fixed_seed`, `random`)
pub fn parse_noise_type(name: &str) -> Result<NoiseType> {
    NoiseType::from_name(name).ok_or_else(|| SynapseError::UnknownVariant {
        kind: "noise type",
        value: name.to_string(),
    })
}

/// Everything one `synapse` run needs besides its input signal
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseParameters {
    /// Characteristic frequency (Hz)
    pub cf: f64,
    /// Spontaneous firing rate (spikes/s)
    pub spontaneous_rate: f64,
    /// Absolute refractory period (s)
    pub abs_refractory_period: f64,
    /// Baseline mean relative refractory period (s)
    pub rel_refractory_period: f64,
    /// Simulation time resolution `tdres` (s)
    pub time_resolution: f64,
    /// Samples in one stimulus repetition
    pub total_stim: usize,
    /// Stimulus repetitions
    pub repetitions: usize,
    pub noise_type: NoiseType,
    pub power_law: PowerLaw,
    /// Compute analytic mean-rate/variance estimates
    pub analytic_estimates: bool,
}

impl Default for SynapseParameters {
    fn default() -> Self {
        Self {
            cf: 5_000.0,
            spontaneous_rate: 100.0,
            abs_refractory_period: 0.6e-3,
            rel_refractory_period: 0.6e-3,
            time_resolution: 1e-5,
            total_stim: 0,
            repetitions: 1,
            noise_type: NoiseType::Random,
            power_law: PowerLaw::Approximated,
            analytic_estimates: true,
        }
    }
}

fn check_range(name: &'static str, value: f64, (lower, upper): (f64, f64)) -> Result<()> {
    // NaN fails both comparisons
    if value >= lower && value <= upper {
        Ok(())
    } else {
        Err(SynapseError::InvalidParameter {
            name,
            value,
            lower,
            upper,
        })
    }
}

impl SynapseParameters {
    /// Build parameters from a loaded configuration
    ///
    /// # Errors
    /// Unknown variant names or out-of-range values.
    pub fn from_config(config: &SynapseConfig, total_stim: usize) -> Result<Self> {
        let params = Self {
            cf: config.model.cf,
            spontaneous_rate: config.model.spontaneous_rate,
            abs_refractory_period: config.model.abs_refractory_period,
            rel_refractory_period: config.model.rel_refractory_period,
            time_resolution: config.simulation.time_resolution,
            total_stim,
            repetitions: config.simulation.repetitions,
            noise_type: parse_noise_type(&config.model.noise_type)?,
            power_law: config.model.power_law.parse()?,
            analytic_estimates: config.simulation.analytic_estimates,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every parameter against its range; fails on the first violation
    pub fn validate(&self) -> Result<()> {
        check_range("spontaneous_rate", self.spontaneous_rate, SPONT_RANGE)?;
        check_range("abs_refractory_period", self.abs_refractory_period, REFRACTORY_RANGE)?;
        check_range("rel_refractory_period", self.rel_refractory_period, REFRACTORY_RANGE)?;
        check_range("cf", self.cf, (f64::MIN_POSITIVE, f64::MAX))?;
        check_range(
            "time_resolution",
            self.time_resolution,
            (f64::MIN_POSITIVE, MAX_TIME_RESOLUTION),
        )?;
        Ok(())
    }

    /// Simulated samples across all repetitions (`nrep · totalstim`)
    #[inline]
    pub fn total_samples(&self) -> usize {
        self.total_stim * self.repetitions
    }
}
