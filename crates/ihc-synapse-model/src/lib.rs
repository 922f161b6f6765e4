// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # IHC-AN Synapse Model
//!
//! Converts inner-hair-cell output into auditory-nerve spike trains:
//!
//! 1. **Mapping**: CF- and spontaneous-rate-dependent power-law mapping with delay
//!    padding, downsampled to 10 kHz
//! 2. **Adaptation**: exact or approximated power-law adaptation perturbed by
//!    fractional Gaussian noise, upsampled back to the simulation rate
//! 3. **Spike generation**: four release sites with adaptive redocking and
//!    refractoriness
//! 4. **Statistics**: PSTH, analytic mean rate and variance, trial summaries
//!
//! ```rust,no_run
//! use ihc_synapse_model::{SynapseParameters, SynapseSimulator};
//!
//! let params = SynapseParameters { total_stim: 10_000, ..SynapseParameters::default() };
//! let ihc_out = vec![0.0; params.total_samples()];
//! let output = SynapseSimulator::from_seed(42).simulate(&ihc_out, &params)?;
//! println!("{} spikes", output.spike_count());
//! # Ok::<(), ihc_synapse_model::SynapseError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adaptation;
pub mod error;
pub mod mapping;
pub mod spike_generator;
pub mod statistics;
pub mod synapse;
pub mod types;

pub use adaptation::{adapt, adapt_approximate, adapt_exact, upsample_and_align};
pub use error::{Result, SynapseError};
pub use mapping::{delay_point, map_to_power_law, resampling_size, PowerLawMapping};
pub use spike_generator::{SpikeGenerator, SpikeTrain};
pub use statistics::{
    analytic_rate_estimates, instantaneous_variance, psth, psth_to_rate, rebin_psth,
    relative_refractory_trace, RateEstimates,
};
pub use synapse::{synapse, SynapseOutput, SynapseSimulator, TrialSummary};
pub use types::{parse_noise_type, PowerLaw, SynapseParameters, N_SITES, POWER_LAW_SAMPLING_FREQUENCY};

pub use ihc_synapse_dsp::{NoiseType, RandomSource, SynapseRng};
