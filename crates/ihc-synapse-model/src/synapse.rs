// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Synapse Pipeline
//!
//! ```text
//! power-law drive ──► adaptation (+ fGn) ──► upsample/align ──► synaptic output
//!                                                                    │
//!                         PSTH / mean / variance ◄── spike generator ◄┘
//! ```
//!
//! [`SynapseSimulator`] owns the random source and the fGn spectral cache, so repeated
//! runs of equal length reuse the spectrum. The free function [`synapse`] builds a
//! fresh cache per call.

use ihc_synapse_dsp::{stats, FractionalGaussianNoise, RandomSource, SynapseRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adaptation::{adapt, upsample_and_align};
use crate::error::{Result, SynapseError};
use crate::mapping::{ceil_tolerant, delay_point, map_to_power_law, resampling_size};
use crate::spike_generator::SpikeGenerator;
use crate::statistics::{analytic_rate_estimates, psth, relative_refractory_trace, RateEstimates};
use crate::types::{SynapseParameters, POWER_LAW_SAMPLING_FREQUENCY};

/// Result of one `synapse` run
///
/// Per-sample vectors are `nrep · totalstim` long; `mean_firing_rate` and
/// `variance_firing_rate` cover one repetition (`totalstim`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynapseOutput {
    /// Adapted synaptic release rate (spikes/s)
    pub synaptic_output: Vec<f64>,
    /// Mean redocking time (s)
    pub redocking_time: Vec<f64>,
    /// Mean relative refractory period (s)
    pub relative_refractory_period: Vec<f64>,
    /// Spike times (s), in release order
    pub spike_times: Vec<f64>,
    /// Spike counts folded into the first `totalstim` bins
    pub psth: Vec<f64>,
    pub mean_firing_rate: Vec<f64>,
    pub variance_firing_rate: Vec<f64>,
}

impl SynapseOutput {
    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }

    /// Mean of the synaptic output over the whole run
    pub fn mean_synaptic_rate(&self) -> f64 {
        stats::mean(&self.synaptic_output)
    }
}

/// Mean and spread of spike counts and PSTHs over independent runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub mean_spike_count: f64,
    pub std_spike_count: f64,
    pub mean_psth: Vec<f64>,
    pub std_psth: Vec<f64>,
}

impl TrialSummary {
    pub fn from_outputs(outputs: &[SynapseOutput]) -> Self {
        let counts: Vec<f64> = outputs.iter().map(|o| o.spike_count() as f64).collect();
        let mean_spike_count = stats::mean(&counts);
        let psths: Vec<Vec<f64>> = outputs.iter().map(|o| o.psth.clone()).collect();
        let mean_psth = stats::reduce_mean(&psths);
        let std_psth = stats::reduce_std(&psths, &mean_psth);
        Self {
            trials: outputs.len(),
            mean_spike_count,
            std_spike_count: stats::std_dev(&counts, mean_spike_count),
            mean_psth,
            std_psth,
        }
    }
}

/// Power-law stage length for `total_samples` plus padding
fn power_law_length(total_samples: usize, delay_point: usize, time_resolution: f64) -> usize {
    ceil_tolerant(
        (total_samples + 2 * delay_point) as f64 * time_resolution * POWER_LAW_SAMPLING_FREQUENCY,
    )
}

fn synaptic_output_with<R: RandomSource + ?Sized>(
    power_law_input: &[f64],
    params: &SynapseParameters,
    fgn: &mut FractionalGaussianNoise,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let total = params.total_samples();
    let delay = delay_point(params.cf);
    let resamp = resampling_size(params.time_resolution);
    let n = power_law_length(total, delay, params.time_resolution);
    if n == 0 {
        return Ok(vec![0.0; total]);
    }
    let Some(&last) = power_law_input.last() else {
        return Err(SynapseError::LengthMismatch {
            name: "power_law_input",
            expected: n,
            actual: 0,
        });
    };

    let mut drive = power_law_input[..n.min(power_law_input.len())].to_vec();
    if drive.len() < n {
        debug!(
            "[SYNAPSE] Extending power-law drive from {} to {} samples",
            drive.len(),
            n
        );
        drive.resize(n, last);
    }

    let noise = fgn.generate(n, params.noise_type, params.spontaneous_rate, rng)?;
    let adapted = adapt(&drive, &noise, params.power_law);
    debug!(
        "[SYNAPSE] n={} delay_point={} resamp={} total={}",
        n, delay, resamp, total
    );
    Ok(upsample_and_align(&adapted, resamp, delay, total))
}

fn synapse_with<R: RandomSource + ?Sized>(
    power_law_input: &[f64],
    params: &SynapseParameters,
    fgn: &mut FractionalGaussianNoise,
    rng: &mut R,
) -> Result<SynapseOutput> {
    params.validate()?;
    let total = params.total_samples();

    let synaptic_output = synaptic_output_with(power_law_input, params, fgn, rng)?;
    let mean_rate = stats::mean(&synaptic_output);
    if total > 0 && mean_rate <= 0.0 {
        warn!("[SYNAPSE] Synaptic output is zero everywhere; no spikes will be generated");
    }

    let train = SpikeGenerator::new(params).generate(&synaptic_output, rng);
    let relative_refractory_period =
        relative_refractory_trace(&synaptic_output, params.rel_refractory_period);

    let estimates = if params.analytic_estimates {
        analytic_rate_estimates(
            &synaptic_output,
            &train.redocking_time,
            &relative_refractory_period,
            params.abs_refractory_period,
            params.total_stim,
            params.repetitions,
        )
    } else {
        RateEstimates {
            mean: vec![0.0; params.total_stim],
            variance: vec![0.0; params.total_stim],
        }
    };

    let psth = psth(
        &train.spike_times,
        params.time_resolution,
        params.total_stim,
        total,
    );

    info!(
        "[SYNAPSE] {} spikes over {} samples (mean synaptic rate {:.2} spikes/s)",
        train.spike_count(),
        total,
        mean_rate
    );

    Ok(SynapseOutput {
        synaptic_output,
        redocking_time: train.redocking_time,
        relative_refractory_period,
        spike_times: train.spike_times,
        psth,
        mean_firing_rate: estimates.mean,
        variance_firing_rate: estimates.variance,
    })
}

/// Run the synapse model on a power-law drive produced by [`map_to_power_law`]
///
/// # Errors
/// - [`SynapseError::InvalidParameter`] for out-of-range parameters
/// - [`SynapseError::LengthMismatch`] for an empty drive
/// - [`SynapseError::Dsp`] if noise synthesis fails
pub fn synapse<R: RandomSource + ?Sized>(
    power_law_input: &[f64],
    params: &SynapseParameters,
    rng: &mut R,
) -> Result<SynapseOutput> {
    let mut fgn = FractionalGaussianNoise::new();
    synapse_with(power_law_input, params, &mut fgn, rng)
}

/// Synapse model with its own random source and noise cache
#[derive(Debug, Clone)]
pub struct SynapseSimulator<R: RandomSource = SynapseRng> {
    rng: R,
    fgn: FractionalGaussianNoise,
}

impl SynapseSimulator<SynapseRng> {
    /// Simulator backed by a [`SynapseRng`] seeded with `seed`
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SynapseRng::new(seed))
    }
}

impl<R: RandomSource> SynapseSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            fgn: FractionalGaussianNoise::new(),
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Hair-cell output (`nrep · totalstim` samples) to spikes and statistics
    pub fn simulate(
        &mut self,
        ihc_out: &[f64],
        params: &SynapseParameters,
    ) -> Result<SynapseOutput> {
        let drive = map_to_power_law(ihc_out, params)?;
        self.synapse(&drive, params)
    }

    /// Run the model on an already mapped power-law drive
    pub fn synapse(
        &mut self,
        power_law_input: &[f64],
        params: &SynapseParameters,
    ) -> Result<SynapseOutput> {
        synapse_with(power_law_input, params, &mut self.fgn, &mut self.rng)
    }

    /// Adapted synaptic output only, without spike generation
    pub fn synaptic_output(
        &mut self,
        power_law_input: &[f64],
        params: &SynapseParameters,
    ) -> Result<Vec<f64>> {
        params.validate()?;
        synaptic_output_with(power_law_input, params, &mut self.fgn, &mut self.rng)
    }

    /// Run `trials` independent simulations of the same input
    pub fn run_trials(
        &mut self,
        ihc_out: &[f64],
        params: &SynapseParameters,
        trials: usize,
    ) -> Result<TrialSummary> {
        let drive = map_to_power_law(ihc_out, params)?;
        let outputs = (0..trials)
            .map(|_| self.synapse(&drive, params))
            .collect::<Result<Vec<_>>>()?;
        Ok(TrialSummary::from_outputs(&outputs))
    }
}
