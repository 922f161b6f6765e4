// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Multi-Site Spike Generator
//!
//! Discrete-event simulation of [`N_SITES`] vesicle release sites sharing one adaptive
//! mean redocking time.
//!
//! ## Per step `k`, per site
//! 1. Past its initial release bin, the site's elapsed time advances by `tdres`. When
//!    the quantized elapsed time reaches the quantized redocking draw, the shared
//!    redocking period jumps by [`T_RD_JUMP`].
//! 2. Once redocked, the site integrates `synout[k] / N_SITES`.
//! 3. When the integral crosses the site's unit-rate threshold, a release occurs. A
//!    release past the refractory deadline is a spike (stored only if `t ≥ 0`) and
//!    sets a new deadline `t + tabs − trel_k · ln(U)`.
//!
//! After all sites: the redocking period decays toward [`T_RD_REST`] with time
//! constant [`TAU_REDOCKING`], except in a step where a jump fired and before the
//! first jump ever fires.
//!
//! The simulation starts before `t = 0` (at the earliest initial release bin), so
//! sites enter the stimulus mid-cycle. Releases before `t = 0` are not stored.

use ihc_synapse_dsp::RandomSource;
use tracing::{debug, trace};

use crate::types::{SynapseParameters, N_SITES};

/// Resting mean redocking time (s)
pub const T_RD_REST: f64 = 14.0e-3;

/// Jump of the mean redocking time on a redocking event (s)
pub const T_RD_JUMP: f64 = 0.4e-3;

/// Time constant of the redocking adaptation (s)
pub const TAU_REDOCKING: f64 = 60.0e-3;

/// Floor on the initial synaptic output when drawing initial release bins
const MIN_INITIAL_RATE: f64 = 0.1;

/// Initial mean redocking time for a fiber of spontaneous rate `spont`
#[inline]
pub fn initial_redocking_time(spont: f64) -> f64 {
    T_RD_REST + 0.02e-3 * spont - T_RD_JUMP
}

/// Relative refractory mean, shortened at high drive: `min(trel · 100 / s, trel)`
#[inline]
pub fn relative_refractory_mean(trel: f64, synaptic_output: f64) -> f64 {
    (trel * 100.0 / synaptic_output).min(trel)
}

/// Spikes and redocking trace of one generator run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpikeTrain {
    /// Non-negative spike times (s), in release order
    pub spike_times: Vec<f64>,
    /// Mean redocking time per simulation sample (s)
    pub redocking_time: Vec<f64>,
}

impl SpikeTrain {
    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct ReleaseSite {
    /// First bin at which the site may release
    initial_bin: i64,
    elapsed_time: f64,
    redocking_draw: f64,
    previous_release_time: f64,
    x_sum: f64,
    unit_rate_interval: f64,
}

/// Spike generator for fixed refractory and redocking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeGenerator {
    pub time_resolution: f64,
    pub abs_refractory_period: f64,
    pub rel_refractory_period: f64,
    /// Initial mean redocking time (s)
    pub t_rd_init: f64,
}

impl SpikeGenerator {
    pub fn new(params: &SynapseParameters) -> Self {
        Self::with_values(
            params.time_resolution,
            params.abs_refractory_period,
            params.rel_refractory_period,
            params.spontaneous_rate,
        )
    }

    pub fn with_values(time_resolution: f64, tabs: f64, trel: f64, spont: f64) -> Self {
        Self {
            time_resolution,
            abs_refractory_period: tabs,
            rel_refractory_period: trel,
            t_rd_init: initial_redocking_time(spont),
        }
    }

    /// Run the generator over `synout` (spikes/s per simulation sample)
    ///
    /// The redocking trace has the same length as `synout`.
    pub fn generate<R: RandomSource + ?Sized>(&self, synout: &[f64], rng: &mut R) -> SpikeTrain {
        let total = synout.len();
        let Some(&initial_rate) = synout.first() else {
            return SpikeTrain::default();
        };
        let tdres = self.time_resolution;
        let tabs = self.abs_refractory_period;
        let trel = self.rel_refractory_period;
        let total_bins = total as i64;
        let rate_at = |k: i64| synout[k.max(0) as usize];

        let redocking_draws: Vec<f64> = (0..N_SITES)
            .map(|_| -self.t_rd_init * rng.uniform01().ln())
            .collect();

        let mut initial_bins: Vec<i64> = (0..N_SITES)
            .map(|_| {
                let bin = ((N_SITES as f64 / initial_rate.max(MIN_INITIAL_RATE) + self.t_rd_init)
                    * rng.uniform01().ln()
                    / tdres)
                    .ceil();
                bin.max(-(total as f64)) as i64
            })
            .collect();
        initial_bins.sort_unstable();

        let mut sites: Vec<ReleaseSite> = initial_bins
            .iter()
            .zip(redocking_draws.iter())
            .map(|(&bin, &draw)| ReleaseSite {
                initial_bin: bin,
                elapsed_time: 0.0,
                redocking_draw: draw,
                previous_release_time: bin as f64 * tdres,
                x_sum: 0.0,
                unit_rate_interval: 0.0,
            })
            .collect();

        let k_init = initial_bins[0];

        // The initial refractory draw is consumed to keep the random stream aligned;
        // the first deadline is the start of the simulation
        rng.uniform01();
        let mut refractory_deadline = k_init as f64 * tdres;

        let mut redocking_period = self.t_rd_init;
        let mut decay = true;
        let mut jumped_once = false;

        let mut spike_times = Vec::new();
        let mut redocking_time = vec![0.0; total];

        debug!(
            "[SPIKE-GEN] {} samples, k_init={}, t_rd_init={:.3e}",
            total, k_init, self.t_rd_init
        );

        let mut k = k_init;
        while k < total_bins {
            for (site_index, site) in sites.iter_mut().enumerate() {
                if k > site.initial_bin {
                    let redock_steps = (site.redocking_draw / tdres) as i64;
                    let elapsed_steps = (site.elapsed_time / tdres) as i64;
                    if redock_steps == elapsed_steps {
                        redocking_period += T_RD_JUMP;
                        decay = false;
                        jumped_once = true;
                    }
                    site.elapsed_time += tdres;
                }

                if site.elapsed_time >= site.redocking_draw {
                    site.x_sum += rate_at(k) / N_SITES as f64;
                }

                if site.x_sum >= site.unit_rate_interval && k >= site.initial_bin {
                    site.redocking_draw = -redocking_period * rng.uniform01().ln();
                    let release_time = site.previous_release_time + site.elapsed_time;
                    site.elapsed_time = 0.0;

                    if release_time >= refractory_deadline {
                        if release_time >= 0.0 {
                            spike_times.push(release_time);
                            trace!("[SPIKE-GEN] site {} spike at {:.6}s", site_index, release_time);
                        }
                        let trel_k = relative_refractory_mean(trel, rate_at(k));
                        refractory_deadline = release_time + tabs - trel_k * rng.uniform01().ln();
                    }

                    site.previous_release_time = release_time;
                    site.x_sum = 0.0;
                    site.unit_rate_interval = (-rng.uniform01().ln() / tdres).trunc();
                }
            }

            if decay && jumped_once {
                redocking_period -= (tdres / TAU_REDOCKING) * (redocking_period - T_RD_REST);
            } else {
                decay = true;
            }

            if k >= 0 {
                redocking_time[k as usize] = redocking_period;
            }
            k += 1;
        }

        SpikeTrain {
            spike_times,
            redocking_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ihc_synapse_dsp::SynapseRng;

    const TDRES: f64 = 1e-5;
    const TABS: f64 = 0.6e-3;

    /// Just below 1: `ln(u)` is ~0, so redocking and unit-rate draws are immediate
    const NEARLY_ONE: f64 = 1.0 - 1e-12;

    /// Replays fixed uniform draws, repeating the last one when exhausted
    struct ScriptedRandom {
        values: Vec<f64>,
        index: usize,
    }

    impl ScriptedRandom {
        fn new(values: Vec<f64>) -> Self {
            Self { values, index: 0 }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn uniform01(&mut self) -> f64 {
            let value = self.values[self.index.min(self.values.len() - 1)];
            self.index += 1;
            value
        }

        fn standard_normal(&mut self) -> f64 {
            0.0
        }

        fn reseed(&mut self, _seed: u64) {
            self.index = 0;
        }
    }

    fn generator() -> SpikeGenerator {
        SpikeGenerator::with_values(TDRES, TABS, 0.6e-3, 100.0)
    }

    #[test]
    fn test_initial_redocking_time() {
        assert!((initial_redocking_time(100.0) - 15.6e-3).abs() < 1e-15);
        assert!((initial_redocking_time(0.0) - 13.6e-3).abs() < 1e-15);
    }

    #[test]
    fn test_relative_refractory_mean() {
        assert_eq!(relative_refractory_mean(1e-3, 50.0), 1e-3);
        assert!((relative_refractory_mean(1e-3, 400.0) - 0.25e-3).abs() < 1e-15);
        assert_eq!(relative_refractory_mean(1e-3, 0.0), 1e-3);
    }

    #[test]
    fn test_empty_input() {
        let mut rng = SynapseRng::default();
        let train = generator().generate(&[], &mut rng);
        assert_eq!(train, SpikeTrain::default());
    }

    #[test]
    fn test_rate_increases_spike_count() {
        let n = 50_000;
        let count = |rate: f64| {
            let mut rng = SynapseRng::new(5);
            generator().generate(&vec![rate; n], &mut rng).spike_count()
        };
        let low = count(50.0);
        let high = count(1_000.0);
        assert!(low > 0);
        assert!(high > 2 * low, "low={} high={}", low, high);
    }

    #[test]
    fn test_spikes_respect_absolute_refractory_period() {
        let mut rng = SynapseRng::new(9);
        let train = generator().generate(&vec![2_000.0; 100_000], &mut rng);
        assert!(train.spike_count() > 10);
        for pair in train.spike_times.windows(2) {
            assert!(pair[0] >= 0.0);
            assert!(pair[1] - pair[0] >= TABS - 1e-12, "{:?}", pair);
        }
    }

    #[test]
    fn test_zero_drive_redocking_trace() {
        let mut rng = SynapseRng::new(1);
        let n = 60_000;
        let train = generator().generate(&vec![0.0; n], &mut rng);
        assert!(train.spike_times.is_empty());
        assert_eq!(train.redocking_time.len(), n);
        assert!(train.redocking_time.iter().all(|v| *v >= 0.0));

        // No releases after warm-up, so only decay remains toward the resting value
        let tail = &train.redocking_time[n / 2..];
        for pair in tail.windows(2) {
            assert!(pair[1] <= pair[0]);
            assert!(pair[1] >= T_RD_REST);
        }
    }

    #[test]
    fn test_same_seed_same_train() {
        let synout: Vec<f64> = (0..20_000)
            .map(|i| 200.0 + 150.0 * (i as f64 * 1e-3).sin())
            .collect();
        let a = generator().generate(&synout, &mut SynapseRng::new(77));
        let b = generator().generate(&synout, &mut SynapseRng::new(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_jump_suppresses_decay_in_its_step() {
        // Draw order: 4 redocking, 4 initial bins, 1 initial refractory, then the
        // releases at k = 0 (site 0: redocking, refractory, unit rate; sites 1-3:
        // redocking, unit rate). Site 0 redocks first, so the first jump is its alone.
        let mut script = vec![0.5; 4];
        script.extend([NEARLY_ONE; 4]);
        script.extend([0.5, 0.9]);
        script.extend([0.5; 8]);
        let train = generator().generate(&vec![500.0; 3_000], &mut ScriptedRandom::new(script));

        let trace = &train.redocking_time;
        let t_rd_init = initial_redocking_time(100.0);
        let k = (1..trace.len())
            .find(|&k| trace[k] != trace[k - 1])
            .expect("a redocking jump");

        // Neither jumps nor decay before the first jump
        assert!(trace[..k].iter().all(|&v| v == t_rd_init));
        // The jump step itself is not decayed
        assert!((trace[k] - trace[k - 1] - T_RD_JUMP).abs() < 1e-12, "{:?}", &trace[k - 1..=k]);
        // Decay resumes on the following step
        let decayed = trace[k] - (TDRES / TAU_REDOCKING) * (trace[k] - T_RD_REST);
        assert!((trace[k + 1] - decayed).abs() < 1e-15);
    }

    fn second_spike_time(synout: f64) -> f64 {
        // All sites start at bin 0 and release on every step after the first. Site 0
        // spikes at t = 0 and draws its refractory time from u = 1/e (-ln u = 1), so
        // the next spike is the first step at or past tabs + trel_k.
        let mut script = vec![NEARLY_ONE; 10];
        script.push((-1.0f64).exp());
        script.push(NEARLY_ONE);
        let train = generator().generate(&vec![synout; 300], &mut ScriptedRandom::new(script));
        assert_eq!(train.spike_times[0], 0.0);
        train.spike_times[1]
    }

    #[test]
    fn test_relative_refractory_shortens_at_high_drive() {
        let trel = 0.6e-3;

        // trel · 100 / 2000 = trel / 20
        let deadline = TABS + trel / 20.0;
        let t = second_spike_time(2_000.0);
        assert!(t >= deadline - 1e-12 && t < deadline + TDRES, "{} vs {}", t, deadline);

        // trel · 100 / 50 > trel, so the full relative period applies
        let deadline = TABS + trel;
        let t = second_spike_time(50.0);
        assert!(t >= deadline - 1e-12 && t < deadline + TDRES, "{} vs {}", t, deadline);
    }
}
