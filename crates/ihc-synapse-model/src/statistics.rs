// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # PSTH and Rate Statistics
//!
//! Spike times are folded into one stimulus repetition to build the PSTH. The
//! analytic estimates treat each site as a renewal process with dead time
//! `tabs + trd / N_SITES + trel`:
//!
//! ```text
//! mean[i] = s / (s · (tabs + trd/4 + trel_i) + 1)
//! ```
//!
//! and an 8th-order rational expansion for the spike-count variance.

use ihc_synapse_dsp::stats;

use crate::spike_generator::relative_refractory_mean;
use crate::types::N_SITES;

/// Per-sample relative refractory mean: `min(trel · 100 / s, trel)`, or `trel` where
/// the synaptic output is not positive
pub fn relative_refractory_trace(synout: &[f64], trel: f64) -> Vec<f64> {
    synout
        .iter()
        .map(|&s| {
            if s > 0.0 {
                relative_refractory_mean(trel, s)
            } else {
                trel
            }
        })
        .collect()
}

/// Instantaneous discharge-rate estimate for synaptic output `s > 0`
#[inline]
pub fn instantaneous_mean_rate(s: f64, trd: f64, tabs: f64, trel: f64) -> f64 {
    s / (s * (tabs + trd / N_SITES as f64 + trel) + 1.0)
}

/// Instantaneous discharge-rate variance estimate for synaptic output `s > 0`
pub fn instantaneous_variance(s: f64, trd: f64, tabs: f64, trel: f64) -> f64 {
    let s2 = s * s;
    let s3 = s2 * s;
    let s4 = s3 * s;
    let s5 = s4 * s;
    let s6 = s5 * s;
    let s7 = s6 * s;
    let s8 = s7 * s;
    let trel2 = trel * trel;
    let t2 = trd * trd;
    let t3 = t2 * trd;
    let t4 = t3 * trd;
    let t5 = t4 * trd;
    let t6 = t5 * trd;
    let t7 = t6 * trd;
    let t8 = t7 * trd;
    let st = s * trd + 4.0;
    let st4 = st * st * st * st;
    let ttts = trd / 4.0 + tabs + trel + 1.0 / s;
    let ttts3 = ttts * ttts * ttts;

    let numerator = (11.0 * s7 * t7) / 2.0
        + (3.0 * s8 * t8) / 16.0
        + 12288.0 * s2 * trel2
        + trd * (22528.0 * s3 * trel2 + 22528.0 * s)
        + t6 * (3.0 * s8 * trel2 + 82.0 * s6)
        + t5 * (88.0 * s7 * trel2 + 664.0 * s5)
        + t4 * (976.0 * s6 * trel2 + 3392.0 * s4)
        + t3 * (5376.0 * s5 * trel2 + 10624.0 * s3)
        + t2 * (15616.0 * s4 * trel2 + 20992.0 * s2)
        + 12288.0;
    let denominator = s2 * st4 * (3.0 * s2 * t2 + 40.0 * s * trd + 48.0) * ttts3;
    numerator / denominator
}

/// Analytic mean-rate and variance per within-repetition bin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateEstimates {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
}

/// Accumulate analytic estimates over all repetitions, normalized by `repetitions`
///
/// `synout`, `redocking_time` and `trel_trace` are `repetitions · total_stim` long;
/// the result has `total_stim` bins. Samples with non-positive output contribute
/// nothing.
pub fn analytic_rate_estimates(
    synout: &[f64],
    redocking_time: &[f64],
    trel_trace: &[f64],
    tabs: f64,
    total_stim: usize,
    repetitions: usize,
) -> RateEstimates {
    let mut estimates = RateEstimates {
        mean: vec![0.0; total_stim],
        variance: vec![0.0; total_stim],
    };
    if total_stim == 0 || repetitions == 0 {
        return estimates;
    }
    let nrep = repetitions as f64;

    for (i, ((&s, &trd), &trel_i)) in synout
        .iter()
        .zip(redocking_time.iter())
        .zip(trel_trace.iter())
        .enumerate()
    {
        if s > 0.0 {
            let bin = i % total_stim;
            estimates.mean[bin] += instantaneous_mean_rate(s, trd, tabs, trel_i) / nrep;
            estimates.variance[bin] += instantaneous_variance(s, trd, tabs, trel_i) / nrep;
        }
    }
    estimates
}

/// Fold spike times into one repetition period and count them per `tdres` bin
///
/// Returns `len` bins; counts land in the first `total_stim` of them.
pub fn psth(spike_times: &[f64], time_resolution: f64, total_stim: usize, len: usize) -> Vec<f64> {
    let mut counts = vec![0.0; len];
    let bins = total_stim.min(len);
    if bins == 0 {
        return counts;
    }
    let period = time_resolution * total_stim as f64;
    for &t in spike_times {
        let bin = ((t % period) / time_resolution) as usize;
        counts[bin.min(bins - 1)] += 1.0;
    }
    counts
}

/// Sum consecutive groups of `samples_per_bin` PSTH bins; a partial last group is dropped
pub fn rebin_psth(psth: &[f64], samples_per_bin: usize) -> Vec<f64> {
    if samples_per_bin == 0 {
        return Vec::new();
    }
    stats::make_bins(psth, psth.len() / samples_per_bin)
}

/// Convert spike counts per bin into a firing rate (spikes/s) averaged over repetitions
pub fn psth_to_rate(counts: &[f64], repetitions: usize, bin_width: f64) -> Vec<f64> {
    if repetitions == 0 || bin_width <= 0.0 {
        return vec![0.0; counts.len()];
    }
    let scale = 1.0 / (repetitions as f64 * bin_width);
    counts.iter().map(|c| c * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_refractory_trace() {
        let trace = relative_refractory_trace(&[0.0, 50.0, 200.0, -1.0], 1e-3);
        assert_eq!(trace[0], 1e-3);
        assert_eq!(trace[1], 1e-3);
        assert!((trace[2] - 0.5e-3).abs() < 1e-15);
        assert_eq!(trace[3], 1e-3);
    }

    #[test]
    fn test_mean_rate_saturates() {
        let dead_time: f64 = 0.6e-3 + 14e-3 / 4.0 + 0.3e-3;
        let rate = instantaneous_mean_rate(1e9, 14e-3, 0.6e-3, 0.3e-3);
        assert!((rate - 1.0 / dead_time).abs() < 1e-3);
        assert!((instantaneous_mean_rate(10.0, 0.0, 0.0, 0.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_variance_low_rate_limit_is_poisson() {
        // s → 0 with negligible dead time: variance ≈ rate
        let s = 1e-3;
        let v = instantaneous_variance(s, 0.0, 0.0, 0.0);
        // numerator → 12288, denominator → s² · 256 · 48 · s⁻³
        assert!((v - s).abs() < 1e-9, "{}", v);
    }

    #[test]
    fn test_variance_positive() {
        for s in [1.0, 50.0, 300.0, 2_000.0] {
            let v = instantaneous_variance(s, 14e-3, 0.6e-3, 0.6e-3);
            assert!(v.is_finite() && v > 0.0, "s={} v={}", s, v);
        }
    }

    #[test]
    fn test_estimates_fold_repetitions() {
        let synout = [100.0, 0.0, 100.0, 0.0];
        let trd = [14e-3; 4];
        let trel = relative_refractory_trace(&synout, 0.6e-3);
        let est = analytic_rate_estimates(&synout, &trd, &trel, 0.6e-3, 2, 2);
        assert_eq!(est.mean.len(), 2);
        let expected = instantaneous_mean_rate(100.0, 14e-3, 0.6e-3, 0.6e-3);
        assert!((est.mean[0] - expected).abs() < 1e-12);
        assert_eq!(est.mean[1], 0.0);
        assert_eq!(est.variance[1], 0.0);
    }

    #[test]
    fn test_psth_folds_by_repetition() {
        // Period = 10 bins of 1 ms
        let spikes = [0.0005, 0.0035, 0.0105, 0.0195];
        let counts = psth(&spikes, 1e-3, 10, 20);
        assert_eq!(counts.len(), 20);
        assert_eq!(counts[0], 2.0);
        assert_eq!(counts[3], 1.0);
        assert_eq!(counts[9], 1.0);
        assert_eq!(counts[10..].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_rebin_and_rate() {
        let counts = [1.0, 0.0, 2.0, 1.0, 5.0];
        let rebinned = rebin_psth(&counts, 2);
        assert_eq!(rebinned, vec![1.0, 3.0]);
        assert_eq!(rebin_psth(&counts, 0), Vec::<f64>::new());

        let rate = psth_to_rate(&rebinned, 10, 1e-3);
        assert!((rate[1] - 300.0).abs() < 1e-9);
        assert_eq!(psth_to_rate(&rebinned, 0, 1e-3), vec![0.0, 0.0]);
    }
}
