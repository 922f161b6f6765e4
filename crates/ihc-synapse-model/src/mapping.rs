// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Power-Law Mapping
//!
//! Maps inner-hair-cell output onto the synaptic drive of the power-law stage:
//!
//! ```text
//! mapped = sign(x) · 10^(0.9 · log10(|x| · cf_factor) + mult_fac)
//! ```
//!
//! The mapped signal (offset by `3 · spont`) is padded with `delay_point` leading and
//! `2 · delay_point` trailing samples, then downsampled to the 10 kHz power-law rate.
//! The leading padding is removed again after adaptation (see
//! [`crate::adaptation::upsample_and_align`]), so both steps must use the same
//! [`delay_point`].

use ihc_synapse_dsp::resample;
use tracing::debug;

use crate::error::{Result, SynapseError};
use crate::types::{SynapseParameters, POWER_LAW_SAMPLING_FREQUENCY};

/// CF above which the gain saturates (Hz)
const CF_SATURATION: f64 = 8965.5;

/// `ceil(x)` tolerant of floating-point error just above an integer
#[inline]
pub(crate) fn ceil_tolerant(x: f64) -> usize {
    (x - 1e-9).ceil().max(0.0) as usize
}

/// Padding (in simulation samples) compensating the adaptation group delay
#[inline]
pub fn delay_point(cf: f64) -> usize {
    (7500.0 / (cf / 1e3)).floor() as usize
}

/// Simulation samples per power-law sample: `ceil(1 / (tdres · 10 kHz))`
#[inline]
pub fn resampling_size(time_resolution: f64) -> usize {
    ceil_tolerant(1.0 / (time_resolution * POWER_LAW_SAMPLING_FREQUENCY)).max(1)
}

/// CF- and spontaneous-rate-dependent log-log gain of the mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawMapping {
    pub cf_factor: f64,
    pub mult_fac: f64,
    pub delay_point: usize,
}

impl PowerLawMapping {
    pub fn new(cf: f64, spont: f64) -> Self {
        let log_spont = spont.log10();
        let cf_slope = spont.powf(0.19) * 10f64.powf(-0.87);
        let cf_const = 0.1 * log_spont * log_spont + 0.56 * log_spont - 0.84;
        let cf_sat = 10f64.powf(cf_slope * CF_SATURATION / 1e3 + cf_const);
        let cf_factor = cf_sat.min(10f64.powf(cf_slope * cf / 1e3 + cf_const)) * 2.0;
        let mult_fac = (2.95 * (1.5 - spont / 100.0).max(1.0)).max(4.3 - 0.2 * cf / 1e3);

        Self {
            cf_factor,
            mult_fac,
            delay_point: delay_point(cf),
        }
    }

    /// Map one hair-cell sample (sign preserving, 0 maps to 0)
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        let magnitude = 10f64.powf(0.9 * (x.abs() * self.cf_factor).log10() + self.mult_fac);
        if x < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Mapped signal plus `3 · spont`, with delay padding, at the simulation rate
    ///
    /// Layout (`d = delay_point`, `N = ihc_out.len()`):
    /// - `[0, d)`: first mapped sample + `3 · spont`
    /// - `[d, N + d)`: mapped samples + `3 · spont`
    /// - `[N + d, N + 3d)`: each sample adds `3 · spont` to its predecessor
    pub fn padded_drive(&self, ihc_out: &[f64], spont: f64) -> Vec<f64> {
        let d = self.delay_point;
        let offset = 3.0 * spont;
        let first = ihc_out.first().map_or(0.0, |&x| self.apply(x));

        let mut padded = Vec::with_capacity(ihc_out.len() + 3 * d);
        padded.extend(std::iter::repeat(first + offset).take(d));
        padded.extend(ihc_out.iter().map(|&x| self.apply(x) + offset));
        for _ in 0..2 * d {
            let previous = padded.last().copied().unwrap_or(0.0);
            padded.push(previous + offset);
        }
        padded
    }
}

/// Map hair-cell output to the power-law drive, downsampled to 10 kHz
///
/// # Errors
/// - [`SynapseError::LengthMismatch`] if `ihc_out` is not `nrep · totalstim` long
/// - [`SynapseError::InvalidParameter`] for out-of-range parameters
pub fn map_to_power_law(ihc_out: &[f64], params: &SynapseParameters) -> Result<Vec<f64>> {
    params.validate()?;
    if ihc_out.len() != params.total_samples() {
        return Err(SynapseError::LengthMismatch {
            name: "ihc_out",
            expected: params.total_samples(),
            actual: ihc_out.len(),
        });
    }

    let mapping = PowerLawMapping::new(params.cf, params.spontaneous_rate);
    let padded = mapping.padded_drive(ihc_out, params.spontaneous_rate);
    if padded.is_empty() {
        return Ok(Vec::new());
    }

    let resamp = resampling_size(params.time_resolution);
    debug!(
        "[SYNAPSE] Power-law mapping: cf_factor={:.4} mult_fac={:.4} delay_point={} resamp={}",
        mapping.cf_factor, mapping.mult_fac, mapping.delay_point, resamp
    );
    Ok(resample(&padded, 1, resamp)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn test_mapping_constants() {
        let m = PowerLawMapping::new(5_000.0, 100.0);
        assert!(close(m.cf_factor, 397.189_976_702_185_1, 1e-9), "{}", m.cf_factor);
        assert!(close(m.mult_fac, 3.3, 1e-12));
        assert_eq!(m.delay_point, 1_500);

        let low_cf = PowerLawMapping::new(500.0, 100.0);
        assert!(close(low_cf.mult_fac, 4.2, 1e-12));
        assert_eq!(low_cf.delay_point, 15_000);

        let low_spont = PowerLawMapping::new(5_000.0, 1.0);
        assert!(close(low_spont.mult_fac, 4.3955, 1e-12));
    }

    #[test]
    fn test_gain_saturates_above_cf_limit() {
        let a = PowerLawMapping::new(9_000.0, 100.0);
        let b = PowerLawMapping::new(20_000.0, 100.0);
        assert_eq!(a.cf_factor, b.cf_factor);
        assert!(close(a.cf_factor, 7_624.457_130_121_088, 1e-9));
    }

    #[test]
    fn test_mapping_has_no_hidden_state() {
        let first = PowerLawMapping::new(5_000.0, 50.0);
        let _ = PowerLawMapping::new(250.0, 0.1);
        assert_eq!(PowerLawMapping::new(5_000.0, 50.0), first);
    }

    #[test]
    fn test_apply_is_odd_and_zero_preserving() {
        let m = PowerLawMapping::new(5_000.0, 100.0);
        assert_eq!(m.apply(0.0), 0.0);
        assert!(close(m.apply(0.01), 6_903.962_953_202_762, 1e-9));
        assert_eq!(m.apply(-0.01), -m.apply(0.01));
    }

    #[test]
    fn test_padded_drive_layout() {
        let m = PowerLawMapping {
            cf_factor: 1.0,
            mult_fac: 0.0,
            delay_point: 2,
        };
        // 10^(0.9·log10(x)) = x^0.9; inputs chosen so x^0.9 = 1
        let padded = m.padded_drive(&[1.0, 1.0, 1.0], 1.0);
        assert_eq!(padded.len(), 3 + 3 * 2);
        assert_eq!(&padded[..5], &[4.0, 4.0, 4.0, 4.0, 4.0]);
        assert_eq!(&padded[5..], &[7.0, 10.0, 13.0, 16.0]);
    }

    #[test]
    fn test_resampling_size_exact_ratios() {
        assert_eq!(resampling_size(1e-5), 10);
        assert_eq!(resampling_size(1e-4), 1);
        assert_eq!(resampling_size(2e-6), 50);
        assert_eq!(resampling_size(3e-5), 4);
    }

    #[test]
    fn test_map_to_power_law_length() {
        let params = SynapseParameters {
            total_stim: 2_000,
            ..SynapseParameters::default()
        };
        let ihc = vec![0.0; 2_000];
        let out = map_to_power_law(&ihc, &params).unwrap();
        // (2000 + 3·1500) / 10
        assert_eq!(out.len(), 650);

        let err = map_to_power_law(&ihc[..10], &params).unwrap_err();
        assert!(matches!(err, SynapseError::LengthMismatch { expected: 2_000, actual: 10, .. }));
    }
}
