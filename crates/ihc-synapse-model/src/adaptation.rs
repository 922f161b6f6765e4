// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Power-Law Adaptation
//!
//! Two parallel pathways adapt the drive at the 10 kHz power-law rate:
//!
//! ```text
//! sout1[k] = max(0, x[k] + noise[k] − α1 · I1[k−1])     (fast, β1 = 0.5 ms)
//! sout2[k] = max(0, x[k]            − α2 · I2[k−1])     (slow, β2 = 100 ms)
//! I[k]     = Σ_{j≤k} sout[j] · Δ / ((k − j)·Δ + β)
//! out[k]   = sout1[k] + sout2[k]
//! ```
//!
//! [`PowerLaw::Actual`] evaluates `I` directly (O(n²)); [`PowerLaw::Approximated`]
//! replaces each sum with a cascade of second-order sections (O(n)), five for the fast
//! kernel and three for the slow one. Filter state starts at zero on every call.

use tracing::debug;

use crate::types::{PowerLaw, POWER_LAW_SAMPLING_FREQUENCY};

/// Fast pathway gain
pub const ALPHA1: f64 = 1.5e-6 * 100e3;
/// Slow pathway gain
pub const ALPHA2: f64 = 1e-2 * 100e3;
/// Fast kernel time constant (s)
pub const BETA1: f64 = 5e-4;
/// Slow kernel time constant (s)
pub const BETA2: f64 = 1e-1;

/// Power-law bin width (s)
const BIN_WIDTH: f64 = 1.0 / POWER_LAW_SAMPLING_FREQUENCY;

/// `(a1, a2, gain, b1, b2)`:
/// `y[k] = a1·y[k−1] + a2·y[k−2] + gain·(x[k] + b1·x[k−1] + b2·x[k−2])`
type SectionCoefficients = (f64, f64, f64, f64, f64);

const SLOW_SECTIONS: [SectionCoefficients; 3] = [
    (1.992127932802320, -0.992140616993846, 1.0e-3, -0.994466986569624, 0.000000000002347),
    (1.999195329360981, -0.999195402928777, 1.0, -1.997855276593802, 0.997855827934345),
    (-0.798261718183851, -0.199131619873480, 1.0, 0.798261718184977, 0.199131619874064),
];

const FAST_SECTIONS: [SectionCoefficients; 5] = [
    (0.491115852967412, -0.055050209956838, 0.2, -0.173492003319319, 0.000000172983796),
    (1.084520302502860, -0.288760329320566, 1.0, -0.803462163297112, 0.154962026341513),
    (1.588427084535629, -0.628138993662508, 1.0, -1.416084732997016, 0.496615555008723),
    (1.886287488516458, -0.888972875389923, 1.0, -1.830362725074550, 0.836399964176882),
    (1.989549282714008, -0.989558985673023, 1.0, -1.983165053215032, 0.983193027347456),
];

#[derive(Debug, Clone, Copy)]
struct Section {
    a1: f64,
    a2: f64,
    gain: f64,
    b1: f64,
    b2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Section {
    fn new((a1, a2, gain, b1, b2): SectionCoefficients) -> Self {
        Self {
            a1,
            a2,
            gain,
            b1,
            b2,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.a1 * self.y1
            + self.a2 * self.y2
            + self.gain * (x + self.b1 * self.x1 + self.b2 * self.x2);
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Cascade of second-order sections approximating one fractional kernel
#[derive(Debug, Clone)]
struct KernelFilter {
    sections: Vec<Section>,
}

impl KernelFilter {
    fn new(coefficients: &[SectionCoefficients]) -> Self {
        Self {
            sections: coefficients.iter().copied().map(Section::new).collect(),
        }
    }

    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        self.sections.iter_mut().fold(x, |acc, s| s.process(acc))
    }
}

/// Pathway outputs for one sample
#[inline]
fn pathways(drive: f64, noise: f64, i1: f64, i2: f64) -> (f64, f64) {
    let sout1 = (drive + noise - ALPHA1 * i1).max(0.0);
    let sout2 = (drive - ALPHA2 * i2).max(0.0);
    (sout1, sout2)
}

/// Exact power-law adaptation (O(n²) direct convolution)
///
/// Output length is `min(drive.len(), noise.len())`.
pub fn adapt_exact(drive: &[f64], noise: &[f64]) -> Vec<f64> {
    let n = drive.len().min(noise.len());
    let mut sout1 = Vec::with_capacity(n);
    let mut sout2 = Vec::with_capacity(n);
    let mut output = Vec::with_capacity(n);
    let (mut i1, mut i2) = (0.0, 0.0);

    for k in 0..n {
        let (s1, s2) = pathways(drive[k], noise[k], i1, i2);
        sout1.push(s1);
        sout2.push(s2);

        i1 = 0.0;
        i2 = 0.0;
        for j in 0..=k {
            let lag = (k - j) as f64 * BIN_WIDTH;
            i1 += sout1[j] * BIN_WIDTH / (lag + BETA1);
            i2 += sout2[j] * BIN_WIDTH / (lag + BETA2);
        }
        output.push(s1 + s2);
    }
    output
}

/// Approximated power-law adaptation (O(n) cascaded IIR filters)
///
/// Output length is `min(drive.len(), noise.len())`.
pub fn adapt_approximate(drive: &[f64], noise: &[f64]) -> Vec<f64> {
    let mut fast = KernelFilter::new(&FAST_SECTIONS);
    let mut slow = KernelFilter::new(&SLOW_SECTIONS);
    let (mut i1, mut i2) = (0.0, 0.0);

    drive
        .iter()
        .zip(noise.iter())
        .map(|(&x, &r)| {
            let (s1, s2) = pathways(x, r, i1, i2);
            i1 = fast.process(s1);
            i2 = slow.process(s2);
            s1 + s2
        })
        .collect()
}

/// Run the selected integration scheme
pub fn adapt(drive: &[f64], noise: &[f64], power_law: PowerLaw) -> Vec<f64> {
    debug!(
        "[SYNAPSE] Power-law adaptation ({}) over {} samples",
        power_law.name(),
        drive.len().min(noise.len())
    );
    match power_law {
        PowerLaw::Approximated => adapt_approximate(drive, noise),
        PowerLaw::Actual => adapt_exact(drive, noise),
    }
}

/// Linearly up-sample the adapted signal to the simulation rate and drop the
/// leading delay padding
///
/// An intermediate buffer of `total_samples + 2 · delay_point` samples receives
/// `resampling_size` interpolated values per source interval; writes past its end are
/// dropped. Output sample `i` is buffer sample `i + delay_point`.
pub fn upsample_and_align(
    adapted: &[f64],
    resampling_size: usize,
    delay_point: usize,
    total_samples: usize,
) -> Vec<f64> {
    let mut upsampled = vec![0.0; total_samples + 2 * delay_point];
    let step = resampling_size as f64;

    'outer: for (z, pair) in adapted.windows(2).enumerate() {
        let increment = (pair[1] - pair[0]) / step;
        for b in 0..resampling_size {
            let Some(slot) = upsampled.get_mut(z * resampling_size + b) else {
                break 'outer;
            };
            *slot = pair[0] + b as f64 * increment;
        }
    }

    upsampled
        .into_iter()
        .skip(delay_point)
        .take(total_samples)
        .collect()
}
