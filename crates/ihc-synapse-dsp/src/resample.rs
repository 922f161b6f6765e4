// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Rational-Factor Resampling
//!
//! Changes the sample rate of a signal by `up / down` with a polyphase FIR:
//!
//! ```text
//! 1. Conceptually insert (up - 1) zeros between samples
//! 2. Low-pass at min(π/up, π/down) with a Kaiser-windowed sinc (β = 5)
//! 3. Keep every `down`-th sample
//! ```
//!
//! The filter is never applied to the zero-stuffed signal: each output sample only
//! visits the input samples that land on non-zero taps, so the cost is
//! `O(output_len × taps / up)`. The filter group delay is compensated, so output sample
//! `m` is aligned with input time `m · down / up`.

use core::f64::consts::PI;

use tracing::trace;

use crate::error::{DspError, Result};

/// Filter half-length in units of `max(up, down)`
const HALF_LENGTH_FACTOR: usize = 10;

/// Kaiser window shape parameter
const KAISER_BETA: f64 = 5.0;

/// Resample `x` by the rational factor `up / down`
///
/// Output length is `ceil(x.len() · up / down)`.
///
/// # Errors
/// - [`DspError::InvalidResampleFactors`] if either factor is zero
/// - [`DspError::EmptySignal`] if `x` is empty
///
/// # Example
/// ```
/// use ihc_synapse_dsp::resample;
///
/// let x = vec![1.0; 40];
/// let y = resample(&x, 1, 4).unwrap();
/// assert_eq!(y.len(), 10);
/// ```
pub fn resample(x: &[f64], up: usize, down: usize) -> Result<Vec<f64>> {
    if up == 0 || down == 0 {
        return Err(DspError::InvalidResampleFactors { up, down });
    }
    if x.is_empty() {
        return Err(DspError::EmptySignal);
    }

    let g = gcd(up, down);
    let (up, down) = (up / g, down / g);
    if up == 1 && down == 1 {
        return Ok(x.to_vec());
    }

    let (taps, half) = design_filter(up, down);
    let n = x.len();
    let out_len = (n * up + down - 1) / down;
    trace!(
        "[RESAMPLE] up={} down={} taps={} in={} out={}",
        up,
        down,
        taps.len(),
        n,
        out_len
    );

    let mut y = Vec::with_capacity(out_len);
    for m in 0..out_len {
        // Position in the (virtual) zero-stuffed signal, shifted by the filter delay
        let u = m * down + half;
        let lo = if u >= taps.len() {
            (u - taps.len()) / up + 1
        } else {
            0
        };
        let hi = (u / up).min(n - 1);
        let mut acc = 0.0;
        if lo <= hi {
            for (i, xi) in x.iter().enumerate().take(hi + 1).skip(lo) {
                acc += xi * taps[u - i * up];
            }
        }
        y.push(acc);
    }
    Ok(y)
}

/// Kaiser-windowed sinc low-pass, scaled by `up` to preserve amplitude
fn design_filter(up: usize, down: usize) -> (Vec<f64>, usize) {
    let m = up.max(down);
    let half = HALF_LENGTH_FACTOR * m;
    let len = 2 * half + 1;
    let cutoff = 1.0 / (2.0 * m as f64);
    let norm = bessel_i0(KAISER_BETA);

    let taps = (0..len)
        .map(|i| {
            let t = i as f64 - half as f64;
            let sinc = if i == half {
                2.0 * cutoff
            } else {
                (2.0 * PI * cutoff * t).sin() / (PI * t)
            };
            let r = 2.0 * i as f64 / (len - 1) as f64 - 1.0;
            let window = bessel_i0(KAISER_BETA * (1.0 - r * r).max(0.0).sqrt()) / norm;
            up as f64 * sinc * window
        })
        .collect();
    (taps, half)
}

/// Zeroth-order modified Bessel function of the first kind (power series)
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        let r = x / (2.0 * k);
        term *= r * r;
        sum += term;
        if term < 1e-16 * sum {
            return sum;
        }
        k += 1.0;
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length() {
        let x = vec![0.5; 123];
        assert_eq!(resample(&x, 1, 10).unwrap().len(), 13);
        assert_eq!(resample(&x, 3, 1).unwrap().len(), 369);
        assert_eq!(resample(&x, 2, 4).unwrap().len(), 62);
    }

    #[test]
    fn test_identity_factor_copies() {
        let x = vec![1.0, -2.0, 3.5];
        assert_eq!(resample(&x, 5, 5).unwrap(), x);
    }

    #[test]
    fn test_upsampling_passes_through_original_samples() {
        let x: Vec<f64> = (0..12).map(|i| (0.2 * PI * i as f64).sin()).collect();
        let y = resample(&x, 1000, 1).unwrap();
        assert_eq!(y.len(), 12_000);
        for (j, xj) in x.iter().enumerate() {
            assert!((y[1000 * j] - xj).abs() < 1e-9, "sample {}", j);
        }
    }

    #[test]
    fn test_downsampling_slow_sine() {
        let x: Vec<f64> = (0..400).map(|i| (2.0 * PI * 0.01 * i as f64).sin()).collect();
        let y = resample(&x, 1, 10).unwrap();
        for j in 3..37 {
            assert!((y[j] - x[10 * j]).abs() < 0.01, "output {}: {} vs {}", j, y[j], x[10 * j]);
        }
    }

    #[test]
    fn test_constant_interior_preserved() {
        let x = vec![2.0; 2000];
        let y = resample(&x, 1, 10).unwrap();
        for v in &y[20..180] {
            assert!((v - 2.0).abs() < 0.01, "{}", v);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            resample(&[1.0], 0, 3),
            Err(DspError::InvalidResampleFactors { up: 0, down: 3 })
        );
        assert_eq!(resample(&[], 1, 3), Err(DspError::EmptySignal));
    }

    #[test]
    fn test_bessel_i0_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        assert!((bessel_i0(5.0) - 27.239_871_823_604_44).abs() < 1e-9);
    }
}
