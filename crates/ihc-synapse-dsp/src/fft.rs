// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Radix-2 FFT
//!
//! Iterative decimation-in-frequency Cooley–Tukey transform, in place, followed by a
//! bit-reversal permutation so the output is in natural order.
//!
//! ```text
//! X[k] = Σ_n x[n] · e^(-2πi·nk/N)        (forward, unscaled)
//! x[n] = (1/N) · Σ_k X[k] · e^(+2πi·nk/N) (inverse)
//! ```
//!
//! The inverse is computed as conjugate → forward → conjugate → scale by 1/N.

use core::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{DspError, Result};

/// Forward FFT over a power-of-two buffer (in place)
///
/// # Errors
/// Returns [`DspError::NotPowerOfTwo`] if `x.len()` is not a power of two.
///
/// # Example
/// ```
/// use ihc_synapse_dsp::fft;
/// use num_complex::Complex64;
///
/// let mut x = vec![Complex64::new(1.0, 0.0); 4];
/// fft(&mut x).unwrap();
/// assert!((x[0].re - 4.0).abs() < 1e-12);
/// assert!(x[1].norm() < 1e-12);
/// ```
pub fn fft(x: &mut [Complex64]) -> Result<()> {
    let n = x.len();
    if !n.is_power_of_two() {
        return Err(DspError::NotPowerOfTwo { len: n });
    }
    if n == 1 {
        return Ok(());
    }

    // Butterflies
    let theta = PI / n as f64;
    let mut phi = Complex64::new(theta.cos(), -theta.sin());
    let mut k = n;
    while k > 1 {
        let span = k;
        k >>= 1;
        phi = phi * phi;
        let mut twiddle = Complex64::new(1.0, 0.0);
        for l in 0..k {
            let mut a = l;
            while a < n {
                let b = a + k;
                let (xa, xb) = (x[a], x[b]);
                x[a] = xa + xb;
                x[b] = (xa - xb) * twiddle;
                a += span;
            }
            twiddle *= phi;
        }
    }

    // Decimate
    let bits = n.trailing_zeros();
    for a in 0..n {
        let b = a.reverse_bits() >> (usize::BITS - bits);
        if b > a {
            x.swap(a, b);
        }
    }
    Ok(())
}

/// Inverse FFT over a power-of-two buffer (in place, scaled by 1/N)
///
/// # Errors
/// Returns [`DspError::NotPowerOfTwo`] if `x.len()` is not a power of two.
pub fn ifft(x: &mut [Complex64]) -> Result<()> {
    for v in x.iter_mut() {
        *v = v.conj();
    }
    fft(x)?;
    let scale = 1.0 / x.len() as f64;
    for v in x.iter_mut() {
        *v = v.conj() * scale;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dft(x: &[Complex64]) -> Vec<Complex64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                x.iter().enumerate().fold(Complex64::new(0.0, 0.0), |acc, (j, v)| {
                    let angle = -2.0 * PI * (j * k) as f64 / n as f64;
                    acc + v * Complex64::new(angle.cos(), angle.sin())
                })
            })
            .collect()
    }

    #[test]
    fn test_matches_naive_dft() {
        let x: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new((i as f64 * 0.37).sin(), (i as f64 * 1.3).cos()))
            .collect();
        let expected = naive_dft(&x);
        let mut actual = x.clone();
        fft(&mut actual).unwrap();
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).norm() < 1e-10, "{} vs {}", a, e);
        }
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut x = vec![Complex64::new(0.0, 0.0); 8];
        x[0] = Complex64::new(1.0, 0.0);
        fft(&mut x).unwrap();
        for v in &x {
            assert!((v - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_single_sample_is_identity() {
        let mut x = vec![Complex64::new(3.0, -2.0)];
        fft(&mut x).unwrap();
        assert_eq!(x[0], Complex64::new(3.0, -2.0));
        ifft(&mut x).unwrap();
        assert_eq!(x[0], Complex64::new(3.0, -2.0));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let mut x = vec![Complex64::new(0.0, 0.0); 12];
        assert_eq!(fft(&mut x), Err(DspError::NotPowerOfTwo { len: 12 }));
        assert_eq!(ifft(&mut x), Err(DspError::NotPowerOfTwo { len: 12 }));

        let mut empty: Vec<Complex64> = Vec::new();
        assert!(fft(&mut empty).is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ifft_inverts_fft(
            exponent in 0u32..10,
            seed in proptest::collection::vec(-100.0f64..100.0, 1024 * 2),
        ) {
            let n = 1usize << exponent;
            let original: Vec<Complex64> = (0..n)
                .map(|i| Complex64::new(seed[2 * i], seed[2 * i + 1]))
                .collect();
            let mut x = original.clone();
            fft(&mut x).unwrap();
            ifft(&mut x).unwrap();
            for (i, (a, b)) in x.iter().zip(original.iter()).enumerate() {
                prop_assert!((a - b).norm() < 1e-9, "sample {}: {} vs {}", i, a, b);
            }
        }

        #[test]
        fn parseval_holds(values in proptest::collection::vec(-10.0f64..10.0, 64)) {
            let mut x: Vec<Complex64> = values.iter().map(|&v| Complex64::new(v, 0.0)).collect();
            let time_energy: f64 = values.iter().map(|v| v * v).sum();
            fft(&mut x).unwrap();
            let freq_energy: f64 = x.iter().map(|v| v.norm_sqr()).sum::<f64>() / 64.0;
            prop_assert!((time_energy - freq_energy).abs() < 1e-8 * (1.0 + time_energy));
        }
    }
}
