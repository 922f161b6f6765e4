// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Fast Fractional Gaussian Noise
//!
//! Long-range dependent noise that perturbs the power-law adaptation drive.
//!
//! ## Algorithm (circulant embedding, Hurst index H = 0.9)
//!
//! ```text
//! n_samples = max(10, n_out / 1000 + 1)           internal (coarse) length
//! N         = next_pow2(2 · (n_samples − 1))      spectrum length
//! c[k]      = ½ · (|k+1|^2H − 2|k|^2H + |k−1|^2H)  autocovariance, k = 0..N/2..1
//! |Z|       = sqrt(Re(FFT(c)))                    must be real and ≥ 0
//! z         = |Z| · (zr1 + i·zr2)                  two Gaussian vectors
//! y         = Re(IFFT(z))[0..n_samples] · sqrt(N)
//! out       = σ(mu) · resample(y, ×1000)[0..n_out]
//! ```
//!
//! The spectral magnitude depends only on `n_samples`, so each generator caches the
//! last one it built and reuses it while the requested length maps to the same
//! internal sample count.

use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::{DspError, Result};
use crate::fft::{fft, ifft};
use crate::random::RandomSource;
use crate::resample::resample;

/// Hurst index of the generated noise
pub const HURST_INDEX: f64 = 0.9;

/// Seed applied by [`NoiseType::FixedSeed`] before drawing
pub const FIXED_NOISE_SEED: u64 = 42;

/// The noise is synthesized at 1/1000 of the target rate
const RESAMPLE_FACTOR: usize = 1000;

const MIN_INTERNAL_SAMPLES: usize = 10;

/// Reference Gaussian draws (real parts) reproducing a published MATLAB trace
const FIXED_MATLAB_REAL: [f64; 32] = [
    0.539001198446002, -0.333146282212077, 0.758784275258885, -0.960019229100215,
    -2.010902387858044, -0.014145783976321, 0.014846193555120, 0.179719933210648,
    -2.035475594737959, -0.357587732438863, 0.317062418711363, -1.266378348690577,
    1.038708704838524, -2.500059203501081, -1.252332731960022, 1.230339014018892,
    -0.504687908175280, 0.919640621536610, -0.234470350850954, 0.530697743839911,
    0.660825091280324, 0.855468294638247, -0.994629072636940, -2.231455213644026,
    0.318559022665053, 0.632957296094154, -0.151148210794462, -0.816060813871062,
    -1.014897009384865, 0.518977711821625, -0.059474326486106, 0.731639398082223,
];

/// Reference Gaussian draws (imaginary parts)
const FIXED_MATLAB_IMAG: [f64; 32] = [
    -0.638409626955796, -0.061701505688751, -0.218192062027145, 0.203235982652021,
    -0.098642410359283, 0.945333174032015, -0.801457072154293, -0.085099820744463,
    0.789397946964058, 1.226327097545239, -0.900142192575332, 0.424849252031244,
    -0.387098269639317, 1.170523150888439, -0.072882198808166, -1.612913245229722,
    -0.702699919458338, -0.283874347267996, 0.450432043543390, -0.259699095922555,
    0.409258053752079, 1.926425247717760, -0.945190729563938, -0.854589093975853,
    -0.219510861979715, 0.449824239893538, 0.257557798875416, 0.212844513926846,
    -0.087690563274934, 0.231624682299529, -0.563183338456413, -1.188876899529859,
];

/// How the two Gaussian vectors driving the noise are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoiseType {
    /// Both vectors are all ones (deterministic, no draws)
    Ones,
    /// Literal 32-element reference tables (regression fixture)
    FixedMatlab,
    /// Reseed the random source to a fixed constant, then draw
    FixedSeed,
    /// Draw from the random source as-is
    #[default]
    Random,
}

impl NoiseType {
    /// Configuration name of this variant
    pub fn name(&self) -> &'static str {
        match self {
            NoiseType::Ones => "ones",
            NoiseType::FixedMatlab => "fixed_matlab",
            NoiseType::FixedSeed => "fixed_seed",
            NoiseType::Random => "random",
        }
    }

    /// Parse a configuration name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ones" => Some(NoiseType::Ones),
            "fixed_matlab" => Some(NoiseType::FixedMatlab),
            "fixed_seed" => Some(NoiseType::FixedSeed),
            "random" => Some(NoiseType::Random),
            _ => None,
        }
    }
}

/// Heteroscedastic noise scale: 1 below 0.2 spikes/s, 10 below 20, else mu/2
#[inline]
pub fn noise_sigma(mu: f64) -> f64 {
    if mu < 0.2 {
        1.0
    } else if mu < 20.0 {
        10.0
    } else {
        mu / 2.0
    }
}

/// Internal (coarse) sample count for an output of `n_out` samples
#[inline]
pub fn internal_sample_count(n_out: usize) -> usize {
    (n_out / RESAMPLE_FACTOR + 1).max(MIN_INTERNAL_SAMPLES)
}

/// Square-rooted eigenvalues of the circulant embedding of the fGn autocovariance
///
/// # Errors
/// Returns [`DspError::NegativeSpectrum`] if any eigenvalue is negative.
pub fn spectral_magnitude(n_samples: usize) -> Result<Vec<f64>> {
    let n_fft = (2 * n_samples.saturating_sub(1)).max(1).next_power_of_two();
    let half = n_fft / 2;
    let exponent = 2.0 * HURST_INDEX;

    let autocovariance = |k: f64| {
        0.5 * ((k + 1.0).powf(exponent) - 2.0 * k.powf(exponent) + (k - 1.0).abs().powf(exponent))
    };

    // Lags 0..half-1 ascending, then half..1 descending
    let mut spectrum: Vec<Complex64> = (0..half)
        .chain((1..=half).rev())
        .take(n_fft)
        .map(|k| Complex64::new(autocovariance(k as f64), 0.0))
        .collect();

    fft(&mut spectrum)?;

    spectrum
        .iter()
        .enumerate()
        .map(|(index, v)| {
            if v.re < 0.0 {
                Err(DspError::NegativeSpectrum { index, value: v.re })
            } else {
                Ok(v.re.sqrt())
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct SpectrumCache {
    n_samples: usize,
    magnitude: Vec<f64>,
}

/// Fractional Gaussian noise generator with its own spectral cache
#[derive(Debug, Clone, Default)]
pub struct FractionalGaussianNoise {
    cache: Option<SpectrumCache>,
}

impl FractionalGaussianNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the cached spectrum, if one has been built
    pub fn cached_spectrum_len(&self) -> Option<usize> {
        self.cache.as_ref().map(|c| c.magnitude.len())
    }

    /// Generate `n_out` samples of scaled fGn
    ///
    /// # Arguments
    /// * `n_out` - Output length (exact)
    /// * `noise` - How the driving Gaussian vectors are produced
    /// * `mu` - Mean rate used to pick the noise scale (see [`noise_sigma`])
    /// * `rng` - Random source (reseeded by [`NoiseType::FixedSeed`])
    pub fn generate<R: RandomSource + ?Sized>(
        &mut self,
        n_out: usize,
        noise: NoiseType,
        mu: f64,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        if n_out == 0 {
            return Ok(Vec::new());
        }

        let n_samples = internal_sample_count(n_out);
        let magnitude = self.magnitude_for(n_samples)?;
        let n_fft = magnitude.len();

        let (zr1, zr2) = noise_vectors(n_fft, noise, rng);
        let mut z: Vec<Complex64> = magnitude
            .iter()
            .zip(zr1.iter().zip(zr2.iter()))
            .map(|(m, (re, im))| Complex64::new(m * re, m * im))
            .collect();
        ifft(&mut z)?;

        let root_n = (n_fft as f64).sqrt();
        let coarse: Vec<f64> = z.iter().take(n_samples).map(|v| v.re * root_n).collect();

        let mut output = resample(&coarse, RESAMPLE_FACTOR, 1)?;
        output.resize(n_out, 0.0);

        let sigma = noise_sigma(mu);
        for v in output.iter_mut() {
            *v *= sigma;
        }

        debug!(
            "[FGN] n_out={} internal={} spectrum={} sigma={} noise={}",
            n_out,
            n_samples,
            n_fft,
            sigma,
            noise.name()
        );
        Ok(output)
    }

    fn magnitude_for(&mut self, n_samples: usize) -> Result<&[f64]> {
        let stale = self
            .cache
            .as_ref()
            .map_or(true, |c| c.n_samples != n_samples);
        if stale {
            let magnitude = spectral_magnitude(n_samples)?;
            self.cache = Some(SpectrumCache {
                n_samples,
                magnitude,
            });
        }
        Ok(self
            .cache
            .as_ref()
            .map(|c| c.magnitude.as_slice())
            .unwrap_or(&[]))
    }
}

fn noise_vectors<R: RandomSource + ?Sized>(
    n: usize,
    noise: NoiseType,
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    match noise {
        NoiseType::Ones => (vec![1.0; n], vec![1.0; n]),
        NoiseType::FixedMatlab => {
            if n > FIXED_MATLAB_REAL.len() {
                warn!(
                    "[FGN] Reference noise table has {} entries, spectrum needs {}; cycling table",
                    FIXED_MATLAB_REAL.len(),
                    n
                );
            }
            let cycle = |table: &[f64; 32]| -> Vec<f64> {
                (0..n).map(|i| table[i % table.len()]).collect()
            };
            (cycle(&FIXED_MATLAB_REAL), cycle(&FIXED_MATLAB_IMAG))
        }
        NoiseType::FixedSeed => {
            rng.reseed(FIXED_NOISE_SEED);
            draw_pair(n, rng)
        }
        NoiseType::Random => draw_pair(n, rng),
    }
}

fn draw_pair<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
    let zr1 = rng.standard_normal_vec(n);
    let zr2 = rng.standard_normal_vec(n);
    (zr1, zr2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SynapseRng;

    #[test]
    fn test_internal_sample_count() {
        assert_eq!(internal_sample_count(1), 10);
        assert_eq!(internal_sample_count(5300), 10);
        assert_eq!(internal_sample_count(17_000), 18);
    }

    #[test]
    fn test_spectral_magnitude_length_and_sign() {
        let mag = spectral_magnitude(10).unwrap();
        assert_eq!(mag.len(), 32);
        assert!(mag.iter().all(|m| *m >= 0.0 && m.is_finite()));

        let mag = spectral_magnitude(18).unwrap();
        assert_eq!(mag.len(), 64);
        assert!(mag.iter().all(|m| *m > 0.3));
    }

    #[test]
    fn test_exact_output_length() {
        let mut fgn = FractionalGaussianNoise::new();
        let mut rng = SynapseRng::new(1);
        for n_out in [1, 999, 5300, 25_000] {
            let y = fgn.generate(n_out, NoiseType::Random, 100.0, &mut rng).unwrap();
            assert_eq!(y.len(), n_out);
            assert!(y.iter().all(|v| v.is_finite()));
        }
        assert!(fgn.generate(0, NoiseType::Random, 100.0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_sigma_scaling() {
        assert_eq!(noise_sigma(0.1), 1.0);
        assert_eq!(noise_sigma(0.2), 10.0);
        assert_eq!(noise_sigma(19.9), 10.0);
        assert_eq!(noise_sigma(100.0), 50.0);

        let mut fgn = FractionalGaussianNoise::new();
        let mut rng = SynapseRng::default();
        let low = fgn.generate(3000, NoiseType::Ones, 0.1, &mut rng).unwrap();
        let high = fgn.generate(3000, NoiseType::Ones, 100.0, &mut rng).unwrap();
        for (l, h) in low.iter().zip(high.iter()) {
            assert!((h - 50.0 * l).abs() <= 1e-9 * (1.0 + h.abs()));
        }
    }

    #[test]
    fn test_fixed_matlab_consumes_no_draws() {
        let mut fgn = FractionalGaussianNoise::new();
        let mut rng = SynapseRng::new(5);
        let a = fgn.generate(5300, NoiseType::FixedMatlab, 100.0, &mut rng).unwrap();
        let next = rng.uniform01();

        let mut fresh = SynapseRng::new(5);
        assert_eq!(next, fresh.uniform01());

        let b = FractionalGaussianNoise::new()
            .generate(5300, NoiseType::FixedMatlab, 100.0, &mut fresh)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_seed_ignores_caller_state() {
        let mut fgn = FractionalGaussianNoise::new();
        let a = fgn
            .generate(4000, NoiseType::FixedSeed, 50.0, &mut SynapseRng::new(1))
            .unwrap();
        let b = fgn
            .generate(4000, NoiseType::FixedSeed, 50.0, &mut SynapseRng::new(999))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_depends_on_seed() {
        let mut fgn = FractionalGaussianNoise::new();
        let a = fgn
            .generate(4000, NoiseType::Random, 50.0, &mut SynapseRng::new(1))
            .unwrap();
        let b = fgn
            .generate(4000, NoiseType::Random, 50.0, &mut SynapseRng::new(2))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_matches_fresh_computation() {
        let mut cached = FractionalGaussianNoise::new();
        let mut rng = SynapseRng::new(8);
        let _ = cached.generate(5300, NoiseType::Ones, 10.0, &mut rng).unwrap();
        assert_eq!(cached.cached_spectrum_len(), Some(32));

        let warm = cached.generate(5300, NoiseType::Ones, 10.0, &mut rng).unwrap();
        let cold = FractionalGaussianNoise::new()
            .generate(5300, NoiseType::Ones, 10.0, &mut rng)
            .unwrap();
        assert_eq!(warm, cold);

        let _ = cached.generate(40_000, NoiseType::Ones, 10.0, &mut rng).unwrap();
        assert_eq!(cached.cached_spectrum_len(), Some(128));
    }

    #[test]
    fn test_noise_type_names_round_trip() {
        for noise in [
            NoiseType::Ones,
            NoiseType::FixedMatlab,
            NoiseType::FixedSeed,
            NoiseType::Random,
        ] {
            assert_eq!(NoiseType::from_name(noise.name()), Some(noise));
        }
        assert_eq!(NoiseType::from_name("FIXED_MATLAB"), Some(NoiseType::FixedMatlab));
        assert_eq!(NoiseType::from_name("pink"), None);
    }
}
