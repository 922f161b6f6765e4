// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # IHC Synapse Signal Primitives
//!
//! Pure numerical building blocks shared by the synapse model:
//! - **FFT**: in-place iterative radix-2 transform and its inverse
//! - **Random**: the injectable pseudorandom source used by every stochastic stage
//! - **Fractional Gaussian noise**: spectral synthesis of long-range dependent noise
//! - **Resample**: rational-factor polyphase resampling between time bases
//! - **Stats**: small vector statistics used by the PSTH/trial aggregation
//!
//! Nothing in this crate holds global state. Randomness always comes from a
//! caller-owned [`RandomSource`], and the fGn spectral cache is owned by the
//! [`FractionalGaussianNoise`] instance that built it.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod fft;
pub mod fgn;
pub mod random;
pub mod resample;
pub mod stats;

pub use error::{DspError, Result};
pub use fft::{fft, ifft};
pub use fgn::{FractionalGaussianNoise, NoiseType, HURST_INDEX};
pub use random::{RandomSource, SynapseRng, DEFAULT_SEED};
pub use resample::resample;
