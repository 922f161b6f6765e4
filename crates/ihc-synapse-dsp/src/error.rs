// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for signal primitives

/// Errors raised by the DSP layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DspError {
    /// The radix-2 FFT only accepts power-of-two buffers
    #[error("FFT length must be a power of two, got {len}")]
    NotPowerOfTwo { len: usize },

    /// The circulant covariance embedding produced a negative eigenvalue.
    /// This is a construction bug, never a user error.
    #[error("fGn spectrum has negative real part {value} at bin {index}")]
    NegativeSpectrum { index: usize, value: f64 },

    #[error("Signal must not be empty")]
    EmptySignal,

    #[error("Invalid resampling factors: up={up}, down={down}")]
    InvalidResampleFactors { up: usize, down: usize },
}

pub type Result<T> = core::result::Result<T, DspError>;
