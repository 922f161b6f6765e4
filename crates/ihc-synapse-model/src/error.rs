// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the synapse model

use ihc_synapse_dsp::DspError;

/// Synapse model errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynapseError {
    /// A parameter is outside its physiological range
    #[error("{name} = {value} is out of bounds [{lower}, {upper}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        lower: f64,
        upper: f64,
    },

    #[error("{name} has {actual} samples, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Numerical failure in the signal layer (fatal, never retried)
    #[error(transparent)]
    Dsp(#[from] DspError),
}

pub type Result<T> = core::result::Result<T, SynapseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message_names_bounds() {
        let err = SynapseError::InvalidParameter {
            name: "spontaneous_rate",
            value: 200.0,
            lower: 1e-4,
            upper: 180.0,
        };
        assert_eq!(
            err.to_string(),
            "spontaneous_rate = 200 is out of bounds [0.0001, 180]"
        );
    }

    #[test]
    fn test_dsp_error_converts() {
        let err: SynapseError = DspError::EmptySignal.into();
        assert_eq!(err, SynapseError::Dsp(DspError::EmptySignal));
    }
}
