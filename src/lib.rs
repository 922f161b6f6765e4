// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ihc-synapse - Inner-Hair-Cell to Auditory-Nerve Synapse Model
//!
//! Turns an inner-hair-cell receptor output sampled at the simulation rate into an
//! auditory-nerve fiber response: synaptic release rate, spike times, PSTH, and
//! analytic estimates of the instantaneous mean rate and variance.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ihc-synapse = "0.1"  # Default: model + console logging
//! ```
//!
//! ## Feature Flags
//! - **`observability`** (default): tracing subscriber setup driven by the `[logging]`
//!   config section
//! - **`file-logging`**: JSON log files in timestamped per-run folders
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ihc_synapse::prelude::*;
//!
//! let config = load_config(None, None)?;
//! let _guard = ihc_synapse::init_observability(&config)?;
//!
//! let ihc_out = vec![0.0; 50_000];
//! let params = SynapseParameters::from_config(&config, ihc_out.len())?;
//! let mut simulator = SynapseSimulator::from_seed(config.simulation.seed);
//! let output = simulator.simulate(&ihc_out, &params)?;
//! println!("{} spikes", output.spike_count());
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export member crates
pub use ihc_synapse_config as config;
pub use ihc_synapse_dsp as dsp;
pub use ihc_synapse_model as model;

#[cfg(feature = "observability")]
pub use ihc_synapse_observability as observability;

/// Convenience re-exports for the common load → simulate flow
pub mod prelude {
    pub use crate::config::{load_config, validate_config, SynapseConfig};
    pub use crate::dsp::{NoiseType, RandomSource, SynapseRng};
    pub use crate::model::{
        PowerLaw, SynapseError, SynapseOutput, SynapseParameters, SynapseSimulator,
        TrialSummary,
    };
}

/// Translate the `[logging]` section into the subscriber configuration
#[cfg(feature = "observability")]
pub fn observability_config(
    logging: &config::LoggingConfig,
) -> observability::ObservabilityConfig {
    observability::ObservabilityConfig {
        level: logging.level.clone(),
        format: observability::LogFormat::from_name(&logging.format),
        log_dir: logging.log_dir.clone(),
        retention_days: logging.retention_days,
        retention_runs: logging.retention_runs,
    }
}

/// Install the global tracing subscriber from a loaded configuration
///
/// Per-crate debug flags come from the command line (`--debug-<crate>`) and the
/// `IHC_SYNAPSE_DEBUG` environment variable. Keep the returned guard alive for the
/// duration of the run.
///
/// # Errors
/// Fails when a subscriber is already installed or the log folder cannot be created.
#[cfg(feature = "observability")]
pub fn init_observability(
    config: &config::SynapseConfig,
) -> anyhow::Result<observability::LoggingGuard> {
    let debug_flags = observability::parse_debug_flags();
    let guard = observability::init_logging(&debug_flags, &observability_config(&config.logging))?;
    tracing::info!(
        "[SYNAPSE] ihc-synapse v{} (cf={} Hz, spont={} /s, power law {})",
        VERSION,
        config.model.cf,
        config.model.spontaneous_rate,
        config.model.power_law
    );
    Ok(guard)
}
