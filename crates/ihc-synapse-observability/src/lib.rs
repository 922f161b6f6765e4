// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ihc-synapse-observability
//!
//! Logging infrastructure for the synapse model crates.
//!
//! Library crates only emit `tracing` events; this crate installs the subscriber
//! that formats them, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log files in timestamped per-run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;
pub mod retention;

pub use cli::*;
pub use config::*;
pub use init::*;
pub use retention::cleanup_old_logs;

/// Known synapse crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ihc-synapse",
    "ihc-synapse-config",
    "ihc-synapse-dsp",
    "ihc-synapse-model",
    "ihc-synapse-observability",
];
