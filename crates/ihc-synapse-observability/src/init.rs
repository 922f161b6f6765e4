// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always installed. With the `file-logging` feature and a
//! configured `log_dir`, a JSON log of the whole run is also written to a fresh
//! timestamped folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, ObservabilityConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging initialization result
///
/// Hold on to it for the lifetime of the program; file writers flush on drop.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the filter directive from the configured level and debug flags
///
/// `RUST_LOG`, when set, replaces the configured level as the default directive.
pub fn filter_directive(debug_flags: &CrateDebugFlags, config: &ObservabilityConfig) -> String {
    let base = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    debug_flags.to_filter_string(&base)
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Initialize the global tracing subscriber
///
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       └── ihc-synapse.log (JSON, file-logging feature only)
/// ```
///
/// # Errors
/// Fails on an invalid filter directive, an unwritable log folder, or when a global
/// subscriber is already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    config: &ObservabilityConfig,
) -> Result<LoggingGuard> {
    let directive = filter_directive(debug_flags, config);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(console_layer(
        config.format,
        EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid log filter '{}'", directive))?,
    ));

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    #[cfg(feature = "file-logging")]
    let log_dir = match &config.log_dir {
        Some(base_log_dir) => {
            let run_folder = base_log_dir.join(crate::retention::run_folder_name(chrono::Utc::now()));
            std::fs::create_dir_all(&run_folder).with_context(|| {
                format!("Failed to create log directory: {}", run_folder.display())
            })?;
            crate::retention::cleanup_old_logs(
                base_log_dir,
                config.retention_days,
                config.retention_runs,
            )?;

            let appender = tracing_appender::rolling::never(&run_folder, "ihc-synapse.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            file_guards.push(guard);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_filter(EnvFilter::try_new(&directive)?)
                    .boxed(),
            );
            Some(run_folder)
        }
        None => None,
    };
    #[cfg(not(feature = "file-logging"))]
    let log_dir = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::debug!("[OBSERVABILITY] Logging initialized with filter '{}'", directive);

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_combines_flags_and_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let flags = CrateDebugFlags::from_args(vec!["--debug-ihc-synapse-model".to_string()]);
        let config = ObservabilityConfig {
            level: "warn".to_string(),
            ..ObservabilityConfig::default()
        };
        let directive = filter_directive(&flags, &config);
        assert_eq!(directive, "ihc_synapse_model=debug,warn");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
