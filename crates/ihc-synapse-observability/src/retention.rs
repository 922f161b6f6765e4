// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Retention policy for per-run log folders
//!
//! Run folders are named `run_YYYYmmdd_HHMMSS` (UTC).

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Folder-name timestamp format
pub const RUN_FOLDER_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the run folder created at `now`
pub fn run_folder_name(now: DateTime<Utc>) -> String {
    format!("run_{}", now.format(RUN_FOLDER_FORMAT))
}

fn parse_run_folder(name: &str) -> Option<DateTime<Utc>> {
    let stamp = name.strip_prefix("run_")?;
    NaiveDateTime::parse_from_str(stamp, RUN_FOLDER_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Delete run folders older than `retention_days`, then the oldest ones beyond
/// `retention_runs`
///
/// Entries that are not run folders are left alone. Returns how many folders were
/// removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u32,
    retention_runs: usize,
) -> Result<usize> {
    cleanup_old_logs_at(base_log_dir, retention_days, retention_runs, Utc::now())
}

pub(crate) fn cleanup_old_logs_at(
    base_log_dir: &Path,
    retention_days: u32,
    retention_runs: usize,
    now: DateTime<Utc>,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }
    let cutoff = now - chrono::Duration::days(i64::from(retention_days));

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_folder);
        if let Some(dt) = stamp {
            runs.push((path, dt));
        }
    }

    // Newest first
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (index, (path, dt)) in runs.iter().enumerate() {
        if *dt < cutoff || index >= retention_runs {
            match std::fs::remove_dir_all(path) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
    Ok(removed)
}
