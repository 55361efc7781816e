// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for the atlas tools
//!
//! Console output is always installed. With the `file-logging` feature and a
//! configured log directory, every run also gets its own folder of JSON logs,
//! one file per crate plus a combined one, pruned by the retention policy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const RUN_FOLDER_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Logging initialization result
///
/// Keep it alive for the life of the program; dropping it flushes file logs.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// The run folder receiving file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize logging with console output and, when configured, file output
///
/// File logs use a timestamped folder structure:
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       ├── ccf-io.log
///       ├── ccf-surface.log
///       └── ccf.log (combined)
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags layered over `options.level`
/// * `options` - Level, console format, log directory and retention policy
///
/// # Errors
///
/// Fails if the filter is malformed, the run folder cannot be created, or a
/// global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string_with_default(&options.level);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);
    let console_filter = env_filter(&filter)?;
    layers.push(match options.format {
        LogFormat::Text => console_layer.with_filter(console_filter).boxed(),
        LogFormat::Json => console_layer.json().with_filter(console_filter).boxed(),
    });

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    let mut log_dir = None;
    let mut file_logging_unavailable = false;

    if let Some(base_log_dir) = &options.log_dir {
        #[cfg(feature = "file-logging")]
        {
            let run_folder = create_run_folder(base_log_dir)?;
            cleanup_old_logs(base_log_dir, options.retention_days, options.retention_runs)?;
            let (file_layers, guards) = file_layers(&run_folder, &filter)?;
            layers.extend(file_layers);
            file_guards = guards;
            log_dir = Some(run_folder);
        }
        #[cfg(not(feature = "file-logging"))]
        {
            let _ = base_log_dir;
            file_logging_unavailable = true;
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    if file_logging_unavailable {
        tracing::warn!("log_dir is set but this build lacks the `file-logging` feature; logging to console only");
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

/// Initialize console logging at the default level
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingOptions::default())
}

fn env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter '{}'", filter))
}

#[cfg(feature = "file-logging")]
fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_FOLDER_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

#[cfg(feature = "file-logging")]
fn file_layers(
    run_folder: &Path,
    filter: &str,
) -> Result<(Vec<BoxedLayer>, Vec<tracing_appender::non_blocking::WorkerGuard>)> {
    use tracing_appender::rolling;

    let mut layers = Vec::new();
    let mut guards = Vec::new();

    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::never(run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);

        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                // Only this crate's events
                .with_filter(env_filter(&format!("off,{}=debug", crate_name))?)
                .boxed(),
        );
    }

    let combined_appender = rolling::never(run_folder, "ccf.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);
    guards.push(combined_guard);
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(combined_non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(env_filter(filter)?)
            .boxed(),
    );

    Ok((layers, guards))
}

/// Remove run folders under `base_log_dir` that fall outside the retention policy
///
/// Folders older than `retention_days` are removed first; of the rest, only
/// the `retention_runs` most recent survive. Entries not named
/// `run_YYYYMMDD_HHMMSS` are left alone. Returns the number of folders removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let timestamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_FOLDER_PREFIX))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, RUN_TIMESTAMP_FORMAT).ok());
        if let Some(naive) = timestamp {
            runs.push((path, naive.and_utc()));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let (expired, mut recent): (Vec<_>, Vec<_>) =
        runs.into_iter().partition(|(_, dt)| *dt < cutoff_date);
    let excess = recent.len().saturating_sub(retention_runs);

    let mut removed_count = 0;
    for (path, _) in expired.into_iter().chain(recent.drain(..excess)) {
        match std::fs::remove_dir_all(&path) {
            Ok(()) => removed_count += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed_count)
}
