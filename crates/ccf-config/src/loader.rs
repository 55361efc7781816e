// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{CcfConfig, ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the configuration file
///
/// Search order:
/// 1. `CCF_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ccf_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("CCF_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by CCF_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet CCF_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CcfConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CcfConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CCF_ATLAS_FOLDER` -> `atlas.folder`
/// - `CCF_ATLAS_RESOLUTION` -> `atlas.resolution`
/// - `CCF_FETCH_MISSING` -> `atlas.fetch_missing`
/// - `CCF_FETCH_TIMEOUT_SECS` -> `fetch.timeout_secs`
/// - `CCF_OUTPUT_DIR` -> `export.output_dir`
/// - `CCF_EXPORT_FORMAT` -> `export.format`
/// - `CCF_LOG_LEVEL` -> `logging.level`
/// - `CCF_LOG_DIR` -> `logging.log_dir`
pub fn apply_environment_overrides(config: &mut CcfConfig) {
    if let Ok(value) = env::var("CCF_ATLAS_FOLDER") {
        config.atlas.folder = PathBuf::from(value);
    }
    if let Ok(value) = env::var("CCF_ATLAS_RESOLUTION") {
        if let Ok(resolution) = value.parse::<u32>() {
            config.atlas.resolution = resolution;
        }
    }
    if let Ok(value) = env::var("CCF_FETCH_MISSING") {
        config.atlas.fetch_missing = parse_flag(&value);
    }
    if let Ok(value) = env::var("CCF_FETCH_TIMEOUT_SECS") {
        if let Ok(timeout) = value.parse::<u64>() {
            config.fetch.timeout_secs = timeout;
        }
    }
    if let Ok(value) = env::var("CCF_OUTPUT_DIR") {
        config.export.output_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("CCF_EXPORT_FORMAT") {
        config.export.format = value;
    }
    if let Ok(value) = env::var("CCF_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("CCF_LOG_DIR") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"resolution": "25", "output_dir": "out"}`)
pub fn apply_cli_overrides(config: &mut CcfConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("atlas_folder") {
        config.atlas.folder = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("resolution") {
        if let Ok(resolution) = value.parse::<u32>() {
            config.atlas.resolution = resolution;
        }
    }
    if let Some(value) = cli_args.get("fetch_missing") {
        config.atlas.fetch_missing = parse_flag(value);
    }
    if let Some(value) = cli_args.get("output_dir") {
        config.export.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("export_format") {
        config.export.format = value.clone();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("brain_smoothing_std") {
        if let Ok(std_dev) = value.parse::<f32>() {
            config.surface.brain_smoothing_std = std_dev;
        }
    }
}
