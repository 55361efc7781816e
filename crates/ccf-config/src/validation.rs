// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and don't conflict with each other.

use ccf_structures::Resolution;

use crate::{CcfConfig, ConfigError, ConfigResult};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    UnsupportedResolution { field: String, value: u32 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedResolution { field, value } => {
                write!(
                    f,
                    "{} = {} is not an available atlas resolution (10, 25, 50, 100)",
                    field, value
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Supported resolutions
/// - Required fields
/// - Valid value ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &CcfConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_resolutions(config, &mut errors);
    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_resolutions(config: &CcfConfig, errors: &mut Vec<ConfigValidationError>) {
    if Resolution::from_micrometers(config.atlas.resolution).is_err() {
        errors.push(ConfigValidationError::UnsupportedResolution {
            field: "atlas.resolution".to_string(),
            value: config.atlas.resolution,
        });
    } else if !config.fetch.resolutions.contains(&config.atlas.resolution) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "atlas.resolution".to_string(),
            reason: format!(
                "{} is not listed in fetch.resolutions {:?}",
                config.atlas.resolution, config.fetch.resolutions
            ),
        });
    }

    for &value in &config.fetch.resolutions {
        if Resolution::from_micrometers(value).is_err() {
            errors.push(ConfigValidationError::UnsupportedResolution {
                field: "fetch.resolutions".to_string(),
                value,
            });
        }
    }
}

fn validate_required_fields(config: &CcfConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.atlas.folder.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "atlas.folder".to_string(),
        });
    }
    if config.atlas.structure_tree_file.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "atlas.structure_tree_file".to_string(),
        });
    }
    if config.atlas.fetch_missing {
        if config.fetch.annotation_base_url.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "fetch.annotation_base_url".to_string(),
            });
        }
        if config.fetch.structure_tree_url.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "fetch.structure_tree_url".to_string(),
            });
        }
    }
    if config.export.output_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "export.output_dir".to_string(),
        });
    }
}

fn validate_value_ranges(config: &CcfConfig, errors: &mut Vec<ConfigValidationError>) {
    let iso = config.surface.iso_level;
    if !(iso > 0.0 && iso < 1.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "surface.iso_level".to_string(),
            reason: format!("{} must lie strictly between 0 and 1", iso),
        });
    }

    let std_dev = config.surface.brain_smoothing_std;
    if !std_dev.is_finite() || std_dev < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "surface.brain_smoothing_std".to_string(),
            reason: format!("{} must be a non-negative number", std_dev),
        });
    }

    if config.fetch.timeout_secs == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "fetch.timeout_secs".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let format = config.export.format.to_lowercase();
    if format != "ply" && format != "stl" {
        errors.push(ConfigValidationError::InvalidValue {
            field: "export.format".to_string(),
            reason: format!("'{}' is not one of: ply, stl", config.export.format),
        });
    }

    let opacity = config.export.brain_opacity;
    if !(0.0..=1.0).contains(&opacity) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "export.brain_opacity".to_string(),
            reason: format!("{} must be between 0 and 1", opacity),
        });
    }

    for (field, color) in [
        ("export.brain_color", &config.export.brain_color),
        ("export.default_color", &config.export.default_color),
    ] {
        if !is_hex_color(color) {
            errors.push(ConfigValidationError::InvalidValue {
                field: field.to_string(),
                reason: format!("'{}' is not a #RRGGBB colour", color),
            });
        }
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let log_format = config.logging.format.to_lowercase();
    if log_format != "text" && log_format != "json" {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("'{}' is not one of: text, json", config.logging.format),
        });
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}
