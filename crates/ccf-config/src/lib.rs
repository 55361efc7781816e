// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # CCF Atlas Configuration System
//!
//! Type-safe configuration for the atlas tools. Settings are layered, each
//! tier overriding the one before:
//! 1. `ccf_configuration.toml` (every section and key optional)
//! 2. `CCF_*` environment variables
//! 3. CLI arguments
//!
//! ```toml
//! [atlas]
//! folder = "ccf2017"
//! resolution = 25
//!
//! [export]
//! output_dir = "meshes"
//! format = "stl"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccf_config::{load_config, validate_config};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! validate_config(&config).expect("Invalid config");
//!
//! println!("Atlas folder: {}", config.atlas.folder.display());
//! println!("Resolution: {} µm", config.atlas.resolution);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name searched for on disk
pub const CONFIG_FILE_NAME: &str = "ccf_configuration.toml";

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
