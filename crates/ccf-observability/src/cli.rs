// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-ccf-io`, `--debug-ccf-surface`, etc.
//! to raise one crate's log level to debug.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable listing crates to debug (`all` or comma-separated names)
pub const DEBUG_ENV_VAR: &str = "CCF_DEBUG";

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use ccf_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-ccf-io".to_string()]);
/// assert!(flags.is_enabled("ccf-io"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }
        flags
    }

    /// Build flags from crate names already extracted by an argument parser
    pub fn from_crate_names<I, S>(names: I, all: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = CrateDebugFlags::default();
        for name in names {
            flags.enable(name.as_ref());
        }
        if all {
            flags.enable_all();
        }
        flags
    }

    /// Merge a `CCF_DEBUG`-style value into the flags
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            self.enable(crate_name);
        }
    }

    fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Get all enabled crates
    pub fn enabled_crates(&self) -> Vec<&String> {
        self.enabled_crates.keys().collect()
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level filter for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter from debug flags with `info` as the default level
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_default("info")
    }

    /// Create a tracing filter from debug flags
    ///
    /// Format: `"ccf-io=debug,ccf-surface=debug,warn"`; just `default_level`
    /// if no crate is enabled.
    pub fn to_filter_string_with_default(&self, default_level: &str) -> String {
        let mut crate_names: Vec<&String> = self.enabled_crates.keys().collect();
        crate_names.sort();

        let mut filters: Vec<String> = crate_names
            .into_iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

/// Helper function to parse debug flags from the process arguments and environment
///
/// Checks both command-line arguments and the `CCF_DEBUG` environment variable.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var(DEBUG_ENV_VAR) {
        flags.merge_env_value(&env_var);
    }
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  CCF_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  CCF_DEBUG=all                             Enable debug for all crates

Examples:
  --debug-ccf-io
  --debug-ccf-io --debug-ccf-surface
  CCF_DEBUG=ccf-hierarchy,ccf-surface
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-ccf-io".to_string()]);
        assert!(flags.is_enabled("ccf-io"));
        assert!(!flags.is_enabled("ccf-surface"));
    }

    #[test]
    fn test_non_debug_args_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "ccf_regions".to_string(),
            "--region".to_string(),
            "CH".to_string(),
        ]);
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string(), "info");
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_crate_names_and_env_value() {
        let mut flags = CrateDebugFlags::from_crate_names(["ccf-surface"], false);
        flags.merge_env_value("ccf-io, ccf-hierarchy,");
        assert!(flags.is_enabled("ccf-surface"));
        assert!(flags.is_enabled("ccf-io"));
        assert!(flags.is_enabled("ccf-hierarchy"));
        assert_eq!(flags.enabled_crates().len(), 3);

        let mut all = CrateDebugFlags::default();
        all.merge_env_value("all");
        assert_eq!(all.enabled_crates().len(), KNOWN_CRATES.len());
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-ccf-surface".to_string(),
            "--debug-ccf-io".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string_with_default("warn"),
            "ccf-io=debug,ccf-surface=debug,warn"
        );
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-ccf-io".to_string()]);
        assert_eq!(flags.log_level("ccf-io"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("ccf-surface"), tracing::Level::INFO);
    }
}
