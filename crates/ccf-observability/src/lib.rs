// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ccf-observability
//!
//! Logging setup shared by the CCF atlas crates and tools, with per-crate
//! debug flag support.
//!
//! ## Features
//! - `file-logging`: per-run log folders with per-crate JSON files

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known atlas crate names (and tracing targets) for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ccf-config",
    "ccf-hierarchy",
    "ccf-io",
    "ccf-surface",
    "ccf-regions",
];
