// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
CCF Region Mesh Tool

Exports surface meshes of Allen CCF brain regions plus a `legend.json`
manifest that a renderer can pick up (brain outline translucent black,
regions in their structure-tree colours).

Usage:
  cargo run --release --bin ccf_regions -- --region HPF --region CB --resolution 25

Download every configured resolution without building meshes:
  cargo run --release --bin ccf_regions -- --download-only

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use ccf_atlas::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, validate_config, CcfConfig,
    ConfigError,
};
use ccf_atlas::io::AtlasLoader;
use ccf_atlas::observability::{init_logging, CrateDebugFlags, LoggingOptions, DEBUG_ENV_VAR};
use ccf_atlas::pipeline::{export_regions, ExportPlan};
use ccf_atlas::structures::{Resolution, StructureId};
use ccf_atlas::surface::{MeshFormat, RegionSurfaceBuilder, SurfaceOptions};

/// Export Allen CCF brain regions as surface meshes
#[derive(Parser, Debug)]
#[command(name = "ccf_regions", version, author, long_about = None)]
struct Args {
    /// Configuration file (default: search for ccf_configuration.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding annotation_<res>.nrrd and the structure tree CSV
    #[arg(long)]
    atlas_folder: Option<PathBuf>,

    /// Atlas resolution in micrometers (10, 25, 50, 100)
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Region acronym, e.g. HPF (repeatable)
    #[arg(long = "region", value_name = "ACRONYM")]
    regions: Vec<String>,

    /// Structure ID, e.g. 1089 (repeatable)
    #[arg(long = "id", value_name = "ID")]
    ids: Vec<StructureId>,

    /// Output folder for meshes and legend.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Mesh format: ply or stl
    #[arg(short, long)]
    format: Option<String>,

    /// Gaussian smoothing (standard deviation in voxels) for the brain outline
    #[arg(long)]
    brain_smoothing: Option<f32>,

    /// Skip the brain outline mesh
    #[arg(long, default_value_t = false)]
    no_brain: bool,

    /// Download the configured resolutions and structure tree, then exit
    #[arg(long, default_value_t = false)]
    download_only: bool,

    /// Never download missing atlas files
    #[arg(long, default_value_t = false)]
    no_fetch: bool,

    /// Enable debug logging for a crate, e.g. ccf-io (repeatable)
    #[arg(long = "debug", value_name = "CRATE")]
    debug: Vec<String>,

    /// Enable debug logging for every crate
    #[arg(long, default_value_t = false)]
    debug_all: bool,
}

impl Args {
    /// Settings given on the command line, keyed the way `ccf-config` expects
    fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(folder) = &self.atlas_folder {
            overrides.insert("atlas_folder".to_string(), folder.display().to_string());
        }
        if let Some(resolution) = self.resolution {
            overrides.insert("resolution".to_string(), resolution.to_string());
        }
        if self.no_fetch {
            overrides.insert("fetch_missing".to_string(), "false".to_string());
        }
        if let Some(dir) = &self.output_dir {
            overrides.insert("output_dir".to_string(), dir.display().to_string());
        }
        if let Some(format) = &self.format {
            overrides.insert("export_format".to_string(), format.clone());
        }
        if let Some(std_dev) = self.brain_smoothing {
            overrides.insert("brain_smoothing_std".to_string(), std_dev.to_string());
        }
        overrides
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, used_defaults) = load_configuration(&args)?;

    let mut debug_flags = CrateDebugFlags::from_crate_names(&args.debug, args.debug_all);
    if let Ok(value) = std::env::var(DEBUG_ENV_VAR) {
        debug_flags.merge_env_value(&value);
    }
    let _log_guard = init_logging(&debug_flags, &logging_options(&config)?)?;

    if used_defaults {
        info!(target: "ccf-regions", "No configuration file found; using defaults");
    }

    let loader = atlas_loader(&config)?;

    if args.download_only {
        return download(&config, &loader);
    }

    let resolution = config.atlas.resolution()?;
    info!(
        target: "ccf-regions",
        "Atlas folder {} at {}",
        loader.folder().display(),
        resolution
    );

    let tree = loader
        .load_structure_tree()
        .context("Failed to load the structure tree")?;
    let volume = loader
        .load_atlas(resolution)
        .with_context(|| format!("Failed to load the {} annotation volume", resolution))?;
    info!(
        target: "ccf-regions",
        "Loaded {} structures and a {:?} label volume",
        tree.len(),
        volume.shape()
    );

    let plan = ExportPlan {
        acronyms: args.regions.clone(),
        ids: args.ids.clone(),
        include_brain: !args.no_brain,
        format: config.export.format.parse::<MeshFormat>()?,
        brain_color: config.export.brain_color.clone(),
        brain_opacity: config.export.brain_opacity,
        default_color: config.export.default_color.clone(),
    };
    if plan.acronyms.is_empty() && plan.ids.is_empty() && !plan.include_brain {
        warn!(target: "ccf-regions", "Nothing requested; writing an empty legend");
    }

    let builder = RegionSurfaceBuilder::new(SurfaceOptions {
        iso_level: config.surface.iso_level,
        brain_smoothing_std: config.surface.brain_smoothing_std,
        physical_spacing: config.surface.physical_spacing,
    });

    let legend = export_regions(&volume, &tree, &builder, &plan, &config.export.output_dir)?;
    println!(
        "Wrote {} meshes and legend to {}",
        legend.len(),
        config.export.output_dir.display()
    );

    Ok(())
}

/// File, environment and CLI settings, in rising precedence.
///
/// Falls back to defaults only when no file was asked for, either with
/// `--config` or `CCF_CONFIG_PATH`.
fn load_configuration(args: &Args) -> Result<(CcfConfig, bool)> {
    let overrides = args.config_overrides();

    let (config, used_defaults) = match load_config(args.config.as_deref(), Some(&overrides)) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound(_))
            if args.config.is_none() && std::env::var_os("CCF_CONFIG_PATH").is_none() =>
        {
            let mut config = CcfConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &overrides);
            (config, true)
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    validate_config(&config)?;
    Ok((config, used_defaults))
}

fn logging_options(config: &CcfConfig) -> Result<LoggingOptions> {
    Ok(LoggingOptions {
        level: config.logging.level.clone(),
        format: config
            .logging
            .format
            .parse()
            .map_err(anyhow::Error::msg)?,
        log_dir: config.logging.log_dir.clone(),
        retention_days: config.logging.retention_days,
        retention_runs: config.logging.retention_runs,
    })
}

fn atlas_loader(config: &CcfConfig) -> Result<AtlasLoader> {
    let loader = AtlasLoader::new(&config.atlas.folder)
        .with_structure_tree_file(config.atlas.structure_tree_file.clone());

    if !config.atlas.fetch_missing {
        return Ok(loader);
    }

    #[cfg(feature = "fetch")]
    {
        let fetcher = http_fetcher(config)?;
        Ok(loader.with_fetcher(Box::new(fetcher)))
    }

    #[cfg(not(feature = "fetch"))]
    {
        warn!(
            target: "ccf-regions",
            "fetch_missing is set but this build lacks the `fetch` feature"
        );
        Ok(loader)
    }
}

#[cfg(feature = "fetch")]
fn http_fetcher(config: &CcfConfig) -> Result<ccf_atlas::io::HttpAtlasFetcher> {
    use ccf_atlas::io::{AtlasSources, HttpAtlasFetcher};

    let sources = AtlasSources {
        annotation_base_url: config.fetch.annotation_base_url.clone(),
        structure_tree_url: config.fetch.structure_tree_url.clone(),
    };
    let timeout = std::time::Duration::from_secs(config.fetch.timeout_secs);
    Ok(HttpAtlasFetcher::new(sources, timeout)?)
}

fn download(config: &CcfConfig, loader: &AtlasLoader) -> Result<()> {
    let resolutions = config
        .fetch
        .resolutions
        .iter()
        .map(|&um| Resolution::from_micrometers(um))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "fetch")]
    {
        let fetcher = http_fetcher(config)?;
        ccf_atlas::io::download_atlas(
            &fetcher,
            loader.folder(),
            &resolutions,
            &config.atlas.structure_tree_file,
        )?;
        info!(
            target: "ccf-regions",
            "Atlas files for {} resolutions present in {}",
            resolutions.len(),
            loader.folder().display()
        );
        Ok(())
    }

    #[cfg(not(feature = "fetch"))]
    {
        let _ = (resolutions, loader);
        anyhow::bail!("--download-only needs a build with the `fetch` feature")
    }
}
