// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for the CCF atlas tools. Defines the data structures shared by
//! the hierarchy resolver, the atlas loader and the surface builder.
//!
//! - [`StructureRecord`]: one row of the anatomical structure tree
//! - [`LabelVolume`]: the annotation volume, one structure ID per voxel
//! - [`RegionMask`]: boolean voxel selection derived from a label volume
//! - [`DescendantSet`]: a structure ID plus everything nested beneath it
//! - [`Resolution`]: the fixed set of published voxel sizes

mod descendant_set;
mod error;
mod resolution;
mod structure;
mod volume;

pub use descendant_set::DescendantSet;
pub use error::{AtlasDataError, AtlasDataResult};
pub use resolution::Resolution;
pub use structure::{RegionInfo, StructureId, StructureRecord, BRAIN_OUTLINE_ID};
pub use volume::{LabelVolume, RegionMask, VolumeShape};
