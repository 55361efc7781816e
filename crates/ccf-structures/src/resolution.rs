// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{AtlasDataError, AtlasDataResult};

/// Isotropic voxel size of a published annotation volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Resolution {
    Um10,
    Um25,
    Um50,
    #[default]
    Um100,
}

impl Resolution {
    /// Every published resolution, finest first
    pub const ALL: [Resolution; 4] = [
        Resolution::Um10,
        Resolution::Um25,
        Resolution::Um50,
        Resolution::Um100,
    ];

    pub fn from_micrometers(um: u32) -> AtlasDataResult<Self> {
        match um {
            10 => Ok(Resolution::Um10),
            25 => Ok(Resolution::Um25),
            50 => Ok(Resolution::Um50),
            100 => Ok(Resolution::Um100),
            other => Err(AtlasDataError::UnsupportedResolution(other)),
        }
    }

    pub fn micrometers(self) -> u32 {
        match self {
            Resolution::Um10 => 10,
            Resolution::Um25 => 25,
            Resolution::Um50 => 50,
            Resolution::Um100 => 100,
        }
    }

    /// File name of the annotation volume, e.g. `annotation_25.nrrd`
    pub fn annotation_file_name(self) -> String {
        format!("annotation_{}.nrrd", self.micrometers())
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}µm", self.micrometers())
    }
}

impl TryFrom<u32> for Resolution {
    type Error = AtlasDataError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Resolution::from_micrometers(value)
    }
}

impl From<Resolution> for u32 {
    fn from(value: Resolution) -> Self {
        value.micrometers()
    }
}
