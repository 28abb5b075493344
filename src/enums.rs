use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Anatomical plane selecting which spatial axis is held fixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Fixes Z, the plane spans X (width) and Y (height).
    #[default]
    Axial,
    /// Fixes Y, the plane spans X (width) and Z (height).
    Coronal,
    /// Fixes X, the plane spans Y (width) and Z (height).
    Sagittal,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Axial,
        Orientation::Sagittal,
        Orientation::Coronal,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Orientation::Axial => "axial",
            Orientation::Coronal => "coronal",
            Orientation::Sagittal => "sagittal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown orientation '{0}' (expected axial, sagittal or coronal)")]
pub struct ParseOrientationError(String);

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "axial" => Ok(Orientation::Axial),
            "coronal" => Ok(Orientation::Coronal),
            "sagittal" => Ok(Orientation::Sagittal),
            _ => Err(ParseOrientationError(s.to_string())),
        }
    }
}

/// Voxel encodings understood by the voxel store, keyed by NIfTI datatype code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i16)]
pub enum Datatype {
    UInt8 = 2,
    Int16 = 4,
    Int32 = 8,
    Float32 = 16,
    Float64 = 64,
}

impl Datatype {
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            2 => Some(Datatype::UInt8),
            4 => Some(Datatype::Int16),
            8 => Some(Datatype::Int32),
            16 => Some(Datatype::Float32),
            64 => Some(Datatype::Float64),
            _ => None,
        }
    }

    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Bytes occupied by one voxel.
    pub const fn byte_size(self) -> usize {
        match self {
            Datatype::UInt8 => 1,
            Datatype::Int16 => 2,
            Datatype::Int32 | Datatype::Float32 => 4,
            Datatype::Float64 => 8,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::UInt8 => "uint8",
            Datatype::Int16 => "int16",
            Datatype::Int32 => "int32",
            Datatype::Float32 => "float32",
            Datatype::Float64 => "float64",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}
