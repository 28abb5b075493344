use crate::volume::Volume;

use std::{fs, path::Path};
use thiserror::Error;
use tracing::{info, warn};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Volume buffer is empty")]
    EmptyBuffer,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a complete, uncompressed single-file NIfTI-1 buffer
    ///
    /// # Errors
    ///
    /// Returns error only for an empty buffer. Any non-empty buffer yields a
    /// volume, falling back to the default header when it cannot be parsed.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Volume, VolumeLoaderError> {
        if bytes.is_empty() {
            return Err(VolumeLoaderError::EmptyBuffer);
        }
        if bytes.starts_with(&GZIP_MAGIC) {
            warn!("buffer is gzip-compressed; it must be decompressed before loading");
        }

        let volume = Volume::from_bytes(bytes);
        let header = volume.header();
        info!(
            dims = ?header.spatial_dims(),
            num_dims = header.num_dims,
            datatype = %volume.voxels().datatype(),
            data_byte_offset = header.data_byte_offset,
            voxels = volume.voxels().len(),
            "loaded NIfTI volume"
        );
        Ok(volume)
    }

    /// Load a volume from a `.nii` file on disk
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let bytes = fs::read(path.as_ref())?;
        Self::load_from_bytes(&bytes)
    }
}
