//! NIfTI-1 header decoding.
//!
//! Only the handful of fixed-offset fields needed for slicing are read. The
//! decoder is total: anything that does not look like a usable 3-D or 4-D
//! volume is replaced by [`HeaderDescriptor::default`].

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;
use tracing::{debug, warn};

use crate::enums::Datatype;

/// Size of a NIfTI-1 header in bytes.
pub const MIN_HEADER_SIZE: usize = 348;
/// Header plus the 4-byte extension flag of a single-file `.nii`.
pub const DEFAULT_VOX_OFFSET: usize = 352;
/// Largest extent accepted on any declared axis before the header is
/// considered garbage.
pub const MAX_EXTENT: usize = 2048;

const DEFAULT_DIM_SIZES: [usize; 7] = [256, 256, 180, 1, 1, 1, 1];

mod offsets {
    pub const SIZEOF_HDR: usize = 0;
    pub const DIM: usize = 40;
    pub const DATATYPE: usize = 70;
    pub const VOX_OFFSET: usize = 108;
    pub const MAGIC: usize = 344;
}

#[derive(Debug, Error, PartialEq)]
pub enum HeaderError {
    #[error("buffer of {len} bytes is shorter than a NIfTI-1 header")]
    Truncated { len: usize },

    #[error("unsupported number of dimensions: {0}")]
    DimensionCount(i16),

    #[error("extent of axis {axis} out of range: {value}")]
    Extent { axis: usize, value: i16 },

    #[error("voxel data offset {0} points inside the header")]
    DataOffset(f32),
}

/// Structured view of the header fields used by the slicing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDescriptor {
    /// Number of used dimensions, 3 or 4.
    pub num_dims: u8,
    /// Extent of each axis; unused axes hold 1.
    pub dim_sizes: [usize; 7],
    /// Raw datatype code as stored in the file.
    pub datatype_code: i16,
    /// Byte offset where voxel data starts.
    pub data_byte_offset: usize,
    pub is_valid_magic: bool,
}

impl Default for HeaderDescriptor {
    /// Descriptor substituted for any malformed header: 256x256x180 float32.
    fn default() -> Self {
        Self {
            num_dims: 3,
            dim_sizes: DEFAULT_DIM_SIZES,
            datatype_code: Datatype::Float32.code(),
            data_byte_offset: DEFAULT_VOX_OFFSET,
            is_valid_magic: false,
        }
    }
}

impl HeaderDescriptor {
    /// Spatial extents `(nx, ny, nz)`.
    pub fn spatial_dims(&self) -> (usize, usize, usize) {
        (self.dim_sizes[0], self.dim_sizes[1], self.dim_sizes[2])
    }

    /// Declared voxel encoding, `None` when the code is not supported.
    pub fn datatype(&self) -> Option<Datatype> {
        Datatype::from_code(self.datatype_code)
    }
}

/// Decode a header, substituting the default descriptor on any failure.
pub fn decode_header(bytes: &[u8]) -> HeaderDescriptor {
    match parse_header(bytes) {
        Ok(header) => header,
        Err(error) => {
            warn!(%error, "malformed NIfTI header, using default descriptor");
            HeaderDescriptor::default()
        }
    }
}

/// Strict variant of [`decode_header`] reporting why a header was rejected.
pub fn parse_header(bytes: &[u8]) -> Result<HeaderDescriptor, HeaderError> {
    if bytes.len() < MIN_HEADER_SIZE {
        return Err(HeaderError::Truncated { len: bytes.len() });
    }

    let sizeof_hdr = LittleEndian::read_i32(&bytes[offsets::SIZEOF_HDR..]);
    if sizeof_hdr != MIN_HEADER_SIZE as i32 {
        debug!(sizeof_hdr, "unexpected sizeof_hdr");
    }

    let magic = &bytes[offsets::MAGIC..offsets::MAGIC + 4];
    let is_valid_magic = magic == b"n+1\0" || magic == b"ni1\0";
    if !is_valid_magic {
        warn!(?magic, "NIfTI-1 magic not found");
    }

    let num_dims = LittleEndian::read_i16(&bytes[offsets::DIM..]);
    if !(3..=4).contains(&num_dims) {
        return Err(HeaderError::DimensionCount(num_dims));
    }

    let mut dim_sizes = [1usize; 7];
    for (axis, size) in dim_sizes.iter_mut().enumerate().take(num_dims as usize) {
        let value = LittleEndian::read_i16(&bytes[offsets::DIM + 2 * (axis + 1)..]);
        if value <= 0 || value as usize > MAX_EXTENT {
            return Err(HeaderError::Extent {
                axis: axis + 1,
                value,
            });
        }
        *size = value as usize;
    }

    let datatype_code = LittleEndian::read_i16(&bytes[offsets::DATATYPE..]);
    let data_byte_offset = data_offset(LittleEndian::read_f32(&bytes[offsets::VOX_OFFSET..]))?;

    Ok(HeaderDescriptor {
        num_dims: num_dims as u8,
        dim_sizes,
        datatype_code,
        data_byte_offset,
        is_valid_magic,
    })
}

fn data_offset(vox_offset: f32) -> Result<usize, HeaderError> {
    if !vox_offset.is_finite() || vox_offset <= 0.0 {
        return Ok(DEFAULT_VOX_OFFSET);
    }
    let offset = vox_offset.floor() as usize;
    if offset < MIN_HEADER_SIZE {
        return Err(HeaderError::DataOffset(vox_offset));
    }
    Ok(offset)
}
