use bytemuck::allocation::pod_collect_to_vec;
use tracing::warn;

use crate::enums::Datatype;
use crate::header::HeaderDescriptor;

/// Voxel samples reinterpreted from the bytes following the header.
///
/// The encoding is resolved once here so reads never re-dispatch on the raw
/// datatype code.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelBuffer {
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl VoxelBuffer {
    /// Reinterpret `bytes[header.data_byte_offset..]` per the declared datatype.
    ///
    /// Unknown datatype codes are read as float32. Trailing bytes that do not
    /// fill a whole voxel are ignored.
    pub fn materialize(bytes: &[u8], header: &HeaderDescriptor) -> Self {
        let datatype = header.datatype().unwrap_or_else(|| {
            warn!(
                datatype_code = header.datatype_code,
                "unsupported NIfTI datatype, reading as float32"
            );
            Datatype::Float32
        });
        let data = bytes.get(header.data_byte_offset..).unwrap_or(&[]);
        let data = &data[..data.len() - data.len() % datatype.byte_size()];

        match datatype {
            Datatype::UInt8 => VoxelBuffer::UInt8(data.to_vec()),
            Datatype::Int16 => VoxelBuffer::Int16(
                pod_collect_to_vec::<u8, i16>(data)
                    .into_iter()
                    .map(i16::from_le)
                    .collect(),
            ),
            Datatype::Int32 => VoxelBuffer::Int32(
                pod_collect_to_vec::<u8, i32>(data)
                    .into_iter()
                    .map(i32::from_le)
                    .collect(),
            ),
            Datatype::Float32 => VoxelBuffer::Float32(
                pod_collect_to_vec::<u8, u32>(data)
                    .into_iter()
                    .map(|bits| f32::from_bits(u32::from_le(bits)))
                    .collect(),
            ),
            Datatype::Float64 => VoxelBuffer::Float64(
                pod_collect_to_vec::<u8, u64>(data)
                    .into_iter()
                    .map(|bits| f64::from_bits(u64::from_le(bits)))
                    .collect(),
            ),
        }
    }

    pub fn datatype(&self) -> Datatype {
        match self {
            VoxelBuffer::UInt8(_) => Datatype::UInt8,
            VoxelBuffer::Int16(_) => Datatype::Int16,
            VoxelBuffer::Int32(_) => Datatype::Int32,
            VoxelBuffer::Float32(_) => Datatype::Float32,
            VoxelBuffer::Float64(_) => Datatype::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VoxelBuffer::UInt8(v) => v.len(),
            VoxelBuffer::Int16(v) => v.len(),
            VoxelBuffer::Int32(v) => v.len(),
            VoxelBuffer::Float32(v) => v.len(),
            VoxelBuffer::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`, or 0 when the index lies outside the stored samples.
    ///
    /// Out-of-range reads are expected near the edges of a truncated volume
    /// and must not abort a slice.
    #[inline]
    pub fn value_at(&self, index: u64) -> f64 {
        let Ok(index) = usize::try_from(index) else {
            return 0.0;
        };
        let value = match self {
            VoxelBuffer::UInt8(v) => v.get(index).map(|&x| f64::from(x)),
            VoxelBuffer::Int16(v) => v.get(index).map(|&x| f64::from(x)),
            VoxelBuffer::Int32(v) => v.get(index).map(|&x| f64::from(x)),
            VoxelBuffer::Float32(v) => v.get(index).map(|&x| f64::from(x)),
            VoxelBuffer::Float64(v) => v.get(index).copied(),
        };
        value.unwrap_or(0.0)
    }
}
