//! Builds NIfTI-1 byte buffers for tests.

use crate::header::{DEFAULT_VOX_OFFSET, MIN_HEADER_SIZE};

pub(crate) struct NiftiBuilder {
    dims: [i16; 3],
    num_dims: i16,
    time_points: i16,
    datatype: i16,
    vox_offset: f32,
    magic: [u8; 4],
    data: Vec<u8>,
}

impl NiftiBuilder {
    pub(crate) fn new(dims: [i16; 3]) -> Self {
        Self {
            dims,
            num_dims: 3,
            time_points: 1,
            datatype: 16,
            vox_offset: DEFAULT_VOX_OFFSET as f32,
            magic: *b"n+1\0",
            data: Vec::new(),
        }
    }

    pub(crate) fn num_dims(mut self, num_dims: i16) -> Self {
        self.num_dims = num_dims;
        self
    }

    pub(crate) fn time_points(mut self, time_points: i16) -> Self {
        self.time_points = time_points;
        self
    }

    pub(crate) fn datatype(mut self, datatype: i16) -> Self {
        self.datatype = datatype;
        self
    }

    pub(crate) fn vox_offset(mut self, vox_offset: f32) -> Self {
        self.vox_offset = vox_offset;
        self
    }

    pub(crate) fn magic(mut self, magic: [u8; 4]) -> Self {
        self.magic = magic;
        self
    }

    pub(crate) fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub(crate) fn f32_values(self, values: &[f32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.data(data)
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut bytes = vec![0u8; MIN_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&(MIN_HEADER_SIZE as i32).to_le_bytes());
        bytes[40..42].copy_from_slice(&self.num_dims.to_le_bytes());
        for (axis, extent) in self.dims.iter().enumerate() {
            let at = 42 + axis * 2;
            bytes[at..at + 2].copy_from_slice(&extent.to_le_bytes());
        }
        bytes[48..50].copy_from_slice(&self.time_points.to_le_bytes());
        bytes[70..72].copy_from_slice(&self.datatype.to_le_bytes());
        bytes[108..112].copy_from_slice(&self.vox_offset.to_le_bytes());
        bytes[344..348].copy_from_slice(&self.magic);

        let data_start = if self.vox_offset.is_finite() && self.vox_offset >= DEFAULT_VOX_OFFSET as f32 {
            self.vox_offset as usize
        } else {
            DEFAULT_VOX_OFFSET
        };
        bytes.resize(data_start, 0);
        bytes.extend_from_slice(&self.data);
        bytes
    }
}
