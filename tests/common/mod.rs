//! Shared helpers for building NIfTI-1 buffers in integration tests.

#![allow(dead_code)]

pub const VOX_OFFSET: usize = 352;

/// Single-file NIfTI-1 buffer with a `n+1` magic and data at offset 352.
pub fn nifti_bytes(dims: [i16; 3], datatype: i16, data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; VOX_OFFSET];
    bytes[0..4].copy_from_slice(&348i32.to_le_bytes());
    bytes[40..42].copy_from_slice(&3i16.to_le_bytes());
    for (axis, extent) in dims.iter().enumerate() {
        let at = 42 + axis * 2;
        bytes[at..at + 2].copy_from_slice(&extent.to_le_bytes());
    }
    bytes[70..72].copy_from_slice(&datatype.to_le_bytes());
    bytes[108..112].copy_from_slice(&(VOX_OFFSET as f32).to_le_bytes());
    bytes[344..348].copy_from_slice(b"n+1\0");
    bytes.extend_from_slice(data);
    bytes
}

pub fn float32_volume(dims: [i16; 3], values: impl IntoIterator<Item = f32>) -> Vec<u8> {
    let data: Vec<u8> = values.into_iter().flat_map(f32::to_le_bytes).collect();
    nifti_bytes(dims, 16, &data)
}

/// Volume whose value at `(x, y, z)` equals its linear index.
pub fn sequential_volume(dims: [i16; 3]) -> Vec<u8> {
    let count: usize = dims.iter().map(|&d| d as usize).product();
    float32_volume(dims, (0..count).map(|v| v as f32))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
