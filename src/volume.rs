use ndarray::Array2;

use crate::enums::Orientation;
use crate::header::{HeaderDescriptor, decode_header};
use crate::normalizer;
use crate::plane::{self, Dims, PlaneExtent};
use crate::slice_image::SliceImage;
use crate::voxels::VoxelBuffer;

/// A decoded volume: header descriptor plus its voxel samples.
///
/// Immutable once built; loading another file replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Volume {
    header: HeaderDescriptor,
    voxels: VoxelBuffer,
}

impl Volume {
    pub fn new(header: HeaderDescriptor, voxels: VoxelBuffer) -> Self {
        Self { header, voxels }
    }

    /// Decode the header and materialize voxels from a complete `.nii` buffer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let header = decode_header(bytes);
        let voxels = VoxelBuffer::materialize(bytes, &header);
        Self::new(header, voxels)
    }

    pub fn header(&self) -> &HeaderDescriptor {
        &self.header
    }

    pub fn voxels(&self) -> &VoxelBuffer {
        &self.voxels
    }

    /// Spatial dimensions `(nx, ny, nz)`.
    pub fn dims(&self) -> Dims {
        Dims::from(self.header.spatial_dims())
    }

    pub fn plane_extent(&self, orientation: Orientation) -> PlaneExtent {
        plane::plane_extent(orientation, self.dims())
    }

    pub fn slice_count(&self, orientation: Orientation) -> usize {
        self.plane_extent(orientation).slice_count
    }

    /// Raw voxel values of one plane, shaped `(height, width)`.
    ///
    /// `index` is clamped to the valid slice range.
    pub fn get_slice_from_axis(&self, index: usize, orientation: Orientation) -> Array2<f64> {
        normalizer::extract_plane(&self.voxels, orientation, index, self.dims())
    }

    /// Reslice and normalize one plane into an RGBA image.
    pub fn get_image_from_axis(&self, index: usize, orientation: Orientation) -> SliceImage {
        let slice = self.get_slice_from_axis(index, orientation);
        normalizer::plane_to_image(&slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::NiftiBuilder;

    fn sequential(dims: [i16; 3]) -> Volume {
        let count = dims.iter().map(|&d| d as usize).product::<usize>();
        let values: Vec<f32> = (0..count).map(|v| v as f32).collect();
        Volume::from_bytes(&NiftiBuilder::new(dims).f32_values(&values).build())
    }

    #[test]
    fn slice_counts() {
        let volume = sequential([5, 6, 7]);
        assert_eq!(volume.dims(), Dims::new(5, 6, 7));
        assert_eq!(volume.slice_count(Orientation::Axial), 7);
        assert_eq!(volume.slice_count(Orientation::Coronal), 6);
        assert_eq!(volume.slice_count(Orientation::Sagittal), 5);
    }

    #[test]
    fn extracts_coronal_plane() {
        let volume = sequential([3, 4, 2]);
        let plane = volume.get_slice_from_axis(1, Orientation::Coronal);
        assert_eq!(plane.dim(), (2, 3));
        // x + 1*nx + z*nx*ny
        assert_eq!(plane[[0, 0]], 3.0);
        assert_eq!(plane[[1, 2]], 2.0 + 3.0 + 12.0);
    }

    #[test]
    fn extracts_sagittal_plane() {
        let volume = sequential([3, 4, 2]);
        let plane = volume.get_slice_from_axis(2, Orientation::Sagittal);
        assert_eq!(plane.dim(), (2, 4));
        // 2 + y*nx + z*nx*ny
        assert_eq!(plane[[0, 3]], 2.0 + 9.0);
        assert_eq!(plane[[1, 1]], 2.0 + 3.0 + 12.0);
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let volume = sequential([4, 4, 4]);
        assert_eq!(
            volume.get_slice_from_axis(50, Orientation::Axial),
            volume.get_slice_from_axis(3, Orientation::Axial)
        );
    }

    #[test]
    fn malformed_buffer_still_renders() {
        let volume = Volume::from_bytes(&[7u8; 500]);
        assert_eq!(volume.dims(), Dims::new(256, 256, 180));
        let image = volume.get_image_from_axis(90, Orientation::Axial);
        assert_eq!((image.width(), image.height()), (256, 256));
    }
}
