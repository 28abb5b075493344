//! Index arithmetic for reslicing a volume along one of the three planes.
//!
//! Voxels are stored x-fastest: `idx = x + y*nx + z*nx*ny`. Every orientation
//! maps its plane coordinates onto `(x, y, z)` with one axis pinned to the
//! slice index and then goes through that single formula, so anisotropic
//! volumes reslice without distortion.

use crate::enums::Orientation;

/// Spatial extents of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Dims {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub const fn voxel_count(&self) -> u64 {
        self.nx as u64 * self.ny as u64 * self.nz as u64
    }
}

impl From<(usize, usize, usize)> for Dims {
    fn from((nx, ny, nz): (usize, usize, usize)) -> Self {
        Self { nx, ny, nz }
    }
}

/// Size of the 2-D plane for an orientation and how many such planes exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneExtent {
    pub width: usize,
    pub height: usize,
    pub slice_count: usize,
}

pub fn plane_extent(orientation: Orientation, dims: Dims) -> PlaneExtent {
    let Dims { nx, ny, nz } = dims;
    let (width, height, slice_count) = match orientation {
        // Looking down Z: X is width, Y is height
        Orientation::Axial => (nx, ny, nz),
        // Looking down Y: X is width, Z is height
        Orientation::Coronal => (nx, nz, ny),
        // Looking down X: Y is width, Z is height
        Orientation::Sagittal => (ny, nz, nx),
    };
    PlaneExtent {
        width,
        height,
        slice_count,
    }
}

/// Clamp any requested index into `[0, slice_count - 1]`.
pub fn clamp_slice_index(index: isize, slice_count: usize) -> usize {
    if index <= 0 || slice_count == 0 {
        return 0;
    }
    (index as usize).min(slice_count - 1)
}

/// Linear voxel offset of plane coordinate `(x, y)` on slice `slice_index`.
///
/// The slice index is re-clamped here; plane coordinates are not, so callers
/// may land outside the volume and rely on the voxel store reading 0.
#[inline]
pub fn linear_index(
    orientation: Orientation,
    slice_index: usize,
    x: usize,
    y: usize,
    dims: Dims,
) -> u64 {
    let slice_count = plane_extent(orientation, dims).slice_count;
    let s = slice_index.min(slice_count.saturating_sub(1)) as u64;
    let (x, y) = (x as u64, y as u64);
    let (vx, vy, vz) = match orientation {
        Orientation::Axial => (x, y, s),
        Orientation::Coronal => (x, s, y),
        Orientation::Sagittal => (s, x, y),
    };
    let (nx, ny) = (dims.nx as u64, dims.ny as u64);
    vx.saturating_add(vy.saturating_mul(nx))
        .saturating_add(vz.saturating_mul(nx.saturating_mul(ny)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: Dims = Dims::new(7, 5, 3);

    #[test]
    fn extents_per_orientation() {
        assert_eq!(
            plane_extent(Orientation::Axial, DIMS),
            PlaneExtent {
                width: 7,
                height: 5,
                slice_count: 3
            }
        );
        assert_eq!(
            plane_extent(Orientation::Coronal, DIMS),
            PlaneExtent {
                width: 7,
                height: 3,
                slice_count: 5
            }
        );
        assert_eq!(
            plane_extent(Orientation::Sagittal, DIMS),
            PlaneExtent {
                width: 5,
                height: 3,
                slice_count: 7
            }
        );
    }

    #[test]
    fn per_orientation_formulas() {
        let (nx, ny) = (7u64, 5u64);
        assert_eq!(
            linear_index(Orientation::Axial, 2, 3, 4, DIMS),
            3 + 4 * nx + 2 * nx * ny
        );
        assert_eq!(
            linear_index(Orientation::Coronal, 4, 6, 1, DIMS),
            6 + 4 * nx + nx * ny
        );
        assert_eq!(
            linear_index(Orientation::Sagittal, 5, 2, 2, DIMS),
            5 + 2 * nx + 2 * nx * ny
        );
    }

    #[test]
    fn slice_index_is_reclamped() {
        assert_eq!(
            linear_index(Orientation::Axial, 99, 0, 0, DIMS),
            linear_index(Orientation::Axial, 2, 0, 0, DIMS)
        );
    }

    #[test]
    fn huge_coordinates_saturate_instead_of_wrapping() {
        let dims = Dims::new(2048, 2048, 2048);
        assert_eq!(
            linear_index(Orientation::Axial, 0, 0, usize::MAX, dims),
            u64::MAX
        );
        assert_eq!(
            linear_index(Orientation::Coronal, 0, usize::MAX, usize::MAX, dims),
            u64::MAX
        );
        let voxels = crate::voxels::VoxelBuffer::Float32(vec![1.0; 8]);
        assert_eq!(voxels.value_at(u64::MAX), 0.0);
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_slice_index(-4, 10), 0);
        assert_eq!(clamp_slice_index(10, 10), 9);
        assert_eq!(clamp_slice_index(3, 10), 3);
        assert_eq!(clamp_slice_index(3, 0), 0);
    }

    #[test]
    fn every_voxel_is_covered_exactly_once() {
        for orientation in Orientation::ALL {
            let extent = plane_extent(orientation, DIMS);
            let mut seen = vec![0u8; DIMS.voxel_count() as usize];
            for s in 0..extent.slice_count {
                for y in 0..extent.height {
                    for x in 0..extent.width {
                        seen[linear_index(orientation, s, x, y, DIMS) as usize] += 1;
                    }
                }
            }
            assert!(seen.iter().all(|&n| n == 1), "{orientation}");
        }
    }
}
