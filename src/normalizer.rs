//! Converts one plane of raw voxel values into a grayscale RGBA image.

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::enums::Orientation;
use crate::plane::{Dims, linear_index, plane_extent};
use crate::slice_image::SliceImage;
use crate::voxels::VoxelBuffer;

/// Every n-th plane coordinate is sampled when estimating the value range.
pub const SAMPLE_STRIDE: usize = 5;

/// Range used when sampling finds nothing usable.
pub const DEFAULT_RANGE: IntensityRange = IntensityRange {
    min: 0.0,
    max: 255.0,
};

/// Window mapped linearly onto 0..=255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityRange {
    pub min: f64,
    pub max: f64,
}

impl IntensityRange {
    /// Estimate the range of finite values on a strided grid of `plane`.
    ///
    /// Falls back to [`DEFAULT_RANGE`] when no finite sample exists or all
    /// samples are equal.
    pub fn sample(plane: &Array2<f64>) -> Self {
        let (height, width) = plane.dim();
        let rows = sample_positions(height);
        let cols = sample_positions(width);
        let sampled = plane.select(Axis(0), &rows).select(Axis(1), &cols);

        let (min, max) = sampled
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if !min.is_finite() || !max.is_finite() || min == max {
            return DEFAULT_RANGE;
        }
        Self { min, max }
    }

    /// `clamp(round((value - min) / (max - min) * 255), 0, 255)`; non-finite values map to 0.
    #[inline]
    pub fn intensity(&self, value: f64) -> u8 {
        if !value.is_finite() {
            return 0;
        }
        let scaled = ((value - self.min) / (self.max - self.min) * 255.0).round();
        scaled.clamp(0.0, 255.0) as u8
    }
}

/// Stride positions along an axis of length `len`, plus the last coordinate.
fn sample_positions(len: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..len).step_by(SAMPLE_STRIDE).collect();
    match positions.last() {
        Some(&last) if last != len - 1 => positions.push(len - 1),
        _ => {}
    }
    positions
}

/// Gather the raw values of one plane, rows along the plane height.
pub fn extract_plane(
    voxels: &VoxelBuffer,
    orientation: Orientation,
    slice_index: usize,
    dims: Dims,
) -> Array2<f64> {
    let extent = plane_extent(orientation, dims);
    Array2::from_shape_fn((extent.height, extent.width), |(y, x)| {
        voxels.value_at(linear_index(orientation, slice_index, x, y, dims))
    })
}

/// Normalize a plane of raw values into an opaque grayscale image.
pub fn plane_to_image(plane: &Array2<f64>) -> SliceImage {
    let (height, width) = plane.dim();
    let range = IntensityRange::sample(plane);
    debug!(min = range.min, max = range.max, width, height, "normalizing plane");

    let pixels: Vec<u8> = plane
        .into_par_iter()
        .flat_map_iter(|&value| {
            let g = range.intensity(value);
            [g, g, g, u8::MAX]
        })
        .collect();

    SliceImage::from_raw(width as u32, height as u32, pixels)
        .unwrap_or_else(|| SliceImage::blank(width as u32, height as u32))
}

/// Full normalization step: reslice `voxels` and map the plane to RGBA.
pub fn normalize(
    voxels: &VoxelBuffer,
    orientation: Orientation,
    slice_index: usize,
    dims: Dims,
) -> SliceImage {
    plane_to_image(&extract_plane(voxels, orientation, slice_index, dims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sequential_volume(dims: Dims) -> VoxelBuffer {
        VoxelBuffer::Float32((0..dims.voxel_count()).map(|v| v as f32).collect())
    }

    #[test]
    fn sample_positions_include_last() {
        assert_eq!(sample_positions(4), vec![0, 3]);
        assert_eq!(sample_positions(11), vec![0, 5, 10]);
        assert_eq!(sample_positions(12), vec![0, 5, 10, 11]);
        assert_eq!(sample_positions(1), vec![0]);
        assert!(sample_positions(0).is_empty());
    }

    #[test]
    fn intensity_mapping() {
        let range = IntensityRange {
            min: 10.0,
            max: 20.0,
        };
        assert_eq!(range.intensity(10.0), 0);
        assert_eq!(range.intensity(20.0), 255);
        assert_eq!(range.intensity(15.0), 128);
        assert_eq!(range.intensity(-100.0), 0);
        assert_eq!(range.intensity(1e9), 255);
        assert_eq!(range.intensity(f64::NAN), 0);
        assert_eq!(range.intensity(f64::INFINITY), 0);
    }

    #[test]
    fn sampling_ignores_non_finite_values() {
        let plane = array![[f64::NAN, 4.0], [f64::INFINITY, -2.0]];
        assert_eq!(
            IntensityRange::sample(&plane),
            IntensityRange {
                min: -2.0,
                max: 4.0
            }
        );
    }

    #[test]
    fn degenerate_ranges_use_default() {
        assert_eq!(IntensityRange::sample(&Array2::zeros((6, 6))), DEFAULT_RANGE);
        assert_eq!(
            IntensityRange::sample(&Array2::from_elem((3, 3), f64::NAN)),
            DEFAULT_RANGE
        );
        assert_eq!(IntensityRange::sample(&Array2::zeros((0, 0))), DEFAULT_RANGE);
    }

    #[test]
    fn output_length_matches_plane() {
        let dims = Dims::new(9, 4, 6);
        let voxels = sequential_volume(dims);
        for orientation in Orientation::ALL {
            let extent = plane_extent(orientation, dims);
            let image = normalize(&voxels, orientation, 1, dims);
            assert_eq!(image.width() as usize, extent.width);
            assert_eq!(image.height() as usize, extent.height);
            assert_eq!(image.pixels().len(), extent.width * extent.height * 4);
        }
    }

    #[test]
    fn missing_voxels_degrade_without_aborting() {
        let dims = Dims::new(4, 4, 4);
        let voxels = VoxelBuffer::Float32(vec![100.0; 20]);
        let image = normalize(&voxels, Orientation::Axial, 3, dims);
        assert_eq!(image.pixels().len(), 4 * 4 * 4);
        assert!(image.pixels().chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn normalize_is_idempotent() {
        let dims = Dims::new(13, 11, 7);
        let voxels = sequential_volume(dims);
        let first = normalize(&voxels, Orientation::Sagittal, 4, dims);
        let second = normalize(&voxels, Orientation::Sagittal, 4, dims);
        assert_eq!(first, second);
    }
}
