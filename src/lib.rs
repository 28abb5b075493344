//! # NIfTI-volume library
//!
//! This crate decodes single-file NIfTI-1 volumes (`.nii`) and reslices
//! them into 2-D grayscale images for interactive viewers
//!
//! A volume is read from a byte buffer that some other component has
//! already fetched and decompressed. Decoding never fails for a non-empty
//! buffer: a malformed header is replaced by a default 256x256x180 float32
//! descriptor, unknown datatypes are read as float32 and reads past the end
//! of the voxel data yield 0. The volume can be sliced in the three
//! different medical axes:
//!  - Axial
//!  - Coronal
//!  - Sagittal
//!
//!  Each slice is normalized to 0..=255 from a strided sample of the plane
//!  and returned as an RGBA buffer. When no volume is available a labelled
//!  placeholder is rendered instead, so a viewer never shows a blank frame.
//!
//!  [`ViewerSession`] holds the state of one viewer: the current volume,
//!  orientation, slice index and playback. Playback can be driven from a
//!  frame loop with [`ViewerSession::poll`] or from an async task with
//!  [`player::run`].
//!
//! Supported voxel encodings: uint8, int16, int32, float32 and float64.
//! NIfTI-2 headers and gzip-compressed input are not handled.
//!
//! # Examples
//!
//! ## Rendering the middle sagittal slice of a file
//!
//! ```no_run
//! # use nifti_volume::{Orientation, VolumeLoader};
//! let volume = VolumeLoader::load_from_file("brain.nii")
//!     .expect("should have read the file");
//! let center = volume.slice_count(Orientation::Sagittal) / 2;
//! let image = volume.get_image_from_axis(center, Orientation::Sagittal);
//! image.save("result.png").expect("should have written the image");
//! ```
//!
//! ## Driving a viewer session
//!
//! ```no_run
//! # use nifti_volume::{Orientation, SessionConfig, ViewerSession};
//! # let bytes: Vec<u8> = Vec::new();
//! let mut session = ViewerSession::new(SessionConfig::default());
//! if session.load(Ok(bytes)).is_err() {
//!     // the placeholder returned by `render` carries the reason
//! }
//! session.set_orientation(Orientation::Coronal);
//! session.play();
//! let frame = session.render();
//! println!("{}x{} at {}", frame.width(), frame.height(), session.slice_label());
//! ```

pub mod enums;
pub mod fallback;
pub mod header;
pub mod normalizer;
pub mod plane;
pub mod playback;
pub mod player;
pub mod session;
pub mod slice_image;
pub mod voxels;
pub mod volume;
pub mod volume_loader;

#[cfg(test)]
mod test_support;

pub use enums::{Datatype, Orientation, PlaybackStatus};
pub use fallback::render_placeholder;
pub use header::{HeaderDescriptor, decode_header};
pub use normalizer::normalize;
pub use plane::{Dims, PlaneExtent, linear_index, plane_extent};
pub use playback::{PlaybackScheduler, PlaybackState};
pub use session::{SessionConfig, ViewerError, ViewerSession};
pub use slice_image::SliceImage;
pub use voxels::VoxelBuffer;
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
