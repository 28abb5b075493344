//! Per-viewer state: the loaded volume, current plane, slice and playback.
//!
//! A session is created when a viewer opens, reloaded whenever a new buffer
//! arrives and closed on teardown. It is mutated only through its methods,
//! from one owner at a time.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use web_time::Instant;

use crate::enums::{Orientation, PlaybackStatus};
use crate::fallback::{WAITING_REASON, render_placeholder};
use crate::header::HeaderDescriptor;
use crate::plane::{self, Dims, clamp_slice_index};
use crate::playback::{
    DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS, MIN_INTERVAL_MS, PlaybackScheduler, PlaybackState,
    next_slice,
};
use crate::slice_image::SliceImage;
use crate::volume::Volume;
use crate::volume_loader::{VolumeLoader, VolumeLoaderError};

/// The only failure surfaced to callers; everything else degrades in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("volume source unavailable: {reason}")]
    SourceUnavailable { reason: String },
}

impl ViewerError {
    pub fn source_unavailable(reason: impl Into<String>) -> Self {
        ViewerError::SourceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ViewerError::SourceUnavailable { reason } => reason,
        }
    }
}

impl From<VolumeLoaderError> for ViewerError {
    fn from(error: VolumeLoaderError) -> Self {
        ViewerError::source_unavailable(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_orientation: Orientation,
    /// Playback period in milliseconds, kept within `[50, 1000]`.
    pub playback_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_orientation: Orientation::Axial,
            playback_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document, e.g.
    ///
    /// ```
    /// # use nifti_volume::SessionConfig;
    /// let config = SessionConfig::from_toml_str(
    ///     "initial_orientation = \"coronal\"\nplayback_interval_ms = 100",
    /// ).unwrap();
    /// assert_eq!(config.playback_interval_ms, 100);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(source)?;
        Ok(config.validated())
    }

    /// Clamp out-of-range values instead of rejecting them.
    pub fn validated(mut self) -> Self {
        let interval = self
            .playback_interval_ms
            .clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        if interval != self.playback_interval_ms {
            warn!(
                requested = self.playback_interval_ms,
                clamped = interval,
                "playback interval out of range"
            );
            self.playback_interval_ms = interval;
        }
        self
    }
}

#[derive(Debug)]
pub struct ViewerSession {
    volume: Option<Volume>,
    failure: Option<ViewerError>,
    orientation: Orientation,
    slice_index: usize,
    playback: PlaybackScheduler,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ViewerSession {
    pub fn new(config: SessionConfig) -> Self {
        let config = config.validated();
        let mut session = Self {
            volume: None,
            failure: None,
            orientation: config.initial_orientation,
            slice_index: 0,
            playback: PlaybackScheduler::new(config.playback_interval_ms),
        };
        session.recenter();
        session
    }

    /// Install the outcome of an acquisition.
    ///
    /// Playback stops and the slice index is recentred either way. On failure
    /// the previous volume is released and later renders show a placeholder
    /// carrying the failure reason.
    pub fn load(&mut self, acquired: Result<Vec<u8>, ViewerError>) -> Result<(), ViewerError> {
        self.playback.stop();
        self.volume = None;

        let loaded = acquired
            .and_then(|bytes| VolumeLoader::load_from_bytes(&bytes).map_err(ViewerError::from));
        let result = match loaded {
            Ok(volume) => {
                self.volume = Some(volume);
                self.failure = None;
                Ok(())
            }
            Err(error) => {
                warn!(%error, "volume unavailable");
                self.failure = Some(error.clone());
                Err(error)
            }
        };
        self.recenter();
        result
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ViewerError> {
        let acquired = std::fs::read(path.as_ref())
            .map_err(|error| ViewerError::from(VolumeLoaderError::Io(error)));
        self.load(acquired)
    }

    /// Tear down: stop playback and release the volume.
    pub fn close(&mut self) {
        self.playback.stop();
        self.volume = None;
        debug!("viewer session closed");
    }

    pub fn volume(&self) -> Option<&Volume> {
        self.volume.as_ref()
    }

    pub fn failure(&self) -> Option<&ViewerError> {
        self.failure.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    /// Dims of the loaded volume, or of the default descriptor when none is.
    pub fn dims(&self) -> Dims {
        match &self.volume {
            Some(volume) => volume.dims(),
            None => Dims::from(HeaderDescriptor::default().spatial_dims()),
        }
    }

    pub fn slice_count(&self) -> usize {
        plane::plane_extent(self.orientation, self.dims()).slice_count
    }

    /// 1-based position caption, e.g. `"91 / 180"`.
    pub fn slice_label(&self) -> String {
        format!("{} / {}", self.slice_index + 1, self.slice_count())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        self.playback.stop();
        self.orientation = orientation;
        self.recenter();
    }

    pub fn set_slice(&mut self, index: isize) {
        self.slice_index = clamp_slice_index(index, self.slice_count());
    }

    /// Move by `delta` slices, stopping at either end.
    pub fn step(&mut self, delta: isize) {
        self.set_slice((self.slice_index as isize).saturating_add(delta));
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn playback_status(&self) -> PlaybackStatus {
        self.playback.status()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn play(&mut self) {
        self.playback.play(Instant::now());
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_playback(&mut self) {
        self.playback.toggle(Instant::now());
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.playback.set_interval_ms(interval_ms);
    }

    /// Advance one slice, wrapping to 0 after the last, if playing.
    /// Returns whether a new frame is due.
    pub fn tick(&mut self) -> bool {
        if !self.playback.is_playing() {
            return false;
        }
        self.slice_index = next_slice(self.slice_index, self.slice_count());
        debug!(slice = self.slice_index, "playback tick");
        true
    }

    /// Frame-loop entry point: tick if the scheduler says one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.playback.poll(now) && self.tick()
    }

    /// Image for the current orientation and slice.
    ///
    /// Without a volume this is the placeholder, labelled with the last
    /// acquisition failure or a waiting message.
    pub fn render(&self) -> SliceImage {
        match &self.volume {
            Some(volume) => volume.get_image_from_axis(self.slice_index, self.orientation),
            None => {
                let reason = self
                    .failure
                    .as_ref()
                    .map_or(WAITING_REASON, ViewerError::reason);
                render_placeholder(
                    self.slice_index,
                    self.slice_count(),
                    self.orientation,
                    reason,
                )
            }
        }
    }

    fn recenter(&mut self) {
        self.slice_index = self.slice_count() / 2;
    }
}
