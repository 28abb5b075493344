//! Timer-driven slice advancement.
//!
//! The scheduler holds no clock of its own: hosts pass `now` in, either from
//! a frame loop via [`PlaybackScheduler::poll`] or from the async
//! [`crate::player`] driver.

use tracing::debug;
use web_time::{Duration, Instant};

use crate::enums::PlaybackStatus;

pub const MIN_INTERVAL_MS: u64 = 50;
pub const MAX_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_INTERVAL_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub interval_ms: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

pub fn clamp_interval_ms(interval_ms: u64) -> u64 {
    interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

/// Next slice when looping: wraps from the last slice back to 0.
pub fn next_slice(current: usize, slice_count: usize) -> usize {
    if slice_count == 0 || current + 1 >= slice_count {
        0
    } else {
        current + 1
    }
}

#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    next_tick: Option<Instant>,
}

impl PlaybackScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            state: PlaybackState {
                is_playing: false,
                interval_ms: clamp_interval_ms(interval_ms),
            },
            next_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.state.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.state.interval_ms)
    }

    /// Start ticking; the first tick is due one interval after `now`.
    pub fn play(&mut self, now: Instant) {
        if self.state.is_playing {
            return;
        }
        self.state.is_playing = true;
        self.next_tick = Some(now + self.interval());
        debug!(interval_ms = self.state.interval_ms, "playback started");
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    /// Stop ticking. No tick is reported after this returns.
    pub fn stop(&mut self) {
        if self.state.is_playing {
            debug!("playback stopped");
        }
        self.state.is_playing = false;
        self.next_tick = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.state.is_playing {
            self.stop();
        } else {
            self.play(now);
        }
    }

    /// Change the tick period, clamped to `[50, 1000]` ms. Play state is kept;
    /// a pending tick stays due at its original deadline.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.state.interval_ms = clamp_interval_ms(interval_ms);
    }

    /// Report whether a tick is due at `now`.
    ///
    /// At most one tick is reported per call and the next deadline is taken
    /// from `now`, so a stalled host never receives a burst of ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if self.state.is_playing && now >= deadline => {
                self.next_tick = Some(now + self.interval());
                true
            }
            _ => false,
        }
    }
}
