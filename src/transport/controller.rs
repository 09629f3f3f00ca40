use std::time::Duration;

use thiserror::Error;

use crate::library::Track;

use super::backend::{BackendError, MediaBackend};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("volume {0} out of range (0-100)")]
    VolumeOutOfRange(u8),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

struct ActiveTrack {
    duration: Option<Duration>,
}

/// Translates session intents into calls on the media backend.
///
/// Owns the volume percentage and the knowledge of which track is loaded;
/// the sequencing decisions stay in the session.
pub struct TransportController<B: MediaBackend> {
    backend: B,
    volume: u8,
    active: Option<ActiveTrack>,
    playing: bool,
}

impl<B: MediaBackend> TransportController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            volume: 100,
            active: None,
            playing: false,
        }
    }

    /// Load `track` and start playing it. A backend failure (unopenable or
    /// undecodable file) is surfaced so the caller can skip the track.
    pub fn start(&mut self, track: &Track) -> Result<(), TransportError> {
        self.backend.load(&track.path)?;
        self.backend.play();
        self.active = Some(ActiveTrack {
            duration: track.duration,
        });
        self.playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.backend.pause();
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if self.active.is_some() {
            self.backend.play();
            self.playing = true;
        }
    }

    /// Unload the current track; its playback position is discarded.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.active = None;
        self.playing = false;
    }

    /// Map a 0-100 percentage linearly onto backend gain, exact at both
    /// endpoints.
    pub fn set_volume(&mut self, percent: u8) -> Result<(), TransportError> {
        if percent > 100 {
            return Err(TransportError::VolumeOutOfRange(percent));
        }
        self.volume = percent;
        self.backend.set_gain(f32::from(percent) / 100.0);
        Ok(())
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Jump to `seconds`, clamped to the current track's duration. With no
    /// active track there is no position to move, so this is a no-op.
    pub fn seek(&mut self, seconds: u64) -> Result<(), TransportError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(());
        };
        let mut target = Duration::from_secs(seconds);
        if let Some(total) = active.duration {
            target = target.min(total);
        }
        self.backend.seek(target)?;
        Ok(())
    }

    /// Elapsed seconds of the current track while playing, `None` while
    /// paused or stopped. Read on the runtime's periodic tick.
    pub fn poll_position(&self) -> Option<u64> {
        if self.playing {
            Some(self.backend.position().as_secs())
        } else {
            None
        }
    }

    /// True once a playing track has drained its audio.
    pub fn track_finished(&self) -> bool {
        self.playing && self.active.is_some() && !self.backend.is_busy()
    }
}
