//! The seam between the controller and the audio output device.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(#[from] rodio::StreamError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Blocking-but-fast primitives of the audio output.
///
/// One track at a time: `load` replaces whatever was loaded before. All
/// methods are called from the single control thread; the device's own
/// mixer thread is opaque behind this trait.
pub trait MediaBackend {
    /// Open and decode `path`, leaving it loaded and paused at zero.
    fn load(&mut self, path: &Path) -> Result<(), BackendError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Unload the current track, discarding its playback position.
    fn stop(&mut self);
    /// Jump to `position` within the loaded track, keeping play/pause state.
    fn seek(&mut self, position: Duration) -> Result<(), BackendError>;
    /// Linear gain, 0.0 = silence, 1.0 = full.
    fn set_gain(&mut self, gain: f32);
    /// Elapsed time within the loaded track.
    fn position(&self) -> Duration;
    /// True while the loaded track still has audio queued.
    fn is_busy(&self) -> bool;
}
