use std::fs;
use std::io;
use std::path::PathBuf;

use log::warn;
use thiserror::Error;

use crate::config::PresenceSettings;
use crate::library::Track;

use super::event::NowPlayingEvent;

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("presence consumer unavailable: {0}")]
    Unavailable(String),
}

/// Where the built status event gets handed off. The far side of the sink
/// (D-Bus, a socket, a test recorder) is an external collaborator.
pub trait PresenceSink {
    fn deliver(&self, event: &NowPlayingEvent) -> Result<(), PresenceError>;
}

/// Builds a [`NowPlayingEvent`] per started track and delivers it.
///
/// Delivery failures are logged and swallowed: playback never stops because
/// the presence side is unreachable.
pub struct NowPlayingPublisher<S: PresenceSink> {
    sink: S,
    settings: PresenceSettings,
    art_cache: PathBuf,
}

impl<S: PresenceSink> NowPlayingPublisher<S> {
    pub fn new(sink: S, settings: PresenceSettings, art_cache: PathBuf) -> Self {
        Self {
            sink,
            settings,
            art_cache,
        }
    }

    /// Build and deliver the status event for `track`. The built event is
    /// returned either way so callers can display it.
    pub fn publish(&self, track: &Track) -> NowPlayingEvent {
        let large_image = match track.cover.as_deref() {
            Some(bytes) => match self.store_cover(bytes) {
                Ok(path) => path.display().to_string(),
                Err(e) => {
                    warn!("could not cache cover art for {}: {e}", track.path.display());
                    self.settings.default_art_key.clone()
                }
            },
            None => self.settings.default_art_key.clone(),
        };

        let event =
            NowPlayingEvent::from_track(track, large_image, self.settings.small_art_key.clone());

        if let Err(e) = self.sink.deliver(&event) {
            warn!("presence update failed: {e}");
        }

        event
    }

    /// Write the embedded picture bytes to the art cache so the consumer
    /// can reference them as a file.
    fn store_cover(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.art_cache)?;
        let path = self.art_cache.join("cover_art");
        fs::write(&path, bytes)?;
        Ok(path)
    }

    #[cfg(test)]
    pub(crate) fn art_cache(&self) -> &PathBuf {
        &self.art_cache
    }
}
