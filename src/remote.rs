//! D-Bus control surface and shared status state.
//!
//! A spawned thread serves two interfaces on the session bus: an
//! application interface (identity/quit) and a player interface whose
//! methods forward [`ControlCmd`] values to the control loop and whose
//! properties expose the playback status, the now-playing payload and the
//! transport flags. The [`RemoteHandle`] is also the shipped
//! [`PresenceSink`]: delivering a status event updates what the bus serves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use log::warn;
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::presence::{NowPlayingEvent, PresenceError, PresenceSink};
use crate::session::PlaybackStatus;

const BUS_NAME: &str = "dev.rondo.Rondo";
const OBJECT_PATH: &str = "/dev/rondo/Rondo";

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    PlayIndex(usize),
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    ToggleShuffle,
    ToggleRepeat,
    SetVolume(u8),
    Seek(u64),
    OpenDirectory(String),
}

#[derive(Debug, Default)]
struct SharedStatus {
    playback: PlaybackStatus,
    now_playing: Option<NowPlayingEvent>,
    position_secs: Option<u64>,
    shuffle: bool,
    repeat: bool,
    volume: u8,
}

/// Handle to the status state served over the bus.
#[derive(Clone)]
pub struct RemoteHandle {
    state: Arc<Mutex<SharedStatus>>,
}

impl RemoteHandle {
    pub fn set_playback(&self, playback: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_position(&self, secs: Option<u64>) {
        if let Ok(mut s) = self.state.lock() {
            s.position_secs = secs;
        }
    }

    pub fn set_flags(&self, shuffle: bool, repeat: bool) {
        if let Ok(mut s) = self.state.lock() {
            s.shuffle = shuffle;
            s.repeat = repeat;
        }
    }

    pub fn set_volume(&self, volume: u8) {
        if let Ok(mut s) = self.state.lock() {
            s.volume = volume;
        }
    }

    pub fn clear_now_playing(&self) {
        if let Ok(mut s) = self.state.lock() {
            s.now_playing = None;
        }
    }
}

impl PresenceSink for RemoteHandle {
    fn deliver(&self, event: &NowPlayingEvent) -> Result<(), PresenceError> {
        let mut s = self
            .state
            .lock()
            .map_err(|_| PresenceError::Unavailable("status state poisoned".to_string()))?;
        s.now_playing = Some(event.clone());
        Ok(())
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "dev.rondo.Application")]
impl RootIface {
    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "rondo"
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedStatus>>,
}

#[interface(name = "dev.rondo.Player")]
impl PlayerIface {
    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    /// Play the catalog entry at `index` directly.
    fn play_track(&self, index: u32) {
        let _ = self.tx.send(ControlCmd::PlayIndex(index as usize));
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn toggle_shuffle(&self) {
        let _ = self.tx.send(ControlCmd::ToggleShuffle);
    }

    fn toggle_repeat(&self) {
        let _ = self.tx.send(ControlCmd::ToggleRepeat);
    }

    fn set_volume(&self, percent: u8) {
        let _ = self.tx.send(ControlCmd::SetVolume(percent));
    }

    fn seek(&self, seconds: u64) {
        let _ = self.tx.send(ControlCmd::Seek(seconds));
    }

    /// Rebuild the catalog from `path`, replacing the previous one.
    fn open_directory(&self, path: String) {
        let _ = self.tx.send(ControlCmd::OpenDirectory(path));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    /// Elapsed seconds of the current track, -1 while paused or stopped.
    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.position_secs)
            .map(|secs| secs as i64)
            .unwrap_or(-1)
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        self.state.lock().map(|s| s.shuffle).unwrap_or(false)
    }

    #[zbus(property)]
    fn repeat(&self) -> bool {
        self.state.lock().map(|s| s.repeat).unwrap_or(false)
    }

    #[zbus(property)]
    fn volume(&self) -> u8 {
        self.state.lock().map(|s| s.volume).unwrap_or(0)
    }

    #[zbus(property)]
    fn now_playing(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Some(event) = self.state.lock().ok().and_then(|s| s.now_playing.clone()) else {
            return map;
        };

        for (key, text) in [
            ("state", event.state),
            ("details", event.details),
            ("large_image", event.large_image),
            ("large_text", event.large_text),
            ("small_image", event.small_image),
            ("small_text", event.small_text),
        ] {
            if let Ok(value) = OwnedValue::try_from(Value::from(text)) {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

pub fn spawn_remote(tx: Sender<ControlCmd>) -> RemoteHandle {
    let state = Arc::new(Mutex::new(SharedStatus::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("remote: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("remote: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!("remote: failed to register application iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("remote: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    RemoteHandle { state }
}

#[cfg(test)]
mod tests;
