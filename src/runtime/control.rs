use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::{info, warn};

use crate::config;
use crate::library::LibraryIndex;
use crate::presence::NowPlayingPublisher;
use crate::remote::{ControlCmd, RemoteHandle};
use crate::session::{PlaybackSession, PlaybackStatus};
use crate::transport::{MediaBackend, TransportController};

use super::status_sync;

/// The single control thread: commands are handled as they arrive; each
/// receive timeout is the 1-second tick that refreshes the position feed
/// and performs end-of-track handling.
pub(super) fn run<B: MediaBackend>(
    settings: &config::Settings,
    mut index: LibraryIndex,
    session: &mut PlaybackSession,
    controller: &mut TransportController<B>,
    publisher: &NowPlayingPublisher<RemoteHandle>,
    remote: &RemoteHandle,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match control_rx.recv_timeout(Duration::from_secs(1)) {
            Ok(cmd) => {
                if handle_cmd(
                    cmd, settings, &mut index, session, controller, publisher, remote,
                ) {
                    controller.stop();
                    return Ok(());
                }
                status_sync::update_status(remote, session, controller);
            }
            Err(RecvTimeoutError::Timeout) => {
                if session.status() == PlaybackStatus::Playing && controller.track_finished() {
                    handle_track_end(settings, &index, session, controller, publisher);
                }
                status_sync::update_status(remote, session, controller);
            }
            Err(RecvTimeoutError::Disconnected) => {
                controller.stop();
                return Ok(());
            }
        }
    }
}

fn handle_cmd<B: MediaBackend>(
    cmd: ControlCmd,
    settings: &config::Settings,
    index: &mut LibraryIndex,
    session: &mut PlaybackSession,
    controller: &mut TransportController<B>,
    publisher: &NowPlayingPublisher<RemoteHandle>,
    remote: &RemoteHandle,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            return true;
        }
        ControlCmd::Play => match session.status() {
            PlaybackStatus::Paused => {
                if session.resume().is_ok() {
                    controller.resume();
                }
            }
            PlaybackStatus::Stopped | PlaybackStatus::Playing => {
                // Replays the retained track, or starts from the top.
                let target = session.current().unwrap_or(0);
                match session.play(target) {
                    Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
                    Err(e) => warn!("play: {e}"),
                }
            }
        },
        ControlCmd::PlayIndex(idx) => match session.play(idx) {
            Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
            Err(e) => warn!("play {idx}: {e}"),
        },
        ControlCmd::Pause => {
            if session.pause().is_ok() {
                controller.pause();
            }
        }
        ControlCmd::PlayPause => match session.status() {
            PlaybackStatus::Playing => {
                if session.pause().is_ok() {
                    controller.pause();
                }
            }
            PlaybackStatus::Paused => {
                if session.resume().is_ok() {
                    controller.resume();
                }
            }
            PlaybackStatus::Stopped => {
                let target = session.current().unwrap_or(0);
                match session.play(target) {
                    Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
                    Err(e) => warn!("play: {e}"),
                }
            }
        },
        ControlCmd::Stop => {
            session.stop();
            controller.stop();
        }
        ControlCmd::Next => match session.next() {
            Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
            Err(e) => warn!("next: {e}"),
        },
        ControlCmd::Prev => match session.prev() {
            Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
            Err(e) => warn!("prev: {e}"),
        },
        ControlCmd::ToggleShuffle => {
            let shuffle = session.toggle_shuffle();
            info!("shuffle {}", if shuffle { "on" } else { "off" });
            remote.set_flags(session.shuffle(), session.repeat());
        }
        ControlCmd::ToggleRepeat => {
            let repeat = session.toggle_repeat();
            info!("repeat {}", if repeat { "on" } else { "off" });
            remote.set_flags(session.shuffle(), session.repeat());
        }
        ControlCmd::SetVolume(percent) => match controller.set_volume(percent) {
            Ok(()) => remote.set_volume(controller.volume()),
            Err(e) => warn!("volume: {e}"),
        },
        ControlCmd::Seek(seconds) => {
            if let Err(e) = controller.seek(seconds) {
                warn!("seek: {e}");
            }
        }
        ControlCmd::OpenDirectory(dir) => {
            // Full replace: the new catalog is built before the old one is
            // dropped, and the session always resets with it.
            let rebuilt = LibraryIndex::build(Path::new(&dir), &settings.library);
            info!(
                "indexed {} tracks under {} ({} unreadable)",
                rebuilt.len(),
                dir,
                rebuilt.failures.len()
            );
            controller.stop();
            session.reset(rebuilt.len());
            remote.clear_now_playing();
            *index = rebuilt;
        }
    }

    false
}

/// Load and start the track at `idx`, skipping over files the backend
/// cannot open or decode. Tries at most one full catalog's worth of
/// successors before giving up and stopping the session.
fn start_track<B: MediaBackend>(
    idx: usize,
    settings: &config::Settings,
    index: &LibraryIndex,
    session: &mut PlaybackSession,
    controller: &mut TransportController<B>,
    publisher: &NowPlayingPublisher<RemoteHandle>,
) {
    let mut idx = idx;
    for _ in 0..index.len() {
        let track = &index.tracks[idx];
        match controller.start(track) {
            Ok(()) => {
                if settings.presence.enabled {
                    publisher.publish(track);
                }
                return;
            }
            Err(e) => {
                warn!("cannot play {}: {e}", track.path.display());
                match session.next() {
                    Ok(successor) if successor != idx => idx = successor,
                    _ => break,
                }
            }
        }
    }

    session.stop();
    controller.stop();
}

/// End-of-track policy: repeat on replays the current index, repeat off
/// advances with the session's wrapping successor.
fn handle_track_end<B: MediaBackend>(
    settings: &config::Settings,
    index: &LibraryIndex,
    session: &mut PlaybackSession,
    controller: &mut TransportController<B>,
    publisher: &NowPlayingPublisher<RemoteHandle>,
) {
    let result = if session.repeat() {
        match session.current() {
            Some(cur) => session.play(cur),
            None => session.next(),
        }
    } else {
        session.next()
    };

    match result {
        Ok(idx) => start_track(idx, settings, index, session, controller, publisher),
        Err(e) => {
            warn!("end of track: {e}");
            session.stop();
            controller.stop();
        }
    }
}
