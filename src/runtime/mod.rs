use std::env;
use std::path::Path;
use std::sync::mpsc;

use log::info;

use crate::library::LibraryIndex;
use crate::presence::NowPlayingPublisher;
use crate::remote::{self, ControlCmd};
use crate::session::PlaybackSession;
use crate::transport::{RodioOutput, TransportController};

mod control;
mod settings;
mod status_sync;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let index = LibraryIndex::build(Path::new(&dir), &settings.library);
    info!(
        "indexed {} tracks under {} ({} unreadable)",
        index.len(),
        dir,
        index.failures.len()
    );

    let mut session =
        PlaybackSession::new(index.len(), settings.playback.shuffle, settings.playback.repeat);

    let backend = RodioOutput::new()?;
    let mut controller = TransportController::new(backend);
    controller.set_volume(settings.playback.volume)?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let remote = remote::spawn_remote(control_tx.clone());
    remote.set_volume(controller.volume());
    remote.set_flags(session.shuffle(), session.repeat());

    let art_cache = env::temp_dir().join("rondo");
    let publisher =
        NowPlayingPublisher::new(remote.clone(), settings.presence.clone(), art_cache);

    control::run(
        &settings,
        index,
        &mut session,
        &mut controller,
        &publisher,
        &remote,
        &control_rx,
    )
}
