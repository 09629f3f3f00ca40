use crate::remote::RemoteHandle;
use crate::session::PlaybackSession;
use crate::transport::{MediaBackend, TransportController};

/// Push the session status and the polled playback position onto the bus.
/// Idempotent; called on every tick and after every handled command.
pub(super) fn update_status<B: MediaBackend>(
    remote: &RemoteHandle,
    session: &PlaybackSession,
    controller: &TransportController<B>,
) {
    remote.set_playback(session.status());
    remote.set_position(controller.poll_position());
}
