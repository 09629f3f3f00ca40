//! Now-playing presence feed: the status event built for each started
//! track and the publisher that hands it to the external consumer.

mod event;
mod publisher;

pub use event::NowPlayingEvent;
pub use publisher::{NowPlayingPublisher, PresenceError, PresenceSink};
