use crate::library::Track;

/// The status payload describing the currently playing track.
///
/// Built once per started track and handed to the presence consumer; never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlayingEvent {
    /// "by {artist}"
    pub state: String,
    /// "Listening to {title}"
    pub details: String,
    /// Cover-art artifact reference, or the configured default key.
    pub large_image: String,
    /// Album name.
    pub large_text: String,
    pub small_image: String,
    pub small_text: String,
}

impl NowPlayingEvent {
    pub fn from_track(track: &Track, large_image: String, small_image: String) -> Self {
        let title = track.title.as_deref().unwrap_or("Unknown Song");
        let artist = track.artist.as_deref().unwrap_or("Unknown Artist");
        let album = track.album.as_deref().unwrap_or("Unknown Album");

        Self {
            state: format!("by {artist}"),
            details: format!("Listening to {title}"),
            large_image,
            large_text: album.to_string(),
            small_image,
            small_text: "Music Player".to_string(),
        }
    }
}
