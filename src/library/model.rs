use std::path::PathBuf;
use std::time::Duration;

/// Bucket name for tracks whose genre/artist frame is missing.
pub const UNKNOWN: &str = "Unknown";

/// One audio file's identity plus its descriptive tag fields.
///
/// Tag fields are `None` when the frame is missing or the file could not be
/// read as an audio container; consumers substitute their own fallback text.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
    /// Raw embedded picture bytes, present only when the file carries one.
    pub cover: Option<Vec<u8>>,
}

impl Track {
    /// A track whose tags could not be read at all. It keeps its place in
    /// the catalog but carries no metadata.
    pub(crate) fn placeholder(path: PathBuf) -> Self {
        Self {
            path,
            title: None,
            artist: None,
            album: None,
            genre: None,
            duration: None,
            cover: None,
        }
    }
}
