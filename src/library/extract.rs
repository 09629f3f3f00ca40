use std::borrow::Cow;
use std::path::Path;

use lofty::error::LoftyError;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use thiserror::Error;

use super::model::Track;

/// Container formats the extractor knows how to dispatch on.
pub(super) const SUPPORTED_EXTENSIONS: [&str; 3] = ["mp3", "flac", "wav"];

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extension outside the supported container set. Callers filter by
    /// extension before calling, so hitting this means a filter mismatch.
    #[error("unsupported container format: {0:?}")]
    UnsupportedFormat(String),
    /// The file could not be opened or parsed as an audio container.
    #[error("unreadable audio container: {source}")]
    CorruptFile {
        #[source]
        source: LoftyError,
    },
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read tag fields, duration and embedded cover art from a single file.
///
/// A missing tag or missing individual frames is not an error: the returned
/// `Track` just carries `None` for those fields. Only an unreadable
/// container (or an extension outside [`SUPPORTED_EXTENSIONS`]) fails.
pub fn extract(path: &Path) -> Result<Track, ExtractError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ExtractError::UnsupportedFormat(ext));
    }

    let tagged = lofty::read_from_path(path).map_err(|source| ExtractError::CorruptFile { source })?;
    let duration = Some(tagged.properties().duration());

    let mut title = None;
    let mut artist = None;
    let mut album = None;
    let mut genre = None;

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        title = non_empty(tag.title());
        artist = non_empty(tag.artist());
        album = non_empty(tag.album());
        genre = non_empty(tag.genre());
    }

    // Cover art: prefer the primary tag's first picture, then any tag's.
    let mut cover = tagged
        .primary_tag()
        .and_then(|tag| tag.pictures().first())
        .map(|picture| picture.data().to_vec());
    if cover.is_none() {
        for tag in tagged.tags() {
            if let Some(picture) = tag.pictures().first() {
                cover = Some(picture.data().to_vec());
                break;
            }
        }
    }

    Ok(Track {
        path: path.to_path_buf(),
        title,
        artist,
        album,
        genre,
        duration,
        cover,
    })
}
