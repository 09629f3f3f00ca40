use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::extract::{ExtractError, extract};
use super::model::{Track, UNKNOWN};

/// A file that stayed in the catalog but whose tags could not be read.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// The catalog of all discovered tracks plus genre/artist groupings.
///
/// Groupings hold indices into `tracks` in encounter order, never copies of
/// the track record. A track whose tag read hard-failed is present in
/// `tracks` (as a placeholder) and in `failures`, but in neither grouping.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    pub tracks: Vec<Track>,
    pub by_genre: BTreeMap<String, Vec<usize>>,
    pub by_artist: BTreeMap<String, Vec<usize>>,
    pub failures: Vec<ExtractionFailure>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl LibraryIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Walk `dir` and build a fresh catalog.
    ///
    /// Every file matched by extension lands in `tracks` in walk order,
    /// whether or not its tags could be read. A hard extraction failure is
    /// recorded and skips grouping only; the walk itself never aborts.
    /// Callers replace their previous index wholesale.
    pub fn build(dir: &Path, settings: &LibrarySettings) -> Self {
        let mut index = LibraryIndex::empty();

        let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
            {
                index.push(path);
            }
        }

        index
    }

    fn push(&mut self, path: &Path) {
        let idx = self.tracks.len();
        match extract(path) {
            Ok(track) => {
                let genre = track.genre.clone().unwrap_or_else(|| UNKNOWN.to_string());
                let artist = track.artist.clone().unwrap_or_else(|| UNKNOWN.to_string());
                self.by_genre.entry(genre).or_default().push(idx);
                self.by_artist.entry(artist).or_default().push(idx);
                self.tracks.push(track);
            }
            Err(error) => {
                warn!("could not read tags from {}: {error}", path.display());
                self.tracks.push(Track::placeholder(path.to_path_buf()));
                self.failures.push(ExtractionFailure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }
}
