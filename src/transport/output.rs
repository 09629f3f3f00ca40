//! `rodio`-backed implementation of the media backend.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::backend::{BackendError, MediaBackend};

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    gain: f32,
    paused: bool,

    // Elapsed = accumulated while paused + time since last unpause.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl RodioOutput {
    pub fn new() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a long-running player.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            loaded: None,
            gain: 1.0,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
        })
    }

    /// Decode `path` into a fresh paused sink positioned at `start_at`.
    /// `skip_duration` is the seeking primitive; even `Duration::ZERO` is fine.
    fn build_sink(&self, path: &Path, start_at: Duration) -> Result<Sink, BackendError> {
        let file = File::open(path).map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|source| BackendError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.gain);
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

impl MediaBackend for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        let sink = self.build_sink(path, Duration::ZERO)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(sink);
        self.loaded = Some(path.to_path_buf());
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
            if let Some(started) = self.started_at.take() {
                self.accumulated += started.elapsed();
            }
            self.paused = true;
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> Result<(), BackendError> {
        // Seeking rebuilds the sink and skips into the file.
        let Some(path) = self.loaded.clone() else {
            return Ok(());
        };

        let sink = self.build_sink(&path, position)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        if self.paused {
            self.started_at = None;
        } else {
            sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(sink);
        self.accumulated = position;
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(gain);
        }
    }

    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
