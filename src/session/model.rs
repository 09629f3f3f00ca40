use rand::Rng;
use rand::RngExt;
use thiserror::Error;

/// The playback state of the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Stopped
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the catalog is empty")]
    EmptyCatalog,
    #[error("track index {index} out of range (catalog holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid transition from {from:?}")]
    InvalidTransition { from: PlaybackStatus },
}

#[derive(Copy, Clone)]
enum Direction {
    Forward,
    Backward,
}

/// Sequencing state machine over a catalog of `len` tracks.
///
/// Holds no track data itself, only the current index, status and the
/// shuffle/repeat flags. Every failing operation leaves the state untouched.
#[derive(Debug)]
pub struct PlaybackSession {
    len: usize,
    current: Option<usize>,
    status: PlaybackStatus,
    shuffle: bool,
    repeat: bool,
}

impl PlaybackSession {
    pub fn new(len: usize, shuffle: bool, repeat: bool) -> Self {
        Self {
            len,
            current: None,
            status: PlaybackStatus::Stopped,
            shuffle,
            repeat,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// Adopt a rebuilt catalog: current track and status are discarded, the
    /// shuffle/repeat flags survive.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.current = None;
        self.status = PlaybackStatus::Stopped;
    }

    /// Start playing the track at `index`. Valid from any state.
    pub fn play(&mut self, index: usize) -> Result<usize, SessionError> {
        if self.len == 0 {
            return Err(SessionError::EmptyCatalog);
        }
        if index >= self.len {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.current = Some(index);
        self.status = PlaybackStatus::Playing;
        Ok(index)
    }

    /// Playing -> Paused. Any other starting state is rejected.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.status != PlaybackStatus::Playing {
            return Err(SessionError::InvalidTransition { from: self.status });
        }
        self.status = PlaybackStatus::Paused;
        Ok(())
    }

    /// Paused -> Playing on the retained track.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.status != PlaybackStatus::Paused {
            return Err(SessionError::InvalidTransition { from: self.status });
        }
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    /// Any state -> Stopped. The current index is retained so the same
    /// track can be replayed.
    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
    }

    /// Advance to the successor track and start playing it.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        let successor = self.successor(Direction::Forward)?;
        self.play(successor)
    }

    /// Step back to the predecessor track and start playing it.
    ///
    /// Under shuffle there is no pick history, so this applies the same
    /// random-distinct policy as `next`.
    pub fn prev(&mut self) -> Result<usize, SessionError> {
        let successor = self.successor(Direction::Backward)?;
        self.play(successor)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    /// Compute the index one step away in `dir`, or a random distinct index
    /// under shuffle. A session that never played steps onto the first
    /// (forward) or last (backward) track.
    fn successor(&self, dir: Direction) -> Result<usize, SessionError> {
        if self.len == 0 {
            return Err(SessionError::EmptyCatalog);
        }
        if self.shuffle {
            return Ok(self.shuffled_successor());
        }
        Ok(match (dir, self.current) {
            (Direction::Forward, Some(i)) => (i + 1) % self.len,
            (Direction::Forward, None) => 0,
            (Direction::Backward, Some(i)) => (i + self.len - 1) % self.len,
            (Direction::Backward, None) => self.len - 1,
        })
    }

    fn shuffled_successor(&self) -> usize {
        let mut rng = rand::rng();
        match self.current {
            // Sampling an offset in [1, len) keeps the pick uniform over
            // every index other than the current one.
            Some(cur) if self.len > 1 => (cur + rng.random_range(1..self.len)) % self.len,
            Some(cur) => cur,
            None => rng.random_range(0..self.len),
        }
    }
}
