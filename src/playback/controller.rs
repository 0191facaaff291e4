use crate::playback::session::{PlaybackSession, SessionEvent};
use crate::playback::sequencer::SequencerState;

/// The three ways an episode can be viewed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One cut at a time with manual stepping.
    #[default]
    Normal,
    /// Every cut stacked in one scrolling column.
    Scroll,
    /// Timed playback with transitions.
    Play,
}

/// Owns the viewing mode and the session; every mode change starts from a clean slate.
pub struct ModeController {
    mode: ViewMode,
    index: usize,
    session: PlaybackSession,
}

impl ModeController {
    /// Controller in normal mode at the first cut.
    pub fn new(session: PlaybackSession) -> Self {
        Self {
            mode: ViewMode::Normal,
            index: 0,
            session,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Selected cut in normal mode.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The playback session.
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Mutable access to the playback session.
    pub fn session_mut(&mut self) -> &mut PlaybackSession {
        &mut self.session
    }

    /// Switch modes. Selecting the active mode does nothing.
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.session.reset();
        self.index = 0;
        tracing::debug!(from = ?self.mode, to = ?mode, "view mode changed");
        self.mode = mode;
        true
    }

    /// Start playback when nothing runs, stop it otherwise. Play mode only.
    pub fn toggle_play(&mut self) {
        if self.mode != ViewMode::Play {
            tracing::debug!(mode = ?self.mode, "play toggle outside play mode ignored");
            return;
        }
        match self.session.state() {
            SequencerState::Idle | SequencerState::Stopped | SequencerState::Completed => {
                self.session.start();
            }
            SequencerState::Building { .. } | SequencerState::Running | SequencerState::Paused(_) => {
                self.session.stop();
            }
        }
    }

    /// Reset playback and select the first cut.
    pub fn reset_to_first(&mut self) {
        self.session.reset();
        self.index = 0;
    }

    /// Select the first cut.
    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    /// Select the previous cut.
    pub fn prev(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.go_to(i),
            None => false,
        }
    }

    /// Select the next cut.
    pub fn next(&mut self) -> bool {
        self.go_to(self.index + 1)
    }

    /// Select the last cut.
    pub fn last(&mut self) -> bool {
        self.go_to(self.session.sequence().last_index())
    }

    /// Select a cut; out of range leaves the selection alone.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.session.sequence().len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// Drive the session clock. Outside play mode nothing is animating.
    pub fn tick(&mut self, dt: f64) -> Vec<SessionEvent> {
        if self.mode != ViewMode::Play {
            return Vec::new();
        }
        self.session.tick(dt)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
