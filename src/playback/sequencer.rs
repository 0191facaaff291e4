use std::sync::Arc;

use crate::animation::timeline::{Playhead, PlayheadState, Scene};
use crate::foundation::config::PlaybackConfig;
use crate::playback::schedule::{
    ScheduleEnv, SchedulePlan, TimelineCue, baseline, build_schedule,
};
use crate::sequence::model::Sequence;

/// Why the timeline is frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Paused by the viewer.
    Manual,
    /// Stopped at an encounter cut until it resolves.
    Encounter,
}

/// Lifecycle of one playback run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    /// Never started, or reset.
    Idle,
    /// Waiting out the startup delay before the timeline is built.
    Building {
        /// Seconds of delay left.
        remaining: f64,
    },
    /// The timeline is advancing.
    Running,
    /// The timeline is frozen at its current offset.
    Paused(PauseReason),
    /// The last hold ended.
    Completed,
    /// Killed by [`Sequencer::stop`].
    Stopped,
}

/// What happened during one [`Sequencer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerEvent {
    /// The startup delay ran out and the timeline was built.
    Started,
    /// The playhead crossed a cue.
    Cue(TimelineCue),
    /// The timeline reached its end.
    Completed,
}

/// Owns the playback timeline and is the only thing that moves it.
#[derive(Debug)]
pub struct Sequencer {
    sequence: Arc<Sequence>,
    cfg: PlaybackConfig,
    state: SequencerState,
    playhead: Option<Playhead<TimelineCue>>,
    plan: Option<SchedulePlan>,
    scene: Scene,
    current: usize,
    transition: Option<(usize, usize)>,
}

impl Sequencer {
    /// Idle sequencer showing the baseline scene.
    pub fn new(sequence: Arc<Sequence>, cfg: PlaybackConfig, env: &ScheduleEnv<'_>) -> Self {
        let scene = baseline(&sequence, env);
        Self {
            sequence,
            cfg,
            state: SequencerState::Idle,
            playhead: None,
            plan: None,
            scene,
            current: 0,
            transition: None,
        }
    }

    /// Cuts being played.
    pub fn sequence(&self) -> &Arc<Sequence> {
        &self.sequence
    }

    /// Timing constants.
    pub fn config(&self) -> &PlaybackConfig {
        &self.cfg
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Whether a run is in flight, paused included.
    pub fn is_playing(&self) -> bool {
        matches!(
            self.state,
            SequencerState::Building { .. } | SequencerState::Running | SequencerState::Paused(_)
        )
    }

    /// Index of the cut whose hold started last.
    pub fn current_cut(&self) -> usize {
        self.current
    }

    /// Outgoing and incoming cut while a transition segment is playing.
    pub fn transition(&self) -> Option<(usize, usize)> {
        self.transition
    }

    /// Timeline offset, `0` before the timeline exists.
    pub fn time(&self) -> f64 {
        self.playhead.as_ref().map_or(0.0, Playhead::time)
    }

    /// Summary of the built timeline, `None` before it exists.
    pub fn plan(&self) -> Option<&SchedulePlan> {
        self.plan.as_ref()
    }

    /// Visual state after the last tick.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Begin a fresh run from the baseline, killing any run in flight.
    pub fn start(&mut self, env: &ScheduleEnv<'_>) {
        self.kill_and_restore(env);
        self.state = SequencerState::Building {
            remaining: self.cfg.start_delay_secs,
        };
        tracing::debug!(delay = self.cfg.start_delay_secs, "sequencer building");
    }

    /// Kill the run and restore the baseline; the sequencer reports `Stopped`.
    pub fn stop(&mut self, env: &ScheduleEnv<'_>) {
        self.kill_and_restore(env);
        self.state = SequencerState::Stopped;
        tracing::debug!("sequencer stopped");
    }

    /// Kill the run and restore the baseline; the sequencer reports `Idle`.
    pub fn reset(&mut self, env: &ScheduleEnv<'_>) {
        self.kill_and_restore(env);
        self.state = SequencerState::Idle;
        tracing::debug!("sequencer reset");
    }

    fn kill_and_restore(&mut self, env: &ScheduleEnv<'_>) {
        if let Some(playhead) = self.playhead.as_mut() {
            playhead.kill();
        }
        self.playhead = None;
        self.plan = None;
        self.current = 0;
        self.transition = None;
        self.scene = baseline(&self.sequence, env);
    }

    /// Freeze the timeline mid-segment. Only a running sequencer can pause.
    pub fn pause(&mut self, reason: PauseReason) -> bool {
        if self.state != SequencerState::Running {
            return false;
        }
        if let Some(playhead) = self.playhead.as_mut() {
            playhead.pause();
        }
        self.state = SequencerState::Paused(reason);
        tracing::debug!(?reason, time = self.time(), "sequencer paused");
        true
    }

    /// Continue from the exact offset where the timeline stopped.
    pub fn resume(&mut self) -> bool {
        let SequencerState::Paused(reason) = self.state else {
            return false;
        };
        if let Some(playhead) = self.playhead.as_mut() {
            playhead.resume();
        }
        self.state = SequencerState::Running;
        tracing::debug!(?reason, time = self.time(), "sequencer resumed");
        true
    }

    /// Advance the shared clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64, env: &ScheduleEnv<'_>) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        let mut dt = dt.max(0.0);

        if let SequencerState::Building { remaining } = self.state {
            if remaining > dt {
                self.state = SequencerState::Building {
                    remaining: remaining - dt,
                };
                return events;
            }
            dt -= remaining;
            let schedule = build_schedule(&self.sequence, env);
            tracing::info!(
                cuts = self.sequence.len(),
                duration = schedule.plan.duration_secs,
                "playback started"
            );
            self.plan = Some(schedule.plan);
            self.playhead = Some(Playhead::new(schedule.timeline));
            self.state = SequencerState::Running;
            events.push(SequencerEvent::Started);
        }

        if self.state != SequencerState::Running {
            return events;
        }
        let Some(playhead) = self.playhead.as_mut() else {
            return events;
        };

        for cue in playhead.advance(dt) {
            match cue {
                TimelineCue::Enter { cut } => {
                    self.current = cut;
                    self.transition = None;
                }
                TimelineCue::Transition { from, to } => self.transition = Some((from, to)),
                TimelineCue::Encounter { cut } => {
                    self.state = SequencerState::Paused(PauseReason::Encounter);
                    tracing::info!(cut, time = playhead.time(), "paused for encounter");
                }
                TimelineCue::MountStrips { .. } | TimelineCue::ReleaseStrips { .. } => {}
            }
            events.push(SequencerEvent::Cue(cue));
        }
        self.scene = playhead.sample();

        if playhead.state() == PlayheadState::Completed {
            self.state = SequencerState::Completed;
            self.transition = None;
            self.playhead = None;
            events.push(SequencerEvent::Completed);
            tracing::info!("playback completed");
        }
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sequencer.rs"]
mod tests;
