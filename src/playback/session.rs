use std::sync::Arc;

use crate::assets::store::ImageStore;
use crate::effects::profile::{EntranceStyle, profile};
use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::Viewport;
use crate::geometry::contain::image_frame;
use crate::playback::encounter::{
    EncounterHost, InterruptionCoordinator, InterruptionEvent, InterruptionState, Lineup,
    NullEncounter,
};
use crate::playback::schedule::{ScheduleEnv, TimelineCue, entrance_of};
use crate::playback::scroll::SmoothScroll;
use crate::playback::sequencer::{PauseReason, Sequencer, SequencerEvent, SequencerState};
use crate::playback::snapshot::SceneSnapshot;
use crate::sequence::model::Sequence;
use crate::strips::layout::StripVariant;
use crate::strips::registry::{StripRegistry, StripRequest};

/// Something observable that happened during [`PlaybackSession::tick`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Reported by the sequencer.
    Sequencer(SequencerEvent),
    /// The sequencer reached an encounter and the interstitial started.
    EncounterStarted {
        /// The encounter cut.
        cut: usize,
    },
    /// Reported by the interruption coordinator.
    Interruption(InterruptionEvent),
}

fn image_ready(seq: &Sequence, images: &ImageStore, index: usize) -> bool {
    seq.get(index)
        .and_then(|c| c.image_ref())
        .is_some_and(|r| images.get(r).is_some())
}

/// One play-mode run: sequencer, interruption, scroll driver, strips, and images on one clock.
pub struct PlaybackSession {
    sequence: Arc<Sequence>,
    cfg: PlaybackConfig,
    viewport: Viewport,
    images: ImageStore,
    strips: StripRegistry,
    sequencer: Sequencer,
    interruption: InterruptionCoordinator,
    scroll: SmoothScroll,
    host: Box<dyn EncounterHost>,
    clock: f64,
}

impl PlaybackSession {
    /// Session over `sequence`, loading every referenced image from `images` up front.
    #[tracing::instrument(skip_all, fields(cuts = sequence.len()))]
    pub fn new(
        sequence: Sequence,
        cfg: PlaybackConfig,
        viewport: Viewport,
        mut images: ImageStore,
    ) -> Self {
        images.preload(sequence.image_refs());
        let sequence = Arc::new(sequence);
        let sequencer = {
            let (seq, imgs) = (&sequence, &images);
            let ready = |i: usize| image_ready(seq, imgs, i);
            let env = ScheduleEnv {
                cfg: &cfg,
                viewport_width: viewport.width,
                image_ready: &ready,
            };
            Sequencer::new(Arc::clone(&sequence), cfg.clone(), &env)
        };
        let strips = StripRegistry::new(
            sequence.len(),
            image_frame(viewport, &cfg),
            viewport.dpr(),
            cfg.measure_retry_secs,
        );
        let mut session = Self {
            interruption: InterruptionCoordinator::new(&cfg),
            sequence,
            cfg,
            viewport,
            images,
            strips,
            sequencer,
            scroll: SmoothScroll::default(),
            host: Box::new(NullEncounter),
            clock: 0.0,
        };
        session.restore_strips();
        session
    }

    /// Replace the mini-game host.
    pub fn with_host(mut self, host: Box<dyn EncounterHost>) -> Self {
        self.host = host;
        self
    }

    /// Combatants handed to every encounter.
    pub fn with_lineup(mut self, lineup: Lineup) -> Self {
        self.interruption = InterruptionCoordinator::new(&self.cfg).with_lineup(lineup);
        self
    }

    /// Cuts being played.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Timing constants.
    pub fn config(&self) -> &PlaybackConfig {
        &self.cfg
    }

    /// Logical viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds the session has been ticked for.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// The timeline owner.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Sequencer lifecycle state.
    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Whether a run is in flight, paused included.
    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// Encounter phase.
    pub fn interruption(&self) -> InterruptionState {
        self.interruption.state()
    }

    /// Mounted strip sets.
    pub fn strips(&self) -> &StripRegistry {
        &self.strips
    }

    /// Decoded cut images.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Scroll driver, frozen while paused.
    pub fn scroll(&self) -> &SmoothScroll {
        &self.scroll
    }

    /// Scroll driver, for starting scrolls.
    pub fn scroll_mut(&mut self) -> &mut SmoothScroll {
        &mut self.scroll
    }

    /// Start playback from the baseline, discarding any run in flight.
    pub fn start(&mut self) {
        self.teardown();
        self.drive_sequencer(|sequencer, env| sequencer.start(env));
    }

    /// Kill the run and restore the baseline; the session reports `Stopped`.
    pub fn stop(&mut self) {
        self.teardown();
        self.drive_sequencer(|sequencer, env| sequencer.stop(env));
    }

    /// Kill the run and restore the baseline; the session reports `Idle`.
    pub fn reset(&mut self) {
        self.teardown();
        self.drive_sequencer(|sequencer, env| sequencer.reset(env));
    }

    /// Run `f` on the sequencer with the current config, viewport and image readiness.
    fn drive_sequencer<R>(&mut self, f: impl FnOnce(&mut Sequencer, &ScheduleEnv<'_>) -> R) -> R {
        let (seq, imgs) = (&self.sequence, &self.images);
        let ready = |i: usize| image_ready(seq, imgs, i);
        let env = ScheduleEnv {
            cfg: &self.cfg,
            viewport_width: self.viewport.width,
            image_ready: &ready,
        };
        f(&mut self.sequencer, &env)
    }

    fn teardown(&mut self) {
        self.interruption.cancel(self.host.as_mut());
        self.restore_strips();
        self.scroll.jump_to(0.0);
        self.scroll.start();
    }

    /// Drop every strip set, then redraw the shutter strips cuts show at rest.
    fn restore_strips(&mut self) {
        self.strips.clear();
        for i in 0..self.sequence.len() {
            let shutter = self
                .sequence
                .get(i)
                .is_some_and(|c| profile(entrance_of(c)).entrance == EntranceStyle::Strips);
            if shutter && image_ready(&self.sequence, &self.images, i) {
                let request =
                    self.strip_request(i, StripVariant::ShutterIn, self.cfg.shutter_in_strips);
                self.strips.mount(i, request, self.clock);
            }
        }
    }

    fn strip_request(&self, cut: usize, variant: StripVariant, count: usize) -> Option<StripRequest> {
        let image_ref = self.sequence.get(cut)?.image_ref()?;
        let image = self.images.get(image_ref)?;
        Some(StripRequest {
            variant,
            image_ref: image_ref.to_owned(),
            image: Arc::clone(image),
            count,
            overlap_px: variant.overlap_px(&self.cfg),
        })
    }

    /// Manual pause. Not available while an encounter owns the screen.
    pub fn pause(&mut self) -> bool {
        if self.interruption.is_active() {
            return false;
        }
        let paused = self.sequencer.pause(PauseReason::Manual);
        if paused {
            self.scroll.stop();
        }
        paused
    }

    /// Undo a manual pause; `false` when not manually paused.
    pub fn resume(&mut self) -> bool {
        if self.sequencer.state() != SequencerState::Paused(PauseReason::Manual) {
            return false;
        }
        self.scroll.start();
        self.sequencer.resume()
    }

    /// The mini-game's completion callback.
    pub fn resolve_encounter(&mut self) -> bool {
        match self.interruption.resolve(self.host.as_mut()) {
            Some(_) => {
                self.after_encounter();
                true
            }
            None => false,
        }
    }

    fn after_encounter(&mut self) {
        self.sequencer.resume();
        self.scroll.start();
    }

    /// New viewport size or pixel ratio; strip surfaces are laid out again.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport changed");
        self.viewport = viewport;
        self.strips
            .relayout(image_frame(viewport, &self.cfg), viewport.dpr());
    }

    /// Advance the shared clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Vec<SessionEvent> {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.strips.poll(self.clock);
        let mut events = Vec::new();

        if self.interruption.is_active() {
            if let Some(ev) = self.interruption.tick(dt, self.host.as_mut()) {
                if matches!(ev, InterruptionEvent::Resolved { .. }) {
                    self.after_encounter();
                }
                events.push(SessionEvent::Interruption(ev));
            }
            return events;
        }

        self.scroll.tick(dt);
        let fired = self.drive_sequencer(|sequencer, env| sequencer.tick(dt, env));

        for ev in fired {
            events.push(SessionEvent::Sequencer(ev));
            let SequencerEvent::Cue(cue) = ev else {
                continue;
            };
            match cue {
                TimelineCue::MountStrips {
                    cut,
                    variant,
                    count,
                } => {
                    let request = self.strip_request(cut, variant, count);
                    self.strips.mount(cut, request, self.clock);
                }
                TimelineCue::ReleaseStrips { cut } => self.strips.release(cut),
                TimelineCue::Encounter { cut } => {
                    self.scroll.stop();
                    self.interruption.begin(cut);
                    events.push(SessionEvent::EncounterStarted { cut });
                }
                TimelineCue::Enter { .. } | TimelineCue::Transition { .. } => {}
            }
        }
        events
    }

    /// Borrowed view of everything a frame needs.
    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            viewport: self.viewport,
            frame: image_frame(self.viewport, &self.cfg),
            sequence: &self.sequence,
            scene: self.sequencer.scene(),
            images: &self.images,
            strips: &self.strips,
            overlay: self.interruption.overlay(),
            battle: match self.interruption.state() {
                InterruptionState::BattleActive { cut } => Some(cut),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
