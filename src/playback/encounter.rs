use crate::animation::ease::Ease;
use crate::animation::props::{PropPatch, VisualProps};
use crate::animation::timeline::{OverlayPart, Playhead, Position, Scene, TargetId, TimelineBuilder};
use crate::foundation::config::PlaybackConfig;

/// Stats a combatant enters the mini-game with.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Combatant {
    /// Display name.
    pub name: String,
    /// Starting hit points.
    pub hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Defense stat.
    pub defense: u32,
}

/// Both sides of an encounter.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lineup {
    /// The player's side.
    pub hero: Combatant,
    /// The opposing side.
    pub enemy: Combatant,
}

impl Default for Lineup {
    fn default() -> Self {
        Self {
            hero: Combatant {
                name: "Hero".to_owned(),
                hp: 100,
                attack: 25,
                defense: 10,
            },
            enemy: Combatant {
                name: "Enemy".to_owned(),
                hp: 80,
                attack: 20,
                defense: 8,
            },
        }
    }
}

/// What a mounted mini-game reports each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterStatus {
    /// Still being played.
    Ongoing,
    /// Finished; playback may continue.
    Resolved,
}

/// The interactive mini-game as seen by playback.
///
/// Playback only mounts it, unmounts it, and waits for one resolution, either reported from
/// [`EncounterHost::advance`] or delivered through `PlaybackSession::resolve_encounter`.
pub trait EncounterHost {
    /// Take over the screen with `lineup`.
    fn mount(&mut self, lineup: &Lineup);

    /// Tear down; called once after resolution or cancellation.
    fn unmount(&mut self);

    /// Called once per tick while mounted.
    fn advance(&mut self, _dt: f64) -> EncounterStatus {
        EncounterStatus::Ongoing
    }
}

/// Resolves a fixed number of seconds after mounting.
#[derive(Clone, Debug)]
pub struct ScriptedEncounter {
    resolve_after: f64,
    elapsed: f64,
    mounted: bool,
    mounts: usize,
}

impl ScriptedEncounter {
    /// Host resolving `resolve_after_secs` after each mount.
    pub fn new(resolve_after_secs: f64) -> Self {
        Self {
            resolve_after: resolve_after_secs.max(0.0),
            elapsed: 0.0,
            mounted: false,
            mounts: 0,
        }
    }

    /// Whether the host is mounted now.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// How many times the host was mounted.
    pub fn mount_count(&self) -> usize {
        self.mounts
    }
}

impl EncounterHost for ScriptedEncounter {
    fn mount(&mut self, lineup: &Lineup) {
        tracing::debug!(hero = %lineup.hero.name, enemy = %lineup.enemy.name, "scripted encounter mounted");
        self.mounted = true;
        self.mounts += 1;
        self.elapsed = 0.0;
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn advance(&mut self, dt: f64) -> EncounterStatus {
        if !self.mounted {
            return EncounterStatus::Ongoing;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed + 1e-9 >= self.resolve_after {
            EncounterStatus::Resolved
        } else {
            EncounterStatus::Ongoing
        }
    }
}

/// Never resolves. Playback stays paused until stopped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEncounter;

impl EncounterHost for NullEncounter {
    fn mount(&mut self, _lineup: &Lineup) {}

    fn unmount(&mut self) {}
}

/// Where an interruption stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum InterruptionState {
    /// No encounter in progress.
    Inactive,
    /// The "battle start" overlay is playing.
    Interstitial {
        /// The encounter cut.
        cut: usize,
    },
    /// The mini-game is mounted and owns the screen.
    BattleActive {
        /// The encounter cut.
        cut: usize,
    },
}

/// Progress reported by [`InterruptionCoordinator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionEvent {
    /// The interstitial ended and the mini-game was mounted.
    Mounted {
        /// The encounter cut.
        cut: usize,
    },
    /// The mini-game finished and was unmounted.
    Resolved {
        /// The encounter cut.
        cut: usize,
    },
}

/// Runs the interstitial and mini-game while the sequencer is paused.
///
/// It never touches the sequencer itself; the session pauses and resumes it around the events
/// reported here.
#[derive(Debug)]
pub struct InterruptionCoordinator {
    state: InterruptionState,
    interstitial: Option<Playhead<()>>,
    overlay: Option<Scene>,
    lineup: Lineup,
    interstitial_secs: f64,
}

impl InterruptionCoordinator {
    /// Idle coordinator with the default lineup.
    pub fn new(cfg: &PlaybackConfig) -> Self {
        Self {
            state: InterruptionState::Inactive,
            interstitial: None,
            overlay: None,
            lineup: Lineup::default(),
            interstitial_secs: cfg.encounter_interstitial_secs,
        }
    }

    /// Use `lineup` for every encounter.
    pub fn with_lineup(mut self, lineup: Lineup) -> Self {
        self.lineup = lineup;
        self
    }

    /// Current phase.
    pub fn state(&self) -> InterruptionState {
        self.state
    }

    /// Whether an encounter owns the screen.
    pub fn is_active(&self) -> bool {
        self.state != InterruptionState::Inactive
    }

    /// Whether the mini-game is mounted.
    pub fn is_battle_active(&self) -> bool {
        matches!(self.state, InterruptionState::BattleActive { .. })
    }

    /// Interstitial overlay state while it is showing.
    pub fn overlay(&self) -> Option<&Scene> {
        self.overlay.as_ref()
    }

    /// Show the interstitial for the encounter at `cut`.
    pub fn begin(&mut self, cut: usize) {
        if self.is_active() {
            tracing::warn!(cut, state = ?self.state, "encounter already in progress");
            return;
        }
        let playhead = Playhead::new(interstitial_timeline(self.interstitial_secs));
        self.overlay = Some(playhead.sample());
        self.interstitial = Some(playhead);
        self.state = InterruptionState::Interstitial { cut };
        tracing::debug!(cut, "encounter interstitial");
    }

    /// Advance the interstitial or poll the mounted host.
    pub fn tick(&mut self, dt: f64, host: &mut dyn EncounterHost) -> Option<InterruptionEvent> {
        match self.state {
            InterruptionState::Inactive => None,
            InterruptionState::Interstitial { cut } => {
                let playhead = self.interstitial.as_mut()?;
                playhead.advance(dt);
                self.overlay = Some(playhead.sample());
                if !playhead.is_complete() {
                    return None;
                }
                self.interstitial = None;
                self.overlay = None;
                host.mount(&self.lineup);
                self.state = InterruptionState::BattleActive { cut };
                tracing::info!(cut, "encounter mounted");
                Some(InterruptionEvent::Mounted { cut })
            }
            InterruptionState::BattleActive { cut } => {
                if host.advance(dt) == EncounterStatus::Resolved {
                    self.finish(host);
                    Some(InterruptionEvent::Resolved { cut })
                } else {
                    None
                }
            }
        }
    }

    /// The mini-game's completion callback. Ignored unless a battle is mounted.
    pub fn resolve(&mut self, host: &mut dyn EncounterHost) -> Option<InterruptionEvent> {
        let InterruptionState::BattleActive { cut } = self.state else {
            tracing::debug!(state = ?self.state, "encounter resolution without an active battle");
            return None;
        };
        self.finish(host);
        Some(InterruptionEvent::Resolved { cut })
    }

    fn finish(&mut self, host: &mut dyn EncounterHost) {
        if let InterruptionState::BattleActive { cut } = self.state {
            host.unmount();
            tracing::info!(cut, "encounter resolved");
        }
        self.state = InterruptionState::Inactive;
    }

    /// Tear down on stop/reset, unmounting a live battle.
    pub fn cancel(&mut self, host: &mut dyn EncounterHost) {
        if self.is_battle_active() {
            host.unmount();
        }
        self.state = InterruptionState::Inactive;
        self.interstitial = None;
        self.overlay = None;
    }
}

fn interstitial_timeline(total_secs: f64) -> crate::animation::timeline::Timeline<()> {
    let backdrop = TargetId::Overlay(OverlayPart::Backdrop);
    let title = TargetId::Overlay(OverlayPart::Title);
    let subtitle = TargetId::Overlay(OverlayPart::Subtitle);

    let mut base = Scene::new();
    base.insert(backdrop, VisualProps::HIDDEN);
    base.insert(title, PropPatch::new().shift(-1.0, 0.0).apply(VisualProps::HIDDEN));
    base.insert(subtitle, PropPatch::new().shift(1.0, 0.0).apply(VisualProps::HIDDEN));

    let mut tl = TimelineBuilder::new(base);
    let shown = PropPatch::new().shift(0.0, 0.0).opacity(1.0);
    tl.to(backdrop, PropPatch::new().opacity(1.0), 0.5, Ease::OutCubic, Position::At(0.0));
    tl.to(title, shown, 0.8, Ease::OutQuart, Position::At(0.0));
    tl.to(subtitle, shown, 0.8, Ease::OutQuart, Position::AfterEnd(-0.4));

    let pulse_at = tl.end() + 0.5;
    for target in [title, subtitle] {
        tl.to(target, PropPatch::new().scale(1.1), 0.3, Ease::InOutCubic, Position::At(pulse_at));
        tl.to(
            target,
            PropPatch::new().scale(1.0),
            0.3,
            Ease::InOutCubic,
            Position::At(pulse_at + 0.3),
        );
    }
    if tl.end() < total_secs {
        tl.wait(total_secs - tl.end());
    }
    tl.build()
}

#[cfg(test)]
#[path = "../../tests/unit/playback/encounter.rs"]
mod tests;
