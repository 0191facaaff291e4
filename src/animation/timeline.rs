use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::animation::props::{Lerp, PropPatch, VisualProps};
use crate::foundation::math::{TIME_EPSILON, approx_le};

/// Parts of the encounter interstitial overlay.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPart {
    /// Dimmed full-viewport backdrop.
    Backdrop,
    /// Title banner.
    Title,
    /// Subtitle banner.
    Subtitle,
}

/// Stable handle of an animatable render target.
///
/// Targets are addressed by cut index, never by lookup of rendered nodes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    /// The full-viewport container of a cut.
    Cut(usize),
    /// The image layer inside a cut container.
    Content(usize),
    /// One band of a cut's shutter strip set.
    Strip {
        /// Owning cut.
        cut: usize,
        /// Band index, left to right.
        index: usize,
    },
    /// One half of a cut's slice-split.
    Slice {
        /// Owning cut.
        cut: usize,
        /// `0` is the left half, `1` the right.
        half: usize,
    },
    /// A part of the encounter interstitial.
    Overlay(OverlayPart),
}

/// Resolved visual state of every target at one timeline offset.
pub type Scene = BTreeMap<TargetId, VisualProps>;

/// Where a new entry lands on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    End,
    /// At the start of the previously added entry.
    WithPrevious,
    /// At an absolute offset.
    At(f64),
    /// At the current end plus a gap.
    AfterEnd(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EntryKind {
    Set(VisualProps),
    Tween {
        from: VisualProps,
        to: VisualProps,
        ease: Ease,
    },
}

impl EntryKind {
    // Sets land before tweens that start at the same offset.
    fn rank(&self) -> u8 {
        match self {
            Self::Set(_) => 0,
            Self::Tween { .. } => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Entry {
    target: TargetId,
    start: f64,
    duration: f64,
    kind: EntryKind,
    seq: usize,
}

impl Entry {
    fn cmp_order(&self, other: &Self) -> std::cmp::Ordering {
        self.start
            .total_cmp(&other.start)
            .then(self.kind.rank().cmp(&other.kind.rank()))
            .then(self.seq.cmp(&other.seq))
    }

    /// Value at `t` layered over `current`. Tweens never touch stacking order.
    fn apply_at(&self, current: VisualProps, t: f64) -> VisualProps {
        match self.kind {
            EntryKind::Set(props) => props,
            EntryKind::Tween { from, to, ease } => {
                let v = if self.duration <= TIME_EPSILON || approx_le(self.start + self.duration, t)
                {
                    to
                } else {
                    let p = ((t - self.start) / self.duration).clamp(0.0, 1.0);
                    VisualProps::lerp(&from, &to, ease.apply(p))
                };
                v.with_z(current.z_index)
            }
        }
    }
}

#[derive(Clone, Debug)]
struct CueEntry<C> {
    at: f64,
    cue: C,
    halting: bool,
}

/// Builder for a [`Timeline`].
///
/// Tween start values are resolved while building, from the target's state at the tween's start
/// offset. Tweens on one target must not overlap.
#[derive(Clone, Debug)]
pub struct TimelineBuilder<C> {
    base: Scene,
    entries: Vec<Entry>,
    cues: Vec<CueEntry<C>>,
    end: f64,
    prev_start: f64,
}

impl<C: Clone> TimelineBuilder<C> {
    /// Empty timeline over the `base` scene.
    pub fn new(base: Scene) -> Self {
        Self {
            base,
            entries: Vec::new(),
            cues: Vec::new(),
            end: 0.0,
            prev_start: 0.0,
        }
    }

    /// Offset where the last entry, wait, or cue ends.
    pub fn end(&self) -> f64 {
        self.end
    }

    fn resolve(&self, pos: Position) -> f64 {
        match pos {
            Position::End => self.end,
            Position::WithPrevious => self.prev_start,
            Position::At(t) => t.max(0.0),
            Position::AfterEnd(gap) => (self.end + gap).max(0.0),
        }
    }

    fn mark(&mut self, start: f64, end: f64) {
        self.prev_start = start;
        self.end = self.end.max(end);
    }

    /// Append an empty interval of `duration` at the end (a hold).
    pub fn wait(&mut self, duration: f64) -> f64 {
        let start = self.end;
        self.mark(start, start + duration.max(0.0));
        start
    }

    /// Instantaneous state change.
    pub fn set(&mut self, target: TargetId, patch: PropPatch, pos: Position) -> f64 {
        let start = self.resolve(pos);
        let props = patch.apply(self.state_at(target, start));
        self.push(target, start, 0.0, EntryKind::Set(props));
        self.mark(start, start);
        start
    }

    /// Interpolated change over `duration`.
    pub fn to(
        &mut self,
        target: TargetId,
        patch: PropPatch,
        duration: f64,
        ease: Ease,
        pos: Position,
    ) -> f64 {
        let start = self.resolve(pos);
        let duration = duration.max(0.0);
        let from = self.state_at(target, start);
        let to = patch.apply(from);
        self.push(target, start, duration, EntryKind::Tween { from, to, ease });
        self.mark(start, start + duration);
        start
    }

    /// One tween per target, each starting `stagger` after the previous one.
    pub fn stagger_to(
        &mut self,
        targets: &[TargetId],
        patch_for: impl Fn(usize) -> PropPatch,
        duration: f64,
        stagger: f64,
        ease: Ease,
        pos: Position,
    ) -> f64 {
        let start = self.resolve(pos);
        let duration = duration.max(0.0);
        let mut last_end = start;
        for (i, &target) in targets.iter().enumerate() {
            let s = start + stagger.max(0.0) * i as f64;
            let from = self.state_at(target, s);
            let to = patch_for(i).apply(from);
            self.push(target, s, duration, EntryKind::Tween { from, to, ease });
            last_end = last_end.max(s + duration);
        }
        self.mark(start, last_end);
        start
    }

    /// Typed event fired when the playhead crosses `pos`.
    pub fn cue(&mut self, cue: C, pos: Position) -> f64 {
        self.push_cue(cue, pos, false)
    }

    /// Like [`TimelineBuilder::cue`], but the playhead stops exactly on it until resumed.
    pub fn halting_cue(&mut self, cue: C, pos: Position) -> f64 {
        self.push_cue(cue, pos, true)
    }

    fn push_cue(&mut self, cue: C, pos: Position, halting: bool) -> f64 {
        let at = self.resolve(pos);
        self.cues.push(CueEntry { at, cue, halting });
        self.mark(at, at);
        at
    }

    fn push(&mut self, target: TargetId, start: f64, duration: f64, kind: EntryKind) {
        let seq = self.entries.len();
        self.entries.push(Entry {
            target,
            start,
            duration,
            kind,
            seq,
        });
    }

    /// State of `target` at offset `t` given the entries added so far.
    pub fn state_at(&self, target: TargetId, t: f64) -> VisualProps {
        let mut mine: Vec<&Entry> = self.entries.iter().filter(|e| e.target == target).collect();
        mine.sort_by(|a, b| a.cmp_order(b));
        fold_target(mine.into_iter(), base_of(&self.base, target), t)
    }

    /// Sort the entries and freeze the timeline.
    pub fn build(self) -> Timeline<C> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| a.cmp_order(b));
        let mut cues = self.cues;
        cues.sort_by(|a, b| a.at.total_cmp(&b.at));
        Timeline {
            base: self.base,
            entries,
            cues,
            duration: self.end,
        }
    }
}

fn base_of(base: &Scene, target: TargetId) -> VisualProps {
    base.get(&target).copied().unwrap_or_default()
}

// `entries` must be in timeline order and belong to one target.
fn fold_target<'a>(entries: impl Iterator<Item = &'a Entry>, base: VisualProps, t: f64) -> VisualProps {
    let mut current = base;
    for entry in entries {
        if !approx_le(entry.start, t) {
            break;
        }
        current = entry.apply_at(current, t);
    }
    current
}

/// Immutable schedule of sets, tweens, and cues over a shared clock.
#[derive(Clone, Debug)]
pub struct Timeline<C> {
    base: Scene,
    entries: Vec<Entry>,
    cues: Vec<CueEntry<C>>,
    duration: f64,
}

impl<C: Clone> Timeline<C> {
    /// Offset of the last entry's end.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Scene before any entry applies.
    pub fn base(&self) -> &Scene {
        &self.base
    }

    /// Every target's state at offset `t`. Pure in `t`.
    pub fn sample(&self, t: f64) -> Scene {
        let mut scene = self.base.clone();
        for entry in &self.entries {
            if !approx_le(entry.start, t) {
                break;
            }
            let current = base_of(&scene, entry.target);
            scene.insert(entry.target, entry.apply_at(current, t));
        }
        scene
    }

    /// State of one target at offset `t`.
    pub fn sample_target(&self, target: TargetId, t: f64) -> VisualProps {
        fold_target(
            self.entries.iter().filter(|e| e.target == target),
            base_of(&self.base, target),
            t,
        )
    }

    /// Offsets and payloads of every cue, in firing order.
    pub fn cues(&self) -> impl Iterator<Item = (f64, &C)> {
        self.cues.iter().map(|c| (c.at, &c.cue))
    }
}

/// Lifecycle of a [`Playhead`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayheadState {
    /// Advancing on every call to [`Playhead::advance`].
    Running,
    /// Frozen by [`Playhead::pause`].
    Paused,
    /// Stopped on a halting cue; resumes like a pause.
    Halted,
    /// Reached the end of the timeline.
    Completed,
    /// Abandoned; never advances again.
    Killed,
}

/// Moves through a [`Timeline`] on a shared clock and reports crossed cues.
#[derive(Clone, Debug)]
pub struct Playhead<C> {
    timeline: Timeline<C>,
    time: f64,
    next_cue: usize,
    state: PlayheadState,
}

impl<C: Clone> Playhead<C> {
    /// Playhead at offset zero, running.
    pub fn new(timeline: Timeline<C>) -> Self {
        Self {
            timeline,
            time: 0.0,
            next_cue: 0,
            state: PlayheadState::Running,
        }
    }

    /// Current offset.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlayheadState {
        self.state
    }

    /// Timeline being played.
    pub fn timeline(&self) -> &Timeline<C> {
        &self.timeline
    }

    /// Whether the end was reached.
    pub fn is_complete(&self) -> bool {
        self.state == PlayheadState::Completed
    }

    /// Advance by `dt` seconds, returning the cues crossed in order.
    ///
    /// A halting cue stops time at its own offset; the rest of `dt` is dropped.
    pub fn advance(&mut self, dt: f64) -> Vec<C> {
        let mut fired = Vec::new();
        if self.state != PlayheadState::Running {
            return fired;
        }
        let target = self.time + dt.max(0.0);
        while let Some(cue) = self.timeline.cues.get(self.next_cue) {
            if !approx_le(cue.at, target) {
                break;
            }
            self.next_cue += 1;
            fired.push(cue.cue.clone());
            if cue.halting {
                self.time = cue.at.max(self.time);
                self.state = PlayheadState::Halted;
                return fired;
            }
        }
        self.time = target.min(self.timeline.duration);
        if approx_le(self.timeline.duration, self.time) {
            self.time = self.timeline.duration;
            self.state = PlayheadState::Completed;
        }
        fired
    }

    /// Freeze a running playhead.
    pub fn pause(&mut self) {
        if self.state == PlayheadState::Running {
            self.state = PlayheadState::Paused;
        }
    }

    /// Continue after a pause or a halting cue.
    pub fn resume(&mut self) {
        if matches!(self.state, PlayheadState::Paused | PlayheadState::Halted) {
            self.state = PlayheadState::Running;
        }
    }

    /// Stop for good.
    pub fn kill(&mut self) {
        self.state = PlayheadState::Killed;
    }

    /// Scene at the current offset.
    pub fn sample(&self) -> Scene {
        self.timeline.sample(self.time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
