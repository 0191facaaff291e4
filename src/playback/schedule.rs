//! Turns a [`Sequence`] into one timeline of holds and transitions.
//!
//! Cut `i` holds for its own duration, then one transition segment plays cut `i`'s exit and cut
//! `i + 1`'s entrance on the same clock. The next hold starts once every entry of the segment
//! has finished, stagger tails included.

use crate::animation::ease::Ease;
use crate::animation::props::{PropPatch, VisualProps};
use crate::animation::timeline::{Position, Scene, TargetId, Timeline, TimelineBuilder};
use crate::effects::profile::{AnimationType, EntranceStyle, OutEffect, profile};
use crate::effects::rules::{PlannedEntrance, exit_secs, plan_entrance};
use crate::foundation::config::PlaybackConfig;
use crate::sequence::model::{Cut, Sequence};
use crate::strips::layout::StripVariant;

/// Events the timeline reports to whoever drives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "cue")]
pub enum TimelineCue {
    /// `cut` is fully shown; its hold starts.
    Enter {
        /// Cut index.
        cut: usize,
    },
    /// Transition segment from `from` to `to` begins.
    Transition {
        /// Outgoing cut.
        from: usize,
        /// Incoming cut.
        to: usize,
    },
    /// Draw `count` bands of `cut`'s image for an exit.
    MountStrips {
        /// Cut whose image is split.
        cut: usize,
        /// Band geometry to cut.
        variant: StripVariant,
        /// Number of bands.
        count: usize,
    },
    /// Drop `cut`'s strip set; its content draws again.
    ReleaseStrips {
        /// Cut index.
        cut: usize,
    },
    /// The next cut (or the first one) is an encounter; the timeline stops here until resumed.
    Encounter {
        /// The encounter cut.
        cut: usize,
    },
}

/// Serializable summary of a built schedule.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SchedulePlan {
    /// Timeline length.
    pub duration_secs: f64,
    /// One segment per cut, in order.
    pub cuts: Vec<CutSegment>,
}

/// Hold and outgoing transition of one cut.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CutSegment {
    /// Cut index.
    pub cut: usize,
    /// `image` or `encounter`.
    pub kind: &'static str,
    /// Entrance identifier after encounter overrides.
    pub entrance: AnimationType,
    /// Offset where the cut is fully shown.
    pub hold_start: f64,
    /// Offset where its transition begins.
    pub hold_end: f64,
    /// Transition into the next cut; `None` for the last cut.
    pub transition: Option<TransitionWindow>,
}

/// Offsets of one transition segment on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TransitionWindow {
    /// Offset of the segment start, equal to the outgoing hold end.
    pub start: f64,
    /// Offset where every entry of the segment has finished.
    pub end: f64,
    /// Exit played by the outgoing cut.
    pub out_effect: OutEffect,
    /// Offset where the exit ends, stagger tail included.
    pub exit_end: f64,
    /// Offset where the incoming entrance starts.
    pub entrance_start: f64,
    /// Offset where the incoming entrance ends.
    pub entrance_end: f64,
    /// The incoming entrance was replaced by the exit's rule.
    pub forced_entrance: bool,
    /// Playback stops at `start` for an encounter.
    pub encounter: bool,
}

/// Built timeline plus its summary.
#[derive(Clone, Debug)]
pub struct Schedule {
    /// Everything that moves, on one clock.
    pub timeline: Timeline<TimelineCue>,
    /// Summary of `timeline`.
    pub plan: SchedulePlan,
}

/// Per-build facts about the rendering side.
#[derive(Clone, Copy)]
pub struct ScheduleEnv<'a> {
    /// Timing and strip constants.
    pub cfg: &'a PlaybackConfig,
    /// Logical viewport width, for the shutter exit's strip count.
    pub viewport_width: f64,
    /// Whether the image of a cut is loaded, so strips can be cut from it.
    pub image_ready: &'a dyn Fn(usize) -> bool,
}

/// Entrance identifier of a cut. Encounter cuts always fade.
pub fn entrance_of(cut: &Cut) -> AnimationType {
    if cut.is_encounter() {
        AnimationType::Basic
    } else {
        cut.in_effect
    }
}

/// Exit identifier of a cut. Encounter cuts always fade.
pub fn exit_of(cut: &Cut) -> OutEffect {
    if cut.is_encounter() {
        OutEffect::FadeOut
    } else {
        cut.effective_out()
    }
}

/// Stacking order of a cut at rest; the first cut starts on top.
pub fn resting_z(cut_count: usize, index: usize, cfg: &PlaybackConfig) -> i32 {
    let n = cut_count as i32;
    if index == 0 {
        n + cfg.z_index_base
    } else {
        n - index as i32 + cfg.z_index_base
    }
}

/// Stacking order of a cut once its exit has finished, below every resting cut.
pub fn retired_z(cut_count: usize, index: usize) -> i32 {
    cut_count as i32 - index as i32
}

fn shows_via_strips(seq: &Sequence, index: usize, env: &ScheduleEnv<'_>) -> bool {
    seq.get(index).is_some_and(|c| {
        profile(entrance_of(c)).entrance == EntranceStyle::Strips && (env.image_ready)(index)
    })
}

fn strip_targets(cut: usize, count: usize) -> Vec<TargetId> {
    (0..count).map(|index| TargetId::Strip { cut, index }).collect()
}

/// Entrance of the cut at `index` following an exit, with a plain fade for unknown indices.
pub fn planned_entrance(
    seq: &Sequence,
    prev_out: OutEffect,
    index: usize,
    cfg: &PlaybackConfig,
) -> PlannedEntrance {
    match seq.get(index) {
        Some(cut) => plan_entrance(prev_out, entrance_of(cut), cfg),
        None => {
            tracing::warn!(
                index,
                len = seq.len(),
                "cut index out of range, using plain fade"
            );
            let basic = profile(AnimationType::Basic);
            PlannedEntrance {
                style: EntranceStyle::Container,
                hidden: basic.hidden,
                shown: basic.shown,
                content_hidden: None,
                ease: Ease::InOutCubic,
                duration_secs: cfg.fallback_fade_secs,
                delay_secs: 0.0,
                forced: false,
            }
        }
    }
}

/// Visual state of every target before playback: first cut shown on top, the rest hidden.
pub fn baseline(seq: &Sequence, env: &ScheduleEnv<'_>) -> Scene {
    let n = seq.len();
    let cfg = env.cfg;
    let mut scene = Scene::new();
    for (i, cut) in seq.cuts().iter().enumerate() {
        let p = profile(entrance_of(cut));
        let z = resting_z(n, i, cfg);
        let container = if i == 0 { p.shown } else { p.hidden };
        scene.insert(TargetId::Cut(i), container.with_z(z));

        let content = if shows_via_strips(seq, i, env) {
            VisualProps::HIDDEN
        } else if i > 0 {
            p.content_hidden.unwrap_or(VisualProps::SHOWN)
        } else {
            VisualProps::SHOWN
        };
        scene.insert(TargetId::Content(i), content);

        if shows_via_strips(seq, i, env) {
            let rest = if i == 0 {
                VisualProps::SHOWN
            } else {
                PropPatch::new().shift(0.0, 1.0).apply(VisualProps::SHOWN)
            };
            for target in strip_targets(i, cfg.shutter_in_strips) {
                scene.insert(target, rest);
            }
        }
    }
    scene
}

/// Build the whole playback timeline.
#[tracing::instrument(skip(seq, env), fields(cuts = seq.len()))]
pub fn build_schedule(seq: &Sequence, env: &ScheduleEnv<'_>) -> Schedule {
    let n = seq.len();
    let cfg = env.cfg;
    let mut tl = TimelineBuilder::new(baseline(seq, env));
    let mut segments = Vec::with_capacity(n);

    // An opening encounter has no transition to stop on, so it stops before its own hold.
    if seq.get(0).is_some_and(Cut::is_encounter) {
        tl.halting_cue(TimelineCue::Encounter { cut: 0 }, Position::At(0.0));
    }

    for (i, cut) in seq.cuts().iter().enumerate() {
        tl.cue(TimelineCue::Enter { cut: i }, Position::End);
        let hold_start = tl.end();
        tl.wait(cut.hold_secs);
        let hold_end = tl.end();

        let transition = (i + 1 < n).then(|| add_transition(&mut tl, seq, i, hold_end, env));
        segments.push(CutSegment {
            cut: i,
            kind: if cut.is_encounter() {
                "encounter"
            } else {
                "image"
            },
            entrance: entrance_of(cut),
            hold_start,
            hold_end,
            transition,
        });
    }

    let timeline = tl.build();
    let plan = SchedulePlan {
        duration_secs: timeline.duration(),
        cuts: segments,
    };
    tracing::debug!(duration = plan.duration_secs, "schedule built");
    Schedule { timeline, plan }
}

fn add_transition(
    tl: &mut TimelineBuilder<TimelineCue>,
    seq: &Sequence,
    i: usize,
    t0: f64,
    env: &ScheduleEnv<'_>,
) -> TransitionWindow {
    let n = seq.len();
    let cfg = env.cfg;
    let next = i + 1;
    let encounter = seq.get(next).is_some_and(Cut::is_encounter);
    if encounter {
        tl.halting_cue(TimelineCue::Encounter { cut: next }, Position::At(t0));
    }
    tl.cue(TimelineCue::Transition { from: i, to: next }, Position::At(t0));
    tl.set(
        TargetId::Cut(next),
        PropPatch::new().z_index(resting_z(n, next, cfg)),
        Position::At(t0),
    );

    let out = seq.get(i).map(exit_of).unwrap_or(OutEffect::FadeOut);
    let exit_end = add_exit(tl, seq, i, out, t0, env);

    let entrance = planned_entrance(seq, out, next, cfg);
    let entrance_start = t0 + entrance.delay_secs;
    let entrance_end = add_entrance(tl, seq, next, &entrance, entrance_start, env);

    TransitionWindow {
        start: t0,
        end: tl.end(),
        out_effect: out,
        exit_end,
        entrance_start,
        entrance_end,
        forced_entrance: entrance.forced,
        encounter,
    }
}

/// Schedule the exit of cut `i`; returns when it ends.
fn add_exit(
    tl: &mut TimelineBuilder<TimelineCue>,
    seq: &Sequence,
    i: usize,
    out: OutEffect,
    t0: f64,
    env: &ScheduleEnv<'_>,
) -> f64 {
    let cfg = env.cfg;
    let n = seq.len();
    let container = TargetId::Cut(i);
    let dur = exit_secs(out, cfg);
    let end = match out {
        OutEffect::FadeOut | OutEffect::ZoomOut | OutEffect::SlideOut => {
            let (patch, ease) = match out.container_exit() {
                Some(exit) => exit,
                None => (PropPatch::new().opacity(0.0), Ease::InOutCubic),
            };
            tl.to(container, patch, dur, ease, Position::At(t0));
            if shows_via_strips(seq, i, env) {
                tl.cue(TimelineCue::ReleaseStrips { cut: i }, Position::At(t0 + dur));
            }
            t0 + dur
        }
        OutEffect::Slice => {
            if (env.image_ready)(i) {
                tl.cue(
                    TimelineCue::MountStrips {
                        cut: i,
                        variant: StripVariant::Slice,
                        count: 2,
                    },
                    Position::At(t0),
                );
                tl.set(TargetId::Content(i), PropPatch::new().opacity(0.0), Position::At(t0));
                for (half, dx) in [(0usize, -0.5), (1, 0.5)] {
                    tl.to(
                        TargetId::Slice { cut: i, half },
                        PropPatch::new().shift(dx, 0.0).opacity(0.0),
                        dur,
                        Ease::OutQuart,
                        Position::At(t0),
                    );
                }
                tl.cue(TimelineCue::ReleaseStrips { cut: i }, Position::At(t0 + dur));
                tl.set(container, PropPatch::new().opacity(0.0), Position::At(t0 + dur));
            } else {
                tracing::debug!(cut = i, "slice exit without image, fading instead");
                tl.to(
                    container,
                    PropPatch::new().opacity(0.0),
                    dur,
                    Ease::InOutCubic,
                    Position::At(t0),
                );
            }
            t0 + dur
        }
        OutEffect::ShutterOut => {
            let strips = if shows_via_strips(seq, i, env) {
                Some(cfg.shutter_in_strips)
            } else if (env.image_ready)(i) {
                let count = cfg.shutter_out_count(env.viewport_width);
                tl.cue(
                    TimelineCue::MountStrips {
                        cut: i,
                        variant: StripVariant::ShutterOut,
                        count,
                    },
                    Position::At(t0),
                );
                tl.set(TargetId::Content(i), PropPatch::new().opacity(0.0), Position::At(t0));
                Some(count)
            } else {
                None
            };
            let mut end = t0 + dur;
            if let Some(count) = strips {
                tl.stagger_to(
                    &strip_targets(i, count),
                    |k| {
                        let dy = if k % 2 == 0 { -1.0 } else { 1.0 };
                        PropPatch::new().shift(0.0, dy).opacity(0.0)
                    },
                    dur,
                    cfg.strip_stagger_secs,
                    Ease::OutQuart,
                    Position::At(t0),
                );
                end = end.max(t0 + dur + cfg.strip_stagger_secs * (count.saturating_sub(1)) as f64);
            }
            tl.to(
                container,
                PropPatch::new().opacity(0.0),
                dur,
                Ease::InOutCubic,
                Position::At(t0),
            );
            if strips.is_some() {
                tl.cue(TimelineCue::ReleaseStrips { cut: i }, Position::At(end));
            }
            end
        }
    };
    tl.set(
        container,
        PropPatch::new().z_index(retired_z(n, i)),
        Position::At(end),
    );
    end
}

/// Schedule the entrance of cut `j`; returns when it ends.
fn add_entrance(
    tl: &mut TimelineBuilder<TimelineCue>,
    seq: &Sequence,
    j: usize,
    entrance: &PlannedEntrance,
    start: f64,
    env: &ScheduleEnv<'_>,
) -> f64 {
    let cfg = env.cfg;
    let container = TargetId::Cut(j);
    let via_strips = shows_via_strips(seq, j, env);
    let at = Position::At(start);

    match entrance.style {
        EntranceStyle::Strips if via_strips => {
            tl.set(container, PropPatch::visual(entrance.shown), at);
            let count = cfg.shutter_in_strips;
            tl.stagger_to(
                &strip_targets(j, count),
                |_| PropPatch::new().shift(0.0, 0.0).opacity(1.0),
                cfg.shutter_in_strip_secs,
                cfg.strip_stagger_secs,
                entrance.ease,
                at,
            );
            start + cfg.shutter_in_strip_secs + cfg.strip_stagger_secs * (count - 1) as f64
        }
        EntranceStyle::Content => {
            tl.set(container, PropPatch::visual(entrance.shown), at);
            if let Some(hidden) = entrance.content_hidden {
                tl.set(TargetId::Content(j), PropPatch::visual(hidden), at);
            }
            tl.to(
                TargetId::Content(j),
                PropPatch::visual(VisualProps::SHOWN),
                entrance.duration_secs,
                entrance.ease,
                at,
            );
            start + entrance.duration_secs
        }
        EntranceStyle::Strips | EntranceStyle::Container => {
            // Cuts whose own style is not a container tween are shown plainly.
            if via_strips {
                for target in strip_targets(j, cfg.shutter_in_strips) {
                    tl.set(target, PropPatch::new().shift(0.0, 0.0).opacity(1.0), at);
                }
            } else if profile(seq.get(j).map(entrance_of).unwrap_or(AnimationType::Basic))
                .content_hidden
                .is_some()
            {
                tl.set(TargetId::Content(j), PropPatch::visual(VisualProps::SHOWN), at);
            }
            tl.set(container, PropPatch::visual(entrance.hidden), at);
            tl.to(
                container,
                PropPatch::visual(entrance.shown),
                entrance.duration_secs,
                entrance.ease,
                at,
            );
            start + entrance.duration_secs
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/schedule.rs"]
mod tests;
