//! cutplay is the play-mode engine of a webtoon viewer.
//!
//! It turns an ordered list of cuts into one timeline of holds and transitions, draws the
//! shutter and slice effects from pre-split image strips, and hands the screen to an interactive
//! encounter mid-sequence, pausing and resuming the timeline around it.
//!
//! - Build a [`Sequence`] (directly or from [`EpisodeRecord`]s)
//! - Create a [`PlaybackSession`] and drive it with [`PlaybackSession::tick`]
//! - Render frames with [`CpuCompositor`] or stream a whole run into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod assets;
/// Frame sinks.
pub mod encode;
pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod geometry;
pub(crate) mod playback;
/// CPU rendering.
pub mod render;
pub(crate) mod sequence;
pub(crate) mod strips;

pub use crate::animation::ease::Ease;
pub use crate::animation::props::{Lerp, PropPatch, VisualProps};
pub use crate::animation::timeline::{
    OverlayPart, Playhead, PlayheadState, Position, Scene, TargetId, Timeline, TimelineBuilder,
};
pub use crate::assets::decode::decode_image;
pub use crate::assets::store::{AssetStatus, ImageStore, PreparedImage};
pub use crate::effects::profile::{AnimationType, EntranceStyle, OutEffect, Profile, profile};
pub use crate::effects::rules::{PlannedEntrance, TransitionRule, plan_entrance, rule_for};
pub use crate::foundation::config::PlaybackConfig;
pub use crate::foundation::core::{
    Affine, Fps, FrameIndex, Point, Rect, Rgba8Premul, Size, Vec2, Viewport,
};
pub use crate::foundation::error::{CutplayError, CutplayResult};
pub use crate::geometry::contain::{contain_fit, image_frame};
pub use crate::playback::controller::{ModeController, ViewMode};
pub use crate::playback::encounter::{
    Combatant, EncounterHost, EncounterStatus, InterruptionCoordinator, InterruptionEvent,
    InterruptionState, Lineup, NullEncounter, ScriptedEncounter,
};
pub use crate::playback::schedule::{
    CutSegment, Schedule, ScheduleEnv, SchedulePlan, TimelineCue, TransitionWindow,
    build_schedule,
};
pub use crate::playback::scroll::SmoothScroll;
pub use crate::playback::sequencer::{PauseReason, Sequencer, SequencerEvent, SequencerState};
pub use crate::playback::session::{PlaybackSession, SessionEvent};
pub use crate::playback::snapshot::SceneSnapshot;
pub use crate::sequence::model::{Cut, CutKind, Sequence};
pub use crate::sequence::records::{AnimationOverride, CutRecord, EpisodeRecord};
pub use crate::strips::layout::{StripLayout, StripVariant, band_rects};
pub use crate::strips::registry::{MountOutcome, StripRegistry, StripRequest};
pub use crate::strips::surfaces::{StripSet, StripSurface};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{CompositorOpts, CpuCompositor};
pub use crate::render::pipeline::{
    RenderOpts, RenderStats, render_frame_at, render_playback, seek,
};
