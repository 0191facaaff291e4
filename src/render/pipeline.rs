use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CutplayError, CutplayResult};
use crate::playback::sequencer::SequencerState;
use crate::playback::session::{PlaybackSession, SessionEvent};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuCompositor;

/// Largest clock step used when seeking to a playback time.
pub const SEEK_STEP_SECS: f64 = 1.0 / 60.0;

/// Controls for stepping a session into frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOpts {
    /// Output frame rate; the session clock advances one frame duration per frame.
    pub fps: Fps,
    /// Stop after this much playback time even when playback has not completed.
    pub max_secs: f64,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            fps: Fps { num: 30, den: 1 },
            max_secs: 600.0,
        }
    }
}

/// Counters from [`render_playback`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Playback time covered by the frames.
    pub secs: f64,
    /// Whether playback reached its natural end.
    pub completed: bool,
    /// Encounters entered during the render.
    pub encounters: u32,
}

/// Play `session` from the start and stream one frame per clock step into `sink`.
///
/// Frame 0 shows the baseline at "start playback"; the last frame is the first one sampled after
/// completion, or the frame at `max_secs`.
#[tracing::instrument(skip_all, fields(fps = opts.fps.as_f64(), max_secs = opts.max_secs))]
pub fn render_playback(
    session: &mut PlaybackSession,
    compositor: &mut CpuCompositor,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> CutplayResult<RenderStats> {
    if opts.fps.num == 0 || opts.fps.den == 0 {
        return Err(CutplayError::validation("fps must be non-zero"));
    }
    if !(opts.max_secs.is_finite() && opts.max_secs > 0.0) {
        return Err(CutplayError::validation("max_secs must be finite and > 0"));
    }
    let (width, height) = session.viewport().pixel_size();
    if width == 0 || height == 0 {
        return Err(CutplayError::validation("viewport has zero size"));
    }

    let dt = opts.fps.frame_duration_secs();
    let max_frames = opts.fps.secs_to_frames_ceil(opts.max_secs).max(1);
    let mut stats = RenderStats::default();

    session.start();
    sink.begin(SinkConfig {
        width,
        height,
        fps: opts.fps,
    })?;
    for idx in 0..max_frames {
        let frame = compositor.render(&session.snapshot())?;
        sink.push_frame(FrameIndex(idx), &frame)?;
        stats.frames += 1;
        stats.secs = opts.fps.frames_to_secs(idx);

        if session.state() == SequencerState::Completed {
            stats.completed = true;
            break;
        }
        let events = session.tick(dt);
        stats.encounters += events
            .iter()
            .filter(|e| matches!(e, SessionEvent::EncounterStarted { .. }))
            .count() as u32;
    }
    sink.end()?;

    if stats.completed {
        tracing::info!(frames = stats.frames, secs = stats.secs, "playback rendered");
    } else {
        tracing::warn!(
            frames = stats.frames,
            state = ?session.state(),
            "render stopped at max_secs before playback completed"
        );
    }
    Ok(stats)
}

/// Start playback and advance the clock to `secs` in steps of at most [`SEEK_STEP_SECS`].
pub fn seek(session: &mut PlaybackSession, secs: f64) -> CutplayResult<Vec<SessionEvent>> {
    if !(secs.is_finite() && secs >= 0.0) {
        return Err(CutplayError::validation("playback time must be finite and >= 0"));
    }
    session.start();
    let mut events = Vec::new();
    let mut elapsed = 0.0;
    while secs - elapsed > 1e-9 {
        let dt = (secs - elapsed).min(SEEK_STEP_SECS);
        events.extend(session.tick(dt));
        elapsed += dt;
    }
    Ok(events)
}

/// Render the play-mode frame `secs` after "start playback".
pub fn render_frame_at(
    session: &mut PlaybackSession,
    compositor: &mut CpuCompositor,
    secs: f64,
) -> CutplayResult<FrameRGBA> {
    seek(session, secs)?;
    compositor.render(&session.snapshot())
}
