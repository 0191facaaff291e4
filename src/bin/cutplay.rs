use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cutplay::{
    AnimationOverride, AnimationType, CpuCompositor, EpisodeRecord, FfmpegSink, FfmpegSinkOpts,
    FrameSink, ImageStore, PlaybackConfig, PlaybackSession, PngSequenceSink, RenderOpts,
    ScheduleEnv, ScriptedEncounter, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "cutplay", version, about = "Headless webtoon play-mode renderer")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the playback schedule of an episode as JSON.
    Plan(PlanArgs),
    /// Render the play-mode frame at a playback time as a PNG.
    Frame(FrameArgs),
    /// Render a whole playback to a PNG sequence or an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct Common {
    /// Input episode JSON. Image references resolve relative to its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport as WIDTHxHEIGHT in logical pixels.
    #[arg(long, default_value = "390x844")]
    viewport: String,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Use this entrance for every cut instead of each cut's own.
    #[arg(long)]
    animation: Option<String>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    common: Common,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: Common,

    /// Seconds after "start playback", startup delay included.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Seconds the scripted encounter takes to resolve.
    #[arg(long, default_value_t = 3.0)]
    battle_secs: f64,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: Common,

    /// Output directory for PNG frames, or a `.mp4` file.
    #[arg(long)]
    out: PathBuf,

    /// Output frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Stop after this many seconds of playback.
    #[arg(long, default_value_t = 600.0)]
    max_secs: f64,

    /// Seconds the scripted encounter takes to resolve.
    #[arg(long, default_value_t = 3.0)]
    battle_secs: f64,

    /// Overwrite an existing MP4.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

struct Loaded {
    episode: EpisodeRecord,
    cfg: PlaybackConfig,
    viewport: Viewport,
    overrides: AnimationOverride,
    assets_root: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load(common: &Common) -> anyhow::Result<Loaded> {
    let episode = EpisodeRecord::from_path(&common.in_path)?;
    let cfg = match &common.config {
        Some(path) => PlaybackConfig::from_path(path)?,
        None => PlaybackConfig::default(),
    };
    let viewport = Viewport::parse(&common.viewport)?.with_device_pixel_ratio(common.dpr);
    let overrides = match common.animation.as_deref() {
        Some(name) => AnimationOverride::Uniform(
            AnimationType::parse(name)
                .with_context(|| format!("unknown animation type '{name}'"))?,
        ),
        None => AnimationOverride::Individual,
    };
    let assets_root = common
        .in_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok(Loaded {
        episode,
        cfg,
        viewport,
        overrides,
        assets_root,
    })
}

fn session(loaded: Loaded, battle_secs: f64) -> anyhow::Result<PlaybackSession> {
    let sequence = loaded.episode.to_sequence(loaded.overrides, &loaded.cfg)?;
    let images = ImageStore::new(loaded.assets_root);
    Ok(
        PlaybackSession::new(sequence, loaded.cfg, loaded.viewport, images)
            .with_host(Box::new(ScriptedEncounter::new(battle_secs))),
    )
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let loaded = load(&args.common)?;
    let width = loaded.viewport.width;
    let cfg = loaded.cfg.clone();
    let session = session(loaded, 0.0)?;

    let seq = session.sequence();
    let images = session.images();
    let ready = |i: usize| {
        seq.get(i)
            .and_then(|c| c.image_ref())
            .is_some_and(|r| images.get(r).is_some())
    };
    let env = ScheduleEnv {
        cfg: &cfg,
        viewport_width: width,
        image_ready: &ready,
    };
    let schedule = cutplay::build_schedule(seq, &env);
    let json = serde_json::to_string_pretty(&schedule.plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let loaded = load(&args.common)?;
    let mut session = session(loaded, args.battle_secs)?;
    let mut compositor = CpuCompositor::default();
    let frame = cutplay::render_frame_at(&mut session, &mut compositor, args.at)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    cutplay::encode::sink::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let loaded = load(&args.common)?;
    let mut session = session(loaded, args.battle_secs)?;
    let mut compositor = CpuCompositor::default();
    let opts = RenderOpts {
        fps: cutplay::Fps::new(args.fps, 1)?,
        max_secs: args.max_secs,
    };

    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
    let mut sink: Box<dyn FrameSink> = if is_mp4 {
        Box::new(FfmpegSink::new(FfmpegSinkOpts {
            overwrite: args.overwrite,
            ..FfmpegSinkOpts::new(&args.out)
        }))
    } else {
        Box::new(PngSequenceSink::new(&args.out))
    };

    let stats = cutplay::render_playback(&mut session, &mut compositor, &opts, sink.as_mut())?;
    eprintln!(
        "wrote {} ({} frames, {:.2}s{})",
        args.out.display(),
        stats.frames,
        stats.secs,
        if stats.completed { "" } else { ", incomplete" }
    );
    Ok(())
}
