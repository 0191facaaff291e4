//! MP4 output through the system `ffmpeg`.
//!
//! Frames arrive premultiplied from the compositor, get flattened over the page background and
//! are piped to `ffmpeg` as raw RGBA. Viewport sizes at fractional pixel ratios are often odd,
//! which yuv420p cannot encode, so the encoder pads them by one pixel instead of failing.

use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8Premul};
use crate::foundation::error::{CutplayError, CutplayResult};
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 path; its parent directory is created on `begin`.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Colour under transparent pixels and in the padding of odd-sized frames.
    pub background: Rgba8Premul,
    /// x264 constant rate factor; lower is better quality.
    pub crf: u8,
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path` over a black page.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8Premul::opaque(0, 0, 0),
            crf: 20,
        }
    }
}

/// `ffmpeg` arguments for encoding frames of `cfg` read from stdin.
pub fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args: Vec<String> = vec![
        if opts.overwrite { "-y" } else { "-n" }.into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-s".into(),
        format!("{}x{}", cfg.width, cfg.height),
        // Before `-i`, `-r` is the raw input rate.
        "-r".into(),
        format!("{}/{}", cfg.fps.num, cfg.fps.den),
        "-i".into(),
        "pipe:0".into(),
        "-an".into(),
    ];
    if !(cfg.width.is_multiple_of(2) && cfg.height.is_multiple_of(2)) {
        let bg = opts.background;
        args.push("-vf".into());
        args.push(format!(
            "pad=ceil(iw/2)*2:ceil(ih/2)*2:color=0x{:02x}{:02x}{:02x}",
            bg.r, bg.g, bg.b
        ));
    }
    args.extend(
        ["-c:v", "libx264", "-crf"]
            .into_iter()
            .map(String::from)
            .chain([opts.crf.to_string()])
            .chain(
                ["-pix_fmt", "yuv420p", "-movflags", "+faststart"]
                    .into_iter()
                    .map(String::from),
            ),
    );
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

/// A running `ffmpeg` process with its stderr collected on a side thread.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<Vec<u8>>,
}

impl Encoder {
    fn spawn(args: &[String]) -> CutplayResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CutplayError::evaluation(
                    "MP4 output needs ffmpeg, which was not found on PATH",
                ),
                _ => CutplayError::evaluation(format!("failed to spawn ffmpeg: {e}")),
            })?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(CutplayError::evaluation("ffmpeg started without pipes"));
        };
        let stderr = std::thread::spawn(move || {
            let mut log = Vec::new();
            let _ = stderr.read_to_end(&mut log);
            log
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> CutplayResult<()> {
        self.stdin
            .write_all(bytes)
            .context("write frame to ffmpeg")?;
        Ok(())
    }

    /// Close stdin and wait; a failed encode reports ffmpeg's own log.
    fn finish(self) -> CutplayResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        drop(stdin);
        let status = child.wait().context("wait for ffmpeg")?;
        let log = stderr.join().unwrap_or_default();
        if status.success() {
            return Ok(());
        }
        Err(CutplayError::evaluation(format!(
            "ffmpeg exited with {status}: {}",
            String::from_utf8_lossy(&log).trim()
        )))
    }
}

/// Streams flattened frames into an MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    cfg: Option<SinkConfig>,
    encoder: Option<Encoder>,
    scratch: Vec<u8>,
    next: u64,
}

impl FfmpegSink {
    /// Sink that spawns `ffmpeg` on `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            cfg: None,
            encoder: None,
            scratch: Vec::new(),
            next: 0,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CutplayResult<()> {
        cfg.validate()?;
        let out = &self.opts.out_path;
        if !self.opts.overwrite && out.exists() {
            return Err(CutplayError::validation(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }

        let args = encoder_args(&cfg, &self.opts);
        tracing::debug!(?args, "spawning ffmpeg");
        self.encoder = Some(Encoder::spawn(&args)?);
        self.cfg = Some(cfg);
        self.next = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CutplayResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(CutplayError::evaluation("ffmpeg sink not started"));
        };
        if idx.0 < self.next {
            return Err(CutplayError::evaluation(format!(
                "frame {} arrived after frame {}",
                idx.0,
                self.next - 1
            )));
        }
        cfg.check_frame(frame)?;
        frame.flatten_over(self.opts.background, &mut self.scratch);
        encoder.write(&self.scratch)?;
        self.next = idx.0 + 1;
        Ok(())
    }

    fn end(&mut self) -> CutplayResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| CutplayError::evaluation("ffmpeg sink not started"))?;
        encoder.finish()?;
        tracing::info!(frames = self.next, out = %self.opts.out_path.display(), "mp4 written");
        self.cfg = None;
        Ok(())
    }
}
