//! Frame sinks.
//!
//! Sinks consume rendered frames in playback order and are driven by
//! [`render_playback`](crate::render_playback).

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame sink trait and built-in sinks.
pub mod sink;
