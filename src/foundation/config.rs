use std::path::Path;

use crate::foundation::error::{CutplayError, CutplayResult};

/// Tunables for play-mode sequencing and strip geometry.
///
/// Every field has a default, so a config file only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Length of the transition interval between two cuts.
    pub transition_secs: f64,
    /// Hold applied when a cut carries no usable duration.
    pub default_hold_secs: f64,
    /// Wait between "start playback" and the first timeline tick.
    pub start_delay_secs: f64,
    /// Base stacking order for cut containers.
    pub z_index_base: i32,
    /// Length of the "encounter" interstitial shown before the mini-game mounts.
    pub encounter_interstitial_secs: f64,
    /// Strip count for the shutter entrance.
    pub shutter_in_strips: usize,
    /// Strip count for the shutter exit on wide viewports.
    pub shutter_out_strips: usize,
    /// Strip count for the shutter exit on narrow viewports.
    pub shutter_out_strips_compact: usize,
    /// Viewport width at or below which the compact strip count applies.
    pub compact_breakpoint_px: f64,
    /// Start offset between consecutive strips.
    pub strip_stagger_secs: f64,
    /// Per-strip duration of the shutter entrance.
    pub shutter_in_strip_secs: f64,
    /// Slice-split duration as a fraction of `transition_secs`.
    pub slice_duration_factor: f64,
    /// Delay before re-measuring a container that had zero size.
    pub measure_retry_secs: f64,
    /// Seam overlap added to each exit strip, in logical pixels.
    pub out_strip_overlap_px: f64,
    /// Duration of the defensive fade used for out-of-range cut indices.
    pub fallback_fade_secs: f64,
    /// Maximum width of the image frame inside a cut container.
    pub frame_max_width_px: f64,
    /// Width over height of the image frame.
    pub frame_aspect: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            transition_secs: 1.0,
            default_hold_secs: 3.0,
            start_delay_secs: 0.5,
            z_index_base: 1000,
            encounter_interstitial_secs: 2.5,
            shutter_in_strips: 15,
            shutter_out_strips: 15,
            shutter_out_strips_compact: 10,
            compact_breakpoint_px: 768.0,
            strip_stagger_secs: 0.05,
            shutter_in_strip_secs: 0.5,
            slice_duration_factor: 0.5,
            measure_retry_secs: 0.1,
            out_strip_overlap_px: 0.5,
            fallback_fade_secs: 3.0,
            frame_max_width_px: 800.0,
            frame_aspect: 4.0 / 5.0,
        }
    }
}

impl PlaybackConfig {
    /// Parse and validate a config from JSON.
    pub fn from_reader(reader: impl std::io::Read) -> CutplayResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| CutplayError::serde(format!("parse playback config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> CutplayResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            CutplayError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject non-positive durations and strip counts that cannot tile an image.
    pub fn validate(&self) -> CutplayResult<()> {
        let positive = [
            ("transition_secs", self.transition_secs),
            ("default_hold_secs", self.default_hold_secs),
            ("encounter_interstitial_secs", self.encounter_interstitial_secs),
            ("shutter_in_strip_secs", self.shutter_in_strip_secs),
            ("slice_duration_factor", self.slice_duration_factor),
            ("fallback_fade_secs", self.fallback_fade_secs),
            ("frame_max_width_px", self.frame_max_width_px),
            ("frame_aspect", self.frame_aspect),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(CutplayError::validation(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
        }
        let non_negative = [
            ("start_delay_secs", self.start_delay_secs),
            ("strip_stagger_secs", self.strip_stagger_secs),
            ("measure_retry_secs", self.measure_retry_secs),
            ("out_strip_overlap_px", self.out_strip_overlap_px),
            ("compact_breakpoint_px", self.compact_breakpoint_px),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(CutplayError::validation(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        if self.shutter_in_strips == 0
            || self.shutter_out_strips == 0
            || self.shutter_out_strips_compact == 0
        {
            return Err(CutplayError::validation("strip counts must be > 0"));
        }
        Ok(())
    }

    /// Duration of the slice-split exit.
    pub fn slice_secs(&self) -> f64 {
        self.transition_secs * self.slice_duration_factor
    }

    /// Strip count for a synthesized shutter exit on a viewport of the given width.
    pub fn shutter_out_count(&self, viewport_width: f64) -> usize {
        if viewport_width <= self.compact_breakpoint_px {
            self.shutter_out_strips_compact
        } else {
            self.shutter_out_strips
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
