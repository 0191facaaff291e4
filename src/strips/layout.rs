use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::{Rect, Size};
use crate::geometry::contain::contain_fit;

/// Which effect a strip set serves. Decides band count and seam overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripVariant {
    /// Entrance bands, a fixed count.
    ShutterIn,
    /// Exit bands, counted from the viewport width, with seam overlap.
    ShutterOut,
    /// Two halves.
    Slice,
}

impl StripVariant {
    /// Number of bands for this variant.
    pub fn band_count(self, cfg: &PlaybackConfig, viewport_width: f64) -> usize {
        match self {
            Self::ShutterIn => cfg.shutter_in_strips,
            Self::ShutterOut => cfg.shutter_out_count(viewport_width),
            Self::Slice => 2,
        }
    }

    /// Seam overlap on each side of a band.
    pub fn overlap_px(self, cfg: &PlaybackConfig) -> f64 {
        match self {
            Self::ShutterOut => cfg.out_strip_overlap_px,
            Self::ShutterIn | Self::Slice => 0.0,
        }
    }
}

/// Where the bands of one image sit inside a cut's image frame.
///
/// `placement` and `bands` are relative to the frame origin, in logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct StripLayout {
    /// Cut image frame.
    pub frame: Rect,
    /// Contain-fit rectangle of the image.
    pub placement: Rect,
    /// Band rectangles, left to right.
    pub bands: Vec<Rect>,
}

impl StripLayout {
    /// Layout of `count` bands for an image of `natural` size.
    pub fn new(frame: Rect, natural: Size, count: usize, overlap_px: f64) -> Self {
        let placement = contain_fit(natural, frame.size());
        Self {
            frame,
            placement,
            bands: band_rects(placement, count, overlap_px),
        }
    }

    /// Whether there are no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// `count` equal-width vertical bands tiling `placement` left to right.
///
/// Adjacent bands share their edge exactly. A positive `overlap_px` widens each band on both
/// sides, clamped to the placement. Empty placements yield no bands.
pub fn band_rects(placement: Rect, count: usize, overlap_px: f64) -> Vec<Rect> {
    if count == 0 || placement.width() <= 0.0 || placement.height() <= 0.0 {
        return Vec::new();
    }
    let w = placement.width();
    let edge = |i: usize| {
        if i == count {
            placement.x1
        } else {
            placement.x0 + w * i as f64 / count as f64
        }
    };
    let overlap = overlap_px.max(0.0);
    (0..count)
        .map(|i| {
            let x0 = (edge(i) - overlap).max(placement.x0);
            let x1 = (edge(i + 1) + overlap).min(placement.x1);
            Rect::new(x0, placement.y0, x1, placement.y1)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/strips/layout.rs"]
mod tests;
