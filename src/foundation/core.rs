use crate::foundation::error::{CutplayError, CutplayResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Zero-based index of a rendered frame.
pub struct FrameIndex(pub u64);

/// Frame rate as a rational `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Frames per `den` seconds.
    pub num: u32,
    /// Seconds per `num` frames.
    pub den: u32,
}

impl Fps {
    /// Checked constructor; both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> CutplayResult<Self> {
        if den == 0 {
            return Err(CutplayError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CutplayError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Seconds per frame.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Start time of frame `frames`.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Frames needed to cover `secs`.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Rendered viewport the play mode draws into, in CSS-like logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Backing-store pixels per logical pixel.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Viewport at pixel ratio 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Same viewport at pixel ratio `dpr`.
    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    /// Parse a `WIDTHxHEIGHT` string such as `390x844`.
    pub fn parse(s: &str) -> CutplayResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| CutplayError::validation(format!("viewport '{s}' is not WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| CutplayError::validation(format!("viewport '{s}' is not WxH")))
        };
        Ok(Self::new(f64::from(parse(w)?), f64::from(parse(h)?)))
    }

    /// Whether either side is zero or negative.
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Narrow viewports get fewer strips for the shutter exit.
    pub fn is_compact(self, breakpoint_px: f64) -> bool {
        self.width <= breakpoint_px
    }

    /// Viewport rectangle at the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }

    /// Output size in whole device pixels.
    pub fn pixel_size(self) -> (u32, u32) {
        let dpr = self.dpr();
        (
            (self.width.max(0.0) * dpr).round() as u32,
            (self.height.max(0.0) * dpr).round() as u32,
        )
    }

    /// Pixel ratio, `1.0` when unset or invalid.
    pub fn dpr(self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiply a straight-alpha colour.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}
