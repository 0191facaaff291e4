use crate::foundation::core::Vec2;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (`t = 0`) and `b` (`t = 1`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Animatable visual state of one render target (a cut container, its image, or a strip).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualProps {
    /// Alpha multiplier in `[0, 1]`.
    pub opacity: f64,
    /// Uniform scale around the target's centre.
    pub scale: f64,
    /// Translation as a fraction of the target's own box (`-1.0` on y is one box height up).
    pub shift: Vec2,
    /// Translation in logical pixels.
    pub translate_px: Vec2,
    /// Rotation in the screen plane.
    pub rotation_deg: f64,
    /// Rotation around the vertical axis.
    pub rotation_y_deg: f64,
    /// Corner radius as a fraction of the shorter side (0.5 is fully round).
    pub corner_radius: f64,
    /// Gaussian blur radius in logical pixels.
    pub blur_px: f64,
    /// Hue rotation.
    pub hue_deg: f64,
    /// Ripple displacement strength in logical pixels.
    pub distortion: f64,
    /// Stacking order. Only changed by instantaneous sets, never interpolated.
    pub z_index: i32,
}

impl VisualProps {
    /// Fully shown, untransformed, unfiltered.
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        shift: Vec2::ZERO,
        translate_px: Vec2::ZERO,
        rotation_deg: 0.0,
        rotation_y_deg: 0.0,
        corner_radius: 0.0,
        blur_px: 0.0,
        hue_deg: 0.0,
        distortion: 0.0,
        z_index: 0,
    };

    /// Same as [`VisualProps::SHOWN`] but transparent.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        ..Self::SHOWN
    };

    /// Whether the target contributes anything to a frame.
    pub fn is_visible(&self) -> bool {
        self.opacity > 1e-3
    }

    /// Same props with stacking order `z_index`.
    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Whether a pixel filter pass is needed.
    pub fn has_filter(&self) -> bool {
        self.blur_px > 0.01 || self.hue_deg.abs() > 0.01 || self.distortion > 0.01
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::SHOWN
    }
}

impl Lerp for VisualProps {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: Lerp::lerp(&a.opacity, &b.opacity, t),
            scale: Lerp::lerp(&a.scale, &b.scale, t),
            shift: Lerp::lerp(&a.shift, &b.shift, t),
            translate_px: Lerp::lerp(&a.translate_px, &b.translate_px, t),
            rotation_deg: Lerp::lerp(&a.rotation_deg, &b.rotation_deg, t),
            rotation_y_deg: Lerp::lerp(&a.rotation_y_deg, &b.rotation_y_deg, t),
            corner_radius: Lerp::lerp(&a.corner_radius, &b.corner_radius, t),
            blur_px: Lerp::lerp(&a.blur_px, &b.blur_px, t),
            hue_deg: Lerp::lerp(&a.hue_deg, &b.hue_deg, t),
            distortion: Lerp::lerp(&a.distortion, &b.distortion, t),
            z_index: a.z_index,
        }
    }
}

/// Partial property assignment: only the named properties change, the rest keep their value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropPatch {
    /// New [`VisualProps::opacity`].
    pub opacity: Option<f64>,
    /// New [`VisualProps::scale`].
    pub scale: Option<f64>,
    /// New [`VisualProps::shift`].
    pub shift: Option<Vec2>,
    /// New [`VisualProps::translate_px`].
    pub translate_px: Option<Vec2>,
    /// New [`VisualProps::rotation_deg`].
    pub rotation_deg: Option<f64>,
    /// New [`VisualProps::rotation_y_deg`].
    pub rotation_y_deg: Option<f64>,
    /// New [`VisualProps::corner_radius`].
    pub corner_radius: Option<f64>,
    /// New [`VisualProps::blur_px`].
    pub blur_px: Option<f64>,
    /// New [`VisualProps::hue_deg`].
    pub hue_deg: Option<f64>,
    /// New [`VisualProps::distortion`].
    pub distortion: Option<f64>,
    /// New [`VisualProps::z_index`].
    pub z_index: Option<i32>,
}

impl PropPatch {
    /// Patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that assigns every property of `props`.
    pub fn all(props: VisualProps) -> Self {
        Self {
            opacity: Some(props.opacity),
            scale: Some(props.scale),
            shift: Some(props.shift),
            translate_px: Some(props.translate_px),
            rotation_deg: Some(props.rotation_deg),
            rotation_y_deg: Some(props.rotation_y_deg),
            corner_radius: Some(props.corner_radius),
            blur_px: Some(props.blur_px),
            hue_deg: Some(props.hue_deg),
            distortion: Some(props.distortion),
            z_index: Some(props.z_index),
        }
    }

    /// Patch that assigns every animatable property of `props`, leaving stacking order alone.
    pub fn visual(props: VisualProps) -> Self {
        Self {
            z_index: None,
            ..Self::all(props)
        }
    }

    /// Set opacity.
    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    /// Set scale.
    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    /// Set the box-relative offset.
    pub fn shift(mut self, x: f64, y: f64) -> Self {
        self.shift = Some(Vec2::new(x, y));
        self
    }

    /// Set ripple distortion.
    pub fn distortion(mut self, v: f64) -> Self {
        self.distortion = Some(v);
        self
    }

    /// Set stacking order.
    pub fn z_index(mut self, v: i32) -> Self {
        self.z_index = Some(v);
        self
    }

    /// `base` with the named properties replaced.
    pub fn apply(&self, base: VisualProps) -> VisualProps {
        VisualProps {
            opacity: self.opacity.unwrap_or(base.opacity),
            scale: self.scale.unwrap_or(base.scale),
            shift: self.shift.unwrap_or(base.shift),
            translate_px: self.translate_px.unwrap_or(base.translate_px),
            rotation_deg: self.rotation_deg.unwrap_or(base.rotation_deg),
            rotation_y_deg: self.rotation_y_deg.unwrap_or(base.rotation_y_deg),
            corner_radius: self.corner_radius.unwrap_or(base.corner_radius),
            blur_px: self.blur_px.unwrap_or(base.blur_px),
            hue_deg: self.hue_deg.unwrap_or(base.hue_deg),
            distortion: self.distortion.unwrap_or(base.distortion),
            z_index: self.z_index.unwrap_or(base.z_index),
        }
    }
}
