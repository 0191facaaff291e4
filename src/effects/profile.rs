use crate::animation::ease::Ease;
use crate::animation::props::{PropPatch, VisualProps};
use crate::foundation::core::Vec2;

/// Entrance animation identifiers an author can pick per cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    /// Plain fade.
    Basic,
    /// Grows from 0.9 to 1.1 scale while fading in.
    Parallax,
    /// Starts rounded and shrunken, settles square.
    Morphing,
    /// Flips in around the vertical axis.
    #[serde(rename = "3d-flip")]
    Flip3d,
    /// Spins half a turn while fading in.
    Physics,
    /// Drops in from one box height above.
    Timeline,
    /// Hue cycles back to normal while fading in.
    Texture,
    /// Slides in from 100px to the right.
    SmoothScroll,
    /// Fades in from a heavy blur.
    BlurFade,
    /// Image layer fades in through a ripple distortion.
    Ripple,
    /// Vertical strips slide into place one after another.
    Shutter,
    /// Fades in; as an exit it splits the image into two halves.
    Slice,
}

impl AnimationType {
    /// Every animation type, in table order.
    pub const ALL: [Self; 12] = [
        Self::Basic,
        Self::Parallax,
        Self::Morphing,
        Self::Flip3d,
        Self::Physics,
        Self::Timeline,
        Self::Texture,
        Self::SmoothScroll,
        Self::BlurFade,
        Self::Ripple,
        Self::Shutter,
        Self::Slice,
    ];

    /// Identifier used in episode records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Parallax => "parallax",
            Self::Morphing => "morphing",
            Self::Flip3d => "3d-flip",
            Self::Physics => "physics",
            Self::Timeline => "timeline",
            Self::Texture => "texture",
            Self::SmoothScroll => "smooth-scroll",
            Self::BlurFade => "blur-fade",
            Self::Ripple => "ripple",
            Self::Shutter => "shutter",
            Self::Slice => "slice",
        }
    }

    /// Exact identifier match.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }

    /// Parse, falling back to [`AnimationType::Basic`] for unknown identifiers.
    pub fn resolve(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(animation = s, "unknown animation type, using basic fade");
            Self::Basic
        })
    }
}

/// Exit animation identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutEffect {
    /// Fade to transparent.
    FadeOut,
    /// Shrink to half size while fading.
    ZoomOut,
    /// Slide up one box height while fading.
    SlideOut,
    /// Split into left and right halves that separate.
    Slice,
    /// Split into strips that slide apart alternately.
    ShutterOut,
}

impl OutEffect {
    /// Every exit, in table order.
    pub const ALL: [Self; 5] = [
        Self::FadeOut,
        Self::ZoomOut,
        Self::SlideOut,
        Self::Slice,
        Self::ShutterOut,
    ];

    /// Identifier used in episode records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FadeOut => "fade-out",
            Self::ZoomOut => "zoom-out",
            Self::SlideOut => "slide-out",
            Self::Slice => "slice",
            Self::ShutterOut => "shutter-out",
        }
    }

    /// Exact identifier match.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }

    /// Container motion for exits that animate the cut container directly.
    ///
    /// Slice and shutter exits move split surfaces instead and return `None`.
    pub fn container_exit(self) -> Option<(PropPatch, Ease)> {
        match self {
            Self::FadeOut => Some((PropPatch::new().opacity(0.0), Ease::InOutCubic)),
            Self::ZoomOut => Some((PropPatch::new().opacity(0.0).scale(0.5), Ease::OutQuart)),
            Self::SlideOut => Some((PropPatch::new().opacity(0.0).shift(0.0, -1.0), Ease::OutQuart)),
            Self::Slice | Self::ShutterOut => None,
        }
    }
}

/// Which render target carries an entrance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceStyle {
    /// Tween the cut container from `hidden` to `shown`.
    Container,
    /// Reveal the container at once and slide the shutter strips in.
    Strips,
    /// Reveal the container at once and fade the image layer in from `content_hidden`.
    Content,
}

/// Declarative description of one animation type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Profile {
    /// Animation type this entry describes.
    pub kind: AnimationType,
    /// Container state before the cut enters.
    pub hidden: VisualProps,
    /// Container state once the cut is fully shown.
    pub shown: VisualProps,
    /// Image layer state before entering, for [`EntranceStyle::Content`].
    pub content_hidden: Option<VisualProps>,
    /// Entrance length; `None` means the configured transition length.
    pub duration_secs: Option<f64>,
    /// Entrance easing.
    pub ease: Ease,
    /// Exit used when the cut names none.
    pub default_out: OutEffect,
    /// Which target the entrance animates.
    pub entrance: EntranceStyle,
}

const fn container(kind: AnimationType, hidden: VisualProps, shown: VisualProps) -> Profile {
    Profile {
        kind,
        hidden,
        shown,
        content_hidden: None,
        duration_secs: None,
        ease: Ease::InOutCubic,
        default_out: OutEffect::FadeOut,
        entrance: EntranceStyle::Container,
    }
}

const H: VisualProps = VisualProps::HIDDEN;
const S: VisualProps = VisualProps::SHOWN;

static PROFILES: [Profile; 12] = [
    container(AnimationType::Basic, H, S),
    container(
        AnimationType::Parallax,
        VisualProps { scale: 0.9, ..H },
        VisualProps { scale: 1.1, ..S },
    ),
    container(
        AnimationType::Morphing,
        VisualProps {
            scale: 0.8,
            corner_radius: 0.5,
            ..H
        },
        S,
    ),
    container(
        AnimationType::Flip3d,
        VisualProps {
            rotation_y_deg: -90.0,
            ..H
        },
        S,
    ),
    container(
        AnimationType::Physics,
        VisualProps {
            rotation_deg: 180.0,
            ..H
        },
        S,
    ),
    container(
        AnimationType::Timeline,
        VisualProps {
            shift: Vec2::new(0.0, -1.0),
            ..H
        },
        S,
    ),
    container(
        AnimationType::Texture,
        VisualProps { hue_deg: 360.0, ..H },
        S,
    ),
    container(
        AnimationType::SmoothScroll,
        VisualProps {
            translate_px: Vec2::new(100.0, 0.0),
            ..H
        },
        S,
    ),
    container(
        AnimationType::BlurFade,
        VisualProps { blur_px: 100.0, ..H },
        S,
    ),
    Profile {
        content_hidden: Some(VisualProps {
            distortion: 90.0,
            ..H
        }),
        duration_secs: Some(1.2),
        ease: Ease::OutCubic,
        entrance: EntranceStyle::Content,
        ..container(AnimationType::Ripple, H, S)
    },
    Profile {
        entrance: EntranceStyle::Strips,
        ease: Ease::OutQuart,
        ..container(AnimationType::Shutter, H, S)
    },
    // Slice only splits on the way out; its entrance is a plain fade.
    container(AnimationType::Slice, H, S),
];

/// Table entry for `kind`.
pub fn profile(kind: AnimationType) -> &'static Profile {
    &PROFILES[kind as usize]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/profile.rs"]
mod tests;
