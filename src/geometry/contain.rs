use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::{Rect, Size, Viewport};

/// Where an image lands when scaled to fit entirely inside a container, keeping its aspect.
///
/// The result is relative to the container's origin. Degenerate inputs produce [`Rect::ZERO`],
/// which callers treat as "nothing to draw".
pub fn contain_fit(natural: Size, container: Size) -> Rect {
    if !(natural.width > 0.0 && natural.height > 0.0)
        || !(container.width > 0.0 && container.height > 0.0)
    {
        return Rect::ZERO;
    }
    let image_aspect = natural.width / natural.height;
    let container_aspect = container.width / container.height;
    let (w, h) = if image_aspect > container_aspect {
        (container.width, container.width / image_aspect)
    } else {
        (container.height * image_aspect, container.height)
    };
    let x = (container.width - w) / 2.0;
    let y = (container.height - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// The box a cut's image is laid out in, centered in the viewport.
///
/// Full viewport width up to `frame_max_width_px`, height from `frame_aspect`, capped at the
/// viewport height.
pub fn image_frame(viewport: Viewport, cfg: &PlaybackConfig) -> Rect {
    if viewport.is_empty() {
        return Rect::ZERO;
    }
    let w = viewport.width.min(cfg.frame_max_width_px);
    let h = (w / cfg.frame_aspect).min(viewport.height);
    let x = (viewport.width - w) / 2.0;
    let y = (viewport.height - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Outcome of measuring a container that may not be laid out yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Measure {
    /// The container has a size.
    Ready(Rect),
    /// Zero size; measure again later.
    Retry {
        /// Clock time of the retry.
        at: f64,
    },
    /// Still zero after the retry.
    Unavailable,
}

/// One deferred re-measure for containers that report zero size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeferredMeasure {
    retry_at: Option<f64>,
}

impl DeferredMeasure {
    /// No retry pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure `frame` at clock `now`, scheduling one retry `retry_delay` later if it is empty.
    pub fn measure(&mut self, frame: Rect, now: f64, retry_delay: f64) -> Measure {
        if frame.width() > 0.0 && frame.height() > 0.0 {
            self.retry_at = None;
            return Measure::Ready(frame);
        }
        match self.retry_at {
            None => {
                let at = now + retry_delay;
                self.retry_at = Some(at);
                Measure::Retry { at }
            }
            Some(at) if now < at => Measure::Retry { at },
            Some(_) => Measure::Unavailable,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/contain.rs"]
mod tests;
