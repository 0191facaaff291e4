use crate::animation::ease::Ease;
use crate::foundation::math::lerp_f64;

/// Eased scroll offset driven by the playback clock.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothScroll {
    offset: f64,
    from: f64,
    target: f64,
    elapsed: f64,
    duration: f64,
    animating: bool,
    stopped: bool,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(1.2)
    }
}

impl SmoothScroll {
    /// Driver easing each scroll over `duration_secs`.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            offset: 0.0,
            from: 0.0,
            target: 0.0,
            elapsed: 0.0,
            duration: duration_secs.max(0.0),
            animating: false,
            stopped: false,
        }
    }

    /// Current offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Offset the current scroll ends at.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the driver is frozen.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether a scroll is in flight.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Freeze in place; ticks are ignored until [`SmoothScroll::start`].
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Unfreeze after [`SmoothScroll::stop`].
    pub fn start(&mut self) {
        self.stopped = false;
    }

    /// Ease from the current offset to `target`.
    pub fn scroll_to(&mut self, target: f64) {
        self.from = self.offset;
        self.target = target;
        self.elapsed = 0.0;
        self.animating = (target - self.offset).abs() > f64::EPSILON;
    }

    /// Move without easing.
    pub fn jump_to(&mut self, offset: f64) {
        self.offset = offset;
        self.from = offset;
        self.target = offset;
        self.animating = false;
    }

    /// Advance by `dt` seconds unless frozen.
    pub fn tick(&mut self, dt: f64) {
        if self.stopped || !self.animating {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.offset = self.target;
            self.animating = false;
            return;
        }
        let p = Ease::OutExpoScroll.apply(self.elapsed / self.duration);
        self.offset = lerp_f64(self.from, self.target, p);
    }
}
