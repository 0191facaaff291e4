use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::Rect;
use crate::geometry::contain::{DeferredMeasure, Measure};
use crate::strips::layout::{StripLayout, StripVariant};
use crate::strips::surfaces::{StripSet, build_set};

/// What a strip set needs to be (re)drawn.
#[derive(Clone, Debug)]
pub struct StripRequest {
    /// Band geometry.
    pub variant: StripVariant,
    /// Reference the image was loaded from.
    pub image_ref: String,
    /// Decoded source image.
    pub image: Arc<PreparedImage>,
    /// Number of bands.
    pub count: usize,
    /// Extra width each band overlaps its neighbours by, in logical pixels.
    pub overlap_px: f64,
}

/// Result of [`StripRegistry::mount`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MountOutcome {
    /// A new set was drawn.
    Mounted,
    /// A set already existed in the slot and was drawn again in place.
    Redrawn,
    /// The frame had zero size; the registry measures again at `at`.
    Deferred {
        /// Clock time of the re-measure.
        at: f64,
    },
    /// Nothing drawn; the cut renders its plain image instead.
    Skipped,
}

#[derive(Debug)]
enum Slot {
    Empty,
    Pending {
        request: StripRequest,
        measure: DeferredMeasure,
    },
    Live {
        request: StripRequest,
        set: StripSet,
    },
}

/// Live strip sets addressed by cut index, one slot per cut.
#[derive(Debug)]
pub struct StripRegistry {
    slots: Vec<Slot>,
    frame: Rect,
    dpr: f64,
    retry_secs: f64,
}

impl StripRegistry {
    /// Empty registry for `cut_count` cuts.
    pub fn new(cut_count: usize, frame: Rect, dpr: f64, retry_secs: f64) -> Self {
        Self {
            slots: (0..cut_count).map(|_| Slot::Empty).collect(),
            frame,
            dpr,
            retry_secs,
        }
    }

    /// Image frame strips are laid out in.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Create or redraw the strips of `cut`.
    ///
    /// A missing image skips silently. A zero-size frame defers one re-measure; see
    /// [`StripRegistry::poll`].
    pub fn mount(
        &mut self,
        cut: usize,
        request: Option<StripRequest>,
        now: f64,
    ) -> MountOutcome {
        let Some(request) = request else {
            tracing::debug!(cut, "no image for strips, keeping plain render");
            return MountOutcome::Skipped;
        };
        let Some(slot) = self.slots.get_mut(cut) else {
            tracing::warn!(cut, "strip mount for unknown cut");
            return MountOutcome::Skipped;
        };
        let existed = matches!(slot, Slot::Live { .. });
        let mut measure = DeferredMeasure::new();
        match measure.measure(self.frame, now, self.retry_secs) {
            Measure::Ready(frame) => match draw(&request, frame, self.dpr) {
                Some(set) => {
                    *slot = Slot::Live { request, set };
                    if existed {
                        MountOutcome::Redrawn
                    } else {
                        MountOutcome::Mounted
                    }
                }
                None => {
                    *slot = Slot::Empty;
                    MountOutcome::Skipped
                }
            },
            Measure::Retry { at } => {
                tracing::debug!(cut, retry_at = at, "image frame has zero size, deferring strips");
                *slot = Slot::Pending { request, measure };
                MountOutcome::Deferred { at }
            }
            Measure::Unavailable => {
                *slot = Slot::Empty;
                MountOutcome::Skipped
            }
        }
    }

    /// Retry deferred mounts whose re-measure time has come.
    pub fn poll(&mut self, now: f64) {
        let (frame, dpr, retry) = (self.frame, self.dpr, self.retry_secs);
        for (cut, slot) in self.slots.iter_mut().enumerate() {
            let Slot::Pending { request, measure } = slot else {
                continue;
            };
            match measure.measure(frame, now, retry) {
                Measure::Retry { .. } => {}
                Measure::Ready(frame) => {
                    *slot = match draw(request, frame, dpr) {
                        Some(set) => Slot::Live {
                            request: request.clone(),
                            set,
                        },
                        None => Slot::Empty,
                    };
                }
                Measure::Unavailable => {
                    tracing::warn!(cut, "image frame still has zero size, strips not drawn");
                    *slot = Slot::Empty;
                }
            }
        }
    }

    /// Re-layout every live set for a new frame or pixel ratio.
    pub fn relayout(&mut self, frame: Rect, dpr: f64) {
        self.frame = frame;
        self.dpr = dpr;
        for slot in &mut self.slots {
            if let Slot::Live { request, .. } = slot {
                *slot = match draw(request, frame, dpr) {
                    Some(set) => Slot::Live {
                        request: request.clone(),
                        set,
                    },
                    None => Slot::Empty,
                };
            }
        }
    }

    /// Drop `cut`'s strip set or pending request.
    pub fn release(&mut self, cut: usize) {
        if let Some(slot) = self.slots.get_mut(cut) {
            *slot = Slot::Empty;
        }
    }

    /// Drop every strip set and pending request.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Slot::Empty);
    }

    /// Live strip set of `cut`.
    pub fn get(&self, cut: usize) -> Option<&StripSet> {
        match self.slots.get(cut) {
            Some(Slot::Live { set, .. }) => Some(set),
            _ => None,
        }
    }

    /// Whether `cut` waits for its image to measure.
    pub fn is_pending(&self, cut: usize) -> bool {
        matches!(self.slots.get(cut), Some(Slot::Pending { .. }))
    }

    /// Number of live strip sets.
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Live { .. }))
            .count()
    }
}

fn draw(request: &StripRequest, frame: Rect, dpr: f64) -> Option<StripSet> {
    let layout = StripLayout::new(
        frame,
        request.image.natural_size(),
        request.count,
        request.overlap_px,
    );
    if layout.is_empty() {
        return None;
    }
    match build_set(request.variant, &request.image_ref, &request.image, layout, dpr) {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::warn!(image = %request.image_ref, error = %err, "strip render failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strips/registry.rs"]
mod tests;
