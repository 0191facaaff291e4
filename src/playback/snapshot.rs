use crate::animation::props::VisualProps;
use crate::animation::timeline::{Scene, TargetId};
use crate::assets::store::ImageStore;
use crate::foundation::core::{Rect, Viewport};
use crate::sequence::model::Sequence;
use crate::strips::registry::StripRegistry;

/// Everything needed to draw one frame, borrowed from a session.
#[derive(Clone, Copy)]
pub struct SceneSnapshot<'a> {
    /// Logical viewport.
    pub viewport: Viewport,
    /// Image frame inside every cut container.
    pub frame: Rect,
    /// Cuts being played.
    pub sequence: &'a Sequence,
    /// Visual state of every target at the current offset.
    pub scene: &'a Scene,
    /// Decoded cut images.
    pub images: &'a ImageStore,
    /// Strip sets mounted for shutter and slice effects.
    pub strips: &'a StripRegistry,
    /// Encounter interstitial, while it plays.
    pub overlay: Option<&'a Scene>,
    /// Cut whose mini-game is mounted.
    pub battle: Option<usize>,
}

impl SceneSnapshot<'_> {
    /// Visual state of `target`, identity when it has none.
    pub fn props(&self, target: TargetId) -> VisualProps {
        self.scene.get(&target).copied().unwrap_or_default()
    }

    /// Cut indices in paint order: ascending stacking order, ties by index.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.sequence.len()).collect();
        order.sort_by_key(|&i| (self.props(TargetId::Cut(i)).z_index, i));
        order
    }

    /// Cut indices with non-zero opacity, ascending.
    pub fn visible_cuts(&self) -> Vec<usize> {
        (0..self.sequence.len())
            .filter(|&i| self.props(TargetId::Cut(i)).is_visible())
            .collect()
    }

    /// The visible cut on top, if any.
    pub fn active_cut(&self) -> Option<usize> {
        self.visible_cuts()
            .into_iter()
            .max_by_key(|&i| (self.props(TargetId::Cut(i)).z_index, i))
    }
}
