use crate::effects::profile::{AnimationType, OutEffect, profile};
use crate::foundation::error::{CutplayError, CutplayResult};

/// What a cut shows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CutKind {
    /// A picture panel. Without a reference the cut renders a placeholder.
    Image {
        /// Image reference, resolved by the [`ImageStore`](crate::ImageStore).
        image_ref: Option<String>,
    },
    /// Hands control to the interactive mini-game.
    Encounter,
}

/// One visual beat of a sequence. Read-only once playback starts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cut {
    /// What the cut shows.
    pub kind: CutKind,
    /// Entrance; ignored for the first cut.
    pub in_effect: AnimationType,
    /// Exit; `None` means the entrance profile's default.
    pub out_effect: Option<OutEffect>,
    /// Seconds the cut stays fully shown.
    pub hold_secs: f64,
    /// Caption from the authoring layer.
    pub title: Option<String>,
}

impl Cut {
    /// Hold used when a record gives none.
    pub const DEFAULT_HOLD_SECS: f64 = 3.0;

    /// Image cut showing `image_ref`.
    pub fn image(image_ref: impl Into<String>) -> Self {
        Self::with_kind(CutKind::Image {
            image_ref: Some(image_ref.into()),
        })
    }

    /// Image cut without a picture.
    pub fn placeholder() -> Self {
        Self::with_kind(CutKind::Image { image_ref: None })
    }

    /// Encounter cut.
    pub fn encounter() -> Self {
        Self::with_kind(CutKind::Encounter)
    }

    fn with_kind(kind: CutKind) -> Self {
        Self {
            kind,
            in_effect: AnimationType::Basic,
            out_effect: None,
            hold_secs: Self::DEFAULT_HOLD_SECS,
            title: None,
        }
    }

    /// Set the entrance.
    pub fn with_in_effect(mut self, kind: AnimationType) -> Self {
        self.in_effect = kind;
        self
    }

    /// Set an explicit exit.
    pub fn with_out_effect(mut self, out: OutEffect) -> Self {
        self.out_effect = Some(out);
        self
    }

    /// Set the hold in seconds.
    pub fn with_hold(mut self, secs: f64) -> Self {
        self.hold_secs = secs;
        self
    }

    /// Set the caption.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Exit actually played: the explicit one, or the entrance's default.
    pub fn effective_out(&self) -> OutEffect {
        self.out_effect
            .unwrap_or_else(|| profile(self.in_effect).default_out)
    }

    /// Image reference, `None` for placeholders and encounters.
    pub fn image_ref(&self) -> Option<&str> {
        match &self.kind {
            CutKind::Image { image_ref } => image_ref.as_deref(),
            CutKind::Encounter => None,
        }
    }

    /// Whether the cut hands control to the mini-game.
    pub fn is_encounter(&self) -> bool {
        matches!(self.kind, CutKind::Encounter)
    }
}

/// Ordered, non-empty list of cuts played as one unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Sequence {
    cuts: Vec<Cut>,
}

impl Sequence {
    /// Checks that there is at least one cut and every hold is finite and positive.
    pub fn new(cuts: Vec<Cut>) -> CutplayResult<Self> {
        if cuts.is_empty() {
            return Err(CutplayError::validation(
                "a sequence needs at least one cut",
            ));
        }
        for (i, cut) in cuts.iter().enumerate() {
            if !cut.hold_secs.is_finite() || cut.hold_secs <= 0.0 {
                return Err(CutplayError::validation(format!(
                    "cut {i}: hold must be finite and > 0 (got {})",
                    cut.hold_secs
                )));
            }
        }
        Ok(Self { cuts })
    }

    /// Number of cuts.
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// All cuts in order.
    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    /// Cut at `index`.
    pub fn get(&self, index: usize) -> Option<&Cut> {
        self.cuts.get(index)
    }

    /// Index of the final cut.
    pub fn last_index(&self) -> usize {
        self.cuts.len() - 1
    }

    /// Image references in cut order, repeats included.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.cuts.iter().filter_map(Cut::image_ref)
    }

    /// Indices of encounter cuts, ascending.
    pub fn encounter_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cuts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_encounter())
            .map(|(i, _)| i)
    }
}
