use std::path::Path;

use crate::effects::profile::{AnimationType, OutEffect};
use crate::foundation::config::PlaybackConfig;
use crate::foundation::error::{CutplayError, CutplayResult};
use crate::sequence::model::{Cut, CutKind, Sequence};

/// Cut as stored by the authoring layer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutRecord {
    /// Record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Caption.
    #[serde(default)]
    pub title: Option<String>,
    /// Authoring notes; not played.
    #[serde(default)]
    pub description: Option<String>,
    /// Image reference.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Entrance identifier; unknown values fall back to basic.
    #[serde(default)]
    pub animation_type: Option<String>,
    /// Exit identifier; absent means the entrance's default.
    #[serde(default)]
    pub out_effect: Option<String>,
    /// Hold in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// `"image"` or `"command-battle"`; absent means image.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Episode as stored by the authoring layer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    /// Episode id.
    #[serde(default)]
    pub id: String,
    /// Owning series id.
    #[serde(default)]
    pub series_id: String,
    /// Episode title.
    #[serde(default)]
    pub episode_title: String,
    /// Cuts in play order.
    pub cuts: Vec<CutRecord>,
    /// Creation timestamp, kept as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last edit timestamp, kept as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// View counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
}

/// Viewer choice between each cut's own entrance and one entrance for every cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationOverride {
    /// Each cut keeps its own entrance.
    #[default]
    Individual,
    /// Every cut enters with this entrance.
    Uniform(AnimationType),
}

impl EpisodeRecord {
    /// Parse an episode from JSON.
    pub fn from_reader(reader: impl std::io::Read) -> CutplayResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| CutplayError::serde(format!("parse episode: {e}")))
    }

    /// Parse the episode JSON file at `path`.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> CutplayResult<Self> {
        let f = std::fs::File::open(path).map_err(|e| {
            CutplayError::validation(format!("failed to open '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Playable sequence under the viewer's override.
    pub fn to_sequence(
        &self,
        ov: AnimationOverride,
        cfg: &PlaybackConfig,
    ) -> CutplayResult<Sequence> {
        Sequence::from_records(&self.cuts, ov, cfg)
    }
}

impl Sequence {
    /// Convert authoring records into a playable sequence.
    ///
    /// Unknown identifiers and unusable durations degrade with a warning; only an empty list
    /// fails.
    pub fn from_records(
        records: &[CutRecord],
        ov: AnimationOverride,
        cfg: &PlaybackConfig,
    ) -> CutplayResult<Self> {
        let cuts = records
            .iter()
            .enumerate()
            .map(|(i, r)| cut_from_record(i, r, ov, cfg))
            .collect();
        Self::new(cuts)
    }
}

fn cut_from_record(
    index: usize,
    r: &CutRecord,
    ov: AnimationOverride,
    cfg: &PlaybackConfig,
) -> Cut {
    let kind = match r.kind.as_deref() {
        None | Some("image") => CutKind::Image {
            image_ref: r.image_url.clone().filter(|s| !s.trim().is_empty()),
        },
        Some("command-battle") => CutKind::Encounter,
        Some(other) => {
            tracing::warn!(cut = index, kind = other, "unknown cut type, treating as image");
            CutKind::Image {
                image_ref: r.image_url.clone().filter(|s| !s.trim().is_empty()),
            }
        }
    };

    let in_effect = match ov {
        AnimationOverride::Uniform(kind) => kind,
        AnimationOverride::Individual => r
            .animation_type
            .as_deref()
            .map(AnimationType::resolve)
            .unwrap_or(AnimationType::Basic),
    };

    let out_effect = r
        .out_effect
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| {
            let parsed = OutEffect::parse(s);
            if parsed.is_none() {
                tracing::warn!(cut = index, out_effect = s, "unknown out effect, using default");
            }
            parsed
        });

    let hold_secs = match r.duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        Some(d) => {
            tracing::warn!(cut = index, duration = d, "unusable duration, using default hold");
            cfg.default_hold_secs
        }
        None => cfg.default_hold_secs,
    };

    Cut {
        kind,
        in_effect,
        out_effect,
        hold_secs,
        title: r.title.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/records.rs"]
mod tests;
