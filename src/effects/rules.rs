//! Cross-cut coupling between one cut's exit and the next cut's entrance.
//!
//! Exits normally only touch the outgoing cut and entrances only the incoming one. The table
//! below is the single place where an exit overrides the following entrance.

use crate::animation::ease::Ease;
use crate::animation::props::VisualProps;
use crate::effects::profile::{AnimationType, EntranceStyle, OutEffect, profile};
use crate::foundation::config::PlaybackConfig;

/// When the incoming entrance starts relative to the outgoing exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceTiming {
    /// Both start together.
    WithExit,
    /// The entrance waits until the exit has finished.
    AfterExit,
}

/// Entrance imposed on the next cut regardless of its own animation type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForcedEntrance {
    /// Container state the entrance starts from.
    pub hidden: VisualProps,
    /// Container state the entrance ends at.
    pub shown: VisualProps,
    /// Entrance easing.
    pub ease: Ease,
}

/// How one exit shapes the entrance that follows it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRule {
    /// Exit this rule applies to.
    pub out: OutEffect,
    /// Entrance replacing the next cut's own, if any.
    pub forced_entrance: Option<ForcedEntrance>,
    /// When the next entrance starts.
    pub timing: EntranceTiming,
}

const fn plain(out: OutEffect) -> TransitionRule {
    TransitionRule {
        out,
        forced_entrance: None,
        timing: EntranceTiming::WithExit,
    }
}

static RULES: [TransitionRule; 5] = [
    plain(OutEffect::FadeOut),
    plain(OutEffect::ZoomOut),
    plain(OutEffect::SlideOut),
    TransitionRule {
        out: OutEffect::Slice,
        forced_entrance: Some(ForcedEntrance {
            hidden: VisualProps {
                scale: 0.5,
                ..VisualProps::HIDDEN
            },
            shown: VisualProps::SHOWN,
            ease: Ease::InOutCubic,
        }),
        timing: EntranceTiming::AfterExit,
    },
    plain(OutEffect::ShutterOut),
];

/// Rule for exit `out`.
pub fn rule_for(out: OutEffect) -> &'static TransitionRule {
    &RULES[out as usize]
}

/// Length of an exit on the shared clock, excluding any strip stagger tail.
pub fn exit_secs(out: OutEffect, cfg: &PlaybackConfig) -> f64 {
    match out {
        OutEffect::Slice => cfg.slice_secs(),
        _ => cfg.transition_secs,
    }
}

/// Entrance of the incoming cut after applying the exit's rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedEntrance {
    /// Which target animates.
    pub style: EntranceStyle,
    /// Container state the entrance starts from.
    pub hidden: VisualProps,
    /// Container state the entrance ends at.
    pub shown: VisualProps,
    /// Image layer start state for content entrances.
    pub content_hidden: Option<VisualProps>,
    /// Entrance easing.
    pub ease: Ease,
    /// Entrance length.
    pub duration_secs: f64,
    /// Offset from the start of the transition.
    pub delay_secs: f64,
    /// True when an exit rule replaced the incoming cut's own entrance.
    pub forced: bool,
}

/// Entrance of a cut of type `incoming` that follows exit `prev_out`.
pub fn plan_entrance(
    prev_out: OutEffect,
    incoming: AnimationType,
    cfg: &PlaybackConfig,
) -> PlannedEntrance {
    let rule = rule_for(prev_out);
    let delay_secs = match rule.timing {
        EntranceTiming::WithExit => 0.0,
        EntranceTiming::AfterExit => exit_secs(prev_out, cfg),
    };
    if let Some(forced) = rule.forced_entrance {
        return PlannedEntrance {
            style: EntranceStyle::Container,
            hidden: forced.hidden,
            shown: forced.shown,
            content_hidden: None,
            ease: forced.ease,
            duration_secs: cfg.transition_secs,
            delay_secs,
            forced: true,
        };
    }
    let p = profile(incoming);
    PlannedEntrance {
        style: p.entrance,
        hidden: p.hidden,
        shown: p.shown,
        content_hidden: p.content_hidden,
        ease: p.ease,
        duration_secs: p.duration_secs.unwrap_or(cfg.transition_secs),
        delay_secs,
        forced: false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/rules.rs"]
mod tests;
