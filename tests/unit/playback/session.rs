use super::*;

use crate::assets::store::{AssetStatus, PreparedImage};
use crate::effects::profile::{AnimationType, OutEffect};
use crate::playback::encounter::ScriptedEncounter;
use crate::sequence::model::Cut;

fn solid(w: u32, h: u32) -> PreparedImage {
    PreparedImage::from_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

fn store(refs: &[&str]) -> ImageStore {
    let mut images = ImageStore::new("/nonexistent-cutplay-root");
    for r in refs {
        images.insert(*r, solid(8, 10));
    }
    images
}

fn session(cuts: Vec<Cut>, images: ImageStore) -> PlaybackSession {
    PlaybackSession::new(
        Sequence::new(cuts).unwrap(),
        PlaybackConfig::default(),
        Viewport::new(1280.0, 1000.0),
        images,
    )
}

#[test]
fn shutter_cuts_rest_on_strips_before_playback() {
    let s = session(
        vec![
            Cut::image("a.png").with_in_effect(AnimationType::Shutter),
            Cut::image("b.png"),
        ],
        store(&["a.png", "b.png"]),
    );
    let set = s.strips().get(0).unwrap();
    assert_eq!(set.len(), 15);
    assert!(s.strips().get(1).is_none());
    assert_eq!(s.state(), SequencerState::Idle);
}

#[test]
fn missing_image_gets_no_strips_and_is_recorded() {
    let s = session(
        vec![Cut::image("missing.png").with_in_effect(AnimationType::Shutter)],
        store(&[]),
    );
    assert!(s.strips().get(0).is_none());
    assert!(matches!(s.images().status("missing.png"), AssetStatus::Failed(_)));
}

#[test]
fn encounter_halts_playback_until_resolved() {
    let mut s = session(
        vec![Cut::image("a.png").with_hold(1.0), Cut::encounter().with_hold(1.0)],
        store(&["a.png"]),
    )
    .with_host(Box::new(ScriptedEncounter::new(0.5)));
    s.start();
    let events = s.tick(0.6);
    assert!(events.contains(&SessionEvent::Sequencer(SequencerEvent::Started)));

    let events = s.tick(1.0);
    assert!(events.contains(&SessionEvent::EncounterStarted { cut: 1 }));
    assert_eq!(s.state(), SequencerState::Paused(PauseReason::Encounter));
    assert_eq!(s.interruption(), InterruptionState::Interstitial { cut: 1 });
    assert!((s.sequencer().time() - 1.0).abs() < 1e-9);
    assert!(s.scroll().is_stopped());
    assert!(!s.pause());
    assert!(s.snapshot().overlay.is_some());

    let events = s.tick(2.5);
    assert_eq!(
        events,
        vec![SessionEvent::Interruption(InterruptionEvent::Mounted { cut: 1 })]
    );
    assert_eq!(s.snapshot().battle, Some(1));
    assert!((s.sequencer().time() - 1.0).abs() < 1e-9);

    let events = s.tick(0.5);
    assert_eq!(
        events,
        vec![SessionEvent::Interruption(InterruptionEvent::Resolved { cut: 1 })]
    );
    assert_eq!(s.state(), SequencerState::Running);
    assert!(!s.scroll().is_stopped());

    let events = s.tick(0.2);
    assert!(events.contains(&SessionEvent::Sequencer(SequencerEvent::Cue(
        TimelineCue::Transition { from: 0, to: 1 }
    ))));
}

#[test]
fn opening_encounter_halts_before_the_first_hold() {
    let mut s = session(
        vec![Cut::encounter().with_hold(1.0), Cut::image("a.png").with_hold(1.0)],
        store(&["a.png"]),
    )
    .with_host(Box::new(ScriptedEncounter::new(0.5)));
    s.start();
    let events = s.tick(0.6);
    assert!(events.contains(&SessionEvent::EncounterStarted { cut: 0 }));
    assert!(!events.contains(&SessionEvent::Sequencer(SequencerEvent::Cue(
        TimelineCue::Enter { cut: 0 }
    ))));
    assert_eq!(s.state(), SequencerState::Paused(PauseReason::Encounter));
    assert_eq!(s.interruption(), InterruptionState::Interstitial { cut: 0 });
    assert_eq!(s.sequencer().time(), 0.0);

    let events = s.tick(2.5);
    assert_eq!(
        events,
        vec![SessionEvent::Interruption(InterruptionEvent::Mounted { cut: 0 })]
    );
    let events = s.tick(0.5);
    assert_eq!(
        events,
        vec![SessionEvent::Interruption(InterruptionEvent::Resolved { cut: 0 })]
    );

    let events = s.tick(0.1);
    assert!(events.contains(&SessionEvent::Sequencer(SequencerEvent::Cue(
        TimelineCue::Enter { cut: 0 }
    ))));
    assert_eq!(s.state(), SequencerState::Running);
}

#[test]
fn lone_encounter_plays_once_then_completes() {
    let mut s = session(vec![Cut::encounter().with_hold(1.0)], store(&[]))
        .with_host(Box::new(ScriptedEncounter::new(0.5)));
    s.start();
    let mut started = 0;
    let mut resolved = 0;
    for _ in 0..200 {
        for ev in s.tick(0.05) {
            match ev {
                SessionEvent::EncounterStarted { cut } => {
                    assert_eq!(cut, 0);
                    started += 1;
                }
                SessionEvent::Interruption(InterruptionEvent::Resolved { .. }) => resolved += 1,
                _ => {}
            }
        }
        if s.state() == SequencerState::Completed {
            break;
        }
    }
    assert_eq!((started, resolved), (1, 1));
    assert_eq!(s.state(), SequencerState::Completed);
}

#[test]
fn manual_resolution_resumes_playback() {
    let mut s = session(
        vec![Cut::image("a.png").with_hold(1.0), Cut::encounter()],
        store(&["a.png"]),
    );
    s.start();
    s.tick(0.6);
    s.tick(1.0);
    assert!(!s.resolve_encounter());
    s.tick(2.5);
    assert_eq!(s.interruption(), InterruptionState::BattleActive { cut: 1 });
    assert!(s.resolve_encounter());
    assert_eq!(s.interruption(), InterruptionState::Inactive);
    assert_eq!(s.state(), SequencerState::Running);
}

#[test]
fn slice_exit_mounts_then_releases_halves() {
    let mut s = session(
        vec![
            Cut::image("a.png")
                .with_hold(1.0)
                .with_out_effect(OutEffect::Slice),
            Cut::image("b.png").with_hold(1.0),
        ],
        store(&["a.png", "b.png"]),
    );
    s.start();
    s.tick(0.5);
    s.tick(1.1);
    let set = s.strips().get(0).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.variant, StripVariant::Slice);

    s.tick(1.0);
    assert!(s.strips().get(0).is_none());
}

#[test]
fn shutter_strips_are_released_after_a_fade_exit() {
    let mut s = session(
        vec![
            Cut::image("a.png")
                .with_in_effect(AnimationType::Shutter)
                .with_out_effect(OutEffect::FadeOut)
                .with_hold(1.0),
            Cut::image("b.png").with_hold(1.0),
            Cut::image("c.png").with_hold(1.0),
        ],
        store(&["a.png", "b.png", "c.png"]),
    );
    s.start();
    s.tick(0.5);
    s.tick(1.5);
    assert!(s.strips().get(0).is_some());

    // Hold ends at 1.0 and the fade takes 1.0.
    let events = s.tick(0.5);
    assert!(events.contains(&SessionEvent::Sequencer(SequencerEvent::Cue(
        TimelineCue::ReleaseStrips { cut: 0 }
    ))));
    assert_eq!(s.state(), SequencerState::Running);
    assert!(s.strips().get(0).is_none());
    assert_eq!(s.strips().live_count(), 0);
}

#[test]
fn manual_pause_and_resume() {
    let mut s = session(vec![Cut::image("a.png").with_hold(2.0)], store(&["a.png"]));
    s.start();
    s.tick(1.0);
    assert!(s.pause());
    let t = s.sequencer().time();
    s.tick(5.0);
    assert_eq!(s.sequencer().time(), t);
    assert!(s.resume());
    assert!(!s.resume());
    s.tick(0.25);
    assert!((s.sequencer().time() - t - 0.25).abs() < 1e-9);
}

#[test]
fn stop_restores_idle_strips_and_baseline() {
    let mut s = session(
        vec![
            Cut::image("a.png")
                .with_in_effect(AnimationType::Shutter)
                .with_hold(0.5),
            Cut::image("b.png"),
        ],
        store(&["a.png", "b.png"]),
    );
    s.start();
    s.tick(0.5);
    s.tick(1.0);
    s.stop();
    assert_eq!(s.state(), SequencerState::Stopped);
    assert_eq!(s.strips().get(0).map(|set| set.variant), Some(StripVariant::ShutterIn));
    assert_eq!(s.scroll().offset(), 0.0);
    assert!(!s.is_playing());
}

#[test]
fn viewport_change_relays_out_strips() {
    let mut s = session(
        vec![Cut::image("a.png").with_in_effect(AnimationType::Shutter)],
        store(&["a.png"]),
    );
    let before = s.strips().frame();
    s.set_viewport(Viewport::new(400.0, 900.0).with_device_pixel_ratio(2.0));
    assert_ne!(s.strips().frame(), before);
    assert_eq!(s.strips().get(0).map(|set| set.dpr), Some(2.0));
}
