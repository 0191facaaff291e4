use super::*;

use crate::assets::store::ImageStore;
use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::Viewport;
use crate::sequence::model::{Cut, Sequence};

fn controller(n: usize) -> ModeController {
    let cuts = (0..n).map(|_| Cut::placeholder().with_hold(1.0)).collect();
    let session = PlaybackSession::new(
        Sequence::new(cuts).unwrap(),
        PlaybackConfig::default(),
        Viewport::new(800.0, 1000.0),
        ImageStore::new("/nonexistent-cutplay-root"),
    );
    ModeController::new(session)
}

#[test]
fn stepping_is_clamped() {
    let mut c = controller(3);
    assert!(!c.prev());
    assert!(!c.first());
    assert!(c.next());
    assert!(c.last());
    assert_eq!(c.index(), 2);
    assert!(!c.next());
    assert!(!c.go_to(7));
    assert_eq!(c.index(), 2);
    assert!(c.prev());
    assert_eq!(c.index(), 1);
}

#[test]
fn same_mode_is_a_no_op() {
    let mut c = controller(2);
    c.go_to(1);
    assert!(!c.set_mode(ViewMode::Normal));
    assert_eq!(c.index(), 1);
}

#[test]
fn mode_change_tears_down_playback() {
    let mut c = controller(2);
    c.go_to(1);
    assert!(c.set_mode(ViewMode::Play));
    assert_eq!(c.index(), 0);

    c.toggle_play();
    c.tick(0.7);
    assert_eq!(c.session().state(), SequencerState::Running);

    assert!(c.set_mode(ViewMode::Scroll));
    assert_eq!(c.session().state(), SequencerState::Idle);
    assert_eq!(c.session().sequencer().time(), 0.0);
    assert!(c.tick(1.0).is_empty());
}

#[test]
fn toggle_play_only_in_play_mode() {
    let mut c = controller(2);
    c.toggle_play();
    assert_eq!(c.session().state(), SequencerState::Idle);

    c.set_mode(ViewMode::Play);
    c.toggle_play();
    assert!(c.session().is_playing());
    c.toggle_play();
    assert_eq!(c.session().state(), SequencerState::Stopped);
    c.toggle_play();
    assert!(c.session().is_playing());
}

#[test]
fn completed_playback_restarts_on_toggle() {
    let mut c = controller(1);
    c.set_mode(ViewMode::Play);
    c.toggle_play();
    c.tick(0.5);
    c.tick(1.0);
    assert_eq!(c.session().state(), SequencerState::Completed);
    c.toggle_play();
    assert!(matches!(c.session().state(), SequencerState::Building { .. }));
}
