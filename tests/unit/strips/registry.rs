use super::*;

fn image() -> Arc<PreparedImage> {
    let px = [90u8, 90, 90, 255].repeat(8 * 4);
    Arc::new(PreparedImage::from_premul(8, 4, px).unwrap())
}

fn request(variant: StripVariant, count: usize) -> Option<StripRequest> {
    Some(StripRequest {
        variant,
        image_ref: "cut.png".to_owned(),
        image: image(),
        count,
        overlap_px: 0.0,
    })
}

const FRAME: Rect = Rect::new(0.0, 0.0, 64.0, 80.0);

#[test]
fn remount_redraws_in_place() {
    let mut reg = StripRegistry::new(3, FRAME, 1.0, 0.1);
    assert_eq!(
        reg.mount(1, request(StripVariant::ShutterIn, 15), 0.0),
        MountOutcome::Mounted
    );
    assert_eq!(
        reg.mount(1, request(StripVariant::ShutterIn, 15), 0.5),
        MountOutcome::Redrawn
    );
    assert_eq!(reg.live_count(), 1);
    assert_eq!(reg.get(1).map(StripSet::len), Some(15));
    assert!(reg.get(0).is_none());
}

#[test]
fn slice_replaces_shutter_in_the_same_slot() {
    let mut reg = StripRegistry::new(2, FRAME, 1.0, 0.1);
    reg.mount(0, request(StripVariant::ShutterIn, 15), 0.0);
    reg.mount(0, request(StripVariant::Slice, 2), 1.0);
    let set = reg.get(0).unwrap();
    assert_eq!(set.variant, StripVariant::Slice);
    assert_eq!(set.len(), 2);
    reg.release(0);
    assert!(reg.get(0).is_none());
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn missing_image_is_skipped() {
    let mut reg = StripRegistry::new(1, FRAME, 1.0, 0.1);
    assert_eq!(reg.mount(0, None, 0.0), MountOutcome::Skipped);
    assert!(reg.get(0).is_none());
}

#[test]
fn zero_frame_defers_then_draws_once_laid_out() {
    let mut reg = StripRegistry::new(1, Rect::ZERO, 1.0, 0.1);
    let outcome = reg.mount(0, request(StripVariant::ShutterIn, 4), 2.0);
    assert!(matches!(outcome, MountOutcome::Deferred { at } if (at - 2.1).abs() < 1e-9));
    assert!(reg.is_pending(0));
    reg.relayout(FRAME, 1.0);
    reg.poll(2.05);
    assert_eq!(reg.get(0).map(StripSet::len), Some(4));
    assert!(!reg.is_pending(0));
}

#[test]
fn zero_frame_after_retry_is_not_drawn() {
    let mut reg = StripRegistry::new(1, Rect::ZERO, 1.0, 0.1);
    reg.mount(0, request(StripVariant::ShutterOut, 10), 0.0);
    reg.poll(0.05);
    assert!(reg.is_pending(0));
    reg.poll(0.2);
    assert!(!reg.is_pending(0));
    assert!(reg.get(0).is_none());
}

#[test]
fn relayout_follows_new_frame() {
    let mut reg = StripRegistry::new(1, FRAME, 1.0, 0.1);
    reg.mount(0, request(StripVariant::Slice, 2), 0.0);
    let before = reg.get(0).unwrap().layout.placement;
    reg.relayout(Rect::new(0.0, 0.0, 32.0, 40.0), 2.0);
    let set = reg.get(0).unwrap();
    assert_ne!(set.layout.placement, before);
    assert_eq!(set.dpr, 2.0);
    assert_eq!(reg.frame(), Rect::new(0.0, 0.0, 32.0, 40.0));
}
