use super::*;

use crate::assets::store::ImageStore;
use crate::effects::profile::AnimationType;
use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::Viewport;
use crate::playback::session::PlaybackSession;
use crate::sequence::model::{Cut, Sequence};

fn red(w: u32, h: u32) -> PreparedImage {
    let px = [255u8, 0, 0, 255];
    PreparedImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn session(cuts: Vec<Cut>, with_image: bool) -> PlaybackSession {
    let mut images = ImageStore::new("/nonexistent-cutplay-root");
    if with_image {
        images.insert("red.png", red(4, 5));
    }
    PlaybackSession::new(
        Sequence::new(cuts).unwrap(),
        PlaybackConfig::default(),
        Viewport::new(40.0, 50.0),
        images,
    )
}

#[test]
fn first_cut_fills_its_frame_at_rest() {
    let s = session(vec![Cut::image("red.png"), Cut::placeholder()], true);
    let frame = CpuCompositor::default().render(&s.snapshot()).unwrap();
    assert_eq!((frame.width, frame.height), (40, 50));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(20, 25), Some([255, 0, 0, 255]));
}

#[test]
fn missing_image_draws_placeholder() {
    let s = session(vec![Cut::image("gone.png")], false);
    let opts = CompositorOpts::default();
    let frame = CpuCompositor::new(opts).render(&s.snapshot()).unwrap();
    let p = opts.placeholder;
    assert_eq!(frame.pixel(20, 25), Some([p.r, p.g, p.b, p.a]));
}

#[test]
fn device_pixel_ratio_scales_output() {
    let mut s = session(vec![Cut::image("red.png")], true);
    s.set_viewport(Viewport::new(40.0, 50.0).with_device_pixel_ratio(2.0));
    let frame = CpuCompositor::default().render(&s.snapshot()).unwrap();
    assert_eq!((frame.width, frame.height), (80, 100));
    assert_eq!(frame.pixel(40, 50), Some([255, 0, 0, 255]));
}

#[test]
fn resting_shutter_strips_reproduce_the_image() {
    let s = session(
        vec![Cut::image("red.png").with_in_effect(AnimationType::Shutter)],
        true,
    );
    assert!(s.strips().get(0).is_some());
    let frame = CpuCompositor::default().render(&s.snapshot()).unwrap();
    assert_eq!(frame.pixel(19, 25), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(3, 10), Some([255, 0, 0, 255]));
}

#[test]
fn interstitial_darkens_the_scene() {
    let mut s = session(
        vec![Cut::image("red.png").with_hold(1.0), Cut::encounter()],
        true,
    );
    s.start();
    s.tick(0.6);
    s.tick(1.0);
    s.tick(1.0);
    let frame = CpuCompositor::default().render(&s.snapshot()).unwrap();
    let [r, _, _, a] = frame.pixel(1, 1).unwrap();
    assert_eq!(a, 255);
    assert!(r < 100, "backdrop should cover the cut, got r={r}");
}

#[test]
fn blur_is_cached_per_strength() {
    let img = red(4, 4);
    let mut c = CpuCompositor::default();
    c.filtered_paint("red.png", &img, 1.0, 0.0, 0.0).unwrap();
    c.filtered_paint("red.png", &img, 1.02, 0.0, 0.0).unwrap();
    assert_eq!(c.filter_cache.len(), 1);
    c.filtered_paint("red.png", &img, 0.0, 0.0, 0.0).unwrap();
    assert_eq!(c.image_cache.len(), 1);
}

#[test]
fn box_transform_shifts_by_own_size() {
    let props = VisualProps {
        shift: Vec2::new(0.0, -1.0),
        ..VisualProps::SHOWN
    };
    let bx = Rect::new(0.0, 0.0, 10.0, 20.0);
    let moved = box_transform(&props, bx) * kurbo::Point::new(5.0, 10.0);
    assert!((moved.y - -10.0).abs() < 1e-9);
    assert!((moved.x - 5.0).abs() < 1e-9);
}
