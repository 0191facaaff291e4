use super::*;

#[test]
fn wide_image_fits_width_and_centers_vertically() {
    let r = contain_fit(Size::new(200.0, 100.0), Size::new(100.0, 100.0));
    assert_eq!(r, Rect::new(0.0, 25.0, 100.0, 75.0));
}

#[test]
fn tall_image_fits_height_and_centers_horizontally() {
    let r = contain_fit(Size::new(100.0, 400.0), Size::new(200.0, 200.0));
    assert_eq!(r, Rect::new(75.0, 0.0, 125.0, 200.0));
}

#[test]
fn equal_aspect_fills_container() {
    let r = contain_fit(Size::new(40.0, 50.0), Size::new(400.0, 500.0));
    assert_eq!(r, Rect::new(0.0, 0.0, 400.0, 500.0));
}

#[test]
fn degenerate_inputs_produce_zero() {
    assert_eq!(
        contain_fit(Size::new(0.0, 10.0), Size::new(10.0, 10.0)),
        Rect::ZERO
    );
    assert_eq!(
        contain_fit(Size::new(10.0, 10.0), Size::new(10.0, 0.0)),
        Rect::ZERO
    );
}

#[test]
fn image_frame_caps_width_and_height() {
    let cfg = PlaybackConfig::default();

    let phone = image_frame(Viewport::new(400.0, 900.0), &cfg);
    assert_eq!(phone, Rect::new(0.0, 200.0, 400.0, 700.0));

    let desktop = image_frame(Viewport::new(1280.0, 720.0), &cfg);
    assert_eq!(desktop.width(), 800.0);
    assert_eq!(desktop.height(), 720.0);
    assert_eq!(desktop.x0, 240.0);

    assert_eq!(image_frame(Viewport::new(0.0, 0.0), &cfg), Rect::ZERO);
}

#[test]
fn deferred_measure_retries_once() {
    let mut m = DeferredMeasure::new();
    assert_eq!(m.measure(Rect::ZERO, 1.0, 0.1), Measure::Retry { at: 1.1 });
    assert_eq!(m.measure(Rect::ZERO, 1.05, 0.1), Measure::Retry { at: 1.1 });
    assert_eq!(m.measure(Rect::ZERO, 1.1, 0.1), Measure::Unavailable);

    let mut m = DeferredMeasure::new();
    m.measure(Rect::ZERO, 0.0, 0.1);
    let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(m.measure(frame, 0.1, 0.1), Measure::Ready(frame));
}
