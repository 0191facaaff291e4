use super::*;

const ALL: [Ease; 7] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::OutQuart,
    Ease::OutExpoScroll,
];

#[test]
fn endpoints_are_pinned() {
    for ease in ALL {
        // The scroll curve starts 0.001 above zero.
        assert!(ease.apply(0.0).abs() <= 1e-3 + 1e-12, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-2.0), ease.apply(0.0));
        assert_eq!(ease.apply(3.0), ease.apply(1.0));
    }
}

#[test]
fn curves_are_monotonic() {
    for ease in ALL {
        let mut prev = ease.apply(0.0);
        for i in 1..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!(v + 1e-12 >= prev, "{ease:?} dips at step {i}");
            prev = v;
        }
    }
}

#[test]
fn in_out_cubic_is_symmetric_at_midpoint() {
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!(Ease::OutQuart.apply(0.5) > Ease::OutCubic.apply(0.5));
}
