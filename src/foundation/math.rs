pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Time comparisons across the timeline tolerate float accumulation from per-frame stepping.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

pub(crate) fn approx_le(a: f64, b: f64) -> bool {
    a <= b + TIME_EPSILON
}
