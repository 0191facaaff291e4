use crate::foundation::error::{CutplayError, CutplayResult};

/// Largest kernel radius used for the blur entrance; heavier blurs are clamped.
pub const MAX_BLUR_RADIUS: u32 = 48;

fn expected_len(width: u32, height: u32) -> CutplayResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CutplayError::evaluation("filter buffer size overflow"))
}

/// Gaussian blur of premultiplied RGBA8 with standard deviation `sigma` pixels.
pub fn blur_rgba8_premul(src: &[u8], width: u32, height: u32, sigma: f64) -> CutplayResult<Vec<u8>> {
    let len = expected_len(width, height)?;
    if src.len() != len {
        return Err(CutplayError::evaluation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CutplayError::validation("blur sigma must be >= 0"));
    }
    let radius = ((sigma * 3.0).ceil() as u32).min(MAX_BLUR_RADIUS);
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; len];
    let mut out = vec![0u8; len];
    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// CSS `hue-rotate(deg)` applied in place to premultiplied RGBA8.
pub fn hue_rotate_rgba8_premul(data: &mut [u8], degrees: f64) {
    let (s, c) = degrees.to_radians().sin_cos();
    let m = [
        [
            0.213 + c * 0.787 - s * 0.213,
            0.715 - c * 0.715 - s * 0.715,
            0.072 - c * 0.072 + s * 0.928,
        ],
        [
            0.213 - c * 0.213 + s * 0.143,
            0.715 + c * 0.285 + s * 0.140,
            0.072 - c * 0.072 - s * 0.283,
        ],
        [
            0.213 - c * 0.213 - s * 0.787,
            0.715 - c * 0.715 + s * 0.715,
            0.072 + c * 0.928 + s * 0.072,
        ],
    ];
    for px in data.chunks_exact_mut(4) {
        let a = f64::from(px[3]);
        let rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];
        for (ch, row) in m.iter().enumerate() {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            // Premultiplied channels never exceed alpha.
            px[ch] = v.round().clamp(0.0, a) as u8;
        }
    }
}

/// Wave displacement used by the ripple entrance.
///
/// Each row is shifted horizontally and each column vertically by a sine of the other axis,
/// scaled by `strength` pixels. Samples outside the image read as transparent.
pub fn ripple_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    strength: f64,
) -> CutplayResult<Vec<u8>> {
    let len = expected_len(width, height)?;
    if src.len() != len {
        return Err(CutplayError::evaluation(
            "ripple_rgba8_premul expects src matching width*height*4",
        ));
    }
    if strength.abs() < 0.01 {
        return Ok(src.to_vec());
    }
    let w = width as i64;
    let h = height as i64;
    let wavelength = (w.max(h) as f64 / 6.0).max(8.0);
    let k = std::f64::consts::TAU / wavelength;
    let mut out = vec![0u8; len];
    for y in 0..h {
        let dx = strength * (y as f64 * k).sin();
        for x in 0..w {
            let dy = strength * (x as f64 * k).cos() * 0.5;
            let sx = (x as f64 + dx).round() as i64;
            let sy = (y as f64 + dy).round() as i64;
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            out[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;
