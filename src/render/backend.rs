use crate::foundation::core::Rgba8Premul;
use crate::foundation::math::mul_div255_u16;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, for encoders that expect it.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Opaque RGBA of the frame composited over `bg`, written into `out`.
    pub fn flatten_over(&self, bg: Rgba8Premul, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = u16::from(px[3]);
            let inv = 255 - a;
            for (c, under) in px[..3].iter().zip([bg.r, bg.g, bg.b]) {
                let c = if self.premultiplied {
                    u16::from(*c)
                } else {
                    mul_div255_u16(u16::from(*c), a)
                };
                out.push((c + mul_div255_u16(u16::from(under), inv)).min(255) as u8);
            }
            out.push(255);
        }
    }
}
