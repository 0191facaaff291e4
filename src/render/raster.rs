use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Point, Rgba8Premul};
use crate::foundation::error::{CutplayError, CutplayResult};

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn cpu_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(x0, y0, x1, y1)
}

pub(crate) fn solid(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    // Paint colors are straight alpha.
    let un = |v: u8| -> u8 {
        if c.a == 0 {
            0
        } else {
            ((u16::from(v) * 255 + u16::from(c.a) / 2) / u16::from(c.a)).min(255) as u8
        }
    };
    vello_cpu::peniko::Color::from_rgba8(un(c.r), un(c.g), un(c.b), c.a)
}

pub(crate) fn pixmap_dim(v: u32, what: &str) -> CutplayResult<u16> {
    v.try_into()
        .map_err(|_| CutplayError::evaluation(format!("{what} exceeds u16")))
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CutplayResult<vello_cpu::Pixmap> {
    let w = pixmap_dim(width, "image width")?;
    let h = pixmap_dim(height, "image height")?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CutplayError::evaluation(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

pub(crate) fn paint_from_premul(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CutplayResult<vello_cpu::Image> {
    Ok(image_paint(premul_bytes_to_pixmap(
        rgba8_premul,
        width,
        height,
    )?))
}
