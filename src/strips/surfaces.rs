use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::{CutplayError, CutplayResult};
use crate::render::raster::{affine_to_cpu, cpu_rect, paint_from_premul, pixmap_dim};
use crate::strips::layout::{StripLayout, StripVariant};

/// One off-screen band of a source image, rendered at device resolution.
#[derive(Clone, Debug)]
pub struct StripSurface {
    /// Rest position, relative to the image frame, in logical pixels.
    pub rest: Rect,
    /// Surface width in device pixels.
    pub width_px: u16,
    /// Surface height in device pixels.
    pub height_px: u16,
    /// Band content, ready to paint.
    pub paint: vello_cpu::Image,
}

/// The live strip surfaces of one cut.
#[derive(Clone, Debug)]
pub struct StripSet {
    /// Effect the set serves.
    pub variant: StripVariant,
    /// Source image.
    pub image_ref: String,
    /// Band geometry.
    pub layout: StripLayout,
    /// Device pixel ratio the surfaces were drawn at.
    pub dpr: f64,
    /// One surface per band.
    pub surfaces: Vec<StripSurface>,
}

impl StripSet {
    /// Number of bands.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether there are no bands.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Draw every band of `layout` into its own surface.
///
/// Each surface holds the band's slice of the contain-fit render, so compositing all of them at
/// their rest rects reproduces the plain image.
#[tracing::instrument(skip(image, layout), fields(bands = layout.bands.len()))]
pub fn render_bands(
    image: &PreparedImage,
    layout: &StripLayout,
    dpr: f64,
) -> CutplayResult<Vec<StripSurface>> {
    if image.width == 0 || image.height == 0 {
        return Err(CutplayError::evaluation("cannot split an empty image"));
    }
    let source = paint_from_premul(image.rgba8_premul.as_slice(), image.width, image.height)?;
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    let p = layout.placement;
    let image_to_frame = Affine::translate(Vec2::new(p.x0, p.y0))
        * Affine::scale_non_uniform(p.width() / iw, p.height() / ih);

    layout
        .bands
        .iter()
        .map(|&band| {
            let width_px = pixmap_dim((band.width() * dpr).ceil().max(1.0) as u32, "strip width")?;
            let height_px =
                pixmap_dim((band.height() * dpr).ceil().max(1.0) as u32, "strip height")?;
            let band_to_px = Affine::scale(dpr) * Affine::translate(Vec2::new(-band.x0, -band.y0));

            let mut pixmap = vello_cpu::Pixmap::new(width_px, height_px);
            let mut ctx = vello_cpu::RenderContext::new(width_px, height_px);
            ctx.set_transform(affine_to_cpu(band_to_px * image_to_frame));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(source.clone());
            ctx.fill_rect(&cpu_rect(0.0, 0.0, iw, ih));
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);

            Ok(StripSurface {
                rest: band,
                width_px,
                height_px,
                paint: crate::render::raster::image_paint(pixmap),
            })
        })
        .collect()
}

pub(crate) fn build_set(
    variant: StripVariant,
    image_ref: &str,
    image: &Arc<PreparedImage>,
    layout: StripLayout,
    dpr: f64,
) -> CutplayResult<StripSet> {
    let surfaces = render_bands(image, &layout, dpr)?;
    Ok(StripSet {
        variant,
        image_ref: image_ref.to_owned(),
        layout,
        dpr,
        surfaces,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/strips/surfaces.rs"]
mod tests;
