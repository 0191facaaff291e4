use std::collections::HashMap;

use kurbo::Shape;

use crate::animation::props::VisualProps;
use crate::animation::timeline::{OverlayPart, TargetId};
use crate::assets::store::PreparedImage;
use crate::effects::filters::{blur_rgba8_premul, hue_rotate_rgba8_premul, ripple_rgba8_premul};
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8Premul, Size, Vec2};
use crate::foundation::error::{CutplayError, CutplayResult};
use crate::geometry::contain::contain_fit;
use crate::playback::snapshot::SceneSnapshot;
use crate::render::backend::FrameRGBA;
use crate::render::raster::{
    affine_to_cpu, bezpath_to_cpu, cpu_rect, paint_from_premul, pixmap_dim, solid,
};
use crate::strips::layout::StripVariant;
use crate::strips::surfaces::StripSet;

/// Colors the compositor paints with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Page background and the fill of every cut container.
    pub background: Rgba8Premul,
    /// Image frame of a cut without a usable image.
    pub placeholder: Rgba8Premul,
    /// Image frame of an encounter cut.
    pub encounter_panel: Rgba8Premul,
    /// Hero bar of the encounter panel.
    pub hero: Rgba8Premul,
    /// Enemy bar of the encounter panel.
    pub enemy: Rgba8Premul,
    /// Interstitial title and subtitle bars.
    pub banner: Rgba8Premul,
    /// Subtitle bar of the interstitial.
    pub banner_sub: Rgba8Premul,
    /// Backdrop alpha of the interstitial at full opacity.
    pub backdrop_alpha: f64,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            background: Rgba8Premul::opaque(0, 0, 0),
            placeholder: Rgba8Premul::opaque(42, 42, 46),
            encounter_panel: Rgba8Premul::opaque(64, 16, 24),
            hero: Rgba8Premul::opaque(37, 99, 235),
            enemy: Rgba8Premul::opaque(220, 38, 38),
            banner: Rgba8Premul::opaque(245, 158, 11),
            banner_sub: Rgba8Premul::opaque(229, 231, 235),
            backdrop_alpha: 0.85,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FilterKey {
    image_ref: String,
    blur: i64,
    hue: i64,
    ripple: i64,
}

const FILTER_CACHE_CAP: usize = 64;

fn quantize(v: f64) -> i64 {
    (v * 10.0).round() as i64
}

/// Placement transform of a box: shift and pixel translation, then rotation and scale about
/// its center. Rotation around the vertical axis is drawn as horizontal foreshortening.
pub(crate) fn box_transform(props: &VisualProps, bx: Rect) -> Affine {
    let c = bx.center().to_vec2();
    let offset = Vec2::new(props.shift.x * bx.width(), props.shift.y * bx.height())
        + props.translate_px;
    let fold = props.rotation_y_deg.to_radians().cos();
    Affine::translate(c + offset)
        * Affine::rotate(props.rotation_deg.to_radians())
        * Affine::scale_non_uniform(props.scale * fold, props.scale)
        * Affine::translate(-c)
}

fn rounded(bx: Rect, corner_radius: f64) -> BezPath {
    let r = corner_radius.clamp(0.0, 0.5) * bx.width().min(bx.height());
    if r <= 0.01 {
        return bx.to_path(0.1);
    }
    bx.to_rounded_rect(r).to_path(0.1)
}

/// CPU compositor for play-mode frames, powered by `vello_cpu`.
///
/// Paints every visible cut in stacking order, then the encounter layers on top.
pub struct CpuCompositor {
    opts: CompositorOpts,
    image_cache: HashMap<String, vello_cpu::Image>,
    filter_cache: HashMap<FilterKey, vello_cpu::Image>,
}

impl Default for CpuCompositor {
    fn default() -> Self {
        Self::new(CompositorOpts::default())
    }
}

impl CpuCompositor {
    /// Compositor with empty caches.
    pub fn new(opts: CompositorOpts) -> Self {
        Self {
            opts,
            image_cache: HashMap::new(),
            filter_cache: HashMap::new(),
        }
    }

    /// Colors in use.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Render one frame at the viewport's device pixel size.
    #[tracing::instrument(
        skip_all,
        fields(width = tracing::field::Empty, height = tracing::field::Empty)
    )]
    pub fn render(&mut self, snap: &SceneSnapshot<'_>) -> CutplayResult<FrameRGBA> {
        let (w, h) = snap.viewport.pixel_size();
        if w == 0 || h == 0 {
            return Err(CutplayError::validation("viewport has zero size"));
        }
        tracing::Span::current().record("width", w).record("height", h);
        let (w16, h16) = (pixmap_dim(w, "frame width")?, pixmap_dim(h, "frame height")?);
        let root = Affine::scale(snap.viewport.dpr());
        let bounds = snap.viewport.bounds();

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(root));
        ctx.set_paint(solid(self.opts.background));
        ctx.fill_rect(&cpu_rect(bounds.x0, bounds.y0, bounds.x1, bounds.y1));

        for cut in snap.draw_order() {
            self.draw_cut(&mut ctx, snap, root, cut)?;
        }
        if let Some(cut) = snap.battle {
            self.draw_battle(&mut ctx, root, bounds, cut);
        } else if snap.overlay.is_some() {
            self.draw_interstitial(&mut ctx, snap, root, bounds);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: w,
            height: h,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_cut(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        snap: &SceneSnapshot<'_>,
        root: Affine,
        cut: usize,
    ) -> CutplayResult<()> {
        let props = snap.props(TargetId::Cut(cut));
        if !props.is_visible() {
            return Ok(());
        }
        let Some(entry) = snap.sequence.get(cut) else {
            return Err(CutplayError::evaluation(format!("cut {cut} is not in the sequence")));
        };
        let bounds = snap.viewport.bounds();
        let container = root * box_transform(&props, bounds);
        let outline = bezpath_to_cpu(&rounded(bounds, props.corner_radius));
        let clipped = props.corner_radius > 0.0;

        ctx.set_transform(affine_to_cpu(container));
        if props.opacity < 1.0 {
            ctx.push_opacity_layer(props.opacity as f32);
        }
        ctx.set_paint(solid(self.opts.background));
        ctx.fill_path(&outline);
        if clipped {
            ctx.push_clip_layer(&outline);
        }

        if let Some(set) = snap.strips.get(cut) {
            draw_strips(ctx, snap, container, cut, set);
        } else if entry.is_encounter() {
            self.draw_encounter_panel(ctx, container, snap.frame);
        } else {
            let image = entry
                .image_ref()
                .and_then(|r| snap.images.get(r).map(|img| (r, img)));
            match image {
                Some((image_ref, img)) => {
                    self.draw_content(ctx, snap, container, &props, cut, image_ref, img)?;
                }
                None => self.draw_placeholder(ctx, container, snap.frame),
            }
        }

        if clipped {
            ctx.pop_layer();
        }
        if props.opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_content(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        snap: &SceneSnapshot<'_>,
        container: Affine,
        container_props: &VisualProps,
        cut: usize,
        image_ref: &str,
        image: &PreparedImage,
    ) -> CutplayResult<()> {
        let content = snap.props(TargetId::Content(cut));
        if !content.is_visible() {
            return Ok(());
        }
        let frame = snap.frame;
        let local = contain_fit(image.natural_size(), frame.size());
        if local.area() <= 0.0 {
            return Ok(());
        }
        let placement = local + frame.origin().to_vec2();
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        // Filter strengths are given in logical pixels; the bitmap is filtered at its own size.
        let px_per_logical = iw / placement.width();
        let paint = self.filtered_paint(
            image_ref,
            image,
            (container_props.blur_px + content.blur_px) * px_per_logical,
            container_props.hue_deg + content.hue_deg,
            (container_props.distortion + content.distortion) * px_per_logical,
        )?;

        let tf = container
            * box_transform(&content, frame)
            * Affine::translate(placement.origin().to_vec2())
            * Affine::scale_non_uniform(placement.width() / iw, placement.height() / ih);
        ctx.set_transform(affine_to_cpu(tf));
        ctx.set_paint(paint);
        if content.opacity < 1.0 {
            ctx.push_opacity_layer(content.opacity as f32);
        }
        ctx.fill_rect(&cpu_rect(0.0, 0.0, iw, ih));
        if content.opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn filtered_paint(
        &mut self,
        image_ref: &str,
        image: &PreparedImage,
        blur_px: f64,
        hue_deg: f64,
        ripple_px: f64,
    ) -> CutplayResult<vello_cpu::Image> {
        let key = FilterKey {
            image_ref: image_ref.to_owned(),
            blur: quantize(blur_px.max(0.0)),
            hue: quantize(hue_deg.rem_euclid(360.0)),
            ripple: quantize(ripple_px),
        };
        if key.blur == 0 && key.hue == 0 && key.ripple == 0 {
            if let Some(paint) = self.image_cache.get(image_ref) {
                return Ok(paint.clone());
            }
            let paint =
                paint_from_premul(image.rgba8_premul.as_slice(), image.width, image.height)?;
            self.image_cache.insert(image_ref.to_owned(), paint.clone());
            return Ok(paint);
        }
        if let Some(paint) = self.filter_cache.get(&key) {
            return Ok(paint.clone());
        }

        let (w, h) = (image.width, image.height);
        let mut bytes = if key.ripple != 0 {
            ripple_rgba8_premul(image.rgba8_premul.as_slice(), w, h, ripple_px)?
        } else {
            image.rgba8_premul.as_slice().to_vec()
        };
        if key.blur != 0 {
            bytes = blur_rgba8_premul(&bytes, w, h, blur_px)?;
        }
        if key.hue != 0 {
            hue_rotate_rgba8_premul(&mut bytes, hue_deg);
        }
        let paint = paint_from_premul(&bytes, w, h)?;

        if self.filter_cache.len() >= FILTER_CACHE_CAP {
            self.filter_cache.clear();
        }
        self.filter_cache.insert(key, paint.clone());
        Ok(paint)
    }

    fn draw_placeholder(&self, ctx: &mut vello_cpu::RenderContext, container: Affine, frame: Rect) {
        ctx.set_transform(affine_to_cpu(container));
        ctx.set_paint(solid(self.opts.placeholder));
        ctx.fill_rect(&cpu_rect(frame.x0, frame.y0, frame.x1, frame.y1));
    }

    fn draw_encounter_panel(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        container: Affine,
        frame: Rect,
    ) {
        ctx.set_transform(affine_to_cpu(container));
        ctx.set_paint(solid(self.opts.encounter_panel));
        ctx.fill_rect(&cpu_rect(frame.x0, frame.y0, frame.x1, frame.y1));
        self.draw_combatants(ctx, frame);
    }

    fn draw_combatants(&self, ctx: &mut vello_cpu::RenderContext, area: Rect) {
        let (w, h) = (area.width(), area.height());
        let side = w.min(h) * 0.25;
        let y = area.y0 + h * 0.5 - side / 2.0;
        let hero_x = area.x0 + w * 0.25 - side / 2.0;
        let enemy_x = area.x0 + w * 0.75 - side / 2.0;
        ctx.set_paint(solid(self.opts.hero));
        ctx.fill_rect(&cpu_rect(hero_x, y, hero_x + side, y + side));
        ctx.set_paint(solid(self.opts.enemy));
        ctx.fill_rect(&cpu_rect(enemy_x, y, enemy_x + side, y + side));
    }

    fn draw_battle(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        root: Affine,
        bounds: Rect,
        cut: usize,
    ) {
        tracing::trace!(cut, "drawing mounted encounter");
        ctx.set_transform(affine_to_cpu(root));
        ctx.set_paint(solid(self.opts.encounter_panel));
        ctx.fill_rect(&cpu_rect(bounds.x0, bounds.y0, bounds.x1, bounds.y1));
        self.draw_combatants(ctx, bounds);
    }

    fn draw_interstitial(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        snap: &SceneSnapshot<'_>,
        root: Affine,
        bounds: Rect,
    ) {
        let part = |p: OverlayPart| {
            snap.overlay
                .and_then(|o| o.get(&TargetId::Overlay(p)).copied())
                .unwrap_or(VisualProps::HIDDEN)
        };

        let backdrop = part(OverlayPart::Backdrop);
        let alpha = (backdrop.opacity * self.opts.backdrop_alpha).clamp(0.0, 1.0);
        if alpha > 0.0 {
            ctx.set_transform(affine_to_cpu(root));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                0,
                0,
                0,
                (alpha * 255.0).round() as u8,
            ));
            ctx.fill_rect(&cpu_rect(bounds.x0, bounds.y0, bounds.x1, bounds.y1));
        }

        let (w, h) = (bounds.width(), bounds.height());
        let bars = [
            (
                OverlayPart::Title,
                Rect::from_center_size((w * 0.5, h * 0.42), Size::new(w * 0.6, h * 0.08)),
                self.opts.banner,
            ),
            (
                OverlayPart::Subtitle,
                Rect::from_center_size((w * 0.5, h * 0.54), Size::new(w * 0.4, h * 0.04)),
                self.opts.banner_sub,
            ),
        ];
        for (p, bx, color) in bars {
            let props = part(p);
            if !props.is_visible() {
                continue;
            }
            ctx.set_transform(affine_to_cpu(root * box_transform(&props, bx)));
            ctx.set_paint(solid(color));
            if props.opacity < 1.0 {
                ctx.push_opacity_layer(props.opacity as f32);
            }
            ctx.fill_rect(&cpu_rect(bx.x0, bx.y0, bx.x1, bx.y1));
            if props.opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }
}

/// Strip and slice surfaces at their animated positions, clipped to the image frame.
fn draw_strips(
    ctx: &mut vello_cpu::RenderContext,
    snap: &SceneSnapshot<'_>,
    container: Affine,
    cut: usize,
    set: &StripSet,
) {
    let frame = snap.frame;
    let origin = frame.origin().to_vec2();
    let to_logical = Affine::scale(1.0 / set.dpr);

    ctx.set_transform(affine_to_cpu(container));
    ctx.push_clip_layer(&bezpath_to_cpu(&frame.to_path(0.1)));
    for (index, surface) in set.surfaces.iter().enumerate() {
        let target = match set.variant {
            StripVariant::Slice => TargetId::Slice { cut, half: index },
            StripVariant::ShutterIn | StripVariant::ShutterOut => TargetId::Strip { cut, index },
        };
        let props = snap.props(target);
        if !props.is_visible() {
            continue;
        }
        let rest = surface.rest + origin;
        let tf = container
            * box_transform(&props, rest)
            * Affine::translate(rest.origin().to_vec2())
            * to_logical;
        ctx.set_transform(affine_to_cpu(tf));
        ctx.set_paint(surface.paint.clone());
        if props.opacity < 1.0 {
            ctx.push_opacity_layer(props.opacity as f32);
        }
        ctx.fill_rect(&cpu_rect(
            0.0,
            0.0,
            f64::from(surface.width_px),
            f64::from(surface.height_px),
        ));
        if props.opacity < 1.0 {
            ctx.pop_layer();
        }
    }
    ctx.pop_layer();
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
