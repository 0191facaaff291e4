use super::*;

use crate::foundation::core::Size;

fn solid_image(w: u32, h: u32) -> PreparedImage {
    let mut px = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        px.extend_from_slice(&[200, 10, 10, 255]);
    }
    PreparedImage::from_premul(w, h, px).unwrap()
}

fn alpha_at(buf: &[u8], width: usize, x: usize, y: usize) -> u8 {
    buf[(y * width + x) * 4 + 3]
}

#[test]
fn strips_at_rest_cover_the_contain_fit_region() {
    let image = solid_image(50, 20);
    let frame = Rect::new(0.0, 0.0, 100.0, 120.0);
    let layout = StripLayout::new(frame, Size::new(50.0, 20.0), 10, 0.0);
    assert_eq!(layout.placement, Rect::new(0.0, 40.0, 100.0, 80.0));

    let surfaces = render_bands(&image, &layout, 1.0).unwrap();
    assert_eq!(surfaces.len(), 10);

    // Paste every strip at its rest rect.
    let (fw, fh) = (100usize, 120usize);
    let mut composed = vec![0u8; fw * fh * 4];
    for s in &surfaces {
        let vello_cpu::ImageSource::Pixmap(pixmap) = &s.paint.image else {
            panic!("strip paint must be a pixmap");
        };
        let data = pixmap.data_as_u8_slice();
        let (sw, sh) = (usize::from(s.width_px), usize::from(s.height_px));
        let (ox, oy) = (s.rest.x0 as usize, s.rest.y0 as usize);
        for y in 0..sh {
            for x in 0..sw {
                let src = (y * sw + x) * 4;
                let dst = ((oy + y) * fw + ox + x) * 4;
                composed[dst..dst + 4].copy_from_slice(&data[src..src + 4]);
            }
        }
    }

    let mut mismatches = 0;
    for y in 0..fh {
        for x in 0..fw {
            let expected = (40..80).contains(&y);
            let covered = alpha_at(&composed, fw, x, y) >= 128;
            if expected != covered {
                mismatches += 1;
            }
        }
    }
    assert_eq!(mismatches, 0);
    let mid = (60 * fw + 55) * 4;
    assert!(composed[mid] > 150 && composed[mid + 1] < 60);
}

#[test]
fn surfaces_scale_with_device_pixel_ratio() {
    let image = solid_image(10, 10);
    let frame = Rect::new(0.0, 0.0, 40.0, 40.0);
    let layout = StripLayout::new(frame, Size::new(10.0, 10.0), 2, 0.0);
    let surfaces = render_bands(&image, &layout, 2.0).unwrap();
    assert_eq!(surfaces.len(), 2);
    assert_eq!((surfaces[0].width_px, surfaces[0].height_px), (40, 80));
    assert_eq!(surfaces[1].rest, Rect::new(20.0, 0.0, 40.0, 40.0));
}
