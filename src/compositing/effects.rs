use super::blur::blur_alpha;
use super::color::Rgba8;
use super::surface::{Surface, blend_over};
use super::text::{self, Align};
use crate::util::rng::SimpleRng;
use fontdue::Font;
use image::RgbaImage;
use rayon::prelude::*;

pub const SHADOW_OFFSET_Y: f32 = 10.0;
pub const WATERMARK_TEXT: &str = "Created with Text Behind Image Editor";
pub const WATERMARK_SIZE: f32 = 14.0;
/// Distance of the watermark's right edge and baseline from the surface corner.
pub const WATERMARK_INSET: f32 = 10.0;
pub const WATERMARK_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 128);
/// Vignette radius is `max(width, height) / VIGNETTE_DIVISOR`.
pub const VIGNETTE_DIVISOR: f32 = 1.5;

/// Draws `source` at `(x, y)` over a blurred, offset silhouette of itself.
///
/// `blur` follows the canvas `shadowBlur` convention: sigma is half of it.
pub fn draw_with_shadow(
    surface: &mut Surface,
    source: &RgbaImage,
    x: i64,
    y: i64,
    color: Rgba8,
    blur: f32,
    offset_y: f32,
) {
    let sigma = (blur / 2.0).max(0.0);
    let margin = (sigma * 3.0).ceil() as usize;
    let width = source.width() as usize + 2 * margin;
    let height = source.height() as usize + 2 * margin;

    let mut alpha = vec![0.0f32; width * height];
    for (sx, sy, pixel) in source.enumerate_pixels() {
        alpha[(sy as usize + margin) * width + sx as usize + margin] = pixel.0[3] as f32 / 255.0;
    }
    let shadow = blur_alpha(&alpha, width, height, sigma);

    let origin_x = x - margin as i64;
    let origin_y = y - margin as i64 + offset_y.round() as i64;
    let rgba = color.to_array();
    for row in 0..height {
        for col in 0..width {
            let coverage = shadow[row * width + col];
            if coverage > 0.0 {
                surface.blend_pixel(origin_x + col as i64, origin_y + row as i64, rgba, coverage);
            }
        }
    }

    surface.draw_image(source, x, y);
}

/// Paints an outline of `width` pixels along the inside of the surface edge.
pub fn stroke_border(surface: &mut Surface, width: f32, color: Rgba8) {
    let band = width.round().max(0.0) as i64;
    if band == 0 {
        return;
    }
    let (w, h) = (surface.width() as i64, surface.height() as i64);
    surface.fill_rect(0, 0, w, band.min(h), color);
    surface.fill_rect(0, (h - band).max(band), w, h, color);
    surface.fill_rect(0, band, band.min(w), h - band, color);
    surface.fill_rect((w - band).max(band), band, w, h - band, color);
}

/// Attribution text anchored to the bottom-right corner.
pub fn draw_watermark(surface: &mut Surface, font: &Font, scale: f32) {
    let inset = WATERMARK_INSET * scale;
    let x = surface.width() as f32 - inset;
    let baseline = surface.height() as f32 - inset;
    text::draw_text(
        surface,
        font,
        WATERMARK_TEXT,
        WATERMARK_SIZE * scale,
        x,
        baseline,
        WATERMARK_COLOR,
        Align::Right,
    );
}

/// Top-to-bottom linear gradient blended over the surface.
pub fn linear_gradient(surface: &mut Surface, top: Rgba8, bottom: Rgba8) {
    let span = surface.height().saturating_sub(1).max(1) as f32;
    surface.par_rows(|y, row, clip| {
        let color = top.lerp_premultiplied(bottom, y as f32 / span).to_array();
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let coverage = clip.map_or(1.0, |c| c[x]);
            blend_over(pixel, color, coverage);
        }
    });
}

/// Adds luminance noise: one draw `r` in `[-0.5, 0.5)` per pixel, shifting
/// R, G and B by `opacity * 255 * r` (truncated toward zero). Alpha is kept.
///
/// Works on the raw buffer and ignores any clip. Fully transparent pixels
/// keep their colour; they still consume a draw.
pub fn apply_noise(image: &mut RgbaImage, opacity: f32, seed: u64) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }
    let mut rng = SimpleRng::new(seed);
    for pixel in image.pixels_mut() {
        let delta = (opacity * 255.0 * rng.next_centered()).trunc() as i32;
        if pixel.0[3] == 0 {
            continue;
        }
        for channel in &mut pixel.0[..3] {
            *channel = (*channel as i32 + delta).clamp(0, 255) as u8;
        }
    }
}

/// Radial darkening from a clear centre to black at `intensity` alpha.
pub fn vignette(surface: &mut Surface, intensity: f32) {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius = w.max(h) / VIGNETTE_DIVISOR;
    if radius <= 0.0 {
        return;
    }
    let intensity = intensity.clamp(0.0, 1.0);

    surface.par_rows(|y, row, clip| {
        let dy = y as f32 + 0.5 - cy;
        for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
            let dx = x as f32 + 0.5 - cx;
            let t = ((dx * dx + dy * dy).sqrt() / radius).min(1.0);
            let color = Rgba8::BLACK.with_alpha(intensity * t).to_array();
            let coverage = clip.map_or(1.0, |c| c[x]);
            blend_over(pixel, color, coverage);
        }
    });
}

/// Largest channel difference between two equally sized images.
pub fn max_channel_delta(a: &RgbaImage, b: &RgbaImage) -> u8 {
    a.as_raw()
        .par_iter()
        .zip(b.as_raw().par_iter())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn noise_reuses_one_draw_across_channels() {
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([128, 128, 128, 255]));
        apply_noise(&mut image, 0.5, 7);
        for pixel in image.pixels() {
            assert_eq!(pixel.0[0], pixel.0[1]);
            assert_eq!(pixel.0[1], pixel.0[2]);
            assert_eq!(pixel.0[3], 255);
        }
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let base = RgbaImage::from_pixel(4, 4, Rgba([100, 100, 100, 255]));
        let mut a = base.clone();
        let mut b = base.clone();
        apply_noise(&mut a, 1.0, 42);
        apply_noise(&mut b, 1.0, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn noise_leaves_transparent_pixels_alone() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 0]));
        image.put_pixel(3, 3, Rgba([128, 128, 128, 255]));
        apply_noise(&mut image, 1.0, 11);
        for (x, y, pixel) in image.enumerate_pixels() {
            if (x, y) != (3, 3) {
                assert_eq!(pixel.0, [0, 0, 0, 0]);
            }
        }
    }

    #[test]
    fn border_covers_only_the_edge_band() {
        let mut surface = Surface::new(10, 10);
        stroke_border(&mut surface, 2.0, Rgba8::WHITE);
        let image = surface.image();
        assert_eq!(image.get_pixel(0, 5).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(1, 5).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(9, 9).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(5, 5).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn gradient_runs_from_top_to_bottom_colour() {
        let mut surface = Surface::new(2, 11);
        surface.fill(Rgba8::WHITE);
        linear_gradient(&mut surface, Rgba8::new(0, 0, 0, 0), Rgba8::new(0, 0, 0, 255));
        assert_eq!(surface.image().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(surface.image().get_pixel(1, 10).0, [0, 0, 0, 255]);
        let mid = surface.image().get_pixel(0, 5).0[0];
        assert!((120..=135).contains(&mid), "mid = {mid}");
    }

    #[test]
    fn vignette_darkens_edges_more_than_centre() {
        let mut surface = Surface::new(30, 30);
        surface.fill(Rgba8::WHITE);
        vignette(&mut surface, 0.8);
        let centre = surface.image().get_pixel(15, 15).0[0];
        let corner = surface.image().get_pixel(0, 0).0[0];
        assert!(centre > corner);
        assert!(centre >= 245);
    }

    #[test]
    fn shadow_falls_below_the_source() {
        let mut surface = Surface::new(40, 60);
        let source = RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255]));
        draw_with_shadow(&mut surface, &source, 10, 10, Rgba8::BLACK, 4.0, SHADOW_OFFSET_Y);
        assert_eq!(surface.image().get_pixel(20, 20).0, [255, 0, 0, 255]);
        assert!(surface.image().get_pixel(20, 35).0[3] > 0);
        assert_eq!(surface.image().get_pixel(20, 2).0[3], 0);
    }
}
