//! Turns a rendered scene into the framed, decorated image the user exports.
//!
//! The passes run in a fixed order and each draws on top of the previous:
//!
//! ```text
//! surface (w + 2p, h + 2p) · scale
//!   └─ rounded clip ─ background ─ source (+ shadow) ─ border ─ watermark
//!        └─ gradient ─ noise ─ vignette
//! ```
//!
//! Geometry is multiplied by the render scale, so the padding stays
//! proportional to the content at every export size.

pub mod blur;
pub mod color;
pub mod effects;
pub mod surface;
pub mod text;

use crate::export::ExportOptions;
use crate::fonts::FontBook;
use crate::layer::DEFAULT_FONT_FAMILY;
use crate::util::time::timestamp_nanos;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::borrow::Cow;

pub use color::Rgba8;
pub use surface::{Mask, Surface};

/// Scale used for the on-screen export preview.
pub const PREVIEW_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Multiplier applied to the source size, padding and every stroke width
    pub scale: f32,
    pub noise_seed: u64,
}

impl RenderSettings {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            noise_seed: timestamp_nanos(),
        }
    }

    pub fn preview() -> Self {
        Self::new(PREVIEW_SCALE)
    }

    pub fn with_seed(self, noise_seed: u64) -> Self {
        Self { noise_seed, ..self }
    }
}

fn scaled(length: u32, scale: f32) -> u32 {
    ((length as f32 * scale).round() as u32).max(1)
}

/// Runs the full pipeline over `source`.
pub fn compose(
    source: &RgbaImage,
    options: &ExportOptions,
    settings: RenderSettings,
    fonts: &FontBook,
) -> RgbaImage {
    let scale = if settings.scale.is_finite() && settings.scale > 0.0 {
        settings.scale
    } else {
        1.0
    };
    let style = &options.style;
    let toggles = &options.effects;

    let content_w = scaled(source.width(), scale);
    let content_h = scaled(source.height(), scale);
    let pad = (options.padding.max(0.0) * scale).round() as u32;

    let mut surface = Surface::new(content_w + 2 * pad, content_h + 2 * pad);
    log::debug!(
        "Compositing {}x{} source into {}x{} at {}x",
        source.width(),
        source.height(),
        surface.width(),
        surface.height(),
        scale
    );

    surface.clip_rounded(options.border_radius * scale);
    surface.fill(options.background);

    let content: Cow<'_, RgbaImage> = if (content_w, content_h) == source.dimensions() {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(imageops::resize(source, content_w, content_h, FilterType::Triangle))
    };
    if toggles.shadow {
        effects::draw_with_shadow(
            &mut surface,
            &content,
            pad as i64,
            pad as i64,
            style.shadow_color,
            style.shadow_blur * scale,
            effects::SHADOW_OFFSET_Y * scale,
        );
    } else {
        surface.draw_image(&content, pad as i64, pad as i64);
    }

    if toggles.border {
        effects::stroke_border(&mut surface, style.border_width * scale, style.border_color);
    }
    if toggles.watermark {
        effects::draw_watermark(&mut surface, fonts.resolve(DEFAULT_FONT_FAMILY), scale);
    }
    if toggles.gradient {
        let [top, bottom] = style.gradient_colors;
        effects::linear_gradient(&mut surface, top, bottom);
    }
    if toggles.noise {
        effects::apply_noise(surface.image_mut(), style.noise_opacity, settings.noise_seed);
    }
    if toggles.vignette {
        effects::vignette(&mut surface, style.vignette_intensity);
    }

    surface.into_image()
}
