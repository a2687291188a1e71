use super::color::Rgba8;
use super::surface::Surface;
use fontdue::Font;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Horizontal advance of `text` at `px`.
pub fn measure(font: &Font, text: &str, px: f32) -> f32 {
    text.chars().map(|ch| font.metrics(ch, px).advance_width).sum()
}

/// Draws a single line of text with its baseline at `baseline_y`.
///
/// With [`Align::Right`] the line ends at `x`, like canvas `textAlign = "right"`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    surface: &mut Surface,
    font: &Font,
    text: &str,
    px: f32,
    x: f32,
    baseline_y: f32,
    color: Rgba8,
    align: Align,
) {
    draw_text_lifted(surface, font, text, px, x, baseline_y, color, align, &[]);
}

/// [`draw_text`] with a per-character vertical offset; characters past the
/// end of `lift` sit on the baseline.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_lifted(
    surface: &mut Surface,
    font: &Font,
    text: &str,
    px: f32,
    x: f32,
    baseline_y: f32,
    color: Rgba8,
    align: Align,
    lift: &[f32],
) {
    let start = match align {
        Align::Left => x,
        Align::Right => x - measure(font, text, px),
    };
    let color = color.to_array();

    let mut cursor = start;
    for (i, ch) in text.chars().enumerate() {
        let (metrics, bitmap) = font.rasterize(ch, px);
        let baseline = baseline_y + lift.get(i).copied().unwrap_or(0.0);
        let glyph_x = (cursor.round() as i64).saturating_add(metrics.xmin as i64);
        let glyph_y = (baseline.round() as i64).saturating_sub(metrics.height as i64 + metrics.ymin as i64);

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                surface.blend_pixel(
                    glyph_x.saturating_add(gx as i64),
                    glyph_y.saturating_add(gy as i64),
                    color,
                    coverage as f32 / 255.0,
                );
            }
        }
        cursor += metrics.advance_width;
    }
}
