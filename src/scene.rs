//! Flattens the layer stack into the raster the export pipeline starts from.
//!
//! Draw order: text layers flagged `behind_image`, then image layers, then
//! the remaining text, each group in sequence order. Hidden layers are
//! skipped; opacity scales each layer's alpha.
//!
//! Text layers may carry an animation [`Pose`]. Its translation, scale and
//! per-character lift are applied; rotation has no 2D counterpart and is
//! left out.

use crate::animation::Pose;
use crate::compositing::text::{self, Align};
use crate::compositing::{Rgba8, Surface};
use crate::fonts::FontBook;
use crate::layer::{Layer, LayerId, LayerKind};
use crate::state::EditorState;
use image::RgbaImage;
use std::collections::HashMap;

/// Animation poses by layer; layers without one are drawn at rest.
pub type Poses = HashMap<LayerId, Pose>;

/// Scene units to pixels, per pixel of font size.
const UNIT_PER_FONT_PX: f32 = 2.0;

/// Largest canvas side in pixels. Image layers pushed further out are cut off.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Canvas size spanned by the image layers, hidden ones included.
pub fn canvas_size(layers: &[Layer]) -> Option<(u32, u32)> {
    layers
        .iter()
        .filter_map(|layer| {
            let image = layer.image.as_ref()?;
            let side = |offset: f32, length: u32| {
                let offset = offset.clamp(0.0, MAX_CANVAS_SIDE as f32) as u32;
                offset.saturating_add(length).clamp(1, MAX_CANVAS_SIDE)
            };
            Some((
                side(layer.position.x, image.width()),
                side(layer.position.y, image.height()),
            ))
        })
        .reduce(|(w, h), (x, y)| (w.max(x), h.max(y)))
}

/// Layers in the order they are painted.
pub fn draw_order(layers: &[Layer]) -> impl Iterator<Item = &Layer> {
    let behind = layers.iter().filter(|l| l.kind == LayerKind::Text && l.behind_image);
    let images = layers.iter().filter(|l| l.kind == LayerKind::Image);
    let front = layers.iter().filter(|l| l.kind == LayerKind::Text && !l.behind_image);
    behind.chain(images).chain(front)
}

/// Renders the scene, or `None` when there is no image to put text behind.
pub fn render_scene(state: &EditorState, fonts: &FontBook, poses: &Poses) -> Option<RgbaImage> {
    let (width, height) = canvas_size(state.layers())?;
    let mut surface = Surface::new(width, height);

    for layer in draw_order(state.layers()).filter(|layer| layer.visible) {
        match layer.kind {
            LayerKind::Image => draw_image_layer(&mut surface, layer),
            LayerKind::Text => draw_text_layer(&mut surface, layer, fonts, poses.get(&layer.id)),
        }
    }
    Some(surface.into_image())
}

fn draw_image_layer(surface: &mut Surface, layer: &Layer) {
    let Some(image) = &layer.image else {
        return;
    };
    let opacity = layer.effects.opacity;
    let x = layer.position.x.round() as i64;
    let y = layer.position.y.round() as i64;
    for (px, py, pixel) in image.pixels().enumerate_pixels() {
        surface.blend_pixel(x.saturating_add(px as i64), y.saturating_add(py as i64), pixel.0, opacity);
    }
}

fn draw_text_layer(surface: &mut Surface, layer: &Layer, fonts: &FontBook, pose: Option<&Pose>) {
    let rest = Pose::default();
    let pose = pose.unwrap_or(&rest);
    let font = fonts.resolve(&layer.font_family);
    let px = layer.font_size * pose.scale;
    let unit = layer.font_size * UNIT_PER_FONT_PX;
    let (ascent, line_height) = font
        .horizontal_line_metrics(px)
        .map_or((px * 0.8, px * 1.2), |metrics| (metrics.ascent, metrics.new_line_size));
    let base = Rgba8::from(layer.effects.color);
    let color = base.with_alpha(base.a as f32 / 255.0 * layer.effects.opacity);
    // Scene y points up
    let lift: Vec<f32> = pose.char_lift.iter().map(|l| -l * unit).collect();

    // `position` is the top-left corner of the first line
    let x = layer.position.x + pose.dx * unit;
    let top = layer.position.y - pose.dy * unit;
    for (i, line) in layer.content.lines().enumerate() {
        text::draw_text_lifted(
            surface,
            font,
            line,
            px,
            x,
            top + ascent + i as f32 * line_height,
            color,
            Align::Left,
            &lift,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::image::UploadedImage;
    use crate::layer::LayerPatch;
    use image::Rgba;

    fn with_photo() -> EditorState {
        let photo = UploadedImage::new_ref("photo.png", RgbaImage::from_pixel(200, 120, Rgba([0, 0, 255, 255])));
        EditorState::new().reduce(Command::SetImage(photo))
    }

    #[test]
    fn no_image_means_no_scene() {
        let fonts = FontBook::builtin().unwrap();
        let state = EditorState::new().reduce(Command::AddText("alone".into()));
        assert!(render_scene(&state, &fonts, &Poses::new()).is_none());
    }

    #[test]
    fn behind_text_is_hidden_by_an_opaque_image() {
        let fonts = FontBook::builtin().unwrap();
        let state = with_photo().reduce(Command::AddText("HIDDEN".into()));
        let id = state.selected_layer_id().unwrap();
        let state = state.reduce(Command::UpdateLayer {
            id,
            patch: LayerPatch::behind_image(true),
        });

        let scene = render_scene(&state, &fonts, &Poses::new()).unwrap();
        assert_eq!(scene.dimensions(), (200, 120));
        assert!(scene.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn front_text_draws_over_the_image() {
        let fonts = FontBook::builtin().unwrap();
        let state = with_photo().reduce(Command::AddText("FRONT".into()));
        let scene = render_scene(&state, &fonts, &Poses::new()).unwrap();
        assert!(scene.pixels().any(|p| p.0 != [0, 0, 255, 255]));
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let fonts = FontBook::builtin().unwrap();
        let state = with_photo();
        let id = state.layers()[0].id;
        let state = state.reduce(Command::UpdateLayer {
            id,
            patch: LayerPatch::visible(false),
        });
        let scene = render_scene(&state, &fonts, &Poses::new()).unwrap();
        assert!(scene.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn poses_move_text() {
        let fonts = FontBook::builtin().unwrap();
        let state = with_photo().reduce(Command::AddText("MOVE".into()));
        let id = state.selected_layer_id().unwrap();
        let at_rest = render_scene(&state, &fonts, &Poses::new()).unwrap();

        let mut poses = Poses::new();
        poses.insert(id, Pose { dx: 0.5, ..Pose::default() });
        let moved = render_scene(&state, &fonts, &poses).unwrap();
        assert_ne!(at_rest, moved);
    }

    #[test]
    fn draw_order_puts_behind_text_first() {
        let state = with_photo().reduce(Command::AddText("back".into()));
        let back = state.selected_layer_id().unwrap();
        let state = state
            .reduce(Command::UpdateLayer {
                id: back,
                patch: LayerPatch::behind_image(true),
            })
            .reduce(Command::AddText("front".into()));
        let kinds: Vec<&str> = draw_order(state.layers()).map(|l| l.content.as_str()).collect();
        assert_eq!(kinds, ["back", "photo.png", "front"]);
    }

    #[test]
    fn far_offsets_are_capped() {
        let fonts = FontBook::builtin().unwrap();
        let state = with_photo();
        let id = state.layers()[0].id;
        let state = state.reduce(Command::UpdateLayer {
            id,
            patch: LayerPatch::position(crate::layer::Position::new(5e9, 0.0, 0.0)),
        });
        assert_eq!(canvas_size(state.layers()), Some((MAX_CANVAS_SIDE, 120)));

        let far = crate::layer::Position::new(f32::MAX, f32::MIN, 0.0);
        let state = state.reduce(Command::UpdateLayer {
            id,
            patch: LayerPatch::position(far),
        });
        let state = state.reduce(Command::AddText("gone".into()));
        let text = state.selected_layer_id().unwrap();
        let state = state.reduce(Command::UpdateLayer {
            id: text,
            patch: LayerPatch::position(far),
        });
        let scene = render_scene(&state, &fonts, &Poses::new()).unwrap();
        assert_eq!(scene.dimensions(), (MAX_CANVAS_SIDE, 120));
        assert!(scene.pixels().all(|p| p.0[3] == 0));
    }
}
