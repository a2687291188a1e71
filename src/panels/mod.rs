mod canvas_panel;
mod export_window;
mod layers_panel;
mod text_panel;
mod top_bar;

pub use canvas_panel::canvas_panel;
pub use export_window::export_window;
pub use layers_panel::layers_panel;
pub use text_panel::text_panel;
pub use top_bar::top_bar;

use image::RgbaImage;

/// GPU copies of the rendered canvas and export preview.
#[derive(Default)]
pub struct Textures {
    pub canvas: Option<egui::TextureHandle>,
    /// Store revision the canvas texture was rendered from
    pub canvas_revision: Option<u64>,
    pub preview: Option<egui::TextureHandle>,
}

pub(crate) fn to_color_image(image: &RgbaImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

/// Uploads `image` into `slot`, reusing the texture when there is one.
pub(crate) fn upload_texture(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    image: &RgbaImage,
) {
    let color = to_color_image(image);
    match slot {
        Some(texture) => texture.set(color, egui::TextureOptions::LINEAR),
        None => *slot = Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR)),
    }
}

/// A slider or drag value finished changing.
pub(crate) fn settled(response: &egui::Response) -> bool {
    response.drag_stopped() || (response.changed() && !response.dragged())
}
