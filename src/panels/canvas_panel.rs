use super::upload_texture;
use crate::TextBehindApp;
use crate::command::Command;
use crate::compositing::text::measure;
use crate::scene;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

/// Longest frame step fed to the animations, so a stall does not jump.
const MAX_STEP_SECS: f32 = 0.1;

pub fn canvas_panel(app: &mut TextBehindApp, ctx: &egui::Context) {
    let dt = ctx.input(|i| i.stable_dt).min(MAX_STEP_SECS);
    let poses = app.step_animations(dt);
    app.particles_mut().tick();

    egui::CentralPanel::default().show(ctx, |ui| {
        let revision = app.state().revision();
        if !poses.is_empty() || app.textures.canvas_revision != Some(revision) {
            match scene::render_scene(app.state(), app.fonts(), &poses) {
                Some(image) => upload_texture(ctx, &mut app.textures.canvas, "canvas", &image),
                None => app.textures.canvas = None,
            }
            app.textures.canvas_revision = Some(revision);
        }

        let Some(texture) = app.textures.canvas.clone() else {
            empty_canvas(app, ui, ctx);
            return;
        };

        let natural = texture.size_vec2();
        let available = ui.available_size();
        let zoom = (available.x / natural.x).min(available.y / natural.y).min(1.0);
        let (rect, response) = ui.allocate_exact_size(natural * zoom, Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        if let Some(layer) = app.state().selected_layer().filter(|layer| layer.is_text()) {
            let font = app.fonts().resolve(&layer.font_family);
            let width = layer
                .content
                .lines()
                .map(|line| measure(font, line, layer.font_size))
                .fold(0.0, f32::max);
            let height = layer.font_size * 1.2 * layer.content.lines().count().max(1) as f32;
            let min = rect.min + Vec2::new(layer.position.x, layer.position.y) * zoom;
            let outline = Rect::from_min_size(min, Vec2::new(width, height) * zoom).expand(2.0);
            painter.rect_stroke(outline, 2.0, Stroke::new(1.0, ui.visuals().selection.stroke.color));
        }

        if response.clicked() {
            app.dispatch(Command::SelectLayer(None));
        }
        if response.dragged() {
            let delta = response.drag_delta() / zoom;
            if let Some(draft) = app.draft_mut() {
                draft.layer.position = draft.layer.position.offset(delta.x, delta.y);
            }
        }
        if response.drag_stopped() {
            app.commit_draft();
        }

        if let Some(pos) = response.hover_pos() {
            if ctx.input(|i| i.pointer.delta() != Vec2::ZERO) {
                app.particles_mut().spawn(pos.x, pos.y);
            }
        }
        let lifespan = app.particles().settings().lifespan_ms;
        for particle in app.particles().particles() {
            let [r, g, b, a] = particle.color.to_array();
            let alpha = (a as f32 * particle.life_fraction(lifespan)) as u8;
            painter.circle_filled(
                Pos2::new(particle.x, particle.y),
                particle.size,
                Color32::from_rgba_unmultiplied(r, g, b, alpha),
            );
        }

        if !poses.is_empty() || !app.particles().is_empty() {
            ctx.request_repaint();
        }
    });
}

fn empty_canvas(app: &mut TextBehindApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.heading("Drop an image here");
        ui.label("JPEG, PNG or WebP, up to 5MB");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("or open");
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.open_path).hint_text("/path/to/photo.png"),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || submitted {
                app.open_typed_path(ctx);
            }
        });
        if app.files().is_loading() {
            ui.spinner();
        }
        if let Some(error) = app.files().error() {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }
    });
}
