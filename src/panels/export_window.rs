use super::upload_texture;
use crate::TextBehindApp;
use crate::compositing::Rgba8;
use crate::export::{ExportFormat, ExportScale, MAX_QUALITY, MIN_QUALITY};
use egui::Color32;

/// Edits an [`Rgba8`] through egui's color picker.
fn rgba_edit(ui: &mut egui::Ui, label: &str, color: &mut Rgba8) -> bool {
    let [r, g, b, a] = color.to_array();
    let mut picked = Color32::from_rgba_unmultiplied(r, g, b, a);
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            ui.color_edit_button_srgba(&mut picked).changed()
        })
        .inner;
    if changed {
        *color = Rgba8::from(picked);
    }
    changed
}

pub fn export_window(app: &mut TextBehindApp, ctx: &egui::Context) {
    let mut open = true;
    let mut close = false;

    if app.refresh_export_preview() {
        if let Some(preview) = app.export().preview() {
            let image = preview.image.clone();
            upload_texture(ctx, &mut app.textures.preview, "export_preview", &image);
        }
    }

    egui::Window::new("Export Image")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            if let Some(texture) = &app.textures.preview {
                let size = texture.size_vec2();
                let zoom = (400.0 / size.x).min(240.0 / size.y).min(1.0);
                ui.vertical_centered(|ui| {
                    ui.image((texture.id(), size * zoom));
                });
            } else {
                ui.weak("Nothing to export yet");
            }
            ui.separator();

            let exporting = app.export().is_exporting();
            let options = &mut app.export_mut().options;

            ui.add_enabled_ui(!exporting, |ui| {
                egui::Grid::new("export_options")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Format");
                        ui.horizontal(|ui| {
                            for format in ExportFormat::ALL {
                                ui.radio_value(&mut options.format, format, format.to_string());
                            }
                        });
                        ui.end_row();

                        ui.label("Scale");
                        ui.horizontal(|ui| {
                            for scale in ExportScale::ALL {
                                ui.radio_value(&mut options.scale, scale, scale.to_string());
                            }
                        });
                        ui.end_row();

                        ui.label("Quality");
                        ui.add_enabled(
                            options.format.is_lossy(),
                            egui::Slider::new(&mut options.quality, MIN_QUALITY..=MAX_QUALITY),
                        );
                        ui.end_row();

                        ui.label("File name");
                        ui.horizontal(|ui| {
                            ui.text_edit_singleline(&mut options.filename);
                            ui.weak(format!(".{}", options.format.extension()));
                        });
                        ui.end_row();

                        ui.label("Corner radius");
                        ui.add(egui::Slider::new(&mut options.border_radius, 0.0..=64.0));
                        ui.end_row();

                        ui.label("Padding");
                        ui.add(egui::Slider::new(&mut options.padding, 0.0..=100.0));
                        ui.end_row();
                    });

                rgba_edit(ui, "Background", &mut options.background);

                ui.horizontal_wrapped(|ui| {
                    let toggles = &mut options.effects;
                    ui.checkbox(&mut toggles.shadow, "Shadow");
                    ui.checkbox(&mut toggles.border, "Border");
                    ui.checkbox(&mut toggles.watermark, "Watermark");
                    ui.checkbox(&mut toggles.gradient, "Gradient");
                    ui.checkbox(&mut toggles.noise, "Noise");
                    ui.checkbox(&mut toggles.vignette, "Vignette");
                });

                egui::CollapsingHeader::new("Style").show(ui, |ui| {
                    let style = &mut options.style;
                    ui.add(egui::Slider::new(&mut style.shadow_blur, 0.0..=60.0).text("Shadow blur"));
                    rgba_edit(ui, "Shadow", &mut style.shadow_color);
                    ui.add(egui::Slider::new(&mut style.border_width, 0.0..=20.0).text("Border width"));
                    rgba_edit(ui, "Border", &mut style.border_color);
                    rgba_edit(ui, "Gradient top", &mut style.gradient_colors[0]);
                    rgba_edit(ui, "Gradient bottom", &mut style.gradient_colors[1]);
                    ui.add(egui::Slider::new(&mut style.noise_opacity, 0.0..=1.0).text("Noise"));
                    ui.add(egui::Slider::new(&mut style.vignette_intensity, 0.0..=1.0).text("Vignette"));
                });
            });

            if let Some(error) = app.export().last_error() {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    close = true;
                }
                let has_scene = app.state().images().next().is_some();
                if ui
                    .add_enabled(has_scene && !exporting, egui::Button::new("Export"))
                    .clicked()
                {
                    app.start_export(ctx);
                }
                if let Some(file) = app.export().exporting_file() {
                    ui.spinner();
                    ui.label(format!("Saving {file}…"));
                }
            });
        });

    if !open || close {
        app.set_show_export(false);
    }
}
