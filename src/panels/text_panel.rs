use super::settled;
use crate::TextBehindApp;
use crate::layer::AnimationKind;
use crate::templates::{FontTemplate, TEMPLATES};

pub fn text_panel(app: &mut TextBehindApp, ctx: &egui::Context) {
    egui::SidePanel::right("text_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Text");
            let Some(draft) = app.draft_mut() else {
                ui.weak("Select a text layer to style it");
                return;
            };
            let id = draft.layer.id;
            let layer = &mut draft.layer;
            let mut commit = false;

            let response = ui.add(egui::TextEdit::multiline(&mut layer.content).desired_rows(2));
            commit |= response.lost_focus();

            egui::Grid::new("text_controls")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Font");
                    commit |= ui.text_edit_singleline(&mut layer.font_family).lost_focus();
                    ui.end_row();

                    ui.label("Size");
                    commit |= settled(&ui.add(egui::Slider::new(&mut layer.font_size, 8.0..=200.0)));
                    ui.end_row();

                    ui.label("Color");
                    commit |= ui.color_edit_button_srgba(&mut layer.effects.color).changed();
                    ui.end_row();

                    ui.label("Opacity");
                    commit |= settled(&ui.add(egui::Slider::new(&mut layer.effects.opacity, 0.0..=1.0)));
                    ui.end_row();

                    ui.label("Metalness");
                    commit |= settled(&ui.add(egui::Slider::new(&mut layer.effects.metalness, 0.0..=1.0)));
                    ui.end_row();

                    ui.label("Roughness");
                    commit |= settled(&ui.add(egui::Slider::new(&mut layer.effects.roughness, 0.0..=1.0)));
                    ui.end_row();

                    ui.label("Depth");
                    commit |= settled(&ui.add(egui::Slider::new(&mut layer.effects.depth, 0.0..=100.0)));
                    ui.end_row();

                    ui.label("Position");
                    ui.horizontal(|ui| {
                        commit |= settled(&ui.add(egui::DragValue::new(&mut layer.position.x).prefix("x ")));
                        commit |= settled(&ui.add(egui::DragValue::new(&mut layer.position.y).prefix("y ")));
                    });
                    ui.end_row();

                    ui.label("Animation");
                    egui::ComboBox::from_id_salt("animation")
                        .selected_text(layer.effects.animation.name())
                        .show_ui(ui, |ui| {
                            for kind in AnimationKind::ALL {
                                commit |= ui
                                    .selectable_value(&mut layer.effects.animation, kind, kind.name())
                                    .changed();
                            }
                        });
                    ui.end_row();
                });

            commit |= ui.checkbox(&mut layer.visible, "Visible").changed();
            commit |= ui.checkbox(&mut layer.behind_image, "Behind image").changed();

            if commit {
                app.commit_draft();
            }

            ui.separator();
            let mut chosen: Option<&FontTemplate> = None;
            egui::CollapsingHeader::new("Templates")
                .default_open(false)
                .show(ui, |ui| {
                    for template in TEMPLATES {
                        if ui
                            .button(template.name)
                            .on_hover_text(template.description)
                            .clicked()
                        {
                            chosen = Some(template);
                        }
                    }
                });
            if let Some(template) = chosen {
                app.apply_template(id, template);
            }
        });
}
