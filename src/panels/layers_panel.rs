use crate::TextBehindApp;
use crate::command::Command;
use crate::layer::{LayerId, LayerKind, LayerPatch};

enum RowAction {
    Dispatch(Command),
    Move { id: LayerId, forward: bool },
}

pub fn layers_panel(app: &mut TextBehindApp, ctx: &egui::Context) {
    egui::SidePanel::left("layers_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Add Text");
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.text_input).hint_text("Enter text…"),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add Text").clicked() || submitted {
                app.add_text();
            }
            if let Some(error) = app.text_error() {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.separator();
            ui.heading("Layers");

            let selected = app.state().selected_layer_id();
            let rows: Vec<(LayerId, LayerKind, String, bool, bool)> = app
                .state()
                .layers()
                .iter()
                .rev()
                .map(|l| (l.id, l.kind, l.content.clone(), l.visible, l.behind_image))
                .collect();
            if rows.is_empty() {
                ui.weak("No layers yet");
            }

            let mut action = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                // Topmost layer first
                for (id, kind, content, visible, behind) in rows {
                    ui.horizontal(|ui| {
                        let mut shown = visible;
                        if ui.checkbox(&mut shown, "").on_hover_text("Visible").changed() {
                            action = Some(RowAction::Dispatch(Command::UpdateLayer {
                                id,
                                patch: LayerPatch::visible(shown),
                            }));
                        }

                        let icon = match (kind, behind) {
                            (LayerKind::Image, _) => "🖼",
                            (LayerKind::Text, true) => "⬇T",
                            (LayerKind::Text, false) => "T",
                        };
                        let label = format!("{icon} {}", truncate(&content, 18));
                        if ui.selectable_label(selected == Some(id), label).clicked() {
                            action = Some(RowAction::Dispatch(Command::SelectLayer(Some(id))));
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                action = Some(RowAction::Dispatch(Command::DeleteLayer(id)));
                            }
                            if ui.small_button("🗐").on_hover_text("Duplicate").clicked() {
                                action = Some(RowAction::Dispatch(Command::DuplicateLayer(id)));
                            }
                            if ui.small_button("⬇").on_hover_text("Move down").clicked() {
                                action = Some(RowAction::Move { id, forward: false });
                            }
                            if ui.small_button("⬆").on_hover_text("Move up").clicked() {
                                action = Some(RowAction::Move { id, forward: true });
                            }
                        });
                    });
                }
            });

            match action {
                Some(RowAction::Dispatch(command)) => {
                    app.dispatch(command);
                }
                Some(RowAction::Move { id, forward }) => app.move_layer(id, forward),
                None => {}
            }
        });
}

fn truncate(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > max_chars {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{cut}…")
    } else {
        first_line.to_string()
    }
}
