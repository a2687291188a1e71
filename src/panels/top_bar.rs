use crate::TextBehindApp;
use crate::command::Command;

pub fn top_bar(app: &mut TextBehindApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.strong("Text Behind Image");
            ui.separator();

            let can_undo = app.state().can_undo();
            let can_redo = app.state().can_redo();
            if ui
                .add_enabled(can_undo, egui::Button::new("Undo"))
                .on_hover_text("Ctrl+Z")
                .clicked()
            {
                app.dispatch(Command::Undo);
            }
            if ui
                .add_enabled(can_redo, egui::Button::new("Redo"))
                .on_hover_text("Ctrl+Shift+Z")
                .clicked()
            {
                app.dispatch(Command::Redo);
            }

            let history = app.state().history();
            ui.weak(format!("{}/{}", history.index() + 1, history.len()));
            ui.separator();

            let has_image = app.state().images().next().is_some();
            if ui
                .add_enabled(has_image, egui::Button::new("Export…"))
                .clicked()
            {
                app.set_show_export(true);
            }

            if app.files().is_loading() {
                ui.spinner();
                ui.label("Loading image…");
            }
            if let Some(error) = app.files().error() {
                ui.colored_label(ui.visuals().error_fg_color, error);
                if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                    app.files_mut().clear_error();
                }
            }
        });
    });
}
