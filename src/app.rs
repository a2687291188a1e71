use crate::animation::AnimationState;
use crate::command::{Command, validate_text};
use crate::config::EditorConfig;
use crate::error::FontError;
use crate::event::{EditorEvent, ExportEvent, LogHandler};
use crate::export::{DirectorySink, ExportDialog, ExportOptions};
use crate::file_handler::{FileHandler, UploadSource};
use crate::fonts::FontBook;
use crate::layer::{AnimationKind, DEFAULT_FONT_FAMILY, Layer, LayerId, LayerPatch};
use crate::panels;
use crate::particles::ParticleSystem;
use crate::scene::{self, Poses};
use crate::state::{EditorContext, EditorState};
use crate::templates::FontTemplate;
use crate::util::time::timestamp_nanos;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

/// Storage key for the export options kept between sessions.
pub const EXPORT_OPTIONS_KEY: &str = "export_options";

/// Text panel edits in progress, committed as one `UpdateLayer`.
pub struct Draft {
    pub layer: Layer,
    revision: u64,
}

/// The desktop editor. Only the export options persist; layers live for
/// the session.
pub struct TextBehindApp {
    context: EditorContext,
    fonts: FontBook,
    files: FileHandler,
    export: ExportDialog,
    show_export: bool,
    /// Text typed into the "add text" field
    pub text_input: String,
    text_error: Option<String>,
    /// Path typed into the "open image" field
    pub open_path: String,
    draft: Option<Draft>,
    particles: ParticleSystem,
    animations: HashMap<LayerId, AnimationState>,
    scene: Option<(u64, Arc<RgbaImage>)>,
    seed: u64,
    pub textures: panels::Textures,
}

impl TextBehindApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Result<Self, FontError> {
        let mut app = Self::from_config(config)?;
        if let Some(options) = cc
            .storage
            .and_then(|storage| eframe::get_value::<ExportOptions>(storage, EXPORT_OPTIONS_KEY))
        {
            app.export.options = options;
        }
        Ok(app)
    }

    /// Builds the app without a window.
    pub fn from_config(config: EditorConfig) -> Result<Self, FontError> {
        let fonts = FontBook::with_font_file(DEFAULT_FONT_FAMILY, config.font_path.as_deref())?;
        let export_dir = config.export_dir.clone().unwrap_or_else(|| ".".into());
        let seed = timestamp_nanos();

        let context = EditorContext::with_state(EditorState::with_history_limit(config.history_limit));
        context.event_bus.subscribe(Box::new(LogHandler));

        Ok(Self {
            context,
            fonts,
            files: FileHandler::new(config.upload),
            export: ExportDialog::new(config.export, Arc::new(DirectorySink::new(export_dir))),
            show_export: false,
            text_input: String::new(),
            text_error: None,
            open_path: String::new(),
            draft: None,
            particles: ParticleSystem::new(config.particles, seed),
            animations: HashMap::new(),
            scene: None,
            seed,
            textures: panels::Textures::default(),
        })
    }

    pub fn state(&self) -> &EditorState {
        self.context.state()
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn files(&self) -> &FileHandler {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut FileHandler {
        &mut self.files
    }

    pub fn export(&self) -> &ExportDialog {
        &self.export
    }

    pub fn export_mut(&mut self) -> &mut ExportDialog {
        &mut self.export
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    pub fn text_error(&self) -> Option<&str> {
        self.text_error.as_deref()
    }

    pub fn show_export(&self) -> bool {
        self.show_export
    }

    pub fn set_show_export(&mut self, show: bool) {
        self.show_export = show;
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        self.context.dispatch(command)
    }

    /// Adds the typed text as a new layer, or reports why it cannot.
    pub fn add_text(&mut self) {
        match validate_text(&self.text_input) {
            Ok(text) => {
                let text = text.to_string();
                self.dispatch(Command::AddText(text));
                self.text_input.clear();
                self.text_error = None;
            }
            Err(e) => self.text_error = Some(e.to_string()),
        }
    }

    pub fn apply_template(&mut self, id: LayerId, template: &FontTemplate) {
        match template.to_patch() {
            Ok(patch) => {
                self.dispatch(Command::UpdateLayer { id, patch });
            }
            Err(e) => log::error!("Template '{}' is invalid: {}", template.id, e),
        }
    }

    /// Moves a layer one step in the sequence.
    pub fn move_layer(&mut self, id: LayerId, forward: bool) {
        let mut order: Vec<LayerId> = self.state().layers().iter().map(|layer| layer.id).collect();
        let Some(index) = order.iter().position(|&other| other == id) else {
            return;
        };
        let target = if forward { index + 1 } else { index.wrapping_sub(1) };
        if target < order.len() {
            order.swap(index, target);
            self.dispatch(Command::ReorderLayers(order));
        }
    }

    /// The draft for the selected text layer, re-synced when the store moved on.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        let revision = self.state().revision();
        let selected = self.state().selected_layer().filter(|layer| layer.is_text()).cloned();
        match selected {
            None => self.draft = None,
            Some(layer) => {
                let stale = self
                    .draft
                    .as_ref()
                    .is_none_or(|draft| draft.layer.id != layer.id || draft.revision != revision);
                if stale {
                    self.draft = Some(Draft { layer, revision });
                }
            }
        }
        self.draft.as_mut()
    }

    /// Dispatches the difference between the draft and the stored layer.
    ///
    /// Blank content is not committed; the draft falls back to the stored text.
    pub fn commit_draft(&mut self) {
        let Some(draft) = &mut self.draft else {
            return;
        };
        let Some(stored) = self.context.state().layer(draft.layer.id) else {
            return;
        };
        if validate_text(&draft.layer.content).is_err() {
            draft.layer.content = stored.content.clone();
        }
        let patch = LayerPatch::diff(stored, &draft.layer);
        if patch.is_empty() {
            return;
        }
        let id = draft.layer.id;
        self.dispatch(Command::UpdateLayer { id, patch });
        let revision = self.state().revision();
        if let Some(draft) = &mut self.draft {
            draft.revision = revision;
        }
    }

    pub fn open_typed_path(&mut self, ctx: &egui::Context) {
        let path = self.open_path.trim();
        if path.is_empty() {
            return;
        }
        let repaint = ctx.clone();
        self.files
            .start(UploadSource::from_path(path), move || repaint.request_repaint());
    }

    /// Advances every animated text layer by `dt` seconds.
    pub fn step_animations(&mut self, dt: f32) -> Poses {
        let mut poses = Poses::new();
        let layers = self.context.state().layers();
        self.animations.retain(|id, _| layers.iter().any(|layer| layer.id == *id));

        for layer in layers.iter().filter(|layer| layer.is_text() && layer.visible) {
            let kind = layer.effects.animation;
            if kind == AnimationKind::None {
                self.animations.remove(&layer.id);
                continue;
            }
            let animation = self
                .animations
                .entry(layer.id)
                .or_insert_with(|| AnimationState::new(kind, self.seed));
            animation.set_kind(kind);
            poses.insert(layer.id, animation.step(dt, layer.content.chars().count()));
        }
        poses
    }

    /// The static scene for export, cached per revision.
    pub fn scene(&mut self) -> Option<Arc<RgbaImage>> {
        let revision = self.state().revision();
        if let Some((cached, image)) = &self.scene {
            if *cached == revision {
                return Some(Arc::clone(image));
            }
        }
        let image = Arc::new(scene::render_scene(self.state(), &self.fonts, &Poses::new())?);
        self.scene = Some((revision, Arc::clone(&image)));
        Some(image)
    }

    /// Re-renders the export preview if the scene or the options changed.
    pub fn refresh_export_preview(&mut self) -> bool {
        let scene = self.scene();
        let revision = self.state().revision();
        self.export.refresh_preview(scene.as_deref(), revision, &self.fonts)
    }

    pub fn start_export(&mut self, ctx: &egui::Context) {
        let scene = self.scene();
        let repaint = ctx.clone();
        match self
            .export
            .start_export(scene.as_deref(), &self.fonts, move || repaint.request_repaint())
        {
            Ok(filename) => self
                .context
                .event_bus
                .emit(EditorEvent::ExportChanged(ExportEvent::Started { filename })),
            Err(e) => log::debug!("Export not started: {}", e),
        }
    }

    /// Picks up finished uploads and saves.
    fn poll_background(&mut self, ctx: &egui::Context) {
        self.files.check_for_dropped_files(ctx);
        for command in self.files.poll() {
            self.dispatch(command);
        }

        if let Some(result) = self.export.poll() {
            let event = match result {
                Ok(path) => {
                    self.show_export = false;
                    ExportEvent::Saved {
                        filename: path.display().to_string(),
                    }
                }
                Err(e) => ExportEvent::Failed {
                    message: e.to_string(),
                },
            };
            self.context.event_bus.emit(EditorEvent::ExportChanged(event));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        for shortcut in crate::shortcuts::pressed(ctx) {
            if let Some(command) = shortcut.to_command(self.state().selected_layer_id()) {
                log::debug!("Shortcut {:?}", shortcut);
                self.dispatch(command);
            }
        }
    }
}

impl eframe::App for TextBehindApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, EXPORT_OPTIONS_KEY, &self.export.options);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background(ctx);
        self.handle_shortcuts(ctx);

        panels::top_bar(self, ctx);
        panels::layers_panel(self, ctx);
        panels::text_panel(self, ctx);
        panels::canvas_panel(self, ctx);
        if self.show_export {
            panels::export_window(self, ctx);
        }

        self.files.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TextBehindApp {
        TextBehindApp::from_config(EditorConfig::default()).unwrap()
    }

    #[test]
    fn blank_text_reports_an_error() {
        let mut app = app();
        app.text_input = "   ".into();
        app.add_text();
        assert_eq!(app.text_error(), Some("Please enter some text"));
        assert!(app.state().layers().is_empty());

        app.text_input = " Behind ".into();
        app.add_text();
        assert!(app.text_error().is_none());
        assert_eq!(app.state().layers()[0].content, "Behind");
        assert!(app.text_input.is_empty());
    }

    #[test]
    fn draft_commits_as_one_update() {
        let mut app = app();
        app.text_input = "title".into();
        app.add_text();
        let before = app.state().history().len();

        let draft = app.draft_mut().unwrap();
        draft.layer.font_size = 64.0;
        draft.layer.content = "TITLE".into();
        app.commit_draft();

        assert_eq!(app.state().history().len(), before + 1);
        let layer = app.state().selected_layer().unwrap();
        assert_eq!(layer.font_size, 64.0);
        assert_eq!(layer.content, "TITLE");

        // Nothing changed, nothing recorded
        app.commit_draft();
        assert_eq!(app.state().history().len(), before + 1);

        app.draft_mut().unwrap().layer.content = "  ".into();
        app.commit_draft();
        assert_eq!(app.state().selected_layer().unwrap().content, "TITLE");
        assert_eq!(app.draft_mut().unwrap().layer.content, "TITLE");
    }

    #[test]
    fn move_layer_reorders() {
        let mut app = app();
        for text in ["a", "b"] {
            app.text_input = text.into();
            app.add_text();
        }
        let first = app.state().layers()[0].id;
        app.move_layer(first, true);
        assert_eq!(app.state().layers()[1].id, first);
        // Already last
        let revision = app.state().revision();
        app.move_layer(first, true);
        assert_eq!(app.state().revision(), revision);
    }

    #[test]
    fn animations_follow_layers() {
        let mut app = app();
        app.text_input = "spin".into();
        app.add_text();
        let id = app.state().selected_layer_id().unwrap();
        assert!(app.step_animations(0.1).is_empty());

        app.dispatch(Command::UpdateLayer {
            id,
            patch: LayerPatch::effects(crate::layer::EffectsPatch {
                animation: Some(AnimationKind::Rotate),
                ..Default::default()
            }),
        });
        let poses = app.step_animations(0.1);
        assert!(poses[&id].rot_y > 0.0);

        app.dispatch(Command::DeleteLayer(id));
        assert!(app.step_animations(0.1).is_empty());
    }

    #[test]
    fn scene_needs_an_image() {
        let mut app = app();
        assert!(app.scene().is_none());
        let photo = crate::image::UploadedImage::new_ref("p.png", RgbaImage::new(10, 10));
        app.dispatch(Command::SetImage(photo));
        let first = app.scene().unwrap();
        let second = app.scene().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
