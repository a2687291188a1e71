#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod app;
pub mod command;
pub mod compositing;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod fonts;
pub mod image;
pub mod layer;
pub mod panels;
pub mod particles;
pub mod scene;
pub mod shortcuts;
pub mod state;
pub mod templates;
pub mod util;

pub use app::TextBehindApp;
pub use command::{Command, History};
pub use config::EditorConfig;
pub use export::{ExportDialog, ExportOptions};
pub use file_handler::FileHandler;
pub use fonts::FontBook;
pub use layer::{Layer, LayerId, LayerPatch};
pub use state::{EditorContext, EditorState};
