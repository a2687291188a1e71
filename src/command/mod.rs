mod history;

use crate::error::ValidationError;
use crate::image::ImageRef;
use crate::layer::{LayerId, LayerPatch};

pub use history::{DEFAULT_HISTORY_LIMIT, History};

/// Intents dispatched to the editor store.
///
/// Commands never fail: a command that refers to a missing layer, or whose
/// payload breaks its contract, leaves the state untouched.
#[derive(Debug, Clone)]
pub enum Command {
    /// Append an image layer
    SetImage(ImageRef),

    /// Append a text layer at the default position and select it
    AddText(String),

    /// Merge a partial update into a layer
    UpdateLayer {
        id: LayerId,
        patch: LayerPatch,
    },

    DeleteLayer(LayerId),

    /// Clone a layer under a new id, offset, and select the clone
    DuplicateLayer(LayerId),

    SelectLayer(Option<LayerId>),

    /// New front-to-back order; must name every current layer exactly once
    ReorderLayers(Vec<LayerId>),

    Undo,
    Redo,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetImage(_) => "SetImage",
            Command::AddText(_) => "AddText",
            Command::UpdateLayer { .. } => "UpdateLayer",
            Command::DeleteLayer(_) => "DeleteLayer",
            Command::DuplicateLayer(_) => "DuplicateLayer",
            Command::SelectLayer(_) => "SelectLayer",
            Command::ReorderLayers(_) => "ReorderLayers",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
        }
    }

    /// Returns true if a successful execution records a history snapshot
    pub fn records_history(&self) -> bool {
        !matches!(
            self,
            Command::SelectLayer(_) | Command::Undo | Command::Redo
        )
    }
}

/// Caller-side check for text input before dispatching `AddText`.
pub fn validate_text(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyText)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_rejected() {
        assert_eq!(validate_text(""), Err(ValidationError::EmptyText));
        assert_eq!(validate_text(" \t\n"), Err(ValidationError::EmptyText));
        assert_eq!(validate_text("  hi "), Ok("hi"));
    }

    #[test]
    fn selection_and_history_moves_are_not_recorded() {
        assert!(!Command::SelectLayer(None).records_history());
        assert!(!Command::Undo.records_history());
        assert!(Command::AddText("x".into()).records_history());
    }
}
