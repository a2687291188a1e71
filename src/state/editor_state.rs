//! The editor store: layers, selection and history, advanced by a pure reducer.
//!
//! Every `Command` goes through [`EditorState::reduce`], which returns a new
//! state and leaves its input alone. Mutating commands that succeed record a
//! history snapshot:
//!
//! ```text
//!  AddText / SetImage / UpdateLayer / DeleteLayer / DuplicateLayer / ReorderLayers
//!      │
//!      ▼
//!  layers' ──► History::record(layers')   (redo tail dropped)
//!
//!  Undo ──► layers = snapshots[index - 1]
//!  Redo ──► layers = snapshots[index + 1]
//! ```
//!
//! Selection is not part of a snapshot; after undo/redo a selection that no
//! longer names a layer is cleared.
//!
//! # Examples
//!
//! ```rust
//! use text_behind::command::Command;
//! use text_behind::state::EditorState;
//!
//! let state = EditorState::new();
//! let state = state.reduce(Command::AddText("Hello".into()));
//! assert_eq!(state.layers().len(), 1);
//!
//! let state = state.reduce(Command::Undo);
//! assert!(state.layers().is_empty());
//! ```

use crate::command::{Command, History};
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::image::ImageRef;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    layers: Vec<Layer>,
    selected: Option<LayerId>,
    history: History,
    /// Bumped on every effective transition
    revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            selected: None,
            history: History::default(),
            revision: 0,
        }
    }

    /// An empty state whose history keeps at most `limit` snapshots.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: History::with_limit(Vec::new(), limit),
            ..Self::new()
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn selected_layer_id(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.and_then(|id| self.layer(id))
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Image layers in draw order.
    pub fn images(&self) -> impl Iterator<Item = &ImageRef> + '_ {
        self.layers.iter().filter_map(|layer| layer.image.as_ref())
    }

    /// Applies `command` to a copy of this state and returns the copy.
    pub fn reduce(&self, command: Command) -> EditorState {
        let mut next = self.clone();
        if next.apply(command) {
            next.revision += 1;
        }
        next
    }

    /// Returns true if the command changed anything
    fn apply(&mut self, command: Command) -> bool {
        let records = command.records_history();
        let changed = match command {
            Command::SetImage(image) => {
                log::debug!("Adding image layer '{}' ({}x{})", image.name(), image.width(), image.height());
                self.layers.push(Layer::new_image(image));
                true
            }
            Command::AddText(text) => self.add_text(&text),
            Command::UpdateLayer { id, patch } => self.update_layer(id, &patch),
            Command::DeleteLayer(id) => self.delete_layer(id),
            Command::DuplicateLayer(id) => self.duplicate_layer(id),
            Command::SelectLayer(selection) => self.select(selection),
            Command::ReorderLayers(order) => self.reorder(&order),
            Command::Undo => match self.history.undo() {
                Some(snapshot) => {
                    self.layers = snapshot.to_vec();
                    self.drop_dangling_selection();
                    true
                }
                None => false,
            },
            Command::Redo => match self.history.redo() {
                Some(snapshot) => {
                    self.layers = snapshot.to_vec();
                    self.drop_dangling_selection();
                    true
                }
                None => false,
            },
        };

        if changed && records {
            self.history.record(&self.layers);
        }
        changed
    }

    fn add_text(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            log::debug!("Ignoring AddText with empty text");
            return false;
        }
        let layer = Layer::new_text(text);
        self.selected = Some(layer.id);
        self.layers.push(layer);
        true
    }

    fn update_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == id) else {
            log::debug!("Ignoring UpdateLayer for unknown layer {}", id);
            return false;
        };
        let before = layer.clone();
        layer.apply(patch);
        *layer != before
    }

    fn delete_layer(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        if self.layers.len() == before {
            log::debug!("Ignoring DeleteLayer for unknown layer {}", id);
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        true
    }

    fn duplicate_layer(&mut self, id: LayerId) -> bool {
        let Some(source) = self.layer(id) else {
            log::debug!("Ignoring DuplicateLayer for unknown layer {}", id);
            return false;
        };
        let copy = source.duplicate();
        self.selected = Some(copy.id);
        self.layers.push(copy);
        true
    }

    fn select(&mut self, selection: Option<LayerId>) -> bool {
        if let Some(id) = selection {
            if self.layer(id).is_none() {
                log::debug!("Ignoring selection of unknown layer {}", id);
                return false;
            }
        }
        if self.selected == selection {
            return false;
        }
        self.selected = selection;
        true
    }

    fn reorder(&mut self, order: &[LayerId]) -> bool {
        if !self.is_permutation(order) {
            log::warn!(
                "Ignoring ReorderLayers: {} ids given for {} layers, not a permutation",
                order.len(),
                self.layers.len()
            );
            return false;
        }
        if order.iter().zip(&self.layers).all(|(id, layer)| *id == layer.id) {
            return false;
        }

        let mut remaining = std::mem::take(&mut self.layers);
        for id in order {
            if let Some(index) = remaining.iter().position(|layer| layer.id == *id) {
                self.layers.push(remaining.swap_remove(index));
            }
        }
        true
    }

    fn is_permutation(&self, order: &[LayerId]) -> bool {
        if order.len() != self.layers.len() {
            return false;
        }
        let wanted: HashSet<LayerId> = order.iter().copied().collect();
        wanted.len() == order.len() && self.layers.iter().all(|layer| wanted.contains(&layer.id))
    }

    fn drop_dangling_selection(&mut self) {
        if let Some(id) = self.selected {
            if self.layer(id).is_none() {
                self.selected = None;
            }
        }
    }
}
