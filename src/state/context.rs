//! The container views hold a handle to: current editor state plus the event bus.
//!
//! `EditorContext` owns the single [`EditorState`] of a session. Views read the
//! state through [`EditorContext::state`] and request changes by dispatching
//! [`Command`]s; every effective transition is broadcast on the event bus.
//!
//! # Example
//!
//! ```rust
//! use text_behind::command::Command;
//! use text_behind::state::EditorContext;
//!
//! let mut context = EditorContext::new();
//! assert!(context.dispatch(Command::AddText("Behind".into())));
//!
//! let id = context.state().selected_layer_id().unwrap();
//! assert!(context.dispatch(Command::DeleteLayer(id)));
//! assert!(context.state().layers().is_empty());
//! ```

use crate::command::Command;
use crate::event::{EditorEvent, EventBus, HistoryEvent, LayerEvent};
use crate::layer::LayerId;
use super::EditorState;

/// What a command will report once it has gone through.
enum Outcome {
    Added,
    Updated(LayerId),
    Removed(LayerId),
    Duplicated(LayerId),
    Reordered,
    Undone,
    Redone,
    SelectionOnly,
}

impl Outcome {
    fn of(command: &Command) -> Self {
        match command {
            Command::SetImage(_) | Command::AddText(_) => Outcome::Added,
            Command::UpdateLayer { id, .. } => Outcome::Updated(*id),
            Command::DeleteLayer(id) => Outcome::Removed(*id),
            Command::DuplicateLayer(id) => Outcome::Duplicated(*id),
            Command::ReorderLayers(_) => Outcome::Reordered,
            Command::Undo => Outcome::Undone,
            Command::Redo => Outcome::Redone,
            Command::SelectLayer(_) => Outcome::SelectionOnly,
        }
    }
}

#[derive(Debug, Default)]
pub struct EditorContext {
    state: EditorState,
    /// The event bus for broadcasting editor events
    pub event_bus: EventBus,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            event_bus: EventBus::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Runs `command` through the reducer and emits events for what changed.
    ///
    /// Returns true if the state changed.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let name = command.name();
        let outcome = Outcome::of(&command);
        let next = self.state.reduce(command);

        if next.revision() == self.state.revision() {
            log::trace!("{} left the state unchanged", name);
            return false;
        }

        let old = std::mem::replace(&mut self.state, next);
        let newest = self.state.layers().last().map(|layer| layer.id);
        let index = self.state.history().index();

        let mut events = Vec::new();
        let layer_event = match outcome {
            Outcome::Added => newest.map(|id| LayerEvent::Added { id }),
            Outcome::Updated(id) => Some(LayerEvent::Updated { id }),
            Outcome::Removed(id) => Some(LayerEvent::Removed { id }),
            Outcome::Duplicated(source) => newest.map(|copy| LayerEvent::Duplicated { source, copy }),
            Outcome::Reordered => Some(LayerEvent::Reordered),
            Outcome::Undone => {
                events.push(EditorEvent::HistoryChanged(HistoryEvent::Undone { index }));
                None
            }
            Outcome::Redone => {
                events.push(EditorEvent::HistoryChanged(HistoryEvent::Redone { index }));
                None
            }
            Outcome::SelectionOnly => None,
        };
        events.extend(layer_event.map(EditorEvent::LayerChanged));

        if old.selected_layer_id() != self.state.selected_layer_id() {
            events.push(EditorEvent::SelectionChanged {
                old: old.selected_layer_id(),
                new: self.state.selected_layer_id(),
            });
        }

        self.event_bus.emit_all(events);
        true
    }

    /// Replaces the state with a fresh one, keeping the subscribers.
    pub fn reset(&mut self, state: EditorState) {
        self.state = state;
    }
}
