use crate::command::Command;
use crate::layer::LayerId;
use egui::{Context, Key, Modifiers};

/// Editor actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelected,
    DuplicateSelected,
    Deselect,
}

impl Shortcut {
    /// Maps a key press to a shortcut. Ctrl and Cmd are interchangeable.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        let command = modifiers.ctrl || modifiers.mac_cmd || modifiers.command;
        match key {
            Key::Z if command && modifiers.shift => Some(Shortcut::Redo),
            Key::Z if command => Some(Shortcut::Undo),
            Key::D if command => Some(Shortcut::DuplicateSelected),
            Key::Delete | Key::Backspace if !command => Some(Shortcut::DeleteSelected),
            Key::Escape => Some(Shortcut::Deselect),
            _ => None,
        }
    }

    /// Keys that also edit text; ignored while a text field has focus.
    fn edits_text(self) -> bool {
        matches!(self, Shortcut::DeleteSelected | Shortcut::Deselect)
    }

    /// The command this shortcut dispatches given the current selection.
    pub fn to_command(self, selected: Option<LayerId>) -> Option<Command> {
        match self {
            Shortcut::Undo => Some(Command::Undo),
            Shortcut::Redo => Some(Command::Redo),
            Shortcut::DeleteSelected => selected.map(Command::DeleteLayer),
            Shortcut::DuplicateSelected => selected.map(Command::DuplicateLayer),
            Shortcut::Deselect => selected.map(|_| Command::SelectLayer(None)),
        }
    }
}

/// Shortcuts pressed this frame, in event order.
pub fn pressed(ctx: &Context) -> Vec<Shortcut> {
    let typing = ctx.wants_keyboard_input();
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => Shortcut::from_key(*key, *modifiers),
                _ => None,
            })
            .filter(|shortcut| !(typing && shortcut.edits_text()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_and_cmd_z_undo() {
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::CTRL), Some(Shortcut::Undo));
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::MAC_CMD), Some(Shortcut::Undo));
        assert_eq!(Shortcut::from_key(Key::Z, Modifiers::NONE), None);
    }

    #[test]
    fn shift_turns_undo_into_redo() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(Shortcut::from_key(Key::Z, mods), Some(Shortcut::Redo));
        let mods = Modifiers::MAC_CMD | Modifiers::SHIFT;
        assert_eq!(Shortcut::from_key(Key::Z, mods), Some(Shortcut::Redo));
    }

    #[test]
    fn selection_shortcuts_need_a_selection() {
        assert!(Shortcut::DeleteSelected.to_command(None).is_none());
        let id = LayerId::new();
        assert!(matches!(
            Shortcut::DuplicateSelected.to_command(Some(id)),
            Some(Command::DuplicateLayer(x)) if x == id
        ));
        assert!(matches!(Shortcut::Undo.to_command(None), Some(Command::Undo)));
    }
}
