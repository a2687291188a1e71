use text_behind::command::Command;
use text_behind::image::UploadedImage;
use text_behind::layer::{DUPLICATE_OFFSET, LayerPatch, Position};
use text_behind::state::{EditorContext, EditorState};
use image::RgbaImage;

// Helper to run a sequence of commands from an empty store
fn run(commands: impl IntoIterator<Item = Command>) -> EditorState {
    commands
        .into_iter()
        .fold(EditorState::new(), |state, command| state.reduce(command))
}

fn contents(state: &EditorState) -> Vec<&str> {
    state.layers().iter().map(|layer| layer.content.as_str()).collect()
}

#[test]
fn test_reduce_leaves_input_untouched() {
    let before = run([Command::AddText("one".into())]);
    let snapshot = before.clone();
    let after = before.reduce(Command::AddText("two".into()));

    assert_eq!(before, snapshot);
    assert_eq!(contents(&after), ["one", "two"]);
}

#[test]
fn test_undo_everything_then_redo_everything() {
    let mut state = run(["a", "b", "c"].map(|text| Command::AddText(text.into())));
    for _ in 0..3 {
        state = state.reduce(Command::Undo);
    }
    assert!(state.layers().is_empty());
    assert!(!state.can_undo());

    // One more undo is a no-op
    let revision = state.revision();
    state = state.reduce(Command::Undo);
    assert_eq!(state.revision(), revision);

    for _ in 0..3 {
        state = state.reduce(Command::Redo);
    }
    assert_eq!(contents(&state), ["a", "b", "c"]);
    assert!(!state.can_redo());
}

#[test]
fn test_new_mutation_discards_redo() {
    let state = run([
        Command::AddText("a".into()),
        Command::AddText("b".into()),
        Command::Undo,
        Command::AddText("c".into()),
    ]);
    assert_eq!(contents(&state), ["a", "c"]);
    assert!(!state.can_redo());
    assert_eq!(state.history().len(), 3);
}

#[test]
fn test_selection_is_not_history() {
    let state = run([Command::AddText("a".into()), Command::AddText("b".into())]);
    let first = state.layers()[0].id;
    let recorded = state.history().len();

    let state = state.reduce(Command::SelectLayer(Some(first)));
    assert_eq!(state.selected_layer_id(), Some(first));
    assert_eq!(state.history().len(), recorded);

    // Undoing the second add keeps the selection on a surviving layer
    let state = state.reduce(Command::Undo);
    assert_eq!(state.selected_layer_id(), Some(first));
}

#[test]
fn test_undo_clears_dangling_selection() {
    let state = run([Command::AddText("a".into())]);
    assert!(state.selected_layer_id().is_some());
    let state = state.reduce(Command::Undo);
    assert_eq!(state.selected_layer_id(), None);
}

#[test]
fn test_unknown_ids_are_ignored() {
    let other = run([Command::AddText("elsewhere".into())]);
    let stranger = other.layers()[0].id;
    let state = run([Command::AddText("here".into())]);

    for command in [
        Command::DeleteLayer(stranger),
        Command::DuplicateLayer(stranger),
        Command::SelectLayer(Some(stranger)),
        Command::UpdateLayer {
            id: stranger,
            patch: LayerPatch::content("nope"),
        },
    ] {
        let next = state.reduce(command);
        assert_eq!(next, state);
    }
}

#[test]
fn test_reorder_requires_permutation() {
    let state = run(["a", "b", "c"].map(|text| Command::AddText(text.into())));
    let ids: Vec<_> = state.layers().iter().map(|layer| layer.id).collect();

    let missing = state.reduce(Command::ReorderLayers(vec![ids[2], ids[1]]));
    assert_eq!(missing, state);
    let repeated = state.reduce(Command::ReorderLayers(vec![ids[0], ids[0], ids[1]]));
    assert_eq!(repeated, state);

    let reversed = state.reduce(Command::ReorderLayers(ids.iter().rev().copied().collect()));
    assert_eq!(contents(&reversed), ["c", "b", "a"]);
    assert_eq!(contents(&reversed.reduce(Command::Undo)), ["a", "b", "c"]);
}

#[test]
fn test_duplicate_selects_offset_copy() {
    let state = run([Command::AddText("hero".into())]);
    let source = state.layers()[0].clone();
    let state = state.reduce(Command::DuplicateLayer(source.id));

    let copy = &state.layers()[1];
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.content, "hero");
    assert_eq!(
        copy.position,
        Position::new(
            source.position.x + DUPLICATE_OFFSET,
            source.position.y + DUPLICATE_OFFSET,
            source.position.z
        )
    );
    assert_eq!(state.selected_layer_id(), Some(copy.id));
}

#[test]
fn test_no_op_update_is_not_recorded() {
    let state = run([Command::AddText("same".into())]);
    let id = state.layers()[0].id;
    let next = state.reduce(Command::UpdateLayer {
        id,
        patch: LayerPatch::content("same"),
    });
    assert_eq!(next.revision(), state.revision());
    assert_eq!(next.history().len(), state.history().len());
}

#[test]
fn test_history_limit_keeps_newest() {
    let mut state = EditorState::with_history_limit(5);
    for i in 0..20 {
        state = state.reduce(Command::AddText(format!("layer {i}")));
    }
    assert_eq!(state.history().len(), 5);
    while state.can_undo() {
        state = state.reduce(Command::Undo);
    }
    assert_eq!(state.layers().len(), 16);
}

#[test]
fn test_image_layers_are_kept_in_order() {
    let photo = UploadedImage::new_ref("photo.png", RgbaImage::new(4, 3));
    let state = run([Command::AddText("title".into()), Command::SetImage(photo.clone())]);
    assert_eq!(state.images().count(), 1);
    assert_eq!(state.layers()[1].content, "photo.png");
    assert!(!state.layers()[1].is_text());
}

#[test]
fn test_context_reports_changes() {
    let mut context = EditorContext::new();
    assert!(context.dispatch(Command::AddText("x".into())));
    assert!(!context.dispatch(Command::Redo));
    assert!(context.dispatch(Command::Undo));
    assert!(context.state().layers().is_empty());
}

#[test]
fn test_deleting_selected_layer_clears_selection() {
    let state = run([Command::AddText("keep".into()), Command::AddText("drop".into())]);
    let keep = state.layers()[0].id;
    let drop = state.layers()[1].id;
    assert_eq!(state.selected_layer_id(), Some(drop));

    let state = state.reduce(Command::DeleteLayer(drop));
    assert_eq!(state.selected_layer_id(), None);
    assert_eq!(contents(&state), ["keep"]);

    // Deleting an unselected layer leaves the selection alone
    let state = state
        .reduce(Command::AddText("other".into()))
        .reduce(Command::SelectLayer(Some(keep)));
    let other = state.layers()[1].id;
    let state = state.reduce(Command::DeleteLayer(other));
    assert_eq!(state.selected_layer_id(), Some(keep));
}

#[test]
fn test_interleaved_edits_keep_order_and_latest_patch() {
    let state = run(["a", "b", "c", "d"].map(|text| Command::AddText(text.into())));
    let ids: Vec<_> = state.layers().iter().map(|layer| layer.id).collect();

    let state = [
        Command::UpdateLayer {
            id: ids[0],
            patch: LayerPatch::content("A"),
        },
        Command::DeleteLayer(ids[1]),
        Command::UpdateLayer {
            id: ids[2],
            patch: LayerPatch::position(Position::new(5.0, 6.0, 0.0)),
        },
        Command::AddText("e".into()),
        Command::UpdateLayer {
            id: ids[0],
            patch: LayerPatch::visible(false),
        },
        Command::DeleteLayer(ids[3]),
        Command::UpdateLayer {
            id: ids[2],
            patch: LayerPatch::content("C"),
        },
        Command::UpdateLayer {
            id: ids[1],
            patch: LayerPatch::content("ghost"),
        },
    ]
    .into_iter()
    .fold(state, |state, command| state.reduce(command));

    assert_eq!(contents(&state), ["A", "C", "e"]);
    assert_eq!(state.layers()[0].id, ids[0]);
    assert_eq!(state.layers()[1].id, ids[2]);
    assert!(state.layer(ids[1]).is_none());
    assert!(state.layer(ids[3]).is_none());

    // Patches merge: earlier fields survive later updates
    assert!(!state.layers()[0].visible);
    assert_eq!(state.layers()[1].position, Position::new(5.0, 6.0, 0.0));
    assert!(state.layers()[2].visible);
}
