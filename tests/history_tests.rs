// Undo/redo behavior across the whole engine.

use libautomata::prelude::*;
use pretty_assertions::assert_eq;

fn engine_with_two_states() -> Engine {
    let mut engine = Engine::new();
    engine.execute(EditCommand::create_state()).unwrap();
    engine.execute(EditCommand::create_state()).unwrap();
    engine
}

#[test]
fn test_undo_redo_restores_exact_post_command_state() {
    let mut engine = engine_with_two_states();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();

    engine
        .execute(EditCommand::create_transition(
            q0,
            q1,
            vec!["a".into(), "b".into()],
            "1".into(),
        ))
        .unwrap();
    engine.execute(EditCommand::ToggleAcceptance { id: q1 }).unwrap();
    engine
        .execute(EditCommand::RenameState {
            id: q0,
            name: "start".into(),
            previous: None,
        })
        .unwrap();

    let snapshot = engine.export_graph();
    for _ in 0..3 {
        engine.undo().unwrap();
    }
    for _ in 0..3 {
        engine.redo().unwrap();
    }
    assert_eq!(engine.export_graph(), snapshot);
}

#[test]
fn test_delete_cascade_capture_restores_everything() {
    let mut engine = engine_with_two_states();
    engine.execute(EditCommand::create_state()).unwrap();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();
    let q2 = engine.graph().state_by_name("q2").unwrap();
    for (from, to, symbol) in [(q0, q1, "a"), (q2, q1, "b"), (q1, q2, "c"), (q1, q1, "d")] {
        engine
            .execute(EditCommand::create_transition(
                from,
                to,
                vec![symbol.into()],
                String::new(),
            ))
            .unwrap();
    }

    let snapshot = engine.export_graph();
    engine.execute(EditCommand::delete_state(q1)).unwrap();
    assert_eq!(engine.graph().transition_count(), 0);

    engine.undo().unwrap();
    assert_eq!(engine.export_graph(), snapshot);

    // And the cascade redoes cleanly too.
    engine.redo().unwrap();
    assert_eq!(engine.graph().state_count(), 2);
    assert_eq!(engine.graph().transition_count(), 0);
}

#[test]
fn test_undo_of_middle_deletion_keeps_listing_order() {
    let mut engine = engine_with_two_states();
    engine.execute(EditCommand::create_state()).unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();

    engine.execute(EditCommand::delete_state(q1)).unwrap();
    engine.undo().unwrap();

    let names: Vec<&str> = engine.graph().states().map(|(_, s)| s.name()).collect();
    assert_eq!(names, vec!["q0", "q1", "q2"]);
}

#[test]
fn test_delete_with_stale_id_changes_nothing() {
    let mut engine = engine_with_two_states();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();
    engine.execute(EditCommand::delete_state(q0)).unwrap();

    let snapshot = engine.export_graph();
    let depth = engine.history().undo_depth();
    // q0 is gone; the whole deletion must fail up front, before q1 is
    // touched.
    let result = engine.execute(EditCommand::DeleteItems {
        states: vec![q1, q0],
        transitions: Vec::new(),
        captured: None,
    });
    assert!(matches!(
        result,
        Err(CommandError::Graph(GraphError::StateNotFound(_)))
    ));
    assert_eq!(engine.export_graph(), snapshot);
    assert_eq!(engine.history().undo_depth(), depth);
}

#[test]
fn test_duplicate_delete_targets_collapse() {
    let mut engine = engine_with_two_states();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let snapshot = engine.export_graph();

    engine
        .execute(EditCommand::DeleteItems {
            states: vec![q0, q0],
            transitions: Vec::new(),
            captured: None,
        })
        .unwrap();
    assert_eq!(engine.graph().state_count(), 1);

    engine.undo().unwrap();
    assert_eq!(engine.export_graph(), snapshot);
}

#[test]
fn test_new_command_after_undo_discards_redo() {
    let mut engine = engine_with_two_states();
    engine.undo().unwrap();
    assert!(engine.history().can_redo());

    engine.execute(EditCommand::create_state()).unwrap();
    assert!(!engine.history().can_redo());
    assert!(engine.redo().unwrap().is_none());
}

#[test]
fn test_abandoned_toggle_on_transducer_is_not_history() {
    let mut engine = Engine::with_class(AutomatonClass::Moore);
    engine.execute(EditCommand::create_state()).unwrap();
    let q0 = engine.graph().state_by_name("q0").unwrap();

    let effect = engine
        .execute(EditCommand::ToggleAcceptance { id: q0 })
        .unwrap();
    assert_eq!(effect, CommandEffect::Abandoned);
    assert_eq!(engine.history().undo_depth(), 1); // just the create

    // Undoing skips straight past the abandoned toggle.
    assert_eq!(engine.undo().unwrap().unwrap(), "create state");
    assert!(engine.graph().is_empty());
}

#[test]
fn test_rename_collision_fails_and_preserves_references() {
    let mut engine = engine_with_two_states();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();
    engine
        .execute(EditCommand::create_transition(
            q0,
            q1,
            vec!["a".into()],
            String::new(),
        ))
        .unwrap();
    let snapshot = engine.export_graph();

    let result = engine.execute(EditCommand::RenameState {
        id: q1,
        name: "q0".into(),
        previous: None,
    });
    assert!(matches!(
        result,
        Err(CommandError::Graph(GraphError::DuplicateName(_)))
    ));
    assert_eq!(engine.export_graph(), snapshot);

    // The transition still resolves through the untouched state.
    let trace = engine.run("a").unwrap();
    assert_eq!(trace.steps[0].after.describe(engine.graph()), "[q1]");
}

#[test]
fn test_recreated_state_keeps_its_identity_through_redo() {
    let mut engine = Engine::new();
    engine.execute(EditCommand::create_state()).unwrap();
    let q0 = engine.graph().state_by_name("q0").unwrap();

    engine.undo().unwrap();
    engine.redo().unwrap();
    // Same id and name after the round trip, not a fresh q1.
    assert_eq!(engine.graph().state_by_name("q0"), Some(q0));
    assert_eq!(engine.graph().state_count(), 1);
}

#[test]
fn test_deep_undo_then_full_redo() {
    let mut engine = Engine::new();
    for _ in 0..5 {
        engine.execute(EditCommand::create_state()).unwrap();
    }
    let snapshot = engine.export_graph();

    while engine.undo().unwrap().is_some() {}
    assert!(engine.graph().is_empty());
    assert_eq!(engine.history().redo_depth(), 5);

    while engine.redo().unwrap().is_some() {}
    assert_eq!(engine.export_graph(), snapshot);
}

#[test]
fn test_edit_label_validated_against_class_on_redo_path() {
    let mut engine = Engine::with_class(AutomatonClass::Dfa);
    engine.execute(EditCommand::create_state()).unwrap();
    engine.execute(EditCommand::create_state()).unwrap();
    let q0 = engine.graph().state_by_name("q0").unwrap();
    let q1 = engine.graph().state_by_name("q1").unwrap();
    engine
        .execute(EditCommand::create_transition(
            q0,
            q1,
            vec!["a".into()],
            String::new(),
        ))
        .unwrap();

    // A second transition claiming 'a' from q0 violates determinism.
    let result = engine.execute(EditCommand::create_transition(
        q0,
        q0,
        vec!["a".into()],
        String::new(),
    ));
    assert!(matches!(result, Err(CommandError::Validation(_))));

    // Relabeling the existing transition to a superset of itself is fine.
    let id = engine.graph().transitions().next().unwrap().0;
    engine
        .execute(EditCommand::EditTransitionLabel {
            id,
            symbols: vec!["a".into(), "b".into()],
            output: String::new(),
            previous: None,
        })
        .unwrap();
    engine.undo().unwrap();
    engine.redo().unwrap();
    assert_eq!(
        engine.graph().transitions().next().unwrap().1.input_symbols(),
        ["a".to_string(), "b".to_string()]
    );
}
