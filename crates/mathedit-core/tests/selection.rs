use mathedit_core::node::{Atom, Frac, IdGenerator, Node, Row};
use mathedit_core::selection::{common_prefix_len, selection_zipper};
use mathedit_core::zipper::Zipper;
use mathedit_core::{Action, State, reduce};
use std::rc::Rc;

fn atom_row(ids: &mut IdGenerator, chars: &str) -> Row {
    let children = chars
        .chars()
        .map(|ch| Node::Atom(Atom::new(ids, ch)))
        .collect();
    Row::new(ids, children)
}

/// Row "0,Frac(num=[1,2],den=[3]),+,4" with the cursor immediately left of the Frac.
fn scenario_state(ids: &mut IdGenerator) -> (State, Node) {
    let num = atom_row(ids, "12");
    let den = atom_row(ids, "3");
    let frac = Node::Frac(Rc::new(Frac::new(ids, num, den)));
    let zero = Node::Atom(Atom::new(ids, '0'));
    let plus = Node::Atom(Atom::new(ids, '+'));
    let four = Node::Atom(Atom::new(ids, '4'));
    let row = Row::new(ids, vec![zero, frac.clone(), plus, four]);

    let mut state = State::from_row(row);
    state = reduce(&state, &Action::ArrowRight, ids); // past '0'
    (state, frac)
}

#[test]
fn test_cross_depth_selection_shows_fraction_as_one_unit() {
    let mut ids = IdGenerator::new();
    let (mut state, frac) = scenario_state(&mut ids);

    state = reduce(&state, &Action::StartSelecting, &mut ids);
    // Move right across the entire Frac and one step beyond it.
    for _ in 0..6 {
        state = reduce(&state, &Action::ArrowRight, &mut ids);
    }
    assert_eq!(state.end_zipper.depth(), 0);

    // The combined selection shows the Frac as a single fully selected unit at the
    // outer row's level, never as a partially selected internal structure.
    assert_eq!(state.zipper.depth(), 0);
    assert_eq!(state.zipper.row.selection.len(), 1);
    assert_eq!(state.zipper.row.selection[0], frac);
    assert_eq!(state.zipper.row.left.len(), 1);
    assert_eq!(state.zipper.row.right.len(), 2);
}

#[test]
fn test_selection_mid_fraction_already_covers_whole_unit() {
    let mut ids = IdGenerator::new();
    let (mut state, frac) = scenario_state(&mut ids);

    state = reduce(&state, &Action::StartSelecting, &mut ids);
    // Three steps: into the numerator, past '1', past '2'. The focus endpoint is
    // still inside the fraction.
    for _ in 0..3 {
        state = reduce(&state, &Action::ArrowRight, &mut ids);
    }
    assert!(state.end_zipper.depth() > 0);

    assert_eq!(state.zipper.depth(), 0);
    assert_eq!(state.zipper.row.selection.len(), 1);
    assert_eq!(state.zipper.row.selection[0], frac);
}

#[test]
fn test_backward_cross_depth_selection() {
    let mut ids = IdGenerator::new();
    let num = atom_row(&mut ids, "12");
    let den = atom_row(&mut ids, "3");
    let frac = Node::Frac(Rc::new(Frac::new(&mut ids, num, den)));
    let x = Node::Atom(Atom::new(&mut ids, 'x'));
    let row = Row::new(&mut ids, vec![frac.clone(), x]);

    // Cursor inside the denominator; select leftward until the anchor level.
    let mut state = State::from_row(row);
    for _ in 0..5 {
        state = reduce(&state, &Action::ArrowRight, &mut ids);
    }
    // Anchor inside the denominator, after '3'.
    assert!(state.zipper.depth() > 0);
    state = reduce(&state, &Action::StartSelecting, &mut ids);
    for _ in 0..5 {
        state = reduce(&state, &Action::ArrowLeft, &mut ids);
    }

    // The anchor's enclosing fraction is selected whole at the top level.
    assert_eq!(state.zipper.depth(), 0);
    assert_eq!(state.zipper.row.selection.len(), 1);
    assert!(matches!(state.zipper.row.selection[0], Node::Frac(_)));
}

#[test]
fn test_common_prefix_splits_at_divergent_slots() {
    let mut ids = IdGenerator::new();
    let num = atom_row(&mut ids, "1");
    let den = atom_row(&mut ids, "2");
    let frac = Node::Frac(Rc::new(Frac::new(&mut ids, num, den)));
    let row = Row::new(&mut ids, vec![frac]);

    let start = Zipper::enter_start(row);
    let in_num = mathedit_core::movement::move_right(&start); // numerator
    let mut in_den = in_num.clone();
    for _ in 0..2 {
        in_den = mathedit_core::movement::move_right(&in_den); // past '1', into den
    }

    // Same container, different slots: the shared prefix stops above the fraction.
    assert_eq!(common_prefix_len(&in_num, &in_den), 0);
    let combined = selection_zipper(&in_num, &in_den);
    assert_eq!(combined.depth(), 0);
    assert_eq!(combined.row.selection.len(), 1);
}

#[test]
fn test_selection_zipper_preserves_child_sequence() {
    let mut ids = IdGenerator::new();
    let row = atom_row(&mut ids, "abcde");
    let mut state = State::from_row(row.clone());
    state = reduce(&state, &Action::ArrowRight, &mut ids);
    state = reduce(&state, &Action::StartSelecting, &mut ids);
    state = reduce(&state, &Action::ArrowRight, &mut ids);
    state = reduce(&state, &Action::ArrowRight, &mut ids);

    // left ++ selection ++ right equals the original child sequence.
    assert_eq!(state.zipper.zip(), row);
    assert_eq!(state.zipper.row.selection.len(), 2);
}
