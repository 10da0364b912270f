use mathedit_core::node::{Atom, Frac, IdGenerator, Limits, Node, Root, Row, SubSup};
use mathedit_core::movement::{move_down, move_left, move_right, move_up};
use mathedit_core::zipper::Zipper;
use std::rc::Rc;

fn atom_row(ids: &mut IdGenerator, chars: &str) -> Row {
    let children = chars
        .chars()
        .map(|ch| Node::Atom(Atom::new(ids, ch)))
        .collect();
    Row::new(ids, children)
}

/// A nested expression exercising every container kind the linear walk enters:
/// `a √(1/2 + x_i^2) ∑_k b`
fn nested_row(ids: &mut IdGenerator) -> Row {
    let num = atom_row(ids, "1");
    let den = atom_row(ids, "2");
    let frac = Node::Frac(Rc::new(Frac::new(ids, num, den)));

    let sub = atom_row(ids, "i");
    let sup = atom_row(ids, "2");
    let subsup = Node::SubSup(Rc::new(SubSup::new(ids, Some(sub), Some(sup))));

    let plus = Node::Atom(Atom::new(ids, '+'));
    let x = Node::Atom(Atom::new(ids, 'x'));
    let radicand = Row::new(ids, vec![frac, plus, x, subsup]);
    let root = Node::Root(Rc::new(Root::new(ids, None, radicand)));

    let sigma = Atom::new(ids, '∑');
    let lower = atom_row(ids, "k");
    let upper = Row::empty(ids);
    let limits = Node::Limits(Rc::new(Limits::new(ids, sigma, lower, Some(upper))));

    let a = Node::Atom(Atom::new(ids, 'a'));
    let b = Node::Atom(Atom::new(ids, 'b'));
    Row::new(ids, vec![a, root, limits, b])
}

#[test]
fn test_entry_then_flatten_round_trip() {
    let mut ids = IdGenerator::new();
    let row = nested_row(&mut ids);
    assert_eq!(Zipper::enter_start(row.clone()).zip(), row);
    assert_eq!(Zipper::enter_end(row.clone()).zip(), row);
}

#[test]
fn test_walk_right_preserves_tree_at_every_step() {
    let mut ids = IdGenerator::new();
    let row = nested_row(&mut ids);
    let mut zipper = Zipper::enter_start(row.clone());

    let mut steps = 0;
    loop {
        assert_eq!(zipper.zip(), row, "tree intact after {steps} steps");
        let advanced = move_right(&zipper);
        if advanced == zipper {
            break;
        }
        zipper = advanced;
        steps += 1;
        assert!(steps < 1_000, "walk must terminate");
    }
    // The walk visited the inside of every container.
    assert!(steps > row.children.len());
    assert_eq!(zipper.depth(), 0);
    assert!(zipper.row.right.is_empty());
}

#[test]
fn test_move_left_inverts_move_right_everywhere() {
    let mut ids = IdGenerator::new();
    let row = nested_row(&mut ids);
    let mut zipper = Zipper::enter_start(row);

    loop {
        let advanced = move_right(&zipper);
        if advanced == zipper {
            break;
        }
        assert_eq!(move_left(&advanced), zipper);
        zipper = advanced;
    }
}

#[test]
fn test_move_left_at_topmost_start_is_idempotent() {
    let mut ids = IdGenerator::new();
    let row = nested_row(&mut ids);
    let zipper = Zipper::enter_start(row);

    let mut state = zipper.clone();
    for _ in 0..5 {
        state = move_left(&state);
        assert_eq!(state, zipper);
    }
}

#[test]
fn test_walk_left_from_end_mirrors_walk_right_from_start() {
    let mut ids = IdGenerator::new();
    let row = nested_row(&mut ids);

    let mut rightward = 0;
    let mut zipper = Zipper::enter_start(row.clone());
    loop {
        let advanced = move_right(&zipper);
        if advanced == zipper {
            break;
        }
        zipper = advanced;
        rightward += 1;
    }

    let mut leftward = 0;
    let mut zipper = Zipper::enter_end(row);
    loop {
        let advanced = move_left(&zipper);
        if advanced == zipper {
            break;
        }
        zipper = advanced;
        leftward += 1;
    }

    assert_eq!(rightward, leftward);
}

#[test]
fn test_subsup_entry_prefers_subscript_then_superscript() {
    let mut ids = IdGenerator::new();
    let sup = atom_row(&mut ids, "2");
    let sup_id = sup.id;
    let node = Node::SubSup(Rc::new(SubSup::new(&mut ids, None, Some(sup))));
    let row = Row::new(&mut ids, vec![node]);

    // No subscript: entry from the left goes straight to the superscript.
    let zipper = move_right(&Zipper::enter_start(row));
    assert_eq!(zipper.row.id, sup_id);
}

#[test]
fn test_root_exit_steps_index_to_radicand() {
    let mut ids = IdGenerator::new();
    let index = atom_row(&mut ids, "3");
    let radicand = atom_row(&mut ids, "x");
    let radicand_id = radicand.id;
    let node = Node::Root(Rc::new(Root::new(&mut ids, Some(index), radicand)));
    let row = Row::new(&mut ids, vec![node]);

    let mut zipper = Zipper::enter_start(row);
    zipper = move_right(&zipper); // into the index
    zipper = move_right(&zipper); // past '3'
    zipper = move_right(&zipper); // index exhausted: into the radicand
    assert_eq!(zipper.row.id, radicand_id);
    assert_eq!(zipper.row.cursor_index(), 0);
}

#[test]
fn test_vertical_moves_outside_tables_are_noops() {
    let mut ids = IdGenerator::new();
    let row = atom_row(&mut ids, "xy");
    let zipper = Zipper::enter_start(row);
    assert_eq!(move_up(&zipper), zipper);
    assert_eq!(move_down(&zipper), zipper);
}
