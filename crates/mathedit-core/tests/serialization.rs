use mathedit_core::node::{
    Atom, Delimited, Frac, IdGenerator, Limits, Node, Root, Row, SubSup, Table, TableKind,
};
use mathedit_core::{Action, Session};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn atom_row(ids: &mut IdGenerator, chars: &str) -> Row {
    let children = chars
        .chars()
        .map(|ch| Node::Atom(Atom::new(ids, ch)))
        .collect();
    Row::new(ids, children)
}

/// A tree using every node kind plus the pending/composed atom flags.
fn representative_row(ids: &mut IdGenerator) -> Row {
    let num = atom_row(ids, "12");
    let den = atom_row(ids, "3");
    let frac = Node::Frac(Rc::new(Frac::new(ids, num, den)));

    let sub = atom_row(ids, "n");
    let subsup = Node::SubSup(Rc::new(SubSup::new(ids, Some(sub), None)));

    let radicand = atom_row(ids, "x");
    let root = Node::Root(Rc::new(Root::new(ids, None, radicand)));

    let sigma = Atom::new(ids, '∑');
    let lower = atom_row(ids, "k");
    let limits = Node::Limits(Rc::new(Limits::new(ids, sigma, lower, None)));

    let inner = atom_row(ids, "y");
    let left_delim = Atom::new(ids, '(');
    let right_delim = Atom::pending(ids, ')');
    let delimited = Node::Delimited(Rc::new(Delimited::new(
        ids,
        left_delim,
        right_delim,
        inner,
    )));

    let leq = Node::Atom(Atom::composed(ids, '≤', "<="));

    let cells = vec![
        atom_row(ids, "1"),
        atom_row(ids, "0"),
        atom_row(ids, "0"),
        atom_row(ids, "1"),
    ];
    let table = Node::Table(Rc::new(Table::new(
        ids,
        TableKind::Matrix,
        2,
        2,
        cells,
        None,
    )));

    Row::new(ids, vec![frac, subsup, root, limits, delimited, leq, table])
}

#[test]
fn test_tree_round_trips_through_json() {
    let mut ids = IdGenerator::new();
    let row = representative_row(&mut ids);

    let encoded = serde_json::to_string(&row).expect("serializes");
    let decoded: Row = serde_json::from_str(&encoded).expect("deserializes");
    assert_eq!(decoded, row);
}

#[test]
fn test_round_trip_preserves_ids_and_flags() {
    let mut ids = IdGenerator::new();
    let row = representative_row(&mut ids);

    let encoded = serde_json::to_string(&row).expect("serializes");
    let decoded: Row = serde_json::from_str(&encoded).expect("deserializes");

    assert_eq!(decoded.id, row.id);
    for (before, after) in row.children.iter().zip(decoded.children.iter()) {
        assert_eq!(before.id(), after.id());
    }

    let Node::Delimited(delimited) = &decoded.children[4] else {
        panic!("expected a Delimited node");
    };
    assert!(!delimited.left_delim.pending);
    assert!(delimited.right_delim.pending);

    let Some(atom) = decoded.children[5].as_atom() else {
        panic!("expected an atom");
    };
    assert_eq!(atom.value, '≤');
    assert_eq!(atom.composed.as_deref(), Some("<="));
}

#[test]
fn test_session_document_round_trips_after_edits() {
    let mut session = Session::with_seed(42);
    for action in [
        Action::InsertChar { value: 'x' },
        Action::Superscript,
        Action::InsertChar { value: '2' },
        Action::ArrowRight,
        Action::InsertChar { value: '+' },
        Action::Parens { delim: '(' },
        Action::InsertChar { value: 'y' },
    ] {
        session.apply(action).unwrap();
    }

    let document = session.document();
    let encoded = serde_json::to_string(&document).expect("serializes");
    let decoded: Row = serde_json::from_str(&encoded).expect("deserializes");
    assert_eq!(decoded, document);
}
