use mathedit_core::node::{IdGenerator, Node, Row, TableKind};
use mathedit_core::zipper::FocusKind;
use mathedit_core::{Action, State, reduce};

fn apply(state: State, actions: &[Action], ids: &mut IdGenerator) -> State {
    actions
        .iter()
        .fold(state, |state, action| reduce(&state, action, ids))
}

fn type_chars(state: State, text: &str, ids: &mut IdGenerator) -> State {
    text.chars().fold(state, |state, value| {
        reduce(&state, &Action::InsertChar { value }, ids)
    })
}

fn table_shape(state: &State) -> (usize, usize) {
    let crumb = state.zipper.breadcrumbs.last().expect("cursor in a table");
    let FocusKind::Table { rows, cols, .. } = &crumb.focus.kind else {
        panic!("expected a table focus");
    };
    (*rows, *cols)
}

fn column_top_texts(state: &State) -> Vec<String> {
    let document = state.zipper.zip();
    let Some(Node::Table(table)) = document.children.first() else {
        panic!("expected the document to hold one table");
    };
    (0..table.cols)
        .map(|col| {
            table
                .cell(0, col)
                .map(|cell| {
                    cell.children
                        .iter()
                        .filter_map(|node| node.as_atom())
                        .map(|atom| atom.value)
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn test_split_scenario_seven_columns() {
    let mut ids = IdGenerator::new();
    // Type "x+1=2x-3", then enter vertical-work mode.
    let state = type_chars(State::new(&mut ids), "x+1=2x-3", &mut ids);
    let state = reduce(&state, &Action::ArrowDown, &mut ids);

    assert_eq!(table_shape(&state), (2, 7));
    assert_eq!(
        column_top_texts(&state),
        vec!["x", "+", "1", "=", "2x", "-", "3"]
    );

    // Row 2 is entirely empty, cursor in its first cell.
    let document = state.zipper.zip();
    let Some(Node::Table(table)) = document.children.first() else {
        panic!("expected a table");
    };
    assert_eq!(table.kind, TableKind::Algebra);
    for col in 0..7 {
        assert!(table.cell(1, col).is_some_and(Row::is_empty));
    }
    let crumb = state.zipper.breadcrumbs.last().expect("in a cell");
    assert_eq!(crumb.focus.open_slot(), 7);
    assert!(state.zipper.row.is_empty());
}

#[test]
fn test_typing_in_work_row_triggers_column_adjustment() {
    let mut ids = IdGenerator::new();
    let state = type_chars(State::new(&mut ids), "x=1", &mut ids);
    let state = reduce(&state, &Action::ArrowDown, &mut ids);
    assert_eq!(table_shape(&state), (2, 3));

    // Any edit in vertical-work mode runs the adjustment pass: the relational column
    // gains an empty spacer on both sides.
    let state = reduce(&state, &Action::InsertChar { value: '2' }, &mut ids);
    assert_eq!(table_shape(&state), (2, 5));
    assert_eq!(column_top_texts(&state), vec!["x", "", "=", "", "1"]);
}

#[test]
fn test_promotion_demotion_round_trip() {
    let mut ids = IdGenerator::new();
    let state = type_chars(State::new(&mut ids), "x=1", &mut ids);
    let split = reduce(&state, &Action::ArrowDown, &mut ids);

    // Down from the bottom of the 2-row layout: promote to 3 rows with a divider.
    let promoted = reduce(&split, &Action::ArrowDown, &mut ids);
    assert_eq!(table_shape(&promoted), (3, 3));
    let document = promoted.zipper.zip();
    let Some(Node::Table(table)) = document.children.first() else {
        panic!("expected a table");
    };
    assert!(table.row_styles[2].divider_above);

    // Up from the (empty) bottom row: demote back to 2 rows.
    let demoted = reduce(&promoted, &Action::ArrowUp, &mut ids);
    assert_eq!(table_shape(&demoted), (2, 3));

    // Up again: flatten back into a plain row, ending vertical-work mode.
    let flat = reduce(&demoted, &Action::ArrowUp, &mut ids);
    assert_eq!(flat.zipper.depth(), 0);
    let text: String = flat
        .zipper
        .zip()
        .children
        .iter()
        .filter_map(|node| node.as_atom())
        .map(|atom| atom.value)
        .collect();
    assert_eq!(text, "x=1");
}

#[test]
fn test_flatten_preserves_root_row_identity() {
    let mut ids = IdGenerator::new();
    let state = type_chars(State::new(&mut ids), "a+b", &mut ids);
    let root_id = state.zipper.zip().id;

    let split = reduce(&state, &Action::ArrowDown, &mut ids);
    assert_eq!(split.zipper.zip().id, root_id);

    let flat = reduce(&split, &Action::ArrowUp, &mut ids);
    assert_eq!(flat.zipper.zip().id, root_id);
}

#[test]
fn test_arrow_down_on_empty_document_is_noop() {
    let mut ids = IdGenerator::new();
    let state = State::new(&mut ids);
    assert_eq!(reduce(&state, &Action::ArrowDown, &mut ids), state);
}

#[test]
fn test_work_row_edit_below_operand_column() {
    let mut ids = IdGenerator::new();
    let state = type_chars(State::new(&mut ids), "x+1", &mut ids);
    let state = reduce(&state, &Action::ArrowDown, &mut ids);

    // Type an answer digit under the first column.
    let state = reduce(&state, &Action::InsertChar { value: '4' }, &mut ids);
    // Operand/operator spacing: "x | (spacer) | + | 1".
    assert_eq!(column_top_texts(&state), vec!["x", "", "+", "1"]);
    // The typed digit stays under the column it was typed in.
    let document = state.zipper.zip();
    let Some(Node::Table(table)) = document.children.first() else {
        panic!("expected a table");
    };
    let below: String = table
        .cell(1, 0)
        .expect("cell present")
        .children
        .iter()
        .filter_map(|node| node.as_atom())
        .map(|atom| atom.value)
        .collect();
    assert_eq!(below, "4");
}
