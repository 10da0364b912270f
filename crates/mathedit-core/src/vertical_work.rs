//! Vertical Work: the aligned-column layout for algebra steps
//!
//! # Overview
//!
//! Vertical work displays an expression split into aligned per-term columns across two
//! or three table rows, for step-by-step algebra. This module implements the full
//! lifecycle:
//!
//! - **Splitting**: moving down on the topmost row turns it into a 2-row algebra
//!   [`Table`](crate::node::Table) (one column per term, one per plus/minus run, one
//!   per relational atom) with the cursor in the first cell of the empty second row.
//! - **Column adjustment**: after every edit made directly in a cell, spacer columns
//!   are inserted or removed so that operand, operator, and relational columns keep
//!   their required empty neighbors; the cursor is relocated when its column is
//!   removed.
//! - **Row promotion/demotion**: moving down from the bottom of a 2-row layout grows a
//!   third, divider-styled row; moving up from an empty bottom row shrinks back, and a
//!   2-row layout flattens into a plain row, ending vertical-work mode.
//!
//! Matrix tables are untouched: vertical steps in them fall through to plain cell
//! navigation.

use crate::matrix::{close_table, open_table};
use crate::movement;
use crate::node::{IdGenerator, Node, Row, RowStyle, Table, TableKind};
use crate::zipper::{Breadcrumb, BreadcrumbRow, FocusKind, ZRow, Zipper, focus_slot};
use mathedit_chars::{is_plus_minus, is_relation};
use std::rc::Rc;

/// What a column holds, for the adjustment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    /// All cells empty: a spacer (or a work area the user has not filled yet).
    Empty,
    /// A run of plus/minus atoms.
    Operator,
    /// A single relational atom.
    Relation,
    /// Anything else.
    Operand,
}

/// Returns `true` when the cursor sits directly in a cell of an algebra table, which
/// is when the adjustment pass runs.
pub(crate) fn in_algebra_table(zipper: &Zipper) -> bool {
    matches!(
        zipper.breadcrumbs.last().map(|crumb| &crumb.focus.kind),
        Some(FocusKind::Table {
            kind: TableKind::Algebra,
            ..
        })
    )
}

/// Move down with vertical-work semantics layered over plain cell navigation:
/// splitting on the topmost row, 2→3-row promotion at the bottom of an algebra table.
pub fn move_down(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    if let Some(crumb) = zipper.breadcrumbs.last()
        && let FocusKind::Table {
            kind, rows, cols, ..
        } = &crumb.focus.kind
    {
        if *kind == TableKind::Matrix {
            return movement::move_down(zipper);
        }
        let row = crumb.focus.open_slot() / cols;
        if row + 1 < *rows {
            return movement::move_down(zipper);
        }
        if *rows == 2 {
            return promote(zipper, ids);
        }
        return zipper.clone();
    }

    if zipper.depth() == 0 && !zipper.row.is_empty() && !contains_algebra_table(&zipper.row) {
        return split_row(zipper, ids);
    }
    zipper.clone()
}

/// Move up with vertical-work semantics layered over plain cell navigation: row
/// demotion from an empty bottom row, flattening a 2-row layout back into a plain row.
pub fn move_up(zipper: &Zipper) -> Zipper {
    if let Some(crumb) = zipper.breadcrumbs.last()
        && let FocusKind::Table {
            kind, rows, cols, ..
        } = &crumb.focus.kind
    {
        if *kind == TableKind::Matrix {
            return movement::move_up(zipper);
        }
        let row = crumb.focus.open_slot() / cols;
        if row == *rows - 1 && bottom_row_empty(zipper) {
            if *rows == 3 {
                return demote(zipper);
            }
            return flatten(zipper);
        }
        if row > 0 {
            return movement::move_up(zipper);
        }
        return zipper.clone();
    }
    movement::move_up(zipper)
}

fn contains_algebra_table(row: &ZRow) -> bool {
    row.left
        .iter()
        .chain(row.selection.iter())
        .chain(row.right.iter())
        .any(|node| {
            matches!(node, Node::Table(table) if table.kind == TableKind::Algebra)
        })
}

fn bottom_row_empty(zipper: &Zipper) -> bool {
    let Some(table) = open_table(zipper) else {
        return false;
    };
    let bottom = table.rows - 1;
    (0..table.cols).all(|col| {
        table.cells[bottom * table.cols + col]
            .as_ref()
            .is_some_and(Row::is_empty)
    })
}

/// Split the topmost row into a 2-row algebra table: each maximal run of consecutive
/// plus/minus atoms becomes its own single-cell column, each relational atom its own
/// column, every other maximal run one column. Row 2 starts out empty with the cursor
/// in its first cell.
fn split_row(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    let row = zipper.row.to_row();
    let columns = split_columns(&row.children);
    let cols = columns.len();

    let mut cells: Vec<Row> = columns
        .into_iter()
        .map(|nodes| Row::new(ids, nodes))
        .collect();
    for _ in 0..cols {
        cells.push(Row::empty(ids));
    }
    let node = Node::Table(Rc::new(Table::new(
        ids,
        TableKind::Algebra,
        2,
        cols,
        cells,
        None,
    )));

    let (focus, open) = focus_slot(&node, cols).expect("second-row cell present");
    let crumb = Breadcrumb {
        row: BreadcrumbRow {
            id: row.id,
            style: row.style.clone(),
            left: Vec::new(),
            right: Vec::new(),
        },
        focus,
    };
    Zipper {
        row: ZRow::from_row_start(open),
        breadcrumbs: vec![crumb],
    }
}

fn split_columns(children: &[Node]) -> Vec<Vec<Node>> {
    #[derive(PartialEq, Eq, Clone, Copy)]
    enum Run {
        PlusMinus,
        Operand,
    }

    let mut columns: Vec<Vec<Node>> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    let mut current_run: Option<Run> = None;

    for node in children {
        if let Node::Atom(atom) = node
            && is_relation(atom.value)
        {
            if !current.is_empty() {
                columns.push(std::mem::take(&mut current));
            }
            current_run = None;
            columns.push(vec![node.clone()]);
            continue;
        }

        let run = match node {
            Node::Atom(atom) if is_plus_minus(atom.value) => Run::PlusMinus,
            _ => Run::Operand,
        };
        if current_run != Some(run) && !current.is_empty() {
            columns.push(std::mem::take(&mut current));
        }
        current_run = Some(run);
        current.push(node.clone());
    }
    if !current.is_empty() {
        columns.push(current);
    }
    columns
}

/// Grow a third row below a 2-row layout, with a divider rule above it, and move the
/// cursor into it (same column).
fn promote(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };
    let col = table.cursor % table.cols;
    for _ in 0..table.cols {
        table.cells.push(Some(Row::empty(ids)));
    }
    table.row_styles.push(RowStyle {
        divider_above: true,
    });
    table.rows += 1;

    let cursor = (table.rows - 1) * table.cols + col;
    close_table(table, cursor, &zipper.row, false)
}

/// Drop the empty bottom row of a 3-row layout; the cursor lands at the end of the
/// cell above.
fn demote(zipper: &Zipper) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };
    let col = table.cursor % table.cols;
    table.cells.truncate((table.rows - 1) * table.cols);
    table.row_styles.truncate(table.rows - 1);
    table.rows -= 1;

    let cursor = (table.rows - 1) * table.cols + col;
    close_table(table, cursor, &zipper.row, true)
}

/// Flatten a 2-row layout whose bottom row is empty back into one plain row, ending
/// vertical-work mode. The cursor lands after the content of the column it occupied.
fn flatten(zipper: &Zipper) -> Zipper {
    let Some(table) = open_table(zipper) else {
        return zipper.clone();
    };
    let col = table.cursor % table.cols;

    let mut left = table.crumb_row.left.clone();
    let mut right: Vec<Node> = Vec::new();
    for (index, cell) in table.cells[..table.cols].iter().enumerate() {
        let Some(cell) = cell else {
            continue;
        };
        if index <= col {
            left.extend(cell.children.iter().cloned());
        } else {
            right.extend(cell.children.iter().cloned());
        }
    }
    right.extend(table.crumb_row.right.iter().cloned());

    Zipper {
        row: ZRow {
            id: table.crumb_row.id,
            style: table.crumb_row.style.clone(),
            left,
            selection: Vec::new(),
            right,
        },
        breadcrumbs: table.outer,
    }
}

fn classify_column(cells: &[Option<Row>], rows: usize, cols: usize, col: usize) -> ColumnKind {
    let content = (0..rows)
        .filter_map(|row| cells[row * cols + col].as_ref())
        .find(|cell| !cell.is_empty());
    let Some(cell) = content else {
        return ColumnKind::Empty;
    };

    let all_plus_minus = cell.children.iter().all(|node| {
        matches!(node, Node::Atom(atom) if is_plus_minus(atom.value))
    });
    if all_plus_minus {
        return ColumnKind::Operator;
    }
    if cell.children.len() == 1
        && matches!(&cell.children[0], Node::Atom(atom) if is_relation(atom.value))
    {
        return ColumnKind::Relation;
    }
    ColumnKind::Operand
}

/// One column of the rebuilt layout: an existing column carried over, or a fresh
/// spacer of empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutColumn {
    Old(usize),
    Fresh,
}

/// Enforce the spacer placement rules on the algebra table the cursor sits in,
/// inserting and removing empty columns as needed.
///
/// Between two adjacent non-empty columns exactly one spacer is kept, except none
/// between a plus/minus operator column and the operand column it faces on its right.
/// A relational column keeps a spacer on both sides, including at the table edges.
/// When the cursor's column is removed, the cursor relocates to the nearest surviving
/// column, at the end of its cell in the same row.
///
/// Runs after every edit made directly in a cell of an algebra table; a no-op
/// everywhere else.
pub fn adjust_columns(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    if !in_algebra_table(zipper) {
        return zipper.clone();
    }
    let Some(table) = open_table(zipper) else {
        return zipper.clone();
    };

    let (cursor_row, cursor_col) = (table.cursor / table.cols, table.cursor % table.cols);
    let kinds: Vec<ColumnKind> = (0..table.cols)
        .map(|col| classify_column(&table.cells, table.rows, table.cols, col))
        .collect();
    let filled: Vec<usize> = (0..table.cols)
        .filter(|&col| kinds[col] != ColumnKind::Empty)
        .collect();
    if filled.is_empty() {
        return zipper.clone();
    }

    // Reuse an existing empty column as the spacer where one is required, preferring
    // the cursor's own column so a work area being typed into survives.
    let pick_spacer = |from: usize, to: usize| -> LayoutColumn {
        if (from..to).contains(&cursor_col) {
            LayoutColumn::Old(cursor_col)
        } else if from < to {
            LayoutColumn::Old(from)
        } else {
            LayoutColumn::Fresh
        }
    };

    let mut layout: Vec<LayoutColumn> = Vec::new();
    let first = filled[0];
    if kinds[first] == ColumnKind::Relation {
        layout.push(pick_spacer(0, first));
    }
    for (position, &col) in filled.iter().enumerate() {
        layout.push(LayoutColumn::Old(col));
        if let Some(&next) = filled.get(position + 1) {
            let flush =
                kinds[col] == ColumnKind::Operator && kinds[next] == ColumnKind::Operand;
            if !flush {
                layout.push(pick_spacer(col + 1, next));
            }
        }
    }
    let last = *filled.last().expect("non-empty");
    if kinds[last] == ColumnKind::Relation {
        layout.push(pick_spacer(last + 1, table.cols));
    }

    // Cursor mapping: same column when it survives, else the nearest surviving one.
    let surviving = layout
        .iter()
        .position(|entry| *entry == LayoutColumn::Old(cursor_col));
    let (new_col, relocated) = match surviving {
        Some(position) => (position, false),
        None => {
            let nearest = layout
                .iter()
                .enumerate()
                .filter_map(|(position, entry)| match entry {
                    LayoutColumn::Old(col) => Some((position, *col)),
                    LayoutColumn::Fresh => None,
                })
                .min_by_key(|&(_, col)| (col.abs_diff(cursor_col), col))
                .map(|(position, _)| position)
                .expect("at least one filled column survives");
            (nearest, true)
        }
    };

    let new_cols = layout.len();
    let mut cells: Vec<Option<Row>> = Vec::with_capacity(table.rows * new_cols);
    for row in 0..table.rows {
        for entry in &layout {
            match entry {
                LayoutColumn::Old(col) => {
                    cells.push(table.cells[row * table.cols + col].clone());
                }
                LayoutColumn::Fresh => cells.push(Some(Row::empty(ids))),
            }
        }
    }

    let mut rebuilt = table;
    rebuilt.cols = new_cols;
    rebuilt.cells = cells;
    close_table(
        rebuilt,
        cursor_row * new_cols + new_col,
        &zipper.row,
        relocated,
    )
}
