//! Matrix operations: insertion and row/column structure edits
//!
//! Matrix structure edits recompute the full cell-to-(row, col) mapping of the table
//! the cursor sits in, shift indices at/after the insertion or deletion point, and
//! relocate the cursor to a sensible surviving cell: the same logical row/column, or
//! the nearest remaining one if its own row or column was deleted.
//!
//! Every operation is total: applied outside a table cell (or where the table cannot
//! shrink further) it returns the state unchanged.

use crate::node::{
    Atom, IdGenerator, Node, Row, RowStyle, Style, Table, TableDelimiters, TableKind,
};
use crate::zipper::{Breadcrumb, BreadcrumbRow, Focus, FocusKind, ZRow, Zipper, focus_slot};
use std::rc::Rc;

/// Delimiter shape wrapped around an inserted matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixShape {
    /// Parentheses: `( … )`.
    Parens,
    /// Square brackets: `[ … ]`.
    Brackets,
}

/// Where an inserted row lands relative to the cursor's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    /// Before the cursor's row.
    Above,
    /// After the cursor's row.
    Below,
}

/// Where an inserted column lands relative to the cursor's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalSide {
    /// Before the cursor's column.
    Left,
    /// After the cursor's column.
    Right,
}

/// Insert a fresh 2×2 matrix (all cells empty rows) wrapped in the requested
/// delimiters, replacing the active selection if one exists, and place the cursor in
/// the first cell.
pub fn insert_matrix(zipper: &Zipper, ids: &mut IdGenerator, shape: MatrixShape) -> Zipper {
    let mut row = zipper.row.clone();
    row.selection.clear();

    let (open, close) = match shape {
        MatrixShape::Parens => ('(', ')'),
        MatrixShape::Brackets => ('[', ']'),
    };
    let delimiters = TableDelimiters {
        left: Atom::new(ids, open),
        right: Atom::new(ids, close),
    };
    let cells = (0..4).map(|_| Row::empty(ids)).collect();
    let node = Node::Table(Rc::new(Table::new(
        ids,
        TableKind::Matrix,
        2,
        2,
        cells,
        Some(delimiters),
    )));

    let (focus, first) = focus_slot(&node, 0).expect("cells present");
    let crumb = Breadcrumb {
        row: BreadcrumbRow {
            id: row.id,
            style: row.style.clone(),
            left: row.left.clone(),
            right: row.right.clone(),
        },
        focus,
    };
    let mut breadcrumbs = zipper.breadcrumbs.clone();
    breadcrumbs.push(crumb);
    Zipper {
        row: ZRow::from_row_start(first),
        breadcrumbs,
    }
}

/// The cursor's table, opened for a structure edit: every cell materialized (the
/// focused row rebuilt into its slot) plus the flat cursor index.
///
/// Shared with the vertical-work pass, which performs the same materialize/edit/close
/// cycle on algebra tables.
pub(crate) struct OpenTable {
    pub(crate) kind: TableKind,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) delimiters: Option<TableDelimiters>,
    pub(crate) row_styles: Vec<RowStyle>,
    pub(crate) id: crate::node::NodeId,
    pub(crate) style: Style,
    pub(crate) cells: Vec<Option<Row>>,
    pub(crate) cursor: usize,
    pub(crate) crumb_row: BreadcrumbRow,
    pub(crate) outer: Vec<Breadcrumb>,
}

pub(crate) fn open_table(zipper: &Zipper) -> Option<OpenTable> {
    let crumb = zipper.breadcrumbs.last()?;
    let FocusKind::Table {
        kind,
        rows,
        cols,
        delimiters,
        row_styles,
    } = &crumb.focus.kind
    else {
        return None;
    };

    let cursor = crumb.focus.open_slot();
    let mut cells: Vec<Option<Row>> =
        Vec::with_capacity(crumb.focus.left.len() + 1 + crumb.focus.right.len());
    cells.extend(crumb.focus.left.iter().cloned());
    cells.push(Some(zipper.row.to_row()));
    cells.extend(crumb.focus.right.iter().cloned());

    Some(OpenTable {
        kind: *kind,
        rows: *rows,
        cols: *cols,
        delimiters: delimiters.clone(),
        row_styles: row_styles.clone(),
        id: crumb.focus.id,
        style: crumb.focus.style.clone(),
        cells,
        cursor,
        crumb_row: crumb.row.clone(),
        outer: zipper.breadcrumbs[..zipper.breadcrumbs.len() - 1].to_vec(),
    })
}

/// Close an opened table again with the cursor in cell `cursor`. When that cell is the
/// one that was focused before (same row id), the exact in-cell cursor state
/// `previous` is restored; otherwise the cell opens at its start, or at its end when
/// `at_end` is set (relocation after a removal).
pub(crate) fn close_table(
    mut table: OpenTable,
    cursor: usize,
    previous: &ZRow,
    at_end: bool,
) -> Zipper {
    debug_assert_eq!(table.cells.len(), table.rows * table.cols);
    let Some(open) = table.cells[cursor].take() else {
        // Gapped target cell: navigation over permanently-absent cells is an
        // explicitly unimplemented path; leave the cell choice to the caller.
        unreachable!("structure edits target present cells");
    };
    table.cells.remove(cursor);
    let right = table.cells.split_off(cursor);

    let focus = Focus {
        id: table.id,
        style: table.style,
        kind: FocusKind::Table {
            kind: table.kind,
            rows: table.rows,
            cols: table.cols,
            delimiters: table.delimiters,
            row_styles: table.row_styles,
        },
        left: table.cells,
        right,
    };

    let row = if open.id == previous.id {
        previous.clone()
    } else if at_end {
        ZRow::from_row_end(open)
    } else {
        ZRow::from_row_start(open)
    };

    let mut breadcrumbs = table.outer;
    breadcrumbs.push(Breadcrumb {
        row: table.crumb_row,
        focus,
    });
    Zipper { row, breadcrumbs }
}

/// Insert a row of empty cells above or below the cursor's row.
pub fn add_row(zipper: &Zipper, ids: &mut IdGenerator, side: VerticalSide) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };

    let row = table.cursor / table.cols;
    let insert_row = match side {
        VerticalSide::Above => row,
        VerticalSide::Below => row + 1,
    };
    let insert_at = insert_row * table.cols;
    for offset in 0..table.cols {
        table.cells.insert(insert_at + offset, Some(Row::empty(ids)));
    }
    table.row_styles.insert(insert_row, RowStyle::default());
    table.rows += 1;

    let cursor = match side {
        VerticalSide::Above => table.cursor + table.cols,
        VerticalSide::Below => table.cursor,
    };
    close_table(table, cursor, &zipper.row, false)
}

/// Insert a column of empty cells left or right of the cursor's column.
pub fn add_column(zipper: &Zipper, ids: &mut IdGenerator, side: HorizontalSide) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };

    let (row, col) = (table.cursor / table.cols, table.cursor % table.cols);
    let insert_col = match side {
        HorizontalSide::Left => col,
        HorizontalSide::Right => col + 1,
    };
    for table_row in (0..table.rows).rev() {
        table
            .cells
            .insert(table_row * table.cols + insert_col, Some(Row::empty(ids)));
    }
    table.cols += 1;

    let cursor_col = match side {
        HorizontalSide::Left => col + 1,
        HorizontalSide::Right => col,
    };
    let cursor = row * table.cols + cursor_col;
    close_table(table, cursor, &zipper.row, false)
}

/// Delete the cursor's row, relocating the cursor to the same column of the nearest
/// remaining row. No-op on a single-row table.
pub fn delete_row(zipper: &Zipper) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };
    if table.rows <= 1 {
        return zipper.clone();
    }

    let (row, col) = (table.cursor / table.cols, table.cursor % table.cols);
    table.cells.drain(row * table.cols..(row + 1) * table.cols);
    table.row_styles.remove(row);
    table.rows -= 1;

    let target_row = row.min(table.rows - 1);
    let cursor = target_row * table.cols + col;
    close_table(table, cursor, &zipper.row, false)
}

/// Delete the cursor's column, relocating the cursor to the same row of the nearest
/// remaining column. No-op on a single-column table.
pub fn delete_column(zipper: &Zipper) -> Zipper {
    let Some(mut table) = open_table(zipper) else {
        return zipper.clone();
    };
    if table.cols <= 1 {
        return zipper.clone();
    }

    let (row, col) = (table.cursor / table.cols, table.cursor % table.cols);
    for table_row in (0..table.rows).rev() {
        table.cells.remove(table_row * table.cols + col);
    }
    table.cols -= 1;

    let target_col = col.min(table.cols - 1);
    let cursor = row * table.cols + target_col;
    close_table(table, cursor, &zipper.row, false)
}
