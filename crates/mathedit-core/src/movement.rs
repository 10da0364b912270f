//! Move Engine: pure cursor motion
//!
//! Implements `move_left`/`move_right` (the linear-order walk over the tree) and the
//! in-table vertical steps used by matrices and vertical work. This is the only code
//! that walks the breadcrumb stack.
//!
//! Every function is total: when no valid transition exists (the two ends of the
//! topmost row, the vertical edges of a table) the input state is returned unchanged.
//!
//! Motion on a zipper whose focused row carries a selection run collapses the run
//! first: `move_left` lands at the run's left edge, `move_right` at its right edge.

use crate::node::{Node, Row};
use crate::zipper::{Breadcrumb, BreadcrumbRow, Focus, FocusKind, ZRow, Zipper, focus_slot, rebuild};

/// Which slot of a container the cursor enters when walking in from the left.
///
/// Frac→numerator; SubSup→subscript if present else superscript; Root→index if present
/// else radicand; Limits→lower; Delimited→the inner row; Table→first present cell in
/// row-major order, with a row-centered rule for two-column matrix entry.
/// `None` when the container has no enterable slot (a fully gapped table).
fn entry_slot_from_left(node: &Node) -> Option<usize> {
    match node {
        Node::Atom(_) => None,
        Node::Frac(_) => Some(0),
        Node::SubSup(subsup) => Some(if subsup.subscript.is_some() { 0 } else { 1 }),
        Node::Root(root) => Some(if root.index.is_some() { 0 } else { 1 }),
        Node::Limits(_) => Some(0),
        Node::Delimited(_) => Some(0),
        Node::Table(table) => {
            if table.cols == 2 {
                let centered = (table.rows / 2) * table.cols;
                if table.cells.get(centered).is_some_and(Option::is_some) {
                    return Some(centered);
                }
            }
            table.cells.iter().position(Option::is_some)
        }
    }
}

/// Mirror of [`entry_slot_from_left`] for walking in from the right. Backspace uses
/// the same rule to descend into the container left of the cursor.
pub(crate) fn entry_slot_from_right(node: &Node) -> Option<usize> {
    match node {
        Node::Atom(_) => None,
        Node::Frac(_) => Some(1),
        Node::SubSup(subsup) => Some(if subsup.superscript.is_some() { 1 } else { 0 }),
        Node::Root(_) => Some(1),
        Node::Limits(limits) => Some(if limits.upper.is_some() { 1 } else { 0 }),
        Node::Delimited(_) => Some(0),
        Node::Table(table) => {
            if table.cols == 2 {
                let centered = (table.rows / 2) * table.cols + table.cols - 1;
                if table.cells.get(centered).is_some_and(Option::is_some) {
                    return Some(centered);
                }
            }
            table.cells.iter().rposition(Option::is_some)
        }
    }
}

/// Move the cursor one position to the right.
///
/// Entering a container descends a breadcrumb into its leftmost enterable slot;
/// exhausting the focused row pops the breadcrumb, continuing into the container's next
/// sibling slot when one is present (numerator→denominator, sub→sup, index→radicand,
/// cell→next cell) and otherwise re-emerging in the parent row just right of the
/// reconstructed node. No-op at the end of the topmost row.
pub fn move_right(zipper: &Zipper) -> Zipper {
    if !zipper.row.selection.is_empty() {
        let mut row = zipper.row.clone();
        row.left.append(&mut row.selection);
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    if let Some(next) = zipper.row.right.first() {
        if let Some(slot) = entry_slot_from_left(next)
            && let Some((focus, open)) = focus_slot(next, slot)
        {
            let crumb = Breadcrumb {
                row: BreadcrumbRow {
                    id: zipper.row.id,
                    style: zipper.row.style.clone(),
                    left: zipper.row.left.clone(),
                    right: zipper.row.right[1..].to_vec(),
                },
                focus,
            };
            let mut breadcrumbs = zipper.breadcrumbs.clone();
            breadcrumbs.push(crumb);
            return Zipper {
                row: ZRow::from_row_start(open),
                breadcrumbs,
            };
        }

        // An atom, or a container with nothing to enter: step over it.
        let mut row = zipper.row.clone();
        row.left.push(row.right.remove(0));
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    let Some(crumb) = zipper.breadcrumbs.last() else {
        return zipper.clone();
    };

    let exited = zipper.row.to_row();

    if let Some(pos) = crumb.focus.right.iter().position(Option::is_some) {
        // A further sibling slot exists: descend into it at its start. Absent slots
        // skipped on the way keep their positions on the left side.
        let mut left = crumb.focus.left.clone();
        left.push(Some(exited));
        left.extend(crumb.focus.right[..pos].iter().cloned());
        let open = crumb.focus.right[pos].clone().expect("checked");
        let right = crumb.focus.right[pos + 1..].to_vec();

        let focus = Focus {
            id: crumb.focus.id,
            style: crumb.focus.style.clone(),
            kind: crumb.focus.kind.clone(),
            left,
            right,
        };
        let mut breadcrumbs = zipper.breadcrumbs.clone();
        let row = crumb.row.clone();
        *breadcrumbs.last_mut().expect("checked") = Breadcrumb { row, focus };
        return Zipper {
            row: ZRow::from_row_start(open),
            breadcrumbs,
        };
    }

    // No further slot: reconstruct the node and re-emerge right of it.
    let node = rebuild(&crumb.focus, exited);
    let mut left = crumb.row.left.clone();
    left.push(node);
    Zipper {
        row: ZRow {
            id: crumb.row.id,
            style: crumb.row.style.clone(),
            left,
            selection: Vec::new(),
            right: crumb.row.right.clone(),
        },
        breadcrumbs: zipper.breadcrumbs[..zipper.breadcrumbs.len() - 1].to_vec(),
    }
}

/// Move the cursor one position to the left. Mirror image of [`move_right`].
pub fn move_left(zipper: &Zipper) -> Zipper {
    if !zipper.row.selection.is_empty() {
        let mut row = zipper.row.clone();
        let mut selection = std::mem::take(&mut row.selection);
        selection.append(&mut row.right);
        row.right = selection;
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    if let Some(prev) = zipper.row.left.last() {
        if let Some(slot) = entry_slot_from_right(prev)
            && let Some((focus, open)) = focus_slot(prev, slot)
        {
            let crumb = Breadcrumb {
                row: BreadcrumbRow {
                    id: zipper.row.id,
                    style: zipper.row.style.clone(),
                    left: zipper.row.left[..zipper.row.left.len() - 1].to_vec(),
                    right: zipper.row.right.clone(),
                },
                focus,
            };
            let mut breadcrumbs = zipper.breadcrumbs.clone();
            breadcrumbs.push(crumb);
            return Zipper {
                row: ZRow::from_row_end(open),
                breadcrumbs,
            };
        }

        let mut row = zipper.row.clone();
        let node = row.left.pop().expect("checked");
        row.right.insert(0, node);
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    let Some(crumb) = zipper.breadcrumbs.last() else {
        return zipper.clone();
    };

    let exited = zipper.row.to_row();

    if let Some(pos) = crumb.focus.left.iter().rposition(Option::is_some) {
        let left = crumb.focus.left[..pos].to_vec();
        let open = crumb.focus.left[pos].clone().expect("checked");
        let mut right = crumb.focus.left[pos + 1..].to_vec();
        right.push(Some(exited));
        right.extend(crumb.focus.right.iter().cloned());

        let focus = Focus {
            id: crumb.focus.id,
            style: crumb.focus.style.clone(),
            kind: crumb.focus.kind.clone(),
            left,
            right,
        };
        let mut breadcrumbs = zipper.breadcrumbs.clone();
        let row = crumb.row.clone();
        *breadcrumbs.last_mut().expect("checked") = Breadcrumb { row, focus };
        return Zipper {
            row: ZRow::from_row_end(open),
            breadcrumbs,
        };
    }

    let node = rebuild(&crumb.focus, exited);
    let mut right = Vec::with_capacity(1 + crumb.row.right.len());
    right.push(node);
    right.extend(crumb.row.right.iter().cloned());
    Zipper {
        row: ZRow {
            id: crumb.row.id,
            style: crumb.row.style.clone(),
            left: crumb.row.left.clone(),
            selection: Vec::new(),
            right,
        },
        breadcrumbs: zipper.breadcrumbs[..zipper.breadcrumbs.len() - 1].to_vec(),
    }
}

/// Direction of an in-table vertical step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalStep {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
}

/// Step to the cell one row up/down in the same column, when the innermost breadcrumb
/// is a table focus. Enters at the cell start going down and at the cell end going up.
///
/// Returns `None` when the cursor is not directly in a table cell, at the table's
/// vertical edge, or when the target cell is absent (gapped tables are an explicitly
/// unimplemented path).
fn table_vertical(zipper: &Zipper, step: VerticalStep) -> Option<Zipper> {
    let crumb = zipper.breadcrumbs.last()?;
    let FocusKind::Table { rows, cols, .. } = &crumb.focus.kind else {
        return None;
    };
    let (rows, cols) = (*rows, *cols);

    let index = crumb.focus.open_slot();
    let (row, col) = (index / cols, index % cols);
    let target_row = match step {
        VerticalStep::Up => row.checked_sub(1)?,
        VerticalStep::Down => {
            if row + 1 >= rows {
                return None;
            }
            row + 1
        }
    };
    let target = target_row * cols + col;

    let mut slots: Vec<Option<Row>> =
        Vec::with_capacity(crumb.focus.left.len() + 1 + crumb.focus.right.len());
    slots.extend(crumb.focus.left.iter().cloned());
    slots.push(Some(zipper.row.to_row()));
    slots.extend(crumb.focus.right.iter().cloned());

    let open = slots[target].take()?;
    slots.remove(target);
    let right = slots.split_off(target);

    let focus = Focus {
        id: crumb.focus.id,
        style: crumb.focus.style.clone(),
        kind: crumb.focus.kind.clone(),
        left: slots,
        right,
    };
    let mut breadcrumbs = zipper.breadcrumbs.clone();
    let row = crumb.row.clone();
    *breadcrumbs.last_mut().expect("checked") = Breadcrumb { row, focus };
    Some(Zipper {
        row: match step {
            VerticalStep::Down => ZRow::from_row_start(open),
            VerticalStep::Up => ZRow::from_row_end(open),
        },
        breadcrumbs,
    })
}

/// Move the cursor one table row up. No-op outside a table cell and at the top row.
/// Vertical-work row demotion layers on top of this in the reducer.
pub fn move_up(zipper: &Zipper) -> Zipper {
    table_vertical(zipper, VerticalStep::Up).unwrap_or_else(|| zipper.clone())
}

/// Move the cursor one table row down. No-op outside a table cell and at the bottom
/// row. Vertical-work splitting/promotion layers on top of this in the reducer.
pub fn move_down(zipper: &Zipper) -> Zipper {
    table_vertical(zipper, VerticalStep::Down).unwrap_or_else(|| zipper.clone())
}

/// Merge a selection run into the left list, yielding a collapsed cursor at the run's
/// right edge. Identity on zippers without a selection.
pub(crate) fn collapsed(zipper: &Zipper) -> Zipper {
    if zipper.row.selection.is_empty() {
        return zipper.clone();
    }
    let mut row = zipper.row.clone();
    row.left.append(&mut row.selection);
    Zipper {
        row,
        breadcrumbs: zipper.breadcrumbs.clone(),
    }
}
