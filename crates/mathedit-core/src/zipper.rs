//! Zipper: cursor and selection state over the node tree
//!
//! # Overview
//!
//! A [`Zipper`] decomposes the tree around the cursor: a focused row split into left
//! siblings, an optional selection run, and right siblings ([`ZRow`]), plus a stack of
//! [`Breadcrumb`]s (innermost last). Each breadcrumb pairs a partially-reconstructed
//! ancestor row with a [`Focus`]: the zippered view of the container the cursor
//! descended into, holding every sibling slot except the one currently open.
//!
//! Invariants maintained by this module and relied on everywhere else:
//!
//! - Exactly one row is in focus at any time; walking the breadcrumb stack from its end
//!   backward and reconstituting each focus ([`Zipper::zip`]) exactly reproduces the
//!   original tree, ids included.
//! - `left ++ selection ++ right` of the focused row always equals the row's full
//!   original child sequence.
//! - A focus's two slot arrays hold exactly (N−1) of its container's N child slots; the
//!   remaining slot is held implicitly by the focused row and is reinserted when the
//!   breadcrumb is popped.
//!
//! A focus whose slot arrays cannot rebuild its container kind is a programmer error
//! and panics unconditionally; boundary conditions never reach this module.

use crate::node::{
    Atom, Delimited, Frac, Limits, Node, NodeId, Root, Row, RowStyle, Style, SubSup, Table,
    TableDelimiters, TableKind,
};
use std::rc::Rc;

/// The focused row: left siblings, selection run, right siblings.
///
/// The cursor sits between `left` and `selection` (or `right` when the selection is
/// empty, which is the collapsed-cursor case).
#[derive(Debug, Clone, PartialEq)]
pub struct ZRow {
    /// Id of the row being edited; preserved through the round trip.
    pub id: NodeId,
    /// Style of the row being edited.
    pub style: Style,
    /// Children left of the cursor.
    pub left: Vec<Node>,
    /// The selection run, possibly empty.
    pub selection: Vec<Node>,
    /// Children right of the cursor/selection.
    pub right: Vec<Node>,
}

impl ZRow {
    /// Open `row` with the cursor at its start.
    pub fn from_row_start(row: Row) -> Self {
        Self {
            id: row.id,
            style: row.style,
            left: Vec::new(),
            selection: Vec::new(),
            right: row.children,
        }
    }

    /// Open `row` with the cursor at its end.
    pub fn from_row_end(row: Row) -> Self {
        Self {
            id: row.id,
            style: row.style,
            left: row.children,
            selection: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Reconstitute the plain row: `left ++ selection ++ right`, same id and style.
    pub fn to_row(&self) -> Row {
        let mut children =
            Vec::with_capacity(self.left.len() + self.selection.len() + self.right.len());
        children.extend(self.left.iter().cloned());
        children.extend(self.selection.iter().cloned());
        children.extend(self.right.iter().cloned());
        Row {
            id: self.id,
            children,
            style: self.style.clone(),
        }
    }

    /// Cursor position within the row (index of the first selected/right child).
    pub fn cursor_index(&self) -> usize {
        self.left.len()
    }

    /// Returns `true` if the row holds no children at all.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.selection.is_empty() && self.right.is_empty()
    }
}

/// Container-specific payload of a [`Focus`]: everything needed to rebuild the node
/// that is not one of its row slots.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusKind {
    /// Fraction; slots are `[numerator, denominator]`.
    Frac,
    /// Sub/superscript; slots are `[subscript, superscript]`.
    SubSup,
    /// Radical; slots are `[index, radicand]`.
    Root,
    /// Big operator; slots are `[lower, upper]`.
    Limits {
        /// The operator glyph.
        inner: Atom,
    },
    /// Delimited group; the single slot is the inner row.
    Delimited {
        /// Opening delimiter atom.
        left_delim: Atom,
        /// Closing delimiter atom.
        right_delim: Atom,
    },
    /// Matrix / vertical-work grid; slots are the row-major cells.
    Table {
        /// What the table is used for.
        kind: TableKind,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
        /// Surrounding delimiters, for matrices.
        delimiters: Option<TableDelimiters>,
        /// Per-row display options.
        row_styles: Vec<RowStyle>,
    },
}

/// The zippered view of a container: every child slot except the open one.
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    /// Id of the container; preserved through the round trip.
    pub id: NodeId,
    /// Style of the container.
    pub style: Style,
    /// Container-specific payload.
    pub kind: FocusKind,
    /// Slots before the open one, in order. Absent slots stay `None`.
    pub left: Vec<Option<Row>>,
    /// Slots after the open one, in order.
    pub right: Vec<Option<Row>>,
}

impl Focus {
    /// Index of the open slot within the container.
    pub fn open_slot(&self) -> usize {
        self.left.len()
    }
}

/// The partially-reconstructed ancestor row of a breadcrumb: the focused child is
/// missing, held one level down.
#[derive(Debug, Clone, PartialEq)]
pub struct BreadcrumbRow {
    /// Id of the ancestor row.
    pub id: NodeId,
    /// Style of the ancestor row.
    pub style: Style,
    /// Children left of the descended-into child.
    pub left: Vec<Node>,
    /// Children right of the descended-into child.
    pub right: Vec<Node>,
}

/// One level of the zipper's ancestor path.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    /// The ancestor row minus the descended-into child.
    pub row: BreadcrumbRow,
    /// The zippered container the cursor descended into.
    pub focus: Focus,
}

/// Cursor state: the focused row plus the ancestor path, innermost crumb last.
#[derive(Debug, Clone, PartialEq)]
pub struct Zipper {
    /// The focused row.
    pub row: ZRow,
    /// Ancestor path; pushed/popped only at the end.
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl Zipper {
    /// Open `row` with the cursor at its start and no ancestors.
    pub fn enter_start(row: Row) -> Self {
        Self {
            row: ZRow::from_row_start(row),
            breadcrumbs: Vec::new(),
        }
    }

    /// Open `row` with the cursor at its end and no ancestors.
    pub fn enter_end(row: Row) -> Self {
        Self {
            row: ZRow::from_row_end(row),
            breadcrumbs: Vec::new(),
        }
    }

    /// Current descent depth (number of breadcrumbs).
    pub fn depth(&self) -> usize {
        self.breadcrumbs.len()
    }

    /// Reconstitute the full tree by folding the breadcrumb stack from its end
    /// backward; exactly reproduces the original tree, ids included.
    pub fn zip(&self) -> Row {
        let mut row = self.row.to_row();
        for crumb in self.breadcrumbs.iter().rev() {
            let node = rebuild(&crumb.focus, row);
            let mut children =
                Vec::with_capacity(crumb.row.left.len() + 1 + crumb.row.right.len());
            children.extend(crumb.row.left.iter().cloned());
            children.push(node);
            children.extend(crumb.row.right.iter().cloned());
            row = Row {
                id: crumb.row.id,
                children,
                style: crumb.row.style.clone(),
            };
        }
        row
    }
}

/// The row slots of a container node, in order, absent slots as `None`.
/// Returns `None` for atoms, which have no slots.
pub(crate) fn node_slots(node: &Node) -> Option<Vec<Option<Row>>> {
    match node {
        Node::Atom(_) => None,
        Node::Frac(frac) => Some(vec![
            Some(frac.numerator.clone()),
            Some(frac.denominator.clone()),
        ]),
        Node::SubSup(subsup) => Some(vec![
            subsup.subscript.clone(),
            subsup.superscript.clone(),
        ]),
        Node::Root(root) => Some(vec![root.index.clone(), Some(root.radicand.clone())]),
        Node::Limits(limits) => Some(vec![Some(limits.lower.clone()), limits.upper.clone()]),
        Node::Delimited(delimited) => Some(vec![Some(delimited.inner.clone())]),
        Node::Table(table) => Some(table.cells.clone()),
    }
}

/// Split a container into a focus plus the row occupying slot `index`.
/// Returns `None` for atoms and for absent slots.
pub(crate) fn focus_slot(node: &Node, index: usize) -> Option<(Focus, Row)> {
    let mut slots = node_slots(node)?;
    if index >= slots.len() {
        return None;
    }
    let open = slots[index].take()?;
    let right = slots.split_off(index + 1);
    slots.pop(); // the now-empty open slot
    let kind = match node {
        Node::Atom(_) => return None,
        Node::Frac(_) => FocusKind::Frac,
        Node::SubSup(_) => FocusKind::SubSup,
        Node::Root(_) => FocusKind::Root,
        Node::Limits(limits) => FocusKind::Limits {
            inner: limits.inner.clone(),
        },
        Node::Delimited(delimited) => FocusKind::Delimited {
            left_delim: delimited.left_delim.clone(),
            right_delim: delimited.right_delim.clone(),
        },
        Node::Table(table) => FocusKind::Table {
            kind: table.kind,
            rows: table.rows,
            cols: table.cols,
            delimiters: table.delimiters.clone(),
            row_styles: table.row_styles.clone(),
        },
    };
    Some((
        Focus {
            id: node.id(),
            style: node.style().clone(),
            kind,
            left: slots,
            right,
        },
        open,
    ))
}

/// Rebuild the container from a focus plus the row occupying its open slot.
///
/// Panics when the slot arrays cannot rebuild the container kind; that state is
/// unreachable through this module's operations.
pub(crate) fn rebuild(focus: &Focus, open: Row) -> Node {
    let mut slots: Vec<Option<Row>> =
        Vec::with_capacity(focus.left.len() + 1 + focus.right.len());
    slots.extend(focus.left.iter().cloned());
    slots.push(Some(open));
    slots.extend(focus.right.iter().cloned());

    match &focus.kind {
        FocusKind::Frac => {
            let (numerator, denominator) = two_slots(slots, "Frac");
            Node::Frac(Rc::new(Frac {
                id: focus.id,
                numerator: numerator.expect("Frac numerator present"),
                denominator: denominator.expect("Frac denominator present"),
                style: focus.style.clone(),
            }))
        }
        FocusKind::SubSup => {
            let (subscript, superscript) = two_slots(slots, "SubSup");
            Node::SubSup(Rc::new(SubSup {
                id: focus.id,
                subscript,
                superscript,
                style: focus.style.clone(),
            }))
        }
        FocusKind::Root => {
            let (index, radicand) = two_slots(slots, "Root");
            Node::Root(Rc::new(Root {
                id: focus.id,
                index,
                radicand: radicand.expect("Root radicand present"),
                style: focus.style.clone(),
            }))
        }
        FocusKind::Limits { inner } => {
            let (lower, upper) = two_slots(slots, "Limits");
            Node::Limits(Rc::new(Limits {
                id: focus.id,
                inner: inner.clone(),
                lower: lower.expect("Limits lower present"),
                upper,
                style: focus.style.clone(),
            }))
        }
        FocusKind::Delimited {
            left_delim,
            right_delim,
        } => {
            if slots.len() != 1 {
                panic!("Delimited focus has {} slots, expected 1", slots.len());
            }
            let inner = slots.pop().flatten().expect("Delimited inner present");
            Node::Delimited(Rc::new(Delimited {
                id: focus.id,
                left_delim: left_delim.clone(),
                right_delim: right_delim.clone(),
                inner,
                style: focus.style.clone(),
            }))
        }
        FocusKind::Table {
            kind,
            rows,
            cols,
            delimiters,
            row_styles,
        } => {
            if slots.len() != rows * cols {
                panic!(
                    "Table focus has {} slots, expected {}x{}",
                    slots.len(),
                    rows,
                    cols
                );
            }
            Node::Table(Rc::new(Table {
                id: focus.id,
                kind: *kind,
                rows: *rows,
                cols: *cols,
                cells: slots,
                delimiters: delimiters.clone(),
                row_styles: row_styles.clone(),
                style: focus.style.clone(),
            }))
        }
    }
}

fn two_slots(mut slots: Vec<Option<Row>>, kind: &str) -> (Option<Row>, Option<Row>) {
    if slots.len() != 2 {
        panic!("{kind} focus has {} slots, expected 2", slots.len());
    }
    let second = slots.pop().expect("checked");
    let first = slots.pop().expect("checked");
    (first, second)
}

/// Exit one breadcrumb level, placing the rebuilt node immediately right of the cursor
/// in the parent row. The node's index in the parent equals the new `left.len()`.
///
/// Selection reconciliation uses this to walk two zippers up to a common ancestor.
/// Returns the zipper unchanged at the top level.
pub(crate) fn zip_once(zipper: &Zipper) -> Zipper {
    let Some(crumb) = zipper.breadcrumbs.last() else {
        return zipper.clone();
    };
    let node = rebuild(&crumb.focus, zipper.row.to_row());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::IdGenerator;

    fn atom_row(ids: &mut IdGenerator, chars: &str) -> Row {
        let children = chars
            .chars()
            .map(|ch| Node::Atom(Atom::new(ids, ch)))
            .collect();
        Row::new(ids, children)
    }

    #[test]
    fn test_enter_then_zip_round_trip() {
        let mut ids = IdGenerator::new();
        let row = atom_row(&mut ids, "abc");
        assert_eq!(Zipper::enter_start(row.clone()).zip(), row);
        assert_eq!(Zipper::enter_end(row.clone()).zip(), row);
    }

    #[test]
    fn test_focus_slot_then_rebuild_preserves_node() {
        let mut ids = IdGenerator::new();
        let num = atom_row(&mut ids, "12");
        let den = atom_row(&mut ids, "3");
        let node = Node::Frac(Rc::new(Frac::new(&mut ids, num, den)));

        for slot in 0..2 {
            let (focus, open) = focus_slot(&node, slot).expect("slot present");
            assert_eq!(focus.open_slot(), slot);
            assert_eq!(rebuild(&focus, open), node);
        }
    }

    #[test]
    fn test_focus_slot_absent_returns_none() {
        let mut ids = IdGenerator::new();
        let sup = atom_row(&mut ids, "2");
        let node = Node::SubSup(Rc::new(SubSup::new(&mut ids, None, Some(sup))));
        assert!(focus_slot(&node, 0).is_none());
        assert!(focus_slot(&node, 1).is_some());
    }

    #[test]
    fn test_zip_once_places_node_right_of_cursor() {
        let mut ids = IdGenerator::new();
        let num = atom_row(&mut ids, "1");
        let den = atom_row(&mut ids, "2");
        let node = Node::Frac(Rc::new(Frac::new(&mut ids, num, den)));
        let outer = Row::new(&mut ids, vec![node.clone()]);

        let (focus, open) = focus_slot(&node, 0).expect("numerator");
        let zipper = Zipper {
            row: ZRow::from_row_start(open),
            breadcrumbs: vec![Breadcrumb {
                row: BreadcrumbRow {
                    id: outer.id,
                    style: outer.style.clone(),
                    left: Vec::new(),
                    right: Vec::new(),
                },
                focus,
            }],
        };

        let up = zip_once(&zipper);
        assert_eq!(up.depth(), 0);
        assert_eq!(up.row.left.len(), 0);
        assert_eq!(up.row.right.len(), 1);
        assert_eq!(up.row.right[0], node);
        assert_eq!(up.zip(), outer);
    }
}
