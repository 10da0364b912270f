//! Node Model: the persistent expression tree
//!
//! Implements the immutable, structurally shared tree of math nodes that every other
//! component (zipper, move engine, edit operations, vertical work) operates on.
//!
//! # Overview
//!
//! An expression is a [`Row`] of ordered children. A child is either an [`Atom`] (one
//! glyph) or a container holding further rows: [`Frac`], [`SubSup`], [`Root`],
//! [`Limits`], [`Delimited`], or [`Table`]. Containers are held behind `Rc` inside the
//! [`Node`] sum so that cloning a node, a sibling vector, or a whole editor state is a
//! shallow pointer copy; edits allocate new nodes only along the path from the edit
//! point to the root and share every untouched subtree by reference.
//!
//! Every node carries a [`NodeId`] assigned exactly once, by the [`IdGenerator`] owned
//! by the editing session, at the instant a structural edit introduces the node.
//! Identity-keyed consumers (renderer caches, the parser) rely on ids surviving every
//! zipper round trip.
//!
//! The plain tree defined here (not the zipper) is the persisted/transmitted contract
//! with the parser and the renderer; it derives serde `Serialize`/`Deserialize`.
//!
//! # Example
//!
//! ```rust
//! use mathedit_core::node::{Atom, IdGenerator, Node, Row};
//!
//! let mut ids = IdGenerator::new();
//! let children = vec![
//!     Node::Atom(Atom::new(&mut ids, 'x')),
//!     Node::Atom(Atom::new(&mut ids, '+')),
//!     Node::Atom(Atom::new(&mut ids, '1')),
//! ];
//! let row = Row::new(&mut ids, children);
//! assert_eq!(row.children.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Stable node identifier, unique within an editing session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(u64);

impl NodeId {
    /// Raw numeric value, for identity-keyed consumers.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Deterministic node-id generator.
///
/// Owned by the editing session and threaded through every operation that builds nodes;
/// there is no ambient global counter. Seeding the generator per test makes produced
/// trees reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Create a generator starting at `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self { next: seed }
    }

    /// Produce the next id. Ids are monotonically increasing and never reused.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual style carried by every node.
///
/// Styles are orthogonal to structure: the `Color`/`Cancel`/`Uncancel` actions rewrite
/// styles of the selected nodes without touching the tree shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Display color, if overridden (host-defined color name or hex string).
    pub color: Option<String>,
    /// Strike-through mark id; nodes sharing one id are cancelled as a unit.
    pub cancel: Option<NodeId>,
}

impl Style {
    /// Returns `true` if no style property is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.cancel.is_none()
    }
}

/// One glyph.
///
/// The `pending` and `composed` flags stay plain optional fields here rather than atom
/// subtypes, to avoid variant-count explosion in the [`Node`] sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Stable identifier.
    pub id: NodeId,
    /// The glyph.
    pub value: char,
    /// Set on a delimiter atom that is displayed but not yet confirmed by its typed
    /// counterpart (auto-closing brackets).
    pub pending: bool,
    /// For a composed ligature (e.g. `≤`), the characters originally typed, retained
    /// for possible future decomposition.
    pub composed: Option<String>,
    /// Visual style.
    pub style: Style,
}

impl Atom {
    /// Create a plain atom.
    pub fn new(ids: &mut IdGenerator, value: char) -> Self {
        Self {
            id: ids.fresh(),
            value,
            pending: false,
            composed: None,
            style: Style::default(),
        }
    }

    /// Create a pending delimiter atom.
    pub fn pending(ids: &mut IdGenerator, value: char) -> Self {
        Self {
            pending: true,
            ..Self::new(ids, value)
        }
    }

    /// Create a composed ligature atom retaining the typed characters.
    pub fn composed(ids: &mut IdGenerator, value: char, typed: impl Into<String>) -> Self {
        Self {
            composed: Some(typed.into()),
            ..Self::new(ids, value)
        }
    }
}

/// An ordered sequence of children; the only node kind a cursor can sit in.
///
/// Row children contain no absent entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Stable identifier.
    pub id: NodeId,
    /// Ordered children.
    pub children: Vec<Node>,
    /// Visual style.
    pub style: Style,
}

impl Row {
    /// Create a row from children.
    pub fn new(ids: &mut IdGenerator, children: Vec<Node>) -> Self {
        Self {
            id: ids.fresh(),
            children,
            style: Style::default(),
        }
    }

    /// Create an empty row.
    pub fn empty(ids: &mut IdGenerator) -> Self {
        Self::new(ids, Vec::new())
    }

    /// Returns `true` if the row has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A fraction: numerator over denominator. Both rows are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frac {
    /// Stable identifier.
    pub id: NodeId,
    /// Numerator row.
    pub numerator: Row,
    /// Denominator row.
    pub denominator: Row,
    /// Visual style.
    pub style: Style,
}

impl Frac {
    /// Create a fraction from two rows.
    pub fn new(ids: &mut IdGenerator, numerator: Row, denominator: Row) -> Self {
        Self {
            id: ids.fresh(),
            numerator,
            denominator,
            style: Style::default(),
        }
    }
}

/// A subscript/superscript attachment. At least one slot is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSup {
    /// Stable identifier.
    pub id: NodeId,
    /// Subscript row, if present.
    pub subscript: Option<Row>,
    /// Superscript row, if present.
    pub superscript: Option<Row>,
    /// Visual style.
    pub style: Style,
}

impl SubSup {
    /// Create a sub/superscript node. Panics if both slots are absent; the builders are
    /// the single place this invariant is enforced.
    pub fn new(ids: &mut IdGenerator, subscript: Option<Row>, superscript: Option<Row>) -> Self {
        assert!(
            subscript.is_some() || superscript.is_some(),
            "SubSup requires at least one populated slot"
        );
        Self {
            id: ids.fresh(),
            subscript,
            superscript,
            style: Style::default(),
        }
    }
}

/// A radical: optional index row and a required radicand row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Stable identifier.
    pub id: NodeId,
    /// Index row (e.g. the 3 of a cube root), if present.
    pub index: Option<Row>,
    /// Radicand row.
    pub radicand: Row,
    /// Visual style.
    pub style: Style,
}

impl Root {
    /// Create a radical.
    pub fn new(ids: &mut IdGenerator, index: Option<Row>, radicand: Row) -> Self {
        Self {
            id: ids.fresh(),
            index,
            radicand,
            style: Style::default(),
        }
    }
}

/// A big operator (summation, product, integral) with bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Stable identifier.
    pub id: NodeId,
    /// The operator glyph itself.
    pub inner: Atom,
    /// Lower bound row; always present.
    pub lower: Row,
    /// Upper bound row, if present.
    pub upper: Option<Row>,
    /// Visual style.
    pub style: Style,
}

impl Limits {
    /// Create a big-operator node.
    pub fn new(ids: &mut IdGenerator, inner: Atom, lower: Row, upper: Option<Row>) -> Self {
        Self {
            id: ids.fresh(),
            inner,
            lower,
            upper,
            style: Style::default(),
        }
    }
}

/// A delimited group: one inner row between two delimiter atoms.
///
/// Each delimiter atom is independently flaggable `pending`, which is how auto-closed
/// brackets are displayed before the user confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimited {
    /// Stable identifier.
    pub id: NodeId,
    /// Opening delimiter atom.
    pub left_delim: Atom,
    /// Closing delimiter atom.
    pub right_delim: Atom,
    /// Inner row.
    pub inner: Row,
    /// Visual style.
    pub style: Style,
}

impl Delimited {
    /// Create a delimited group.
    pub fn new(ids: &mut IdGenerator, left_delim: Atom, right_delim: Atom, inner: Row) -> Self {
        Self {
            id: ids.fresh(),
            left_delim,
            right_delim,
            inner,
            style: Style::default(),
        }
    }
}

/// What a table is used for; drives vertical navigation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// A matrix entered by the user.
    Matrix,
    /// The vertical-work layout of aligned algebra-step columns.
    Algebra,
}

/// Delimiters wrapped around a matrix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDelimiters {
    /// Opening delimiter atom.
    pub left: Atom,
    /// Closing delimiter atom.
    pub right: Atom,
}

/// Per-row display options of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStyle {
    /// Draw a divider rule above this row (vertical-work result rows).
    pub divider_above: bool,
}

/// A grid of cells, used both for matrices and for the vertical-work layout.
///
/// Cells are stored flat in row-major order; `cells.len() == rows * cols`. Absent cells
/// are tolerated only transiently in the middle of an operation; a completed edit
/// leaves all cells present. Navigation over permanently-gapped tables is an explicitly
/// unimplemented path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Stable identifier.
    pub id: NodeId,
    /// What this table is used for.
    pub kind: TableKind,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row-major cell rows.
    pub cells: Vec<Option<Row>>,
    /// Surrounding delimiters, for matrices.
    pub delimiters: Option<TableDelimiters>,
    /// Per-row display options; `row_styles.len() == rows`.
    pub row_styles: Vec<RowStyle>,
    /// Visual style.
    pub style: Style,
}

impl Table {
    /// Create a table whose cells are all present.
    ///
    /// Panics if `cells.len() != rows * cols`; the builders are the single place this
    /// invariant is enforced.
    pub fn new(
        ids: &mut IdGenerator,
        kind: TableKind,
        rows: usize,
        cols: usize,
        cells: Vec<Row>,
        delimiters: Option<TableDelimiters>,
    ) -> Self {
        assert_eq!(cells.len(), rows * cols, "table cell count mismatch");
        Self {
            id: ids.fresh(),
            kind,
            rows,
            cols,
            cells: cells.into_iter().map(Some).collect(),
            delimiters,
            row_styles: vec![RowStyle::default(); rows],
            style: Style::default(),
        }
    }

    /// The cell at `(row, col)`, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Row> {
        self.cells.get(row * self.cols + col).and_then(Option::as_ref)
    }
}

/// The node sum type.
///
/// Containers sit behind `Rc`, so cloning a `Node` is a pointer copy and persistent
/// structural sharing falls out of immutability. Every consumption site matches
/// exhaustively; adding a variant forces every consumer to be updated at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// One glyph.
    Atom(Atom),
    /// Fraction.
    Frac(Rc<Frac>),
    /// Subscript/superscript attachment.
    SubSup(Rc<SubSup>),
    /// Radical.
    Root(Rc<Root>),
    /// Big operator with bounds.
    Limits(Rc<Limits>),
    /// Delimited group.
    Delimited(Rc<Delimited>),
    /// Matrix or vertical-work grid.
    Table(Rc<Table>),
}

impl Node {
    /// The node's stable identifier.
    pub fn id(&self) -> NodeId {
        match self {
            Node::Atom(atom) => atom.id,
            Node::Frac(frac) => frac.id,
            Node::SubSup(subsup) => subsup.id,
            Node::Root(root) => root.id,
            Node::Limits(limits) => limits.id,
            Node::Delimited(delimited) => delimited.id,
            Node::Table(table) => table.id,
        }
    }

    /// The node's style.
    pub fn style(&self) -> &Style {
        match self {
            Node::Atom(atom) => &atom.style,
            Node::Frac(frac) => &frac.style,
            Node::SubSup(subsup) => &subsup.style,
            Node::Root(root) => &root.style,
            Node::Limits(limits) => &limits.style,
            Node::Delimited(delimited) => &delimited.style,
            Node::Table(table) => &table.style,
        }
    }

    /// A copy of this node with its style replaced. Children and id are shared/kept.
    pub fn with_style(&self, style: Style) -> Node {
        match self {
            Node::Atom(atom) => Node::Atom(Atom {
                style,
                ..atom.clone()
            }),
            Node::Frac(frac) => Node::Frac(Rc::new(Frac {
                style,
                ..(**frac).clone()
            })),
            Node::SubSup(subsup) => Node::SubSup(Rc::new(SubSup {
                style,
                ..(**subsup).clone()
            })),
            Node::Root(root) => Node::Root(Rc::new(Root {
                style,
                ..(**root).clone()
            })),
            Node::Limits(limits) => Node::Limits(Rc::new(Limits {
                style,
                ..(**limits).clone()
            })),
            Node::Delimited(delimited) => Node::Delimited(Rc::new(Delimited {
                style,
                ..(**delimited).clone()
            })),
            Node::Table(table) => Node::Table(Rc::new(Table {
                style,
                ..(**table).clone()
            })),
        }
    }

    /// Borrow the atom, if this node is one.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Node::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Returns `true` for atoms (the only non-container node kind).
    pub fn is_atom(&self) -> bool {
        matches!(self, Node::Atom(_))
    }
}
