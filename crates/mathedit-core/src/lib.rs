#![warn(missing_docs)]
//! Mathedit Core - Headless Structural Math Editor Engine
//!
//! # Overview
//!
//! `mathedit-core` is the editing engine behind a structural editor for tree-shaped
//! mathematical expressions: the user navigates and edits an expression (digits,
//! operators, fractions, radicals, sub/superscripts, delimited groups, matrices) as if
//! it were linear text, while the underlying representation is a heterogeneous tree.
//! It does not involve rendering; an upper layer consumes the plain node tree
//! read-only and draws it however it likes.
//!
//! # Core Features
//!
//! - **Persistent Node Model**: immutable tree, `Rc`-shared subtrees, stable node ids
//! - **Zipper Cursor**: O(1) local edits, O(depth) navigation via a breadcrumb stack
//! - **Move Engine**: total moveLeft/moveRight/moveUp/moveDown over the tree
//! - **Multi-Level Selection**: anchor/focus zippers reconciled across tree depths
//! - **Structural Edits**: every edit preserves invariants and touches only the path
//!   from the edit point to the root
//! - **Vertical Work**: the aligned-column table layout for step-by-step algebra
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Session (versions, subscriptions)          │  ← Host API
//! ├─────────────────────────────────────────────┤
//! │  Reducer (closed action set)                │  ← Pure dispatch
//! ├─────────────────────────────────────────────┤
//! │  Edit Ops · Matrix · Vertical Work          │  ← Structural transforms
//! ├─────────────────────────────────────────────┤
//! │  Move Engine & Selection Engine             │  ← Cursor motion
//! ├─────────────────────────────────────────────┤
//! │  Zipper (breadcrumb stack)                  │  ← Cursor representation
//! ├─────────────────────────────────────────────┤
//! │  Node Model (persistent tree)               │  ← Data
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using the Session
//!
//! ```rust
//! use mathedit_core::{Action, Session};
//!
//! let mut session = Session::new();
//!
//! // Type "x/2": a character, then a fraction whose denominator receives the 2.
//! session.apply(Action::InsertChar { value: 'x' }).unwrap();
//! session.apply(Action::Fraction).unwrap();
//! session.apply(Action::InsertChar { value: '2' }).unwrap();
//!
//! let document = session.document();
//! assert_eq!(document.children.len(), 1);
//! ```
//!
//! ## Using the Pure Reducer
//!
//! ```rust
//! use mathedit_core::{Action, IdGenerator, State, reduce};
//!
//! let mut ids = IdGenerator::with_seed(0);
//! let state = State::new(&mut ids);
//! let state = reduce(&state, &Action::InsertChar { value: '7' }, &mut ids);
//! assert_eq!(state.zipper.zip().children.len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`node`] - the persistent node model and id generator
//! - [`zipper`] - cursor representation (focused row + breadcrumb stack)
//! - [`movement`] - the move engine
//! - [`selection`] - anchor/focus reconciliation
//! - [`edit`] - structural edit operations
//! - [`matrix`] - matrix insertion and row/column structure edits
//! - [`vertical_work`] - the aligned-column algebra-step layout
//! - [`reducer`] - the closed action set and pure dispatch
//! - [`state`] - the session wrapper (versions, subscriptions, cursor queries)
//!
//! # Concurrency Model
//!
//! Single-threaded and synchronous: every operation is a total, side-effect-free
//! transform. New states share unchanged subtrees by reference with their inputs; the
//! only mutable resource is the session-owned id generator, which requires
//! single-writer discipline, not locking.

pub mod edit;
pub mod matrix;
pub mod movement;
pub mod node;
pub mod reducer;
pub mod selection;
pub mod state;
pub mod vertical_work;
pub mod zipper;

pub use edit::ScriptSlot;
pub use matrix::{HorizontalSide, MatrixShape, VerticalSide};
pub use node::{
    Atom, Delimited, Frac, IdGenerator, Limits, Node, NodeId, Root, Row, RowStyle, Style,
    SubSup, Table, TableDelimiters, TableKind,
};
pub use reducer::{Action, State, reduce};
pub use state::{
    CursorDescription, CursorStep, Session, SessionError, StateChange, StateChangeType,
};
pub use zipper::{Breadcrumb, BreadcrumbRow, Focus, FocusKind, ZRow, Zipper};
