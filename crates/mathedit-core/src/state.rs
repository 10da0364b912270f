//! Session and State Boundary
//!
//! Provides the stateful wrapper hosts drive: it owns the id generator and the current
//! reducer state, dispatches actions, tracks a document version, records applied
//! actions, and notifies subscribers with typed change records.
//!
//! # Overview
//!
//! The engine itself is pure ([`reduce`](crate::reduce)); `Session` adds the
//! single-writer discipline around it:
//!
//! - **State Queries**: current document tree, cursor description, selection length
//! - **Version Tracking**: a monotonically increasing version, bumped once per
//!   state-changing action (boundary no-ops do not bump it)
//! - **Change Notifications**: subscribe to classified [`StateChange`] events
//!
//! # Example
//!
//! ```rust
//! use mathedit_core::{Action, Session};
//!
//! let mut session = Session::new();
//! session.apply(Action::InsertChar { value: 'x' }).unwrap();
//! session.apply(Action::InsertChar { value: '2' }).unwrap();
//!
//! assert_eq!(session.version(), 2);
//! assert_eq!(session.document().children.len(), 2);
//! ```

use crate::node::{IdGenerator, NodeId, Row};
use crate::reducer::{Action, State, reduce};
use crate::zipper::Zipper;
use thiserror::Error;

/// State change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// The document tree changed.
    DocumentModified,
    /// Only the cursor moved.
    CursorMoved,
    /// The selection run or session changed.
    SelectionChanged,
}

/// State change record handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Change type.
    pub change_type: StateChangeType,
    /// Version before the action.
    pub old_version: u64,
    /// Version after the action.
    pub new_version: u64,
}

/// Session API misuse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A host-supplied cursor does not reconstitute this session's document.
    #[error("cursor reconstitutes row {actual:?}, expected the session root {expected:?}")]
    ForeignCursor {
        /// Root row id of the session's document.
        expected: NodeId,
        /// Root row id the supplied cursor reconstitutes.
        actual: NodeId,
    },
}

/// One breadcrumb level of a cursor description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStep {
    /// Index of the descended-into child within its row.
    pub child_index: usize,
    /// Index of the open slot within that child.
    pub slot_index: usize,
}

/// Host-facing description of the cursor: the descent path, the offset within the
/// focused row, and the selection run length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorDescription {
    /// One step per breadcrumb, outermost first.
    pub path: Vec<CursorStep>,
    /// Cursor position within the focused row.
    pub offset: usize,
    /// Number of selected children in the focused row.
    pub selection_len: usize,
}

type Listener = Box<dyn Fn(&StateChange)>;

/// The editing session: id generator ownership, reducer state, version tracking,
/// action history, and change notifications.
pub struct Session {
    ids: IdGenerator,
    state: State,
    version: u64,
    history: Vec<Action>,
    listeners: Vec<Listener>,
}

impl Session {
    /// Create a session over a fresh empty document.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a session whose id generator starts at `seed`, for reproducible trees.
    pub fn with_seed(seed: u64) -> Self {
        let mut ids = IdGenerator::with_seed(seed);
        let state = State::new(&mut ids);
        Self {
            ids,
            state,
            version: 0,
            history: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Create a session over an existing document row, together with the generator
    /// that built it (so fresh ids stay unique).
    pub fn with_document(row: Row, ids: IdGenerator) -> Self {
        Self {
            ids,
            state: State::from_row(row),
            version: 0,
            history: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Dispatch one action.
    ///
    /// Boundary no-ops succeed without bumping the version or notifying subscribers.
    /// `PositionCursor` is validated against the session's document first.
    pub fn apply(&mut self, action: Action) -> Result<&State, SessionError> {
        if let Action::PositionCursor { cursor } = &action {
            let expected = root_id(&self.state.zipper);
            let actual = root_id(cursor);
            if expected != actual {
                return Err(SessionError::ForeignCursor { expected, actual });
            }
        }

        let next = reduce(&self.state, &action, &mut self.ids);
        if next == self.state {
            return Ok(&self.state);
        }

        let change = StateChange {
            change_type: classify(&self.state, &next),
            old_version: self.version,
            new_version: self.version + 1,
        };
        self.state = next;
        self.version += 1;
        self.history.push(action);
        for listener in &self.listeners {
            listener(&change);
        }
        Ok(&self.state)
    }

    /// The current reducer state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The current document tree (the reconstituted root row). This is the transport
    /// contract consumed by the parser and the renderer.
    pub fn document(&self) -> Row {
        self.state.zipper.zip()
    }

    /// Host-facing cursor description for the combined zipper.
    pub fn cursor(&self) -> CursorDescription {
        let zipper = &self.state.zipper;
        CursorDescription {
            path: zipper
                .breadcrumbs
                .iter()
                .map(|crumb| CursorStep {
                    child_index: crumb.row.left.len(),
                    slot_index: crumb.focus.open_slot(),
                })
                .collect(),
            offset: zipper.row.cursor_index(),
            selection_len: zipper.row.selection.len(),
        }
    }

    /// Current document version; bumped once per state-changing action.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Every action that changed state, in application order.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Subscribe to state change notifications.
    pub fn subscribe(&mut self, listener: impl Fn(&StateChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Root row id a zipper reconstitutes to (outermost breadcrumb, or the focused row at
/// the top level).
fn root_id(zipper: &Zipper) -> NodeId {
    zipper
        .breadcrumbs
        .first()
        .map(|crumb| crumb.row.id)
        .unwrap_or(zipper.row.id)
}

fn classify(old: &State, new: &State) -> StateChangeType {
    if old.zipper.zip() != new.zipper.zip() {
        StateChangeType::DocumentModified
    } else if old.selecting != new.selecting
        || old.zipper.row.selection.len() != new.zipper.row.selection.len()
    {
        StateChangeType::SelectionChanged
    } else {
        StateChangeType::CursorMoved
    }
}
