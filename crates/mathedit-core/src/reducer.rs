//! Reducer: the closed action set and its pure dispatch
//!
//! # Overview
//!
//! The reducer is a pure function from `(state, action)` to a new state. The action
//! set is closed and tagged; dispatch matches exhaustively, so adding an action
//! variant fails compilation at every consumer instead of silently doing nothing.
//!
//! State is the Selection Engine triple: an anchor zipper, a focus zipper, and the
//! combined zipper produced by reconciling the two, plus the "selecting" flag. Cursor
//! motion while selecting moves only the focus zipper; edits consume the combined
//! zipper's selection run and collapse everything back to a single cursor.
//!
//! # Example
//!
//! ```rust
//! use mathedit_core::{Action, IdGenerator, State, reduce};
//!
//! let mut ids = IdGenerator::new();
//! let mut state = State::new(&mut ids);
//!
//! for action in [
//!     Action::InsertChar { value: '1' },
//!     Action::InsertChar { value: '+' },
//!     Action::InsertChar { value: '2' },
//! ] {
//!     state = reduce(&state, &action, &mut ids);
//! }
//! assert_eq!(state.zipper.zip().children.len(), 3);
//! ```

use crate::edit::{
    ScriptSlot, backspace, cancel, fraction, insert_char, parens, root, set_color, subsup,
    uncancel,
};
use crate::matrix::{
    HorizontalSide, MatrixShape, VerticalSide, add_column, add_row, delete_column, delete_row,
    insert_matrix,
};
use crate::movement;
use crate::node::{IdGenerator, Row};
use crate::selection::selection_zipper;
use crate::vertical_work;
use crate::zipper::Zipper;

/// The closed set of editing actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the cursor left (or shrink/grow the selection while selecting).
    ArrowLeft,
    /// Move the cursor right (or shrink/grow the selection while selecting).
    ArrowRight,
    /// Move up: table-cell navigation plus vertical-work demotion.
    ArrowUp,
    /// Move down: table-cell navigation plus vertical-work splitting/promotion.
    ArrowDown,
    /// Delete backward.
    Backspace,
    /// Attach or enter a subscript.
    Subscript,
    /// Attach or enter a superscript.
    Superscript,
    /// A typed delimiter character.
    Parens {
        /// The delimiter glyph typed.
        delim: char,
    },
    /// Wrap the current term/selection into a fraction.
    Fraction,
    /// Insert a radical.
    Root {
        /// Whether the radical carries an index slot (entered first).
        with_index: bool,
    },
    /// A typed character.
    InsertChar {
        /// The character typed.
        value: char,
    },
    /// Begin a selection session anchored at the cursor.
    StartSelecting,
    /// End the selection session, keeping the selection run.
    StopSelecting,
    /// Set the cursor directly from externally computed coordinates (pointer
    /// hit-testing).
    PositionCursor {
        /// The externally built cursor.
        cursor: Zipper,
    },
    /// Color the selected nodes.
    Color {
        /// Host-defined color name or hex string.
        color: String,
    },
    /// Strike through the selected nodes with one fresh cancel mark.
    Cancel,
    /// Clear the cancel mark of the selected nodes.
    Uncancel,
    /// Insert a fresh 2×2 matrix.
    InsertMatrix {
        /// Delimiter shape around the matrix.
        shape: MatrixShape,
    },
    /// Insert a matrix row next to the cursor's row.
    AddRow {
        /// Which side of the cursor's row.
        side: VerticalSide,
    },
    /// Insert a matrix column next to the cursor's column.
    AddColumn {
        /// Which side of the cursor's column.
        side: HorizontalSide,
    },
    /// Delete the cursor's matrix row.
    DeleteRow,
    /// Delete the cursor's matrix column.
    DeleteColumn,
}

/// Editor state: the Selection Engine triple plus the "selecting" flag.
///
/// `zipper` is the combined, displayable cursor; `start_zipper`/`end_zipper` are the
/// selection endpoints (equal to `zipper` whenever no selection session is active).
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Selection anchor.
    pub start_zipper: Zipper,
    /// Selection focus, the endpoint cursor actions move.
    pub end_zipper: Zipper,
    /// The combined zipper edits operate on.
    pub zipper: Zipper,
    /// Whether a selection session is active.
    pub selecting: bool,
}

impl State {
    /// A state over a fresh empty document.
    pub fn new(ids: &mut IdGenerator) -> Self {
        Self::from_row(Row::empty(ids))
    }

    /// A state with the cursor at the start of an existing document row.
    pub fn from_row(row: Row) -> Self {
        let zipper = Zipper::enter_start(row);
        Self {
            start_zipper: zipper.clone(),
            end_zipper: zipper.clone(),
            zipper,
            selecting: false,
        }
    }
}

fn collapsed_state(zipper: Zipper) -> State {
    State {
        start_zipper: zipper.clone(),
        end_zipper: zipper.clone(),
        zipper,
        selecting: false,
    }
}

fn horizontal_move(state: &State, step: fn(&Zipper) -> Zipper) -> State {
    if state.selecting {
        let end_zipper = step(&state.end_zipper);
        let zipper = selection_zipper(&state.start_zipper, &end_zipper);
        State {
            start_zipper: state.start_zipper.clone(),
            end_zipper,
            zipper,
            selecting: true,
        }
    } else {
        collapsed_state(step(&state.zipper))
    }
}

/// Apply an edit result: the column-adjustment pass reacts to every edit made inside
/// a vertical-work cell, then everything collapses to a single cursor.
fn edited_state(zipper: Zipper, ids: &mut IdGenerator) -> State {
    let adjusted = if vertical_work::in_algebra_table(&zipper) {
        vertical_work::adjust_columns(&zipper, ids)
    } else {
        zipper
    };
    collapsed_state(adjusted)
}

/// The pure reducer: dispatch one action against the current state.
///
/// Boundary conditions (moves at the document edge, structure edits outside their
/// context) leave the state unchanged; recognized-but-invalid internal states panic
/// inside the components this dispatches to.
pub fn reduce(state: &State, action: &Action, ids: &mut IdGenerator) -> State {
    match action {
        Action::ArrowLeft => horizontal_move(state, movement::move_left),
        Action::ArrowRight => horizontal_move(state, movement::move_right),
        Action::ArrowUp => {
            if state.selecting {
                // Vertical motion is not part of selection growth.
                state.clone()
            } else {
                collapsed_state(vertical_work::move_up(&state.zipper))
            }
        }
        Action::ArrowDown => {
            if state.selecting {
                state.clone()
            } else {
                collapsed_state(vertical_work::move_down(&state.zipper, ids))
            }
        }
        Action::Backspace => edited_state(backspace(&state.zipper), ids),
        Action::Subscript => edited_state(subsup(&state.zipper, ids, ScriptSlot::Sub), ids),
        Action::Superscript => edited_state(subsup(&state.zipper, ids, ScriptSlot::Sup), ids),
        Action::Parens { delim } => edited_state(parens(&state.zipper, ids, *delim), ids),
        Action::Fraction => edited_state(fraction(&state.zipper, ids), ids),
        Action::Root { with_index } => edited_state(root(&state.zipper, ids, *with_index), ids),
        Action::InsertChar { value } => edited_state(insert_char(&state.zipper, ids, *value), ids),
        Action::StartSelecting => {
            let zipper = movement::collapsed(&state.zipper);
            State {
                start_zipper: zipper.clone(),
                end_zipper: zipper.clone(),
                zipper,
                selecting: true,
            }
        }
        Action::StopSelecting => State {
            selecting: false,
            ..state.clone()
        },
        Action::PositionCursor { cursor } => collapsed_state(cursor.clone()),
        // Style rewrites keep the selection run visible so they can be chained; the
        // selection session itself ends.
        Action::Color { color } => collapsed_state(set_color(&state.zipper, color)),
        Action::Cancel => collapsed_state(cancel(&state.zipper, ids)),
        Action::Uncancel => collapsed_state(uncancel(&state.zipper)),
        Action::InsertMatrix { shape } => {
            edited_state(insert_matrix(&state.zipper, ids, *shape), ids)
        }
        Action::AddRow { side } => edited_state(add_row(&state.zipper, ids, *side), ids),
        Action::AddColumn { side } => edited_state(add_column(&state.zipper, ids, *side), ids),
        Action::DeleteRow => edited_state(delete_row(&state.zipper), ids),
        Action::DeleteColumn => edited_state(delete_column(&state.zipper), ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: State, actions: &[Action], ids: &mut IdGenerator) -> State {
        actions
            .iter()
            .fold(state, |state, action| reduce(&state, action, ids))
    }

    #[test]
    fn test_type_select_replace() {
        let mut ids = IdGenerator::new();
        let state = State::new(&mut ids);
        let state = apply(
            state,
            &[
                Action::InsertChar { value: 'a' },
                Action::InsertChar { value: 'b' },
                Action::StartSelecting,
                Action::ArrowLeft,
                Action::ArrowLeft,
                Action::StopSelecting,
                Action::InsertChar { value: 'z' },
            ],
            &mut ids,
        );
        let document = state.zipper.zip();
        assert_eq!(document.children.len(), 1);
        assert_eq!(
            document.children[0].as_atom().map(|atom| atom.value),
            Some('z')
        );
    }

    #[test]
    fn test_arrow_at_document_edges_is_noop() {
        let mut ids = IdGenerator::new();
        let state = State::new(&mut ids);
        let moved = reduce(&state, &Action::ArrowLeft, &mut ids);
        assert_eq!(moved, state);
        let moved = reduce(&state, &Action::ArrowRight, &mut ids);
        assert_eq!(moved, state);
    }

    #[test]
    fn test_selection_survives_stop_selecting() {
        let mut ids = IdGenerator::new();
        let state = apply(
            State::new(&mut ids),
            &[
                Action::InsertChar { value: 'x' },
                Action::StartSelecting,
                Action::ArrowLeft,
                Action::StopSelecting,
            ],
            &mut ids,
        );
        assert!(!state.selecting);
        assert_eq!(state.zipper.row.selection.len(), 1);
    }

    #[test]
    fn test_color_applies_to_selection() {
        let mut ids = IdGenerator::new();
        let state = apply(
            State::new(&mut ids),
            &[
                Action::InsertChar { value: 'x' },
                Action::StartSelecting,
                Action::ArrowLeft,
                Action::Color {
                    color: "blue".to_string(),
                },
            ],
            &mut ids,
        );
        let styled = &state.zipper.row.selection[0];
        assert_eq!(styled.style().color.as_deref(), Some("blue"));
    }
}
