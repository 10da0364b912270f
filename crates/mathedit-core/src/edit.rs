//! Structural Edit Operations
//!
//! Each operation is a pure transform from one zipper to the next: character insertion
//! (with ligature composition and big-operator expansion), backspace (with soft delete
//! of confirmed delimiters and container dissolution), paired-delimiter insertion, and
//! fraction/subscript/superscript/radical creation, plus the style rewrites behind the
//! `Color`/`Cancel`/`Uncancel` actions.
//!
//! Operations act on the combined zipper produced by the Selection Engine: a non-empty
//! selection run is consumed first (replaced, wrapped, or deleted), then the collapsed
//! cursor behavior applies. Boundary conditions return the input unchanged.

use crate::movement::entry_slot_from_right;
use crate::node::{
    Atom, Delimited, Frac, IdGenerator, Limits, Node, Root, Row, Style, SubSup,
};
use crate::zipper::{
    Breadcrumb, BreadcrumbRow, Focus, FocusKind, ZRow, Zipper, focus_slot, rebuild, zip_once,
};
use mathedit_chars::{compose_ligature, delimiter_pair, is_big_operator, is_binary_operator, is_relation};
use std::rc::Rc;

/// Which slot a script action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSlot {
    /// The subscript row.
    Sub,
    /// The superscript row.
    Sup,
}

/// Insert a typed character at the cursor, replacing the active selection if one
/// exists.
///
/// A character completing a known two-character ligature replaces the preceding atom
/// with one composed atom retaining the typed characters. A summation/product/integral
/// glyph expands into a [`Limits`] node with empty lower/upper rows, the glyph as its
/// inner atom.
pub fn insert_char(zipper: &Zipper, ids: &mut IdGenerator, value: char) -> Zipper {
    let mut row = zipper.row.clone();
    let replaced_selection = !row.selection.is_empty();
    row.selection.clear();

    if is_big_operator(value) {
        let inner = Atom::new(ids, value);
        let lower = Row::empty(ids);
        let upper = Row::empty(ids);
        row.left
            .push(Node::Limits(Rc::new(Limits::new(ids, inner, lower, Some(upper)))));
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    if !replaced_selection
        && let Some(Node::Atom(prev)) = row.left.last()
        && prev.composed.is_none()
        && let Some(glyph) = compose_ligature(prev.value, value)
    {
        let typed: String = [prev.value, value].into_iter().collect();
        row.left.pop();
        row.left.push(Node::Atom(Atom::composed(ids, glyph, typed)));
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    row.left.push(Node::Atom(Atom::new(ids, value)));
    Zipper {
        row,
        breadcrumbs: zipper.breadcrumbs.clone(),
    }
}

/// Delete backward from the cursor.
///
/// - An active selection is deleted whole.
/// - A preceding atom is removed.
/// - A preceding delimited group with a confirmed closing delimiter is soft-deleted:
///   the closing delimiter flips back to pending and the cursor descends to the end of
///   the inner row, so the delimiter can be re-typed.
/// - Any other preceding container is entered at the end of its last present slot, so
///   repeated backspaces consume its content and finally dissolve it.
/// - At the left edge of a focused row with a breadcrumb, the container dissolves: its
///   slot contents are flattened into the parent row around the cursor.
/// - At the true start of the topmost row: no-op.
pub fn backspace(zipper: &Zipper) -> Zipper {
    if !zipper.row.selection.is_empty() {
        let mut row = zipper.row.clone();
        row.selection.clear();
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    if let Some(prev) = zipper.row.left.last() {
        match prev {
            Node::Atom(_) => {
                let mut row = zipper.row.clone();
                row.left.pop();
                return Zipper {
                    row,
                    breadcrumbs: zipper.breadcrumbs.clone(),
                };
            }
            Node::Delimited(delimited) => {
                if delimited.right_delim.pending {
                    // Backspacing an already-pending delimiter is a documented
                    // placeholder upstream with no specified behavior; the port keeps
                    // the state unchanged rather than guessing merge semantics.
                    return zipper.clone();
                }
                let reopened = Node::Delimited(Rc::new(Delimited {
                    right_delim: Atom {
                        pending: true,
                        ..delimited.right_delim.clone()
                    },
                    ..(**delimited).clone()
                }));
                let (focus, open) = focus_slot(&reopened, 0).expect("delimited inner");
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
            Node::Frac(_) | Node::SubSup(_) | Node::Root(_) | Node::Limits(_) | Node::Table(_) => {
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
                // A container with no enterable slot holds no content; drop it.
                let mut row = zipper.row.clone();
                row.left.pop();
                return Zipper {
                    row,
                    breadcrumbs: zipper.breadcrumbs.clone(),
                };
            }
        }
    }

    let Some(crumb) = zipper.breadcrumbs.last() else {
        return zipper.clone();
    };

    // Dissolve the container: every slot's contents are flattened into the parent row,
    // slots before the open one land left of the cursor, the open slot's contents and
    // everything after land right of it.
    let mut left = crumb.row.left.clone();
    for slot in crumb.focus.left.iter().flatten() {
        left.extend(slot.children.iter().cloned());
    }
    let mut right = zipper.row.to_row().children;
    for slot in crumb.focus.right.iter().flatten() {
        right.extend(slot.children.iter().cloned());
    }
    right.extend(crumb.row.right.iter().cloned());

    Zipper {
        row: ZRow {
            id: crumb.row.id,
            style: crumb.row.style.clone(),
            left,
            selection: Vec::new(),
            right,
        },
        breadcrumbs: zipper.breadcrumbs[..zipper.breadcrumbs.len() - 1].to_vec(),
    }
}

/// Handle a typed delimiter character.
///
/// - Around an active selection: wrap exactly the selection in a non-pending pair and
///   collapse the selection, cursor after the new group.
/// - An opening delimiter whose pending complement encloses the cursor (cursor at the
///   inner start of a group with a pending opener of the same shape) confirms that
///   opener instead of inserting a new pair.
/// - Otherwise an opening delimiter wraps the remainder of the row in a fresh group
///   whose closer is pending, and the cursor descends into the group.
/// - A closing delimiter matching a pending closer on the breadcrumb path confirms it
///   and re-emerges right of the group; otherwise it wraps everything left of the
///   cursor in a group whose opener is pending, cursor after the group.
/// - A character that is no known delimiter: no-op.
pub fn parens(zipper: &Zipper, ids: &mut IdGenerator, delim: char) -> Zipper {
    let Some(pair) = delimiter_pair(delim) else {
        return zipper.clone();
    };

    if !zipper.row.selection.is_empty() {
        let mut row = zipper.row.clone();
        let inner = Row::new(ids, std::mem::take(&mut row.selection));
        let left_delim = Atom::new(ids, pair.open);
        let right_delim = Atom::new(ids, pair.close);
        let node = Node::Delimited(Rc::new(Delimited::new(
            ids,
            left_delim,
            right_delim,
            inner,
        )));
        row.left.push(node);
        return Zipper {
            row,
            breadcrumbs: zipper.breadcrumbs.clone(),
        };
    }

    if delim == pair.open {
        if zipper.row.left.is_empty()
            && let Some(crumb) = zipper.breadcrumbs.last()
            && let FocusKind::Delimited {
                left_delim,
                right_delim,
            } = &crumb.focus.kind
            && left_delim.pending
            && left_delim.value == delim
        {
            let mut breadcrumbs = zipper.breadcrumbs.clone();
            let last = breadcrumbs.last_mut().expect("checked");
            last.focus.kind = FocusKind::Delimited {
                left_delim: Atom {
                    pending: false,
                    ..left_delim.clone()
                },
                right_delim: right_delim.clone(),
            };
            return Zipper {
                row: zipper.row.clone(),
                breadcrumbs,
            };
        }

        let mut row = zipper.row.clone();
        let inner = Row::new(ids, std::mem::take(&mut row.right));
        let left_delim = Atom::new(ids, pair.open);
        let right_delim = Atom::pending(ids, pair.close);
        let node = Node::Delimited(Rc::new(Delimited::new(
            ids,
            left_delim,
            right_delim,
            inner,
        )));
        let (focus, open) = focus_slot(&node, 0).expect("delimited inner");
        let crumb = Breadcrumb {
            row: BreadcrumbRow {
                id: row.id,
                style: row.style.clone(),
                left: row.left.clone(),
                right: Vec::new(),
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

    // Closing delimiter: confirm the nearest enclosing pending closer of this shape.
    if let Some(level) = zipper.breadcrumbs.iter().rposition(|crumb| {
        matches!(
            &crumb.focus.kind,
            FocusKind::Delimited { right_delim, .. }
                if right_delim.pending && right_delim.value == delim
        )
    }) {
        let mut current = zipper.clone();
        while current.depth() > level + 1 {
            current = zip_once(&current);
        }
        let crumb = current.breadcrumbs.last().expect("checked").clone();
        let FocusKind::Delimited {
            left_delim,
            right_delim,
        } = &crumb.focus.kind
        else {
            unreachable!("matched above");
        };
        let focus = Focus {
            kind: FocusKind::Delimited {
                left_delim: left_delim.clone(),
                right_delim: Atom {
                    pending: false,
                    ..right_delim.clone()
                },
            },
            ..crumb.focus.clone()
        };
        let node = rebuild(&focus, current.row.to_row());
        let mut left = crumb.row.left.clone();
        left.push(node);
        return Zipper {
            row: ZRow {
                id: crumb.row.id,
                style: crumb.row.style.clone(),
                left,
                selection: Vec::new(),
                right: crumb.row.right.clone(),
            },
            breadcrumbs: current.breadcrumbs[..level].to_vec(),
        };
    }

    // No pending complement: wrap everything left of the cursor, opener pending.
    let mut row = zipper.row.clone();
    let inner = Row::new(ids, std::mem::take(&mut row.left));
    let left_delim = Atom::pending(ids, pair.open);
    let right_delim = Atom::new(ids, pair.close);
    let node = Node::Delimited(Rc::new(Delimited::new(
        ids,
        left_delim,
        right_delim,
        inner,
    )));
    row.left.push(node);
    Zipper {
        row,
        breadcrumbs: zipper.breadcrumbs.clone(),
    }
}

/// Returns `true` for nodes that terminate the leftward term scan of [`fraction`].
fn is_term_boundary(node: &Node) -> bool {
    match node {
        Node::Atom(atom) => is_binary_operator(atom.value) || is_relation(atom.value),
        Node::Limits(_) => true,
        _ => false,
    }
}

/// Wrap the current term (or the active selection) as the numerator of a fresh
/// fraction with an empty denominator, and move the cursor into the denominator.
///
/// With a collapsed cursor the term is found by scanning left over operand nodes,
/// stopping at a binary-operator atom, a relational atom, or a `Limits` node.
pub fn fraction(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    let mut row = zipper.row.clone();
    let numerator = if row.selection.is_empty() {
        let split = row
            .left
            .iter()
            .rposition(is_term_boundary)
            .map_or(0, |index| index + 1);
        Row::new(ids, row.left.split_off(split))
    } else {
        Row::new(ids, std::mem::take(&mut row.selection))
    };
    let denominator = Row::empty(ids);
    let node = Node::Frac(Rc::new(Frac::new(ids, numerator, denominator)));

    let (focus, open) = focus_slot(&node, 1).expect("denominator");
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
        row: ZRow::from_row_start(open),
        breadcrumbs,
    }
}

/// Attach or re-enter a subscript/superscript at the cursor.
///
/// When the node immediately right of the cursor is already a `SubSup` it is reused:
/// an empty row is created for the requested slot if absent, otherwise the cursor just
/// moves into the existing slot (idempotent re-entry). Otherwise a fresh `SubSup` with
/// only the requested slot populated is inserted and entered.
pub fn subsup(zipper: &Zipper, ids: &mut IdGenerator, slot: ScriptSlot) -> Zipper {
    // Scripts attach at a collapsed cursor; an active selection collapses to its right
    // edge first.
    let mut row = zipper.row.clone();
    let mut run = std::mem::take(&mut row.selection);
    row.left.append(&mut run);

    let slot_index = match slot {
        ScriptSlot::Sub => 0,
        ScriptSlot::Sup => 1,
    };

    if let Some(Node::SubSup(existing)) = row.right.first() {
        let node = match slot {
            ScriptSlot::Sub if existing.subscript.is_none() => Node::SubSup(Rc::new(SubSup {
                subscript: Some(Row::empty(ids)),
                ..(**existing).clone()
            })),
            ScriptSlot::Sup if existing.superscript.is_none() => Node::SubSup(Rc::new(SubSup {
                superscript: Some(Row::empty(ids)),
                ..(**existing).clone()
            })),
            _ => Node::SubSup(Rc::clone(existing)),
        };
        let (focus, open) = focus_slot(&node, slot_index).expect("slot populated");
        let crumb = Breadcrumb {
            row: BreadcrumbRow {
                id: row.id,
                style: row.style.clone(),
                left: row.left.clone(),
                right: row.right[1..].to_vec(),
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

    let empty = Row::empty(ids);
    let node = match slot {
        ScriptSlot::Sub => Node::SubSup(Rc::new(SubSup::new(ids, Some(empty), None))),
        ScriptSlot::Sup => Node::SubSup(Rc::new(SubSup::new(ids, None, Some(empty)))),
    };
    let (focus, open) = focus_slot(&node, slot_index).expect("slot populated");
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
        row: ZRow::from_row_start(open),
        breadcrumbs,
    }
}

/// Insert a fresh radical and descend into its index slot (index-bearing variant) or
/// its radicand. An active selection becomes the radicand verbatim.
pub fn root(zipper: &Zipper, ids: &mut IdGenerator, with_index: bool) -> Zipper {
    let mut row = zipper.row.clone();
    let radicand = Row::new(ids, std::mem::take(&mut row.selection));

    let (node, slot_index) = if with_index {
        let index = Row::empty(ids);
        (
            Node::Root(Rc::new(Root::new(ids, Some(index), radicand))),
            0,
        )
    } else {
        (Node::Root(Rc::new(Root::new(ids, None, radicand))), 1)
    };

    let (focus, open) = focus_slot(&node, slot_index).expect("slot populated");
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
        row: ZRow::from_row_start(open),
        breadcrumbs,
    }
}

fn map_selection(zipper: &Zipper, mut update: impl FnMut(&Node) -> Node) -> Zipper {
    if zipper.row.selection.is_empty() {
        return zipper.clone();
    }
    let mut row = zipper.row.clone();
    row.selection = row.selection.iter().map(|node| update(node)).collect();
    Zipper {
        row,
        breadcrumbs: zipper.breadcrumbs.clone(),
    }
}

/// Set the display color of every node in the active selection. No-op without a
/// selection.
pub fn set_color(zipper: &Zipper, color: &str) -> Zipper {
    map_selection(zipper, |node| {
        node.with_style(Style {
            color: Some(color.to_string()),
            ..node.style().clone()
        })
    })
}

/// Strike through every node in the active selection with one fresh cancel mark.
/// No-op without a selection.
pub fn cancel(zipper: &Zipper, ids: &mut IdGenerator) -> Zipper {
    if zipper.row.selection.is_empty() {
        return zipper.clone();
    }
    let mark = ids.fresh();
    map_selection(zipper, |node| {
        node.with_style(Style {
            cancel: Some(mark),
            ..node.style().clone()
        })
    })
}

/// Clear the cancel mark of every node in the active selection. No-op without a
/// selection.
pub fn uncancel(zipper: &Zipper) -> Zipper {
    map_selection(zipper, |node| {
        node.with_style(Style {
            cancel: None,
            ..node.style().clone()
        })
    })
}
