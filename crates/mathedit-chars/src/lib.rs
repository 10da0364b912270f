#![warn(missing_docs)]
//! `mathedit-chars` - data-driven character classification helpers for `mathedit-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on the node model or
//! any editing machinery. It provides the small lookup tables the editor kernel consults
//! when deciding how a typed character behaves: operator classes, delimiter pairing, and
//! two-character ligature composition. Hosts can inspect the same tables to build key maps
//! or palettes.

/// Broad behavioral class of a typed character, as seen by the editor kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `+`, `-` and friends: infix operators that terminate a term.
    BinaryOperator,
    /// `=`, `<`, `>` and composed forms: relational operators.
    Relation,
    /// `∑`, `∏`, `∫`: glyphs that spawn a `Limits` construct when typed.
    BigOperator,
    /// An opening delimiter such as `(`.
    OpenDelimiter,
    /// A closing delimiter such as `)`.
    CloseDelimiter,
    /// Anything else: digits, identifiers, punctuation without editor semantics.
    Operand,
}

/// A matched pair of delimiter glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterPair {
    /// Opening glyph (e.g. `(`).
    pub open: char,
    /// Closing glyph (e.g. `)`).
    pub close: char,
}

/// Delimiter pairs the editor auto-closes.
pub const DELIMITER_PAIRS: &[DelimiterPair] = &[
    DelimiterPair {
        open: '(',
        close: ')',
    },
    DelimiterPair {
        open: '[',
        close: ']',
    },
    DelimiterPair {
        open: '{',
        close: '}',
    },
];

/// A two-character ligature composition rule.
///
/// Typing `second` immediately after an atom holding `first` replaces that atom with a
/// single composed atom rendering `composed`, while the original characters are retained
/// on the atom for possible future decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ligature {
    /// Character already in the row.
    pub first: char,
    /// Character just typed.
    pub second: char,
    /// Glyph of the composed atom.
    pub composed: char,
}

/// Ligature rules the editor applies during character insertion.
pub const LIGATURES: &[Ligature] = &[
    Ligature {
        first: '<',
        second: '=',
        composed: '≤',
    },
    Ligature {
        first: '>',
        second: '=',
        composed: '≥',
    },
    Ligature {
        first: '!',
        second: '=',
        composed: '≠',
    },
    Ligature {
        first: '-',
        second: '>',
        composed: '→',
    },
];

/// Returns `true` for plus/minus-shaped operators (the runs that become their own column
/// in vertical-work layout).
pub fn is_plus_minus(ch: char) -> bool {
    matches!(ch, '+' | '-' | '−' | '±')
}

/// Returns `true` for infix binary operators that terminate a term.
pub fn is_binary_operator(ch: char) -> bool {
    is_plus_minus(ch) || matches!(ch, '·' | '×' | '÷' | '∗')
}

/// Returns `true` for relational operators (`=`, `<`, `>` and their composed forms).
pub fn is_relation(ch: char) -> bool {
    matches!(ch, '=' | '<' | '>' | '≤' | '≥' | '≠')
}

/// Returns `true` for glyphs that spawn a `Limits` construct (summation, product,
/// integral).
pub fn is_big_operator(ch: char) -> bool {
    matches!(ch, '∑' | '∏' | '∫')
}

/// Returns `true` if `ch` opens a known delimiter pair.
pub fn is_open_delimiter(ch: char) -> bool {
    DELIMITER_PAIRS.iter().any(|pair| pair.open == ch)
}

/// Returns `true` if `ch` closes a known delimiter pair.
pub fn is_close_delimiter(ch: char) -> bool {
    DELIMITER_PAIRS.iter().any(|pair| pair.close == ch)
}

/// Look up the pair a delimiter glyph belongs to (either side).
pub fn delimiter_pair(ch: char) -> Option<DelimiterPair> {
    DELIMITER_PAIRS
        .iter()
        .copied()
        .find(|pair| pair.open == ch || pair.close == ch)
}

/// The closing glyph matching an opening delimiter.
pub fn matching_close(open: char) -> Option<char> {
    DELIMITER_PAIRS
        .iter()
        .find(|pair| pair.open == open)
        .map(|pair| pair.close)
}

/// The opening glyph matching a closing delimiter.
pub fn matching_open(close: char) -> Option<char> {
    DELIMITER_PAIRS
        .iter()
        .find(|pair| pair.close == close)
        .map(|pair| pair.open)
}

/// Compose a two-character ligature, if `first` followed by `second` forms one.
pub fn compose_ligature(first: char, second: char) -> Option<char> {
    LIGATURES
        .iter()
        .find(|rule| rule.first == first && rule.second == second)
        .map(|rule| rule.composed)
}

/// Classify a character the way the editor kernel sees it.
pub fn classify(ch: char) -> CharClass {
    if is_binary_operator(ch) {
        CharClass::BinaryOperator
    } else if is_relation(ch) {
        CharClass::Relation
    } else if is_big_operator(ch) {
        CharClass::BigOperator
    } else if is_open_delimiter(ch) {
        CharClass::OpenDelimiter
    } else if is_close_delimiter(ch) {
        CharClass::CloseDelimiter
    } else {
        CharClass::Operand
    }
}
