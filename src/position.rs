//! Source positions: a single `(line, column)` pair, the `(start, end)` byte range every
//! token and AST node carries, and the parser's position marker.

use std::fmt::{Display, Formatter};

/// A 1-based line, 0-based column position, matching the ESTree `loc` convention.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new Position object based on the line and column number.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open byte-offset range `[start, end)` into the source buffer.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge with a later range, assumed to be in source order.
    pub fn to(&self, other: Range) -> Range {
        Range::new(self.start, other.end)
    }
}

/// Start/end location pair, the `loc` field of an ESTree node.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize)]
pub struct Loc {
    pub start: Position,
    pub end: Position,
}

impl Loc {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A cheap-to-copy parser position marker, snapshotted at the start of a production and
/// compared against the current position at its completion to build a node's [`Range`]/[`Loc`].
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Marker {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
