use std::fmt;

/// A location in a document: zero-based line and byte column within that line.
///
/// The column never counts the line terminator. Positions are plain values:
/// the engine never holds on to host state, it only hands new positions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Returns the same position moved `delta` bytes along its line.
    ///
    /// Moving left saturates at the start of the line.
    #[must_use]
    pub fn translate(self, delta: isize) -> Self {
        let character = if delta >= 0 {
            self.character + delta.unsigned_abs()
        } else {
            self.character.saturating_sub(delta.unsigned_abs())
        };
        Self { line: self.line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A span between two positions, always stored with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// An empty range at `position`.
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The user's selection: where it was started (`anchor`) and where the caret is (`active`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub const fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    pub const fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    /// Builds a selection spanning `start..end` that keeps this selection's direction.
    #[must_use]
    pub fn with_bounds(&self, start: Position, end: Position) -> Self {
        if self.is_reversed() {
            Self::new(end, start)
        } else {
            Self::new(start, end)
        }
    }
}

impl From<Range> for Selection {
    fn from(range: Range) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_normalises_its_bounds() {
        let range = Range::new(Position::new(2, 4), Position::new(1, 9));
        assert_eq!(range.start, Position::new(1, 9));
        assert_eq!(range.end, Position::new(2, 4));
    }

    #[test]
    fn range_contains_both_edges() {
        let range = Range::new(Position::new(0, 2), Position::new(0, 5));
        assert!(range.contains(Position::new(0, 2)));
        assert!(range.contains(Position::new(0, 5)));
        assert!(!range.contains(Position::new(0, 6)));
    }

    #[test]
    fn single_line_ranges() {
        assert!(Range::caret(Position::new(1, 4)).is_single_line());
        assert!(!Range::new(Position::new(0, 4), Position::new(1, 0)).is_single_line());
    }

    #[test]
    fn translate_saturates_at_line_start() {
        assert_eq!(Position::new(3, 1).translate(-2), Position::new(3, 0));
        assert_eq!(Position::new(3, 1).translate(2), Position::new(3, 3));
    }

    #[test]
    fn reversed_selection_keeps_direction() {
        let selection = Selection::new(Position::new(0, 8), Position::new(0, 2));
        assert!(selection.is_reversed());
        assert_eq!(selection.start(), Position::new(0, 2));

        let moved = selection.with_bounds(Position::new(0, 3), Position::new(0, 9));
        assert_eq!(moved.anchor, Position::new(0, 9));
        assert_eq!(moved.active, Position::new(0, 3));
    }
}
