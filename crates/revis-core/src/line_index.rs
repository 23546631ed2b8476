//! Read-only line access to the host's current document.
//!
//! The engine only needs the text of individual lines, to measure how far an annotation must be
//! shifted right so it clears the longest line it spans, and (for E0597) to slice the name of a
//! borrower out of the source.

use crate::diagnostics::{DiagnosticRange, Position};
use ropey::Rope;
use unicode_width::UnicodeWidthStr;

/// Line-indexed access to document text.
pub trait LineSource {
    /// Text of `line` without its line terminator, or `None` if the line does not exist.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Display width of `line` in monospace cells, or `None` if the line does not exist.
    ///
    /// ASCII lines measure as their character count; CJK / emoji count as two cells.
    fn line_len(&self, line: usize) -> Option<usize> {
        self.line_text(line).map(|text| text.width())
    }
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn line_text(&self, line: usize) -> Option<String> {
        (**self).line_text(line)
    }

    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        (**self).line_len(line)
    }
}

/// Rope-backed snapshot of a document.
///
/// Rope provides O(log N) line access, which keeps repeated line measurements cheap even on
/// large files.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index from document text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the indexed text.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Insert `text` at `position`. Returns `false` (and leaves the text untouched) when the
    /// position lies outside the document.
    pub fn insert(&mut self, position: Position, text: &str) -> bool {
        let Some(line_text) = self.line_text(position.line) else {
            return false;
        };
        if position.character > line_text.chars().count() {
            return false;
        }
        let at = self.rope.line_to_char(position.line) + position.character;
        self.rope.insert(at, text);
        true
    }

    /// The whole text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}

impl LineSource for LineIndex {
    fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        // Rope's line() includes the terminator.
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }
}

/// Characters `from..to` of `line`, or `None` if the line does not exist.
///
/// Out-of-range character bounds are clamped to the line.
pub fn slice_line(source: &dyn LineSource, line: usize, from: usize, to: usize) -> Option<String> {
    let text = source.line_text(line)?;
    Some(text.chars().skip(from).take(to.saturating_sub(from)).collect())
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Range of the identifier-like word touching `position`: the word containing it, or the one
/// ending right before it. `None` when no word touches the position.
pub fn word_range_at(source: &dyn LineSource, position: Position) -> Option<DiagnosticRange> {
    let chars: Vec<char> = source.line_text(position.line)?.chars().collect();
    let at = position.character.min(chars.len());
    let mut start = at;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = at;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start < end).then(|| DiagnosticRange::on_line(position.line, start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_text_strips_terminators() {
        let index = LineIndex::from_text("fn main() {\r\n    let x = 1;\n}\n");
        assert_eq!(index.line_text(0).as_deref(), Some("fn main() {"));
        assert_eq!(index.line_text(1).as_deref(), Some("    let x = 1;"));
        assert_eq!(index.line_text(2).as_deref(), Some("}"));
        // Trailing newline yields a final empty line.
        assert_eq!(index.line_text(3).as_deref(), Some(""));
        assert_eq!(index.line_text(4), None);
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_line_len_uses_display_width() {
        let index = LineIndex::from_text("abc\n中文\n");
        assert_eq!(index.line_len(0), Some(3));
        assert_eq!(index.line_len(1), Some(4));
        assert_eq!(index.line_len(9), None);
    }

    #[test]
    fn test_slice_line_counts_chars() {
        let index = LineIndex::from_text("    let r = &x;\n");
        assert_eq!(slice_line(&index, 0, 8, 9).as_deref(), Some("r"));
        assert_eq!(slice_line(&index, 0, 12, 100).as_deref(), Some("&x;"));
        assert_eq!(slice_line(&index, 3, 0, 1), None);
    }

    #[test]
    fn test_word_range_at() {
        let index = LineIndex::from_text("    x_1 = 5;\n");
        assert_eq!(
            word_range_at(&index, Position::new(0, 4)),
            Some(DiagnosticRange::on_line(0, 4, 7))
        );
        // Right after the word still selects it.
        assert_eq!(
            word_range_at(&index, Position::new(0, 7)),
            Some(DiagnosticRange::on_line(0, 4, 7))
        );
        assert_eq!(word_range_at(&index, Position::new(0, 1)), None);
        assert_eq!(word_range_at(&index, Position::new(5, 0)), None);
    }

    #[test]
    fn test_insert_checks_bounds() {
        let mut index = LineIndex::from_text("fn f(r: &mut i32) {\n    r = 5;\n}\n");
        assert!(index.insert(Position::new(1, 4), "*"));
        assert_eq!(index.line_text(1).as_deref(), Some("    *r = 5;"));
        assert!(!index.insert(Position::new(1, 40), "*"));
        assert!(!index.insert(Position::new(9, 0), "*"));
    }
}
