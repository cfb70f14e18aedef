use std::collections::VecDeque;

use regex::Regex;
use xi_rope::delta::{DeltaElement, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{Cmd, EditError, EditorHost, Patch, Position, PromptOptions, Range, Selection};
use crate::transform::word;

/// Indentation style detected in the document
#[derive(Debug, Clone, PartialEq)]
pub enum IndentStyle {
    Spaces(usize), // Number of spaces per indent level
    Tabs,          // Tab characters
}

impl IndentStyle {
    /// Text inserted for one level of indentation
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces(n) => " ".repeat(*n),
        }
    }

    /// How many leading bytes of `line` one outdent removes
    pub fn outdent_len(&self, line: &str) -> usize {
        if line.starts_with('\t') {
            return 1;
        }
        let spaces = line.bytes().take_while(|&b| b == b' ').count();
        match self {
            IndentStyle::Spaces(n) => spaces.min(*n),
            // Tab-indented documents still get stray spaces cleaned up
            IndentStyle::Tabs => spaces.min(4),
        }
    }
}

/// In-memory Markdown document that the transform engine can drive.
///
/// The text lives in a single `xi_rope::Rope`. Every change goes through a
/// [`Cmd`], which is compiled to a `Delta`; the selection is carried through
/// the same delta so it never points at stale offsets.
///
/// ```rust
/// # use mini_markdown_engine::editing::{Document, Cmd};
/// let mut doc = Document::from_bytes(b"- first").unwrap();
/// let patch = doc.apply(Cmd::InsertText { at: 7, text: "\n- ".to_string() });
///
/// assert_eq!(doc.text(), "- first\n- ");
/// assert_eq!(patch.version, 1);
/// ```
///
/// Prompts are answered from a queue filled with [`Document::push_answer`];
/// once the queue is empty, every prompt counts as dismissed.
#[derive(Clone)]
pub struct Document {
    /// Entire document as UTF-8
    pub(crate) buffer: Rope,
    /// Selection start as a byte offset
    pub(crate) anchor: usize,
    /// Caret as a byte offset
    pub(crate) active: usize,
    /// Incremented on each edit
    pub(crate) version: u64,
    /// Detected on load, used for indent/outdent and default tab
    pub(crate) indent_style: IndentStyle,
    read_only: bool,
    answers: VecDeque<Option<String>>,
    prompts_shown: Vec<String>,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let indent_style = detect_indent_style(text);
        let len = buffer.len();

        Self {
            buffer,
            anchor: len,
            active: len, // Start with cursor at end
            version: 0,
            indent_style,
            read_only: false,
            answers: VecDeque::new(),
            prompts_shown: Vec::new(),
        }
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command, carrying the selection through the edit
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = self.compile_command(&cmd);

        // Inserted regions in new-document coordinates
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in &delta.els {
            match op {
                DeltaElement::Copy(from, to) => cursor += to - from,
                DeltaElement::Insert(inserted) => {
                    changed.push(cursor..cursor + inserted.len());
                    cursor += inserted.len();
                }
            }
        }

        let mut transformer = Transformer::new(&delta);
        self.anchor = transformer.transform(self.anchor, true);
        self.active = transformer.transform(self.active, true);

        self.buffer = delta.apply(&self.buffer);
        self.version += 1;

        log::debug!(
            "applied {cmd:?}, version {} selection {:?}",
            self.version,
            self.selection_offsets()
        );

        Patch {
            changed,
            new_selection: self.selection_offsets(),
            version: self.version,
        }
    }

    /// Selection as ordered byte offsets
    pub fn selection_offsets(&self) -> std::ops::Range<usize> {
        self.anchor.min(self.active)..self.anchor.max(self.active)
    }

    /// Select a byte range, clamped to the document
    pub fn select_offsets(&mut self, selection: std::ops::Range<usize>) {
        let len = self.len();
        self.anchor = selection.start.min(len);
        self.active = selection.end.min(len);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn indent_style(&self) -> &IndentStyle {
        &self.indent_style
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Queue the text the next prompt will be answered with
    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.answers.push_back(Some(answer.into()));
    }

    /// Queue a dismissed prompt
    pub fn push_dismissal(&mut self) {
        self.answers.push_back(None);
    }

    /// Questions asked so far, in order, including re-prompts after invalid input
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn line_count(&self) -> usize {
        line_spans(&self.text()).len()
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn compile_command(&self, cmd: &Cmd) -> Delta<RopeInfo> {
        crate::editing::commands::compile_command(self, cmd)
    }

    /// Byte offset of `position`, rejecting anything past the end of its line
    pub fn offset_of(&self, position: Position) -> Result<usize, EditError> {
        let text = self.text();
        let out_of_bounds = EditError::OutOfBounds {
            line: position.line,
            character: position.character,
        };
        let line = line_spans(&text)
            .into_iter()
            .nth(position.line)
            .ok_or_else(|| out_of_bounds.clone())?;
        let offset = line.start + position.character;
        if offset > line.end || !text.is_char_boundary(offset) {
            return Err(out_of_bounds);
        }
        Ok(offset)
    }

    /// Position of a byte offset; offsets past the end clamp to the last position
    pub fn position_of(&self, offset: usize) -> Position {
        let text = self.text();
        let offset = offset.min(text.len());
        let spans = line_spans(&text);
        let line = spans
            .iter()
            .rposition(|span| span.start <= offset)
            .unwrap_or(0);
        let span = &spans[line];
        Position::new(line, offset.min(span.end) - span.start)
    }

    fn clamp_offset(&self, position: Position) -> usize {
        let text = self.text();
        let spans = line_spans(&text);
        let Some(span) = spans.get(position.line).or(spans.last()) else {
            return 0;
        };
        let mut offset = (span.start + position.character).min(span.end);
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    fn range_offsets(&self, range: Range) -> Result<std::ops::Range<usize>, EditError> {
        Ok(self.offset_of(range.start)?..self.offset_of(range.end)?)
    }

    fn ensure_writable(&self) -> Result<(), EditError> {
        if self.read_only {
            Err(EditError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn replace_selection(&mut self, text: String) -> Result<(), EditError> {
        self.ensure_writable()?;
        let range = self.selection_offsets();
        self.apply(Cmd::ReplaceRange { range, text });
        Ok(())
    }
}

impl EditorHost for Document {
    fn selection(&self) -> Selection {
        Selection::new(self.position_of(self.anchor), self.position_of(self.active))
    }

    fn set_selection(&mut self, selection: Selection) {
        self.anchor = self.clamp_offset(selection.anchor);
        self.active = self.clamp_offset(selection.active);
    }

    fn text_in_range(&self, range: Range) -> String {
        let start = self.clamp_offset(range.start);
        let end = self.clamp_offset(range.end).max(start);
        self.buffer.slice_to_cow(start..end).into_owned()
    }

    fn word_range_at(&self, position: Position, pattern: Option<&Regex>) -> Option<Range> {
        let line = self.line_text(position.line);
        let found = match pattern {
            Some(pattern) => word::find_match_at(&line, position.character, pattern),
            None => word::find_word_at(&line, position.character),
        }?;
        Some(Range::new(
            Position::new(position.line, found.start),
            Position::new(position.line, found.end),
        ))
    }

    fn replace_range(&mut self, range: Range, text: &str) -> Result<(), EditError> {
        self.ensure_writable()?;
        let range = self.range_offsets(range)?;
        self.apply(Cmd::ReplaceRange {
            range,
            text: text.to_string(),
        });
        Ok(())
    }

    fn line_text(&self, line: usize) -> String {
        let text = self.text();
        line_spans(&text)
            .into_iter()
            .nth(line)
            .map(|span| text[span].to_string())
            .unwrap_or_default()
    }

    fn line_range(&self, line: usize) -> Range {
        let length = self.line_text(line).len();
        Range::new(Position::new(line, 0), Position::new(line, length))
    }

    fn indent_lines(&mut self) -> Result<(), EditError> {
        self.ensure_writable()?;
        let range = self.selection_offsets();
        self.apply(Cmd::IndentLines { range });
        Ok(())
    }

    fn outdent_lines(&mut self) -> Result<(), EditError> {
        self.ensure_writable()?;
        let range = self.selection_offsets();
        self.apply(Cmd::OutdentLines { range });
        Ok(())
    }

    fn default_tab(&mut self) -> Result<(), EditError> {
        let unit = self.indent_style.unit();
        self.replace_selection(unit)
    }

    fn default_newline(&mut self) -> Result<(), EditError> {
        self.replace_selection("\n".to_string())
    }

    fn prompt_for_text(&mut self, options: &PromptOptions<'_>) -> Option<String> {
        loop {
            self.prompts_shown.push(options.prompt.to_string());
            let answer = self.answers.pop_front().flatten()?;
            match options.check(&answer) {
                Ok(()) => return Some(answer),
                Err(message) => log::debug!("prompt answer {answer:?} rejected: {message}"),
            }
        }
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text())
            .field("selection", &self.selection_offsets())
            .field("version", &self.version)
            .field("indent_style", &self.indent_style)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Byte spans of every line with the terminator (`\n` or `\r\n`) excluded.
///
/// Text ending in a newline has a final empty line, and empty text has one
/// empty line, matching how editors count lines.
pub(crate) fn line_spans(text: &str) -> Vec<std::ops::Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if byte == b'\n' {
            let end = if i > start && bytes[i - 1] == b'\r' {
                i - 1
            } else {
                i
            };
            spans.push(start..end);
            start = i + 1;
        }
    }
    spans.push(start..text.len());
    spans
}

/// Detect the indent style (tabs vs spaces and size) by finding the first non-zero indentation
fn detect_indent_style(text: &str) -> IndentStyle {
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('\t') {
            return IndentStyle::Tabs;
        }

        let spaces = line.chars().take_while(|&c| c == ' ').count();
        if spaces > 0 {
            return IndentStyle::Spaces(spaces);
        }
    }

    // Default to 2 spaces if we couldn't detect
    IndentStyle::Spaces(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ============ Basic document tests ============

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let text = "# Hello World\n\nThis is a test document.";
        let doc = Document::from_bytes(text.as_bytes()).expect("Should create document");

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.selection_offsets(), text.len()..text.len());
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];

        assert!(Document::from_bytes(&invalid_bytes).is_err());
    }

    #[test]
    fn test_document_with_windows_line_endings() {
        let doc = Document::from_text("Line 1\r\nLine 2");

        assert_eq!(doc.line_text(0), "Line 1");
        assert_eq!(doc.line_text(1), "Line 2");
        assert_eq!(doc.to_bytes(), b"Line 1\r\nLine 2");
    }

    // ============ Line and position mapping tests ============

    #[test]
    fn test_line_spans_trailing_newline_adds_empty_line() {
        assert_eq!(line_spans("a\nbc\n"), vec![0..1, 2..4, 5..5]);
        assert_eq!(line_spans(""), vec![0..0]);
        assert_eq!(line_spans("x\r\ny"), vec![0..1, 3..4]);
    }

    #[test]
    fn test_offset_and_position_round_trip() {
        let doc = Document::from_text("Line 1\nLine 2\nLine 3");

        assert_eq!(doc.position_of(0), Position::new(0, 0));
        assert_eq!(doc.position_of(6), Position::new(0, 6));
        assert_eq!(doc.position_of(7), Position::new(1, 0));
        assert_eq!(doc.position_of(100), Position::new(2, 6));
        assert_eq!(doc.offset_of(Position::new(1, 6)), Ok(13));
    }

    #[test]
    fn test_offset_of_rejects_positions_past_line_end() {
        let doc = Document::from_text("ab\ncd");

        assert_eq!(
            doc.offset_of(Position::new(0, 3)),
            Err(EditError::OutOfBounds {
                line: 0,
                character: 3
            })
        );
        assert!(doc.offset_of(Position::new(5, 0)).is_err());
    }

    #[test]
    fn test_offset_of_rejects_split_characters() {
        let doc = Document::from_text("é");

        assert!(doc.offset_of(Position::new(0, 1)).is_err());
        assert_eq!(doc.offset_of(Position::new(0, 2)), Ok(2));
    }

    #[test]
    fn test_set_selection_clamps_to_line() {
        let mut doc = Document::from_text("short\nline");
        doc.set_selection(Selection::caret(Position::new(0, 50)));

        assert_eq!(doc.selection(), Selection::caret(Position::new(0, 5)));
    }

    // ============ Host behaviour tests ============

    #[test]
    fn test_replace_range_on_read_only_document_is_rejected() {
        let mut doc = Document::from_text("text");
        doc.set_read_only(true);

        let result = doc.replace_range(Range::caret(Position::new(0, 0)), "x");

        assert_eq!(result, Err(EditError::ReadOnly));
        assert_eq!(doc.text(), "text");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_default_newline_replaces_selection() {
        let mut doc = Document::from_text("hello world");
        doc.set_selection(Selection::new(Position::new(0, 5), Position::new(0, 6)));

        doc.default_newline().unwrap();

        assert_eq!(doc.text(), "hello\nworld");
        assert_eq!(doc.selection(), Selection::caret(Position::new(1, 0)));
    }

    #[test]
    fn test_default_tab_inserts_indent_unit() {
        let mut doc = Document::from_text("a\n    b");
        doc.set_selection(Selection::caret(Position::new(0, 0)));

        doc.default_tab().unwrap();

        assert_eq!(doc.text(), "    a\n    b");
        assert_eq!(doc.selection(), Selection::caret(Position::new(0, 4)));
    }

    #[test]
    fn test_prompt_skips_invalid_answers() {
        let mut doc = Document::from_text("");
        doc.push_answer("nope");
        doc.push_answer("42");
        let validate = |text: &str| {
            text.parse::<u32>()
                .map(|_| ())
                .map_err(|_| "not a number".to_string())
        };
        let options = PromptOptions {
            prompt: "Number",
            value: "",
            placeholder: "",
            validate: &validate,
        };

        assert_eq!(doc.prompt_for_text(&options), Some("42".to_string()));
        assert_eq!(doc.prompts_shown(), ["Number", "Number"]);
        // Queue exhausted: the prompt counts as dismissed
        assert_eq!(doc.prompt_for_text(&options), None);
    }

    #[test]
    fn test_word_range_at_uses_default_word() {
        let doc = Document::from_text("first\nsay hello there");

        let range = doc.word_range_at(Position::new(1, 6), None);

        assert_eq!(
            range,
            Some(Range::new(Position::new(1, 4), Position::new(1, 9)))
        );
    }

    // ============ IndentStyle tests ============

    #[test]
    fn test_indent_style_outdent_len() {
        assert_eq!(IndentStyle::Spaces(2).outdent_len("    - x"), 2);
        assert_eq!(IndentStyle::Spaces(4).outdent_len("  - x"), 2);
        assert_eq!(IndentStyle::Spaces(2).outdent_len("\t- x"), 1);
        assert_eq!(IndentStyle::Tabs.outdent_len("- x"), 0);
    }

    #[test]
    fn test_detect_indent_style() {
        assert_eq!(
            detect_indent_style("- item 1\n    - nested\n"),
            IndentStyle::Spaces(4)
        );
        assert_eq!(detect_indent_style("- item 1\n\t- nested\n"), IndentStyle::Tabs);
        assert_eq!(detect_indent_style("- a\n- b\n"), IndentStyle::Spaces(2));
    }
}
