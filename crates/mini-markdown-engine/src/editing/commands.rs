use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::document::{Document, line_spans};

/// Low-level edits the in-memory document understands, in byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
    IndentLines {
        range: std::ops::Range<usize>,
    },
    OutdentLines {
        range: std::ops::Range<usize>,
    },
}

/// Compile a command into a delta
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let mut builder = Builder::new(doc.len());
    match cmd {
        Cmd::InsertText { at, text } => {
            builder.replace(*at..*at, Rope::from(text));
        }
        Cmd::DeleteRange { range } => {
            builder.delete(range.clone());
        }
        Cmd::ReplaceRange { range, text } => {
            builder.replace(range.clone(), Rope::from(text));
        }
        Cmd::IndentLines { range } => {
            let unit = doc.indent_style().unit();
            for line in touched_lines(&doc.text(), range) {
                builder.replace(line.start..line.start, Rope::from(unit.as_str()));
            }
        }
        Cmd::OutdentLines { range } => {
            let text = doc.text();
            for line in touched_lines(&text, range) {
                let removable = doc.indent_style().outdent_len(&text[line.clone()]);
                if removable > 0 {
                    builder.delete(line.start..line.start + removable);
                }
            }
        }
    }
    builder.build()
}

/// Lines covered by `range`. A non-empty range ending at the very start of a
/// line does not touch that line.
fn touched_lines(text: &str, range: &std::ops::Range<usize>) -> Vec<std::ops::Range<usize>> {
    line_spans(text)
        .into_iter()
        .filter(|line| {
            let ends_before = if range.is_empty() {
                range.end < line.start
            } else {
                range.end <= line.start
            };
            !ends_before && range.start <= line.end
        })
        .collect()
}
