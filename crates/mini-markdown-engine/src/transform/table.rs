//! Generating empty Markdown tables and inserting them below the caret.
//!
//! ```text
//! | Col 1 | Col 2 | Col 3 |
//! | ----- | ----- | ----- |
//! | x | x | x |
//! ```

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::editing::{EditError, EditorHost, PromptOptions, Range};
use crate::transform::Outcome;

pub const DEFAULT_TABLE_SIZE: &str = "2x3";

/// Largest table accepted, counted in cells (`columns * rows`).
pub const MAX_TABLE_CELLS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableSizeError {
    #[error("Incorrect table size, expected format: COLUMNSxROWS")]
    Format,

    #[error("Expected a whole number")]
    NotANumber,

    #[error("A table needs at least one column")]
    NoColumns,

    #[error("Table too large, at most {} cells", MAX_TABLE_CELLS)]
    TooLarge,
}

/// Dimensions of a table. `rows` counts the header, so a table with
/// `rows <= 1` has no body rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub columns: usize,
    pub rows: usize,
}

impl TableSpec {
    pub fn new(columns: usize, rows: usize) -> Result<Self, TableSizeError> {
        if columns == 0 {
            return Err(TableSizeError::NoColumns);
        }
        match columns.checked_mul(rows) {
            Some(cells) if cells <= MAX_TABLE_CELLS => Ok(Self { columns, rows }),
            _ => Err(TableSizeError::TooLarge),
        }
    }
}

fn table_size_regex() -> &'static Regex {
    static TABLE_SIZE_REGEX: OnceLock<Regex> = OnceLock::new();
    TABLE_SIZE_REGEX
        .get_or_init(|| Regex::new(r"(?i)^([0-9]+)x([0-9]+)$").expect("Invalid table size regex"))
}

fn parse_count(text: &str) -> Result<usize, TableSizeError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TableSizeError::NotANumber);
    }
    text.parse().map_err(|_| TableSizeError::NotANumber)
}

impl FromStr for TableSpec {
    type Err = TableSizeError;

    /// Parses `COLUMNSxROWS`, e.g. `3x2` or `3X2`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let caps = table_size_regex()
            .captures(text)
            .ok_or(TableSizeError::Format)?;
        let columns = caps[1].parse().map_err(|_| TableSizeError::Format)?;
        let rows = caps[2].parse().map_err(|_| TableSizeError::Format)?;
        Self::new(columns, rows)
    }
}

fn table_row(columns: usize, cell: impl Fn(usize) -> String) -> String {
    (0..columns).map(cell).collect::<Vec<_>>().join(" | ")
}

/// Renders the Markdown for `spec`: a numbered header, a separator and
/// `rows - 1` body rows of `x` placeholders.
pub fn build_table(spec: &TableSpec) -> String {
    let mut lines = vec![
        table_row(spec.columns, |column| format!("Col {}", column + 1)),
        table_row(spec.columns, |_| "-----".to_string()),
    ];
    let body = table_row(spec.columns, |_| "x".to_string());
    lines.extend(std::iter::repeat_n(body, spec.rows.saturating_sub(1)));

    format!("| {} |", lines.join(" |\n| "))
}

/// How the table dimensions are asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablePrompt {
    /// One `COLUMNSxROWS` prompt pre-filled with `default_size`.
    Combined { default_size: String },
    /// A prompt for columns, then one for rows.
    Separate,
}

impl Default for TablePrompt {
    fn default() -> Self {
        TablePrompt::Combined {
            default_size: DEFAULT_TABLE_SIZE.to_string(),
        }
    }
}

/// Asks the user for the table size. `None` if any prompt is dismissed.
pub fn ask_table_spec<H: EditorHost + ?Sized>(host: &mut H, style: &TablePrompt) -> Option<TableSpec> {
    match style {
        TablePrompt::Combined { default_size } => {
            let validate = |text: &str| {
                text.parse::<TableSpec>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            };
            let answer = host.prompt_for_text(&PromptOptions {
                prompt: "Table size",
                value: default_size,
                placeholder: "Choose table size: COLUMNSxROWS",
                validate: &validate,
            })?;
            answer.parse().ok()
        }
        TablePrompt::Separate => {
            let validate_columns = |text: &str| {
                parse_count(text)
                    .and_then(|columns| TableSpec::new(columns, 1))
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            };
            let columns = host.prompt_for_text(&PromptOptions {
                prompt: "Number of columns",
                value: "2",
                placeholder: "Columns",
                validate: &validate_columns,
            })?;
            let columns = parse_count(&columns).ok()?;

            let validate_rows = |text: &str| {
                let rows = parse_count(text).map_err(|e| e.to_string())?;
                TableSpec::new(columns, rows)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            };
            let rows = host.prompt_for_text(&PromptOptions {
                prompt: "Number of rows",
                value: "3",
                placeholder: "Rows",
                validate: &validate_rows,
            })?;
            TableSpec::new(columns, parse_count(&rows).ok()?).ok()
        }
    }
}

/// Asks for a size and inserts the table on its own lines after the caret's line.
pub fn insert_table<H: EditorHost + ?Sized>(
    host: &mut H,
    style: &TablePrompt,
) -> Result<Outcome, EditError> {
    let Some(spec) = ask_table_spec(host, style) else {
        log::debug!("table prompt dismissed");
        return Ok(Outcome::Cancelled);
    };

    let line_end = host.line_range(host.selection().active.line).end;
    let table = build_table(&spec);
    log::debug!(
        "inserting {}x{} table after line {}",
        spec.columns,
        spec.rows,
        line_end.line
    );
    host.replace_range(Range::caret(line_end), &format!("\n{table}\n"))?;
    Ok(Outcome::Edited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Document, Position, Selection};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn three_by_two_has_one_body_row() {
        let table = build_table(&TableSpec::new(3, 2).unwrap());

        assert_eq!(
            table,
            "| Col 1 | Col 2 | Col 3 |\n| ----- | ----- | ----- |\n| x | x | x |"
        );
    }

    #[test]
    fn zero_rows_is_header_only() {
        let table = build_table(&TableSpec::new(2, 0).unwrap());

        assert_eq!(table, "| Col 1 | Col 2 |\n| ----- | ----- |");
    }

    #[test]
    fn default_size_table() {
        let table = build_table(&DEFAULT_TABLE_SIZE.parse().unwrap());

        insta::assert_snapshot!(table, @r"
        | Col 1 | Col 2 |
        | ----- | ----- |
        | x | x |
        | x | x |
        ");
    }

    #[rstest]
    #[case("3x2", Ok(TableSpec { columns: 3, rows: 2 }))]
    #[case("3X2", Ok(TableSpec { columns: 3, rows: 2 }))]
    #[case("1x0", Ok(TableSpec { columns: 1, rows: 0 }))]
    #[case("0x3", Err(TableSizeError::NoColumns))]
    #[case("3 x 2", Err(TableSizeError::Format))]
    #[case("3x", Err(TableSizeError::Format))]
    #[case("x", Err(TableSizeError::Format))]
    #[case("99999999999999999999999x1", Err(TableSizeError::Format))]
    #[case("1x100000000000", Err(TableSizeError::TooLarge))]
    #[case("100x101", Err(TableSizeError::TooLarge))]
    #[case("100x100", Ok(TableSpec { columns: 100, rows: 100 }))]
    fn parses_table_sizes(#[case] input: &str, #[case] expected: Result<TableSpec, TableSizeError>) {
        assert_eq!(input.parse::<TableSpec>(), expected);
    }

    fn doc_at(text: &str, line: usize, character: usize) -> Document {
        let mut doc = Document::from_text(text);
        doc.set_selection(Selection::caret(Position::new(line, character)));
        doc
    }

    #[test]
    fn inserts_table_after_current_line() {
        let mut doc = doc_at("Intro text\nAfter", 0, 3);
        doc.push_answer("2x2");

        let outcome = insert_table(&mut doc, &TablePrompt::default()).unwrap();

        assert_eq!(outcome, Outcome::Edited);
        assert_eq!(
            doc.text(),
            "Intro text\n| Col 1 | Col 2 |\n| ----- | ----- |\n| x | x |\n\nAfter"
        );
        assert_eq!(doc.selection(), Selection::caret(Position::new(0, 3)));
    }

    #[test]
    fn invalid_size_is_asked_again() {
        let mut doc = doc_at("", 0, 0);
        doc.push_answer("three by two");
        doc.push_answer("1x1");

        insert_table(&mut doc, &TablePrompt::default()).unwrap();

        assert_eq!(doc.prompts_shown().len(), 2);
        assert_eq!(doc.text(), "\n| Col 1 |\n| ----- |\n");
    }

    #[test]
    fn dismissed_prompt_makes_no_edit() {
        let mut doc = doc_at("keep", 0, 0);
        doc.push_dismissal();

        let outcome = insert_table(&mut doc, &TablePrompt::default()).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(doc.text(), "keep");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn separate_prompts_ask_columns_then_rows() {
        let mut doc = doc_at("", 0, 0);
        doc.push_answer("0");
        doc.push_answer("2");
        doc.push_answer("1");

        insert_table(&mut doc, &TablePrompt::Separate).unwrap();

        assert_eq!(
            doc.prompts_shown(),
            ["Number of columns", "Number of columns", "Number of rows"]
        );
        assert_eq!(doc.text(), "\n| Col 1 | Col 2 |\n| ----- | ----- |\n");
    }

    #[test]
    fn oversized_table_is_asked_again() {
        let mut doc = doc_at("", 0, 0);
        doc.push_answer("1x100000000000");
        doc.push_answer("1x1");

        let outcome = insert_table(&mut doc, &TablePrompt::default()).unwrap();

        assert_eq!(outcome, Outcome::Edited);
        assert_eq!(doc.prompts_shown(), ["Table size", "Table size"]);
        assert_eq!(doc.text(), "\n| Col 1 |\n| ----- |\n");
    }

    #[test]
    fn separate_prompts_reject_oversized_rows() {
        let mut doc = doc_at("", 0, 0);
        doc.push_answer("200");
        doc.push_answer("51");
        doc.push_answer("1");

        insert_table(&mut doc, &TablePrompt::Separate).unwrap();

        assert_eq!(
            doc.prompts_shown(),
            ["Number of columns", "Number of rows", "Number of rows"]
        );
        assert!(doc.text().starts_with("\n| Col 1 | Col 2 |"));
        assert_eq!(doc.line_count(), 4);
    }

    #[test]
    fn too_large_error_names_the_limit() {
        assert_eq!(
            TableSizeError::TooLarge.to_string(),
            "Table too large, at most 10000 cells"
        );
    }

    #[test]
    fn dismissing_second_prompt_cancels() {
        let mut doc = doc_at("", 0, 0);
        doc.push_answer("2");
        doc.push_dismissal();

        let outcome = insert_table(&mut doc, &TablePrompt::Separate).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(doc.text(), "");
    }
}
