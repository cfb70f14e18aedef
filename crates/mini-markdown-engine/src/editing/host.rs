use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::editing::{Position, Range, Selection};

/// Reasons a host refuses an edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("document is read-only")]
    ReadOnly,

    #[error("position {line}:{character} is outside the document")]
    OutOfBounds { line: usize, character: usize },

    #[error("edit rejected by host: {0}")]
    Rejected(String),
}

/// Built-in editor behaviour the engine can hand a key press back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    IndentLines,
    OutdentLines,
    DefaultTab,
    DefaultNewline,
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostAction::IndentLines => "indent lines",
            HostAction::OutdentLines => "outdent lines",
            HostAction::DefaultTab => "default tab",
            HostAction::DefaultNewline => "default newline",
        };
        f.write_str(name)
    }
}

/// Validation callback for a prompt: `Err(message)` keeps the prompt open.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// What to show the user when the engine needs a value typed in.
pub struct PromptOptions<'a> {
    /// Question shown above the input.
    pub prompt: &'a str,
    /// Text pre-filled in the input.
    pub value: &'a str,
    /// Hint shown while the input is empty.
    pub placeholder: &'a str,
    pub validate: Validator<'a>,
}

impl PromptOptions<'_> {
    pub fn check(&self, input: &str) -> Result<(), String> {
        (self.validate)(input)
    }
}

impl fmt::Debug for PromptOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptOptions")
            .field("prompt", &self.prompt)
            .field("value", &self.value)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

/// Everything the transform engine needs from the editor it runs in.
///
/// Implemented by [`crate::Document`] for in-memory use and by front ends
/// that embed the engine. `replace_range` returning `Ok` is the host's
/// confirmation that the edit is committed; the engine only moves the
/// selection after that.
pub trait EditorHost {
    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    fn text_in_range(&self, range: Range) -> String;

    /// Range of the word under `position`, or of the match of `pattern` covering it.
    ///
    /// With no pattern the host uses its own notion of a word.
    fn word_range_at(&self, position: Position, pattern: Option<&Regex>) -> Option<Range>;

    fn replace_range(&mut self, range: Range, text: &str) -> Result<(), EditError>;

    /// Text of `line` without its terminator.
    fn line_text(&self, line: usize) -> String;

    /// Range of `line`, excluding its terminator.
    fn line_range(&self, line: usize) -> Range;

    fn indent_lines(&mut self) -> Result<(), EditError>;

    fn outdent_lines(&mut self) -> Result<(), EditError>;

    fn default_tab(&mut self) -> Result<(), EditError>;

    fn default_newline(&mut self) -> Result<(), EditError>;

    /// Ask the user for a value. `None` means the prompt was dismissed.
    fn prompt_for_text(&mut self, options: &PromptOptions<'_>) -> Option<String>;

    fn is_read_only(&self) -> bool {
        false
    }

    /// Runs one of the built-in behaviours.
    fn perform(&mut self, action: HostAction) -> Result<(), EditError> {
        match action {
            HostAction::IndentLines => self.indent_lines(),
            HostAction::OutdentLines => self.outdent_lines(),
            HostAction::DefaultTab => self.default_tab(),
            HostAction::DefaultNewline => self.default_newline(),
        }
    }
}
