use std::fmt;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("emphasis tag must not be empty")]
    Empty,

    #[error("emphasis tag {0:?} must not contain whitespace")]
    Whitespace(String),
}

/// A symmetric emphasis marker, written identically before and after the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Result<Self, TagError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(TagError::Empty);
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(TagError::Whitespace(tag));
        }
        Ok(Self(tag))
    }

    /// `_`
    pub fn emphasis() -> Self {
        Self("_".to_string())
    }

    /// `**`
    pub fn strong() -> Self {
        Self("**".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pattern for a word already wrapped in this tag, e.g. `\*\*[-\w]*\*\*`.
    pub fn wrapped_word_pattern(&self) -> Regex {
        let escaped = regex::escape(&self.0);
        Regex::new(&format!("{escaped}[-\\w]*{escaped}"))
            .expect("escaped tag always forms a valid pattern")
    }

    /// Whether `text` is this tag, some text, and this tag again.
    pub fn wraps(&self, text: &str) -> bool {
        text.len() >= 2 * self.len() && text.starts_with(&self.0) && text.ends_with(&self.0)
    }

    pub fn wrap(&self, text: &str) -> String {
        format!("{tag}{text}{tag}", tag = self.0)
    }

    /// Strips one leading and one trailing occurrence, if both are there.
    pub fn unwrap_from<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.wraps(text) {
            Some(&text[self.len()..text.len() - self.len()])
        } else {
            None
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
