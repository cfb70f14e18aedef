use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// A run of letters, digits and underscores.
fn default_word() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(r"\w+").expect("Invalid word regex"))
}

/// First non-empty match of `pattern` in `line` that touches `character`.
///
/// A match touches the column when `start <= character <= end`, so a caret
/// sitting just before or just after a word still picks it up.
pub fn find_match_at(line: &str, character: usize, pattern: &Regex) -> Option<Range<usize>> {
    pattern
        .find_iter(line)
        .filter(|found| !found.is_empty())
        .find(|found| found.start() <= character && character <= found.end())
        .map(|found| found.range())
}

/// The default word under `character`.
pub fn find_word_at(line: &str, character: usize) -> Option<Range<usize>> {
    find_match_at(line, character, default_word())
}
