use std::sync::OnceLock;

use regex::Regex;

/// Bullet of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bullet {
    /// `-` or `*`
    Unordered(char),
    /// `1.`, `2.`, ...
    Ordered(u64),
}

/// The list prefix at the start of a line, e.g. `  3. [ ] `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    /// Leading whitespace before the bullet.
    pub indent: String,
    pub bullet: Bullet,
    /// Whitespace between the bullet and the checkbox or content.
    pub spacing: String,
    /// `[ ]`, `[x]` or `[X]`, exactly as written.
    pub checkbox: Option<String>,
    /// Everything the grammar matched, verbatim.
    pub matched: String,
}

/// Result of matching a line against the list grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerMatch {
    NoMatch,
    Match(ListMarker),
}

impl MarkerMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, MarkerMatch::Match(_))
    }

    pub fn marker(&self) -> Option<&ListMarker> {
        match self {
            MarkerMatch::Match(marker) => Some(marker),
            MarkerMatch::NoMatch => None,
        }
    }
}

fn list_marker_regex() -> &'static Regex {
    static LIST_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    LIST_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"^(\s*)([*-]|[0-9]+\.)(\s+)(\[[ xX]\])?").expect("Invalid list marker regex")
    })
}

/// Matches the list prefix of `line`.
///
/// The grammar is: optional indentation, a `-`/`*` bullet or a number
/// followed by `.`, at least one whitespace character, then an optional
/// checkbox. A number too large for `u64` is not a list item.
pub fn parse_list_marker(line: &str) -> MarkerMatch {
    let Some(caps) = list_marker_regex().captures(line) else {
        return MarkerMatch::NoMatch;
    };

    let bullet_text = &caps[2];
    let bullet = match bullet_text.strip_suffix('.') {
        Some(digits) => match digits.parse::<u64>() {
            Ok(n) => Bullet::Ordered(n),
            Err(_) => return MarkerMatch::NoMatch,
        },
        None => match bullet_text.chars().next() {
            Some(c) => Bullet::Unordered(c),
            None => return MarkerMatch::NoMatch,
        },
    };

    MarkerMatch::Match(ListMarker {
        indent: caps[1].to_string(),
        bullet,
        spacing: caps[3].to_string(),
        checkbox: caps.get(4).map(|m| m.as_str().to_string()),
        matched: caps[0].to_string(),
    })
}

impl ListMarker {
    /// The marker a new item following this one starts with.
    ///
    /// Unordered markers repeat verbatim. Ordered markers count up by one and
    /// keep indentation, spacing and checkbox; if the next number does not fit
    /// the marker repeats verbatim too.
    pub fn continuation(&self) -> String {
        match self.bullet {
            Bullet::Unordered(_) => self.matched.clone(),
            Bullet::Ordered(n) => match n.checked_add(1) {
                Some(next) => format!(
                    "{}{next}.{}{}",
                    self.indent,
                    self.spacing,
                    self.checkbox.as_deref().unwrap_or("")
                ),
                None => self.matched.clone(),
            },
        }
    }
}
