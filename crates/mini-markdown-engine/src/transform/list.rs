//! List continuation on Enter and list indentation on Tab / Shift+Tab.
//!
//! Numbers in ordered lists are not rewritten when items move in or out.

use crate::editing::{EditError, EditorHost, HostAction, Range};
use crate::transform::Outcome;
use crate::transform::list_marker::{MarkerMatch, parse_list_marker};

/// What pressing Enter should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterAction {
    /// The line is only a bullet: empty it to leave the list.
    ClearLine,
    /// Start a new item with this marker on the next line.
    InsertBulletLine(String),
    /// Not a list situation; let the editor insert its newline.
    DefaultNewline,
}

/// Decides the Enter behaviour for a line, given where the selection ends on it.
pub fn plan_enter(line: &str, selection_end: usize) -> EnterAction {
    if selection_end != line.len() {
        return EnterAction::DefaultNewline;
    }

    match parse_list_marker(line) {
        MarkerMatch::NoMatch => EnterAction::DefaultNewline,
        MarkerMatch::Match(marker) if marker.matched.len() == line.len() => EnterAction::ClearLine,
        MarkerMatch::Match(marker) => EnterAction::InsertBulletLine(marker.continuation()),
    }
}

/// Tab indents list lines and falls back to the editor's tab elsewhere.
pub fn plan_tab(line: &str) -> HostAction {
    if parse_list_marker(line).is_match() {
        HostAction::IndentLines
    } else {
        HostAction::DefaultTab
    }
}

/// Shift+Tab outdents whether or not the line is a list item.
pub fn plan_shift_tab() -> HostAction {
    HostAction::OutdentLines
}

pub fn on_enter_key<H: EditorHost + ?Sized>(host: &mut H) -> Result<Outcome, EditError> {
    let selection = host.selection();
    let line_number = selection.active.line;
    let line = host.line_text(line_number);
    let line_range = host.line_range(line_number);

    match plan_enter(&line, selection.end().character) {
        EnterAction::ClearLine => {
            log::debug!("clearing empty list item on line {line_number}");
            host.replace_range(line_range, "")?;
            Ok(Outcome::Edited)
        }
        EnterAction::InsertBulletLine(marker) => {
            log::debug!("continuing list on line {line_number} with {marker:?}");
            host.replace_range(Range::caret(line_range.end), &format!("\n{marker}"))?;
            Ok(Outcome::Edited)
        }
        EnterAction::DefaultNewline => delegate(host, HostAction::DefaultNewline),
    }
}

pub fn on_tab_key<H: EditorHost + ?Sized>(host: &mut H) -> Result<Outcome, EditError> {
    let line = host.line_text(host.selection().active.line);
    delegate(host, plan_tab(&line))
}

pub fn on_shift_tab_key<H: EditorHost + ?Sized>(host: &mut H) -> Result<Outcome, EditError> {
    delegate(host, plan_shift_tab())
}

fn delegate<H: EditorHost + ?Sized>(host: &mut H, action: HostAction) -> Result<Outcome, EditError> {
    log::debug!("delegating to host: {action}");
    host.perform(action)?;
    Ok(Outcome::Delegated(action))
}
