//! Toggling emphasis tags around the word or selection under the caret.

use crate::editing::{EditError, EditorHost, Range, Selection};
use crate::transform::{Outcome, Tag};

/// Whether a toggle wraps the text in tags or strips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Add,
    Remove,
}

/// The replacement computed for a toggle, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisEdit {
    pub range: Range,
    pub text: String,
    pub toggle: Toggle,
}

/// Picks the range a toggle acts on.
///
/// In order: a tagged word touching the selection start (`_word_`), the
/// selection itself when it is not empty, then the plain word under the caret.
pub fn target_range<H: EditorHost + ?Sized>(host: &H, tag: &Tag) -> Option<Range> {
    let selection = host.selection();
    let pattern = tag.wrapped_word_pattern();

    if let Some(tagged) = host.word_range_at(selection.start(), Some(&pattern)) {
        return Some(tagged);
    }
    if !selection.is_empty() {
        return Some(selection.range());
    }
    host.word_range_at(selection.start(), None)
}

/// Strips the tag from text already wrapped in it, otherwise wraps it.
pub fn toggle_text(text: &str, tag: &Tag) -> (Toggle, String) {
    match tag.unwrap_from(text) {
        Some(inner) => (Toggle::Remove, inner.to_string()),
        None => (Toggle::Add, tag.wrap(text)),
    }
}

/// Where the selection goes once the toggle's edit is in the document.
///
/// A caret moves with the text it sat in. A selection that gained tags is
/// shifted past the leading tag so it still covers the same inner text; one
/// that lost tags keeps its start and gives up two tag lengths at the end.
pub fn adjusted_selection(selection: Selection, toggle: Toggle, tag: &Tag) -> Selection {
    let len = tag.len() as isize;

    if selection.is_empty() {
        let delta = match toggle {
            Toggle::Add => len,
            Toggle::Remove => -len,
        };
        return Selection::caret(selection.active.translate(delta));
    }

    let (start, end) = (selection.start(), selection.end());
    match toggle {
        Toggle::Add => selection.with_bounds(start.translate(len), end.translate(len)),
        Toggle::Remove => {
            let mut new_end = end.translate(-2 * len);
            if new_end < start {
                new_end = start;
            }
            selection.with_bounds(start, new_end)
        }
    }
}

/// Works out the edit without touching the document.
pub fn plan_emphasis<H: EditorHost + ?Sized>(host: &H, tag: &Tag) -> Option<EmphasisEdit> {
    let range = target_range(host, tag)?;
    let (toggle, text) = toggle_text(&host.text_in_range(range), tag);
    Some(EmphasisEdit {
        range,
        text,
        toggle,
    })
}

/// Adds or removes `tag` around the word or selection under the caret.
///
/// The selection is only moved after the host has accepted the edit.
pub fn toggle_emphasis<H: EditorHost + ?Sized>(
    host: &mut H,
    tag: &Tag,
) -> Result<Outcome, EditError> {
    let selection = host.selection();
    let Some(edit) = plan_emphasis(&*host, tag) else {
        log::debug!("no word or selection at {} for {tag}", selection.active);
        return Ok(Outcome::NoOp);
    };

    log::debug!("{:?} {tag} over {}", edit.toggle, edit.range);
    if !edit.range.is_single_line() {
        log::debug!("range spans lines; selection edges shift on their own lines");
    }
    host.replace_range(edit.range, &edit.text).inspect_err(|e| {
        log::warn!("emphasis edit over {} rejected: {e}", edit.range);
    })?;

    host.set_selection(adjusted_selection(selection, edit.toggle, tag));
    Ok(Outcome::Edited)
}
