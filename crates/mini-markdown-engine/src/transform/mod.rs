//! The text transforms behind each editor command.
//!
//! Each transform reads what it needs through [`EditorHost`], works out the
//! replacement, and either applies it or hands the key back to the host.
//! "Nothing to do" is an [`Outcome`], never an error; errors only come from
//! the host refusing an edit.
//!
//! [`EditorHost`]: crate::editing::EditorHost

pub mod emphasis;
pub mod list;
pub mod list_marker;
pub mod table;
pub mod tag;
pub mod word;

pub use emphasis::{EmphasisEdit, Toggle, toggle_emphasis};
pub use list::{EnterAction, on_enter_key, on_shift_tab_key, on_tab_key, plan_enter, plan_tab};
pub use list_marker::{Bullet, ListMarker, MarkerMatch, parse_list_marker};
pub use table::{
    MAX_TABLE_CELLS, TablePrompt, TableSizeError, TableSpec, build_table, insert_table,
};
pub use tag::{Tag, TagError};

use crate::editing::HostAction;

/// What a command ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The engine changed the text.
    Edited,
    /// The key was handed to the host's built-in behaviour.
    Delegated(HostAction),
    /// Nothing applicable under the caret.
    NoOp,
    /// The user dismissed a prompt.
    Cancelled,
    /// The editor is read-only, so the command does not apply.
    Inactive,
}
