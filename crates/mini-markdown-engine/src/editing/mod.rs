/*!
 * # Editing Module
 *
 * Everything the transform engine knows about the editor it runs in.
 *
 * ## Host Abstraction
 *
 * The engine never owns a document. It talks to one through the
 * [`EditorHost`] trait: read the selection, read text in a range, find the
 * word under the caret, replace a range, and hand key presses back to the
 * host's own behaviour (indent, outdent, tab, newline). Positions, ranges and
 * selections are small `Copy` values; the engine reads them, computes new
 * ones and gives them back.
 *
 * ## Edit Before Selection
 *
 * `replace_range` returning `Ok` is the host's confirmation that the edit is
 * committed. Selection updates that depend on the edit are computed and
 * applied only after that, so they are never made against stale offsets.
 * A rejected edit leaves the selection alone.
 *
 * ## In-memory Host
 *
 * [`Document`] is a complete host backed by a single `xi_rope::Rope`:
 *
 * - all edits are [`Cmd`]s compiled to xi-rope `Delta`s
 * - the selection is carried through each delta with a `Transformer`
 * - indentation style is detected on load and used for indent/outdent/tab
 * - prompts are answered from a queue, which makes scripted use and tests easy
 *
 * ```rust
 * use mini_markdown_engine::editing::*;
 *
 * let mut doc = Document::from_bytes(b"- Item 1").unwrap();
 * doc.set_selection(Selection::caret(Position::new(0, 8)));
 *
 * doc.replace_range(Range::caret(Position::new(0, 8)), "\n- ").unwrap();
 * assert_eq!(doc.text(), "- Item 1\n- ");
 * assert_eq!(doc.selection(), Selection::caret(Position::new(1, 2)));
 * ```
 */

pub mod commands;
pub mod document;
pub mod host;
pub mod patch;
pub mod position;

pub use commands::Cmd;
pub use document::{Document, IndentStyle};
pub use host::{EditError, EditorHost, HostAction, PromptOptions, Validator};
pub use patch::Patch;
pub use position::{Position, Range, Selection};
