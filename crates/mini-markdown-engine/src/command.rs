use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::editing::{EditError, EditorHost};
use crate::transform::{
    Outcome, TablePrompt, Tag, insert_table, on_enter_key, on_shift_tab_key, on_tab_key,
    toggle_emphasis,
};

/// The commands an editor binds to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    ToggleEmphasis,
    ToggleStrongEmphasis,
    InsertTable,
    Enter,
    Tab,
    ShiftTab,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

impl EditorCommand {
    pub const ALL: [EditorCommand; 6] = [
        EditorCommand::ToggleEmphasis,
        EditorCommand::ToggleStrongEmphasis,
        EditorCommand::InsertTable,
        EditorCommand::Enter,
        EditorCommand::Tab,
        EditorCommand::ShiftTab,
    ];

    /// Identifier the command is registered under.
    pub fn id(self) -> &'static str {
        match self {
            EditorCommand::ToggleEmphasis => "miniMarkdown.toggleEmphasis",
            EditorCommand::ToggleStrongEmphasis => "miniMarkdown.toggleStrongEmphasis",
            EditorCommand::InsertTable => "miniMarkdown.insertTable",
            EditorCommand::Enter => "miniMarkdown.onEnterKey",
            EditorCommand::Tab => "miniMarkdown.onTabKey",
            EditorCommand::ShiftTab => "miniMarkdown.onShiftTabKey",
        }
    }

    /// Short name for command lines.
    pub fn alias(self) -> &'static str {
        match self {
            EditorCommand::ToggleEmphasis => "emphasis",
            EditorCommand::ToggleStrongEmphasis => "strong",
            EditorCommand::InsertTable => "table",
            EditorCommand::Enter => "enter",
            EditorCommand::Tab => "tab",
            EditorCommand::ShiftTab => "shift-tab",
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EditorCommand {
    type Err = UnknownCommand;

    /// Accepts the registered id or the short alias.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.id() == name || command.alias() == name)
            .ok_or_else(|| UnknownCommand(name.to_string()))
    }
}

/// Tags and prompt style the commands run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub emphasis: Tag,
    pub strong: Tag,
    pub table_prompt: TablePrompt,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            emphasis: Tag::emphasis(),
            strong: Tag::strong(),
            table_prompt: TablePrompt::default(),
        }
    }
}

/// Runs editor commands against a host.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Runs `command`. Read-only hosts are left alone.
    pub fn execute<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        command: EditorCommand,
    ) -> Result<Outcome, EditError> {
        if host.is_read_only() {
            log::debug!("{command} ignored: editor is read-only");
            return Ok(Outcome::Inactive);
        }

        let outcome = match command {
            EditorCommand::ToggleEmphasis => toggle_emphasis(host, &self.settings.emphasis),
            EditorCommand::ToggleStrongEmphasis => toggle_emphasis(host, &self.settings.strong),
            EditorCommand::InsertTable => insert_table(host, &self.settings.table_prompt),
            EditorCommand::Enter => on_enter_key(host),
            EditorCommand::Tab => on_tab_key(host),
            EditorCommand::ShiftTab => on_shift_tab_key(host),
        }?;
        log::debug!("{command} -> {outcome:?}");
        Ok(outcome)
    }
}
