//! `mini-markdown edit`: a small terminal editor with the engine's commands
//! bound to keys. Table prompts are answered on the status line.

use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mini_markdown_engine::{
    Cmd, Document, EditError, EditorCommand, EditorHost, Engine, Outcome, Position, PromptOptions,
    Range, Selection,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use regex::Regex;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Asks the user for text while a command is running.
pub trait Prompter {
    fn prompt(&mut self, doc: &Document, options: &PromptOptions<'_>) -> Option<String>;
}

/// The engine's view of the editor: the buffer, plus a way to prompt.
struct TuiHost<'a, 'p> {
    doc: &'a mut Document,
    prompter: &'a mut (dyn Prompter + 'p),
}

impl EditorHost for TuiHost<'_, '_> {
    fn selection(&self) -> Selection {
        self.doc.selection()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.doc.set_selection(selection);
    }

    fn text_in_range(&self, range: Range) -> String {
        self.doc.text_in_range(range)
    }

    fn word_range_at(&self, position: Position, pattern: Option<&Regex>) -> Option<Range> {
        self.doc.word_range_at(position, pattern)
    }

    fn replace_range(&mut self, range: Range, text: &str) -> Result<(), EditError> {
        self.doc.replace_range(range, text)
    }

    fn line_text(&self, line: usize) -> String {
        self.doc.line_text(line)
    }

    fn line_range(&self, line: usize) -> Range {
        self.doc.line_range(line)
    }

    fn indent_lines(&mut self) -> Result<(), EditError> {
        self.doc.indent_lines()
    }

    fn outdent_lines(&mut self) -> Result<(), EditError> {
        self.doc.outdent_lines()
    }

    fn default_tab(&mut self) -> Result<(), EditError> {
        self.doc.default_tab()
    }

    fn default_newline(&mut self) -> Result<(), EditError> {
        self.doc.default_newline()
    }

    fn prompt_for_text(&mut self, options: &PromptOptions<'_>) -> Option<String> {
        self.prompter.prompt(&*self.doc, options)
    }

    fn is_read_only(&self) -> bool {
        self.doc.is_read_only()
    }
}

/// Input line shown in place of the status message while a prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLine {
    pub label: String,
    pub input: String,
    pub placeholder: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    Editing,
    Submitted(String),
    Dismissed,
}

impl PromptLine {
    pub fn new(options: &PromptOptions<'_>) -> Self {
        Self {
            label: options.prompt.to_string(),
            input: options.value.to_string(),
            placeholder: options.placeholder.to_string(),
            error: None,
        }
    }

    /// Enter only submits input that passes the prompt's validation.
    pub fn handle_key(&mut self, key: KeyEvent, options: &PromptOptions<'_>) -> PromptStep {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => PromptStep::Dismissed,
            KeyCode::Char('c') if ctrl => PromptStep::Dismissed,
            KeyCode::Enter => match options.check(&self.input) {
                Ok(()) => PromptStep::Submitted(self.input.clone()),
                Err(message) => {
                    self.error = Some(message);
                    PromptStep::Editing
                }
            },
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                PromptStep::Editing
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                self.error = None;
                PromptStep::Editing
            }
            _ => PromptStep::Editing,
        }
    }

    fn render(&self) -> Line<'_> {
        let mut spans = vec![Span::styled(
            format!("{}: ", self.label),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.input.is_empty() {
            spans.push(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::raw(self.input.as_str()));
        }
        if let Some(error) = &self.error {
            spans.push(Span::styled(
                format!("  {error}"),
                Style::default().fg(Color::Red),
            ));
        }
        Line::from(spans)
    }

    fn cursor_column(&self) -> usize {
        self.label.chars().count() + 2 + self.input.chars().count()
    }
}

enum StatusLine<'a> {
    Message(&'a str),
    Prompt(&'a PromptLine),
}

struct TerminalPrompter<'t> {
    terminal: &'t mut Tui,
    title: String,
}

impl Prompter for TerminalPrompter<'_> {
    fn prompt(&mut self, doc: &Document, options: &PromptOptions<'_>) -> Option<String> {
        let mut line = PromptLine::new(options);
        let title = &self.title;
        loop {
            if let Err(e) = self
                .terminal
                .draw(|f| draw(f, doc, title, StatusLine::Prompt(&line)))
            {
                log::warn!("failed to draw prompt: {e}");
                return None;
            }
            let key = match next_key() {
                Ok(key) => key,
                Err(e) => {
                    log::warn!("failed to read prompt input: {e}");
                    return None;
                }
            };
            match line.handle_key(key, options) {
                PromptStep::Editing => {}
                PromptStep::Submitted(answer) => return Some(answer),
                PromptStep::Dismissed => return None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Editor {
    path: PathBuf,
    doc: Document,
    engine: Engine,
    saved_version: u64,
    status: String,
    quit_armed: bool,
}

impl Editor {
    /// Opens `path`, or starts an empty buffer if it does not exist yet.
    pub fn open(path: &Path, engine: Engine) -> Result<Self> {
        let (mut doc, status) = match std::fs::read(path) {
            Ok(bytes) => (
                Document::from_bytes(&bytes)
                    .with_context(|| format!("{} is not valid UTF-8", path.display()))?,
                String::new(),
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (Document::from_text(""), "New file".to_string())
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        doc.set_selection(Selection::caret(Position::new(0, 0)));

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            engine,
            saved_version: 0,
            status,
            quit_armed: false,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.doc.version() != self.saved_version
    }

    pub fn title(&self) -> String {
        let marker = if self.is_dirty() { " [+]" } else { "" };
        format!("{}{marker}", self.path.display())
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.doc.to_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.saved_version = self.doc.version();
        log::info!("saved {}", self.path.display());
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent, prompter: &mut dyn Prompter) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let quitting = matches!(key.code, KeyCode::Esc)
            || (ctrl && matches!(key.code, KeyCode::Char('q')));
        if quitting {
            if !self.is_dirty() || self.quit_armed {
                return Flow::Quit;
            }
            self.quit_armed = true;
            self.status = "Unsaved changes: press again to quit, Ctrl+S to save".to_string();
            return Flow::Continue;
        }
        self.quit_armed = false;

        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.status = match self.save() {
                    Ok(()) => format!("Saved {}", self.path.display()),
                    Err(e) => format!("Save failed: {e:#}"),
                };
            }
            KeyCode::Char('e') if ctrl => self.run_command(EditorCommand::ToggleEmphasis, prompter),
            KeyCode::Char('b') if ctrl => {
                self.run_command(EditorCommand::ToggleStrongEmphasis, prompter)
            }
            KeyCode::Char('t') if ctrl => self.run_command(EditorCommand::InsertTable, prompter),
            KeyCode::Enter => self.run_command(EditorCommand::Enter, prompter),
            KeyCode::Tab => self.run_command(EditorCommand::Tab, prompter),
            KeyCode::BackTab => self.run_command(EditorCommand::ShiftTab, prompter),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.move_horizontal(false),
            KeyCode::Right => self.move_horizontal(true),
            KeyCode::Up => self.move_vertical(false),
            KeyCode::Down => self.move_vertical(true),
            KeyCode::Home => {
                let line = self.doc.selection().active.line;
                self.doc.set_selection(Selection::caret(Position::new(line, 0)));
            }
            KeyCode::End => {
                let line = self.doc.selection().active.line;
                let end = self.doc.line_range(line).end;
                self.doc.set_selection(Selection::caret(end));
            }
            KeyCode::Char(c) if !ctrl => self.insert_text(c.encode_utf8(&mut [0; 4])),
            _ => {}
        }
        Flow::Continue
    }

    fn run_command(&mut self, command: EditorCommand, prompter: &mut dyn Prompter) {
        let mut host = TuiHost {
            doc: &mut self.doc,
            prompter,
        };
        self.status = match self.engine.execute(&mut host, command) {
            Ok(Outcome::Cancelled) => format!("{} cancelled", command.alias()),
            Ok(Outcome::NoOp) => format!("Nothing to {} here", command.alias()),
            Ok(_) => String::new(),
            Err(e) => {
                log::warn!("{command} failed: {e}");
                format!("{}: {e}", command.alias())
            }
        };
    }

    fn insert_text(&mut self, text: &str) {
        let range = self.doc.selection_offsets();
        self.doc.apply(Cmd::ReplaceRange {
            range,
            text: text.to_string(),
        });
    }

    /// Deletes the selection, or the character before the caret. `\r\n` counts as one.
    fn backspace(&mut self) {
        let selected = self.doc.selection_offsets();
        let range = if selected.is_empty() {
            let text = self.doc.text();
            step_back(&text, selected.start)..selected.start
        } else {
            selected
        };
        if !range.is_empty() {
            self.doc.apply(Cmd::DeleteRange { range });
        }
    }

    fn move_horizontal(&mut self, forward: bool) {
        let selected = self.doc.selection_offsets();
        let offset = match (selected.is_empty(), forward) {
            (false, true) => selected.end,
            (false, false) => selected.start,
            (true, true) => step_forward(&self.doc.text(), selected.end),
            (true, false) => step_back(&self.doc.text(), selected.start),
        };
        self.doc.select_offsets(offset..offset);
    }

    /// Keeps the column where the target line is long enough.
    fn move_vertical(&mut self, down: bool) {
        let active = self.doc.selection().active;
        let target = if down {
            Some(active.line + 1).filter(|&line| line < self.doc.line_count())
        } else {
            active.line.checked_sub(1)
        };
        let position = match target {
            Some(line) => Position::new(line, active.character),
            None if down => self.doc.line_range(active.line).end,
            None => Position::new(0, 0),
        };
        self.doc.set_selection(Selection::caret(position));
    }
}

fn step_back(text: &str, offset: usize) -> usize {
    let before = &text[..offset];
    if before.ends_with("\r\n") {
        return offset - 2;
    }
    offset - before.chars().next_back().map_or(0, char::len_utf8)
}

fn step_forward(text: &str, offset: usize) -> usize {
    let after = &text[offset..];
    if after.starts_with("\r\n") {
        return offset + 2;
    }
    offset + after.chars().next().map_or(0, char::len_utf8)
}

/// Screen coordinate `offset` cells past `start`, kept inside a span of `len` cells.
fn cell_at(start: u16, len: u16, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    start.saturating_add(offset.min(len.saturating_sub(1)))
}

fn next_key() -> std::io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(key);
        }
    }
}

fn draw(f: &mut Frame, doc: &Document, title: &str, status: StatusLine<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Scroll just far enough to keep the caret line in view
    let height = usize::from(chunks[0].height.saturating_sub(2)).max(1);
    let caret = doc.selection().active;
    let top = (caret.line + 1).saturating_sub(height);

    let text = doc.text();
    let lines: Vec<Line> = text
        .split('\n')
        .skip(top)
        .take(height)
        .map(|line| Line::from(line.trim_end_matches('\r').to_string()))
        .collect();
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    );
    f.render_widget(body, chunks[0]);

    match status {
        StatusLine::Message(message) => {
            f.render_widget(Paragraph::new(message.to_string()), chunks[1]);
            let caret_line = doc.line_text(caret.line);
            let column = caret_line
                .get(..caret.character)
                .map_or(0, |prefix| prefix.chars().count());
            let inner = chunks[0].inner(Margin::new(1, 1));
            f.set_cursor_position((
                cell_at(inner.x, inner.width, column),
                cell_at(inner.y, inner.height, caret.line - top),
            ));
        }
        StatusLine::Prompt(prompt) => {
            f.render_widget(Paragraph::new(prompt.render()), chunks[1]);
            f.set_cursor_position((
                cell_at(chunks[1].x, chunks[1].width, prompt.cursor_column()),
                chunks[1].y,
            ));
        }
    }

    let help = Line::from(vec![
        Span::raw("Ctrl+E: Emphasis | "),
        Span::raw("Ctrl+B: Strong | "),
        Span::raw("Ctrl+T: Table | "),
        Span::raw("Ctrl+S: Save | "),
        Span::raw("Ctrl+Q/Esc: Quit"),
    ]);
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

pub fn run(path: &Path, engine: Engine) -> Result<()> {
    let mut editor = Editor::open(path, engine)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_editor(&mut terminal, &mut editor);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_editor(terminal: &mut Tui, editor: &mut Editor) -> Result<()> {
    loop {
        let title = editor.title();
        terminal.draw(|f| draw(f, &editor.doc, &title, StatusLine::Message(&editor.status)))?;

        let key = next_key()?;
        let mut prompter = TerminalPrompter {
            terminal: &mut *terminal,
            title,
        };
        if editor.handle_key(key, &mut prompter) == Flow::Quit {
            return Ok(());
        }
    }
}
