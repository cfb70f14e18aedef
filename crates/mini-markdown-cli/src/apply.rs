//! One-shot commands: run a single editor command over a file, or print a table.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use mini_markdown_config::{Config, TablePromptStyle};
use mini_markdown_engine::{
    Document, EditorCommand, EditorHost, Engine, EngineSettings, Outcome, Position, Selection,
    TablePrompt, TableSpec, Tag, build_table,
};

/// Turns the user's config into engine settings, rejecting bad tags and sizes.
pub fn engine_settings(config: &Config) -> Result<EngineSettings> {
    let emphasis = Tag::new(config.emphasis.tag.as_str())
        .with_context(|| format!("invalid emphasis tag {:?}", config.emphasis.tag))?;
    let strong = Tag::new(config.emphasis.strong_tag.as_str())
        .with_context(|| format!("invalid strong tag {:?}", config.emphasis.strong_tag))?;

    let table_prompt = match config.table.prompt {
        TablePromptStyle::Combined => {
            config
                .table
                .default_size
                .parse::<TableSpec>()
                .with_context(|| {
                    format!("invalid default table size {:?}", config.table.default_size)
                })?;
            TablePrompt::Combined {
                default_size: config.table.default_size.clone(),
            }
        }
        TablePromptStyle::Separate => TablePrompt::Separate,
    };

    Ok(EngineSettings {
        emphasis,
        strong,
        table_prompt,
    })
}

/// Parses a 1-based `LINE:COLUMN` into a 0-based position.
pub fn parse_position(text: &str) -> Result<Position, String> {
    let (line, column) = text
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got {text:?}"))?;
    let parse = |part: &str| match part.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("expected a number from 1 up, got {part:?}")),
        Ok(n) => Ok(n - 1),
    };
    Ok(Position::new(parse(line)?, parse(column)?))
}

/// Formats a position the way `parse_position` reads it.
pub fn display_position(position: Position) -> String {
    format!("{}:{}", position.line + 1, position.character + 1)
}

/// Where the selection starts and ends before the command runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placement {
    pub at: Option<Position>,
    pub to: Option<Position>,
}

/// Runs `command` over `text` and returns the edited document.
///
/// Without `--at` the caret sits at the end of the document. `answers` are
/// given, in order, to any prompts the command raises.
pub fn run_command(
    text: &str,
    command: EditorCommand,
    placement: Placement,
    answers: &[String],
    engine: &Engine,
) -> Result<(Document, Outcome)> {
    let mut doc = Document::from_text(text);

    if let Some(at) = placement.at {
        let to = placement.to.unwrap_or(at);
        for position in [at, to] {
            doc.offset_of(position)
                .with_context(|| format!("{} is not in the file", display_position(position)))?;
        }
        doc.set_selection(Selection::new(at, to));
    } else if placement.to.is_some() {
        return Err(anyhow!("--to needs --at"));
    }

    for answer in answers {
        doc.push_answer(answer.as_str());
    }

    let outcome = engine
        .execute(&mut doc, command)
        .with_context(|| format!("{command} failed"))?;
    Ok((doc, outcome))
}

pub fn apply_to_file(
    file: &Path,
    command: EditorCommand,
    placement: Placement,
    answers: &[String],
    in_place: bool,
    engine: &Engine,
) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("{} is not valid UTF-8", file.display()))?;

    let (doc, outcome) = run_command(text, command, placement, answers, engine)?;
    let selection = doc.selection();

    if in_place {
        if doc.version() > 0 {
            std::fs::write(file, doc.to_bytes())
                .with_context(|| format!("writing {}", file.display()))?;
        }
    } else {
        print!("{}", doc.text());
    }

    eprintln!(
        "{}: {} (selection {}-{})",
        command.alias(),
        describe(outcome),
        display_position(selection.anchor),
        display_position(selection.active)
    );
    Ok(())
}

pub fn print_table(size: &str) -> Result<()> {
    let spec: TableSpec = size
        .parse()
        .with_context(|| format!("invalid table size {size:?}"))?;
    println!("{}", build_table(&spec));
    Ok(())
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Edited => "edited".to_string(),
        Outcome::Delegated(action) => format!("delegated to {action}"),
        Outcome::NoOp => "nothing to do".to_string(),
        Outcome::Cancelled => "cancelled".to_string(),
        Outcome::Inactive => "inactive".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mini_markdown_config::{EmphasisConfig, TableConfig};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1:1", Ok(Position::new(0, 0)))]
    #[case("3:7", Ok(Position::new(2, 6)))]
    #[case("0:1", Err(()))]
    #[case("2", Err(()))]
    #[case("a:b", Err(()))]
    fn parses_one_based_positions(#[case] input: &str, #[case] expected: Result<Position, ()>) {
        assert_eq!(parse_position(input).map_err(|_| ()), expected);
    }

    #[test]
    fn default_config_gives_default_settings() {
        let settings = engine_settings(&Config::default()).unwrap();

        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn rejects_blank_tag_in_config() {
        let config = Config {
            emphasis: EmphasisConfig {
                tag: " ".to_string(),
                ..EmphasisConfig::default()
            },
            ..Config::default()
        };

        let err = engine_settings(&config).unwrap_err();

        assert!(err.to_string().contains("invalid emphasis tag"));
    }

    #[test]
    fn rejects_bad_default_table_size() {
        let config = Config {
            table: TableConfig {
                default_size: "big".to_string(),
                ..TableConfig::default()
            },
            ..Config::default()
        };

        assert!(engine_settings(&config).is_err());
    }

    #[test]
    fn runs_enter_at_given_position() {
        let placement = Placement {
            at: Some(Position::new(0, 6)),
            to: None,
        };

        let (doc, outcome) = run_command(
            "- item\nafter",
            EditorCommand::Enter,
            placement,
            &[],
            &Engine::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Edited);
        assert_eq!(doc.text(), "- item\n- \nafter");
    }

    #[test]
    fn answers_feed_the_table_prompt() {
        let (doc, outcome) = run_command(
            "# T",
            EditorCommand::InsertTable,
            Placement::default(),
            &["nope".to_string(), "1x1".to_string()],
            &Engine::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Edited);
        assert_eq!(doc.text(), "# T\n| Col 1 |\n| ----- |\n");
    }

    #[test]
    fn no_answers_cancels_the_table() {
        let (doc, outcome) = run_command(
            "# T",
            EditorCommand::InsertTable,
            Placement::default(),
            &[],
            &Engine::default(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(doc.text(), "# T");
    }

    #[test]
    fn position_outside_file_is_an_error() {
        let placement = Placement {
            at: Some(Position::new(4, 0)),
            to: None,
        };

        let err = run_command("one line", EditorCommand::Tab, placement, &[], &Engine::default())
            .unwrap_err();

        assert!(err.to_string().contains("5:1"));
    }

    #[test]
    fn in_place_writes_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "say hello").unwrap();
        let placement = Placement {
            at: Some(Position::new(0, 5)),
            to: None,
        };

        apply_to_file(
            &file,
            EditorCommand::ToggleStrongEmphasis,
            placement,
            &[],
            true,
            &Engine::default(),
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "say **hello**");
    }
}
