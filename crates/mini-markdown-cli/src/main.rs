use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mini_markdown_config::Config;
use mini_markdown_engine::{EditorCommand, Engine, Position};

mod apply;
mod tui;

#[derive(Parser, Debug)]
#[command(name = "mini-markdown", version)]
#[command(about = "Markdown editing helpers: emphasis toggles, list continuation and tables", long_about = None)]
struct Args {
    /// Config file (default: ~/.config/mini-markdown/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one editor command over a file and print the result
    Apply {
        /// Markdown file to edit
        file: PathBuf,
        /// Command id or alias: emphasis, strong, table, enter, tab, shift-tab
        command: EditorCommand,
        /// Caret position, 1-based (default: end of file)
        #[arg(long, value_name = "LINE:COL", value_parser = apply::parse_position)]
        at: Option<Position>,
        /// Extend the selection from --at to here
        #[arg(long, value_name = "LINE:COL", value_parser = apply::parse_position, requires = "at")]
        to: Option<Position>,
        /// Answer for a prompt; repeat for several prompts
        #[arg(long = "answer", value_name = "TEXT")]
        answers: Vec<String>,
        /// Write the result back to FILE instead of printing it
        #[arg(short, long)]
        in_place: bool,
    },
    /// Print an empty table, e.g. `table 3x2`
    Table {
        #[arg(value_name = "COLUMNSxROWS")]
        size: String,
    },
    /// Open FILE in the terminal editor
    Edit {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Log lines would scribble over the editor's alternate screen
    let default_level = match args.command {
        Commands::Edit { .. } => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    log::info!("Mini Markdown starting...");

    let config = Config::load_or_default(args.config.as_deref()).context("loading config")?;
    let engine = Engine::new(apply::engine_settings(&config)?);

    match args.command {
        Commands::Apply {
            file,
            command,
            at,
            to,
            answers,
            in_place,
        } => apply::apply_to_file(
            &file,
            command,
            apply::Placement { at, to },
            &answers,
            in_place,
            &engine,
        ),
        Commands::Table { size } => apply::print_table(&size),
        Commands::Edit { file } => tui::run(&file, engine),
    }
}
