mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use dotprops::LineEnding;

#[derive(Parser)]
#[command(name = "dotprops", version, about = "Read, edit and convert .properties files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reprint a file in canonical form
    Fmt {
        file: PathBuf,
        /// Line ending written after every entry (cr, nl or crnl)
        #[arg(long = "line-ending", default_value_t = LineEnding::Nl)]
        line_ending: LineEnding,
        /// Rewrite the file instead of printing to stdout
        #[arg(long = "in-place")]
        in_place: bool,
    },
    /// Print entries through the indenting tree printer
    Tree {
        file: PathBuf,
        /// Spaces per indentation level
        #[arg(long = "indent", default_value_t = 2)]
        indent: usize,
    },
    /// Print the raw value of one key
    Get { file: PathBuf, key: String },
    /// Set one key and rewrite the file canonically
    Set {
        file: PathBuf,
        key: String,
        value: String,
        #[arg(long = "line-ending", default_value_t = LineEnding::Nl)]
        line_ending: LineEnding,
    },
    /// Remove one key and rewrite the file canonically
    Remove {
        file: PathBuf,
        key: String,
        #[arg(long = "line-ending", default_value_t = LineEnding::Nl)]
        line_ending: LineEnding,
    },
    /// List keys in path order
    Keys {
        file: PathBuf,
        /// Only keys at or below this path
        #[arg(long = "prefix")]
        prefix: Option<String>,
    },
    /// Print a file as a flat JSON object
    ToJson {
        file: PathBuf,
        #[arg(long = "pretty")]
        pretty: bool,
    },
    /// Print a flat JSON object file as .properties text
    FromJson {
        file: PathBuf,
        #[arg(long = "line-ending", default_value_t = LineEnding::Nl)]
        line_ending: LineEnding,
    },
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fmt {
            file,
            line_ending,
            in_place,
        } => commands::cmd_fmt(&file, line_ending, in_place),
        Command::Tree { file, indent } => commands::cmd_tree(&file, indent),
        Command::Get { file, key } => commands::cmd_get(&file, &key),
        Command::Set {
            file,
            key,
            value,
            line_ending,
        } => commands::cmd_set(&file, &key, &value, line_ending),
        Command::Remove {
            file,
            key,
            line_ending,
        } => commands::cmd_remove(&file, &key, line_ending),
        Command::Keys { file, prefix } => commands::cmd_keys(&file, prefix.as_deref()),
        Command::ToJson { file, pretty } => commands::cmd_to_json(&file, pretty),
        Command::FromJson { file, line_ending } => commands::cmd_from_json(&file, line_ending),
    }
}
