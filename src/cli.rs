use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::processor::ParseMode;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Scene file to load
    #[arg(default_value = "scenes/test.scn")]
    pub input: PathBuf,
    /// Front end used to read the file
    #[arg(long, value_enum, default_value_t = ParseMode::Lines)]
    pub mode: ParseMode,
    /// Write the scene and its diagnostics as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
    /// Print the lexer's token stream
    #[arg(long)]
    pub tokens: bool,
    /// Print every parsed command
    #[arg(long)]
    pub commands: bool,
    /// Log more (-v info, -vv debug); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "info",
            _ => "debug",
        }
    }
}
