pub mod check;
pub mod completions;
pub mod languages;
pub mod parse;

use clap::{Parser, Subcommand};

/// fable - Feature specification parser
#[derive(Parser, Debug)]
#[command(name = "fable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a feature document and print its AST
    Parse(parse::ParseArgs),

    /// Check feature documents for syntax errors
    Check(check::CheckArgs),

    /// List known dialects and their keywords
    Languages(languages::LanguagesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
