//! Parse command implementation.
//!
//! Parses one feature document (fail-fast) and prints its AST to stdout.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::dialect::{loader, DialectTable, DEFAULT_LANGUAGE};
use crate::error::{FableError, Result};
use crate::parser::Parser;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Parse a feature document and print its AST
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Feature document to parse
    pub file: PathBuf,

    /// Language tag for keyword matching
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Merge extra dialects from a YAML file
    #[arg(long)]
    pub dialects: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let mut table = DialectTable::builtin();
    if let Some(path) = &args.dialects {
        loader::extend_from_file(&mut table, path)?;
    }

    let source = std::fs::read_to_string(&args.file)?;
    let document = Parser::new(&table).parse(&source, &args.language)?;

    let rendered = match args.format {
        Format::Json => serde_json::to_string_pretty(&document).map_err(|e| {
            FableError::Render {
                message: e.to_string(),
            }
        })?,
        Format::Yaml => serde_yaml::to_string(&document).map_err(|e| FableError::Render {
            message: e.to_string(),
        })?,
    };
    println!("{rendered}");

    Ok(())
}
