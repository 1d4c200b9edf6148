//! Languages command implementation.
//!
//! Lists the dialect table: tags, display names, and optionally every
//! keyword set.

use std::path::PathBuf;

use clap::Args;

use crate::dialect::{loader, DialectTable};
use crate::error::Result;

/// List known dialects and their keywords
#[derive(Args, Debug)]
pub struct LanguagesArgs {
    /// Merge extra dialects from a YAML file before listing
    #[arg(long)]
    pub dialects: Option<PathBuf>,

    /// Also print the keyword sets per dialect
    #[arg(long)]
    pub keywords: bool,
}

pub fn run(args: LanguagesArgs) -> Result<()> {
    let mut table = DialectTable::builtin();
    if let Some(path) = &args.dialects {
        loader::extend_from_file(&mut table, path)?;
    }

    for (tag, dialect) in table.iter() {
        println!("{tag:8} {}", dialect.name);
        if args.keywords {
            print_keywords("feature", &dialect.feature);
            print_keywords("background", &dialect.background);
            print_keywords("scenario", &dialect.scenario);
            print_keywords("scenario outline", &dialect.scenario_outline);
            print_keywords("examples", &dialect.examples);
            let steps: Vec<String> = dialect
                .step_keywords()
                .map(|k| k.trim_end().to_string())
                .collect();
            print_keywords("steps", &steps);
        }
    }

    Ok(())
}

fn print_keywords(kind: &str, keywords: &[String]) {
    println!("         {kind}: {}", keywords.join(", "));
}
