//! Check command implementation.
//!
//! Runs the parser in collect-all mode over files and directories and
//! reports every syntax fault found, one line per fault, in the exact
//! `(line:column): message` form.

use std::path::PathBuf;

use clap::Args;

use crate::dialect::{loader, DialectTable, DEFAULT_LANGUAGE};
use crate::discovery::discover_features;
use crate::error::{FableError, Result};
use crate::output::{plural, Printer};
use crate::parser::Parser;

/// Check feature documents for syntax errors
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Language tag for keyword matching
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Merge extra dialects from a YAML file
    #[arg(long)]
    pub dialects: Option<PathBuf>,

    /// Stop at the first fault in each file instead of collecting all
    #[arg(long)]
    pub fail_fast: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let printer = Printer::new();

    let mut table = DialectTable::builtin();
    if let Some(path) = &args.dialects {
        loader::extend_from_file(&mut table, path)?;
    }

    let files = discover_features(&args.paths);
    if files.is_empty() {
        return Err(FableError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no feature files found",
        )));
    }

    let parser = Parser::new(&table);
    let mut failures = 0usize;
    let mut faults = 0usize;

    for file in &files {
        let source = std::fs::read_to_string(file)?;
        let result = if args.fail_fast {
            parser.parse(&source, &args.language)
        } else {
            parser.parse_collecting(&source, &args.language)
        };

        match result {
            Ok(_) => printer.status("Checked", &file.display().to_string()),
            Err(error) => {
                failures += 1;
                let children = error.flatten();
                faults += children.len();
                printer.error("Failed", &printer.cyan(&file.display().to_string()));
                for child in children {
                    eprintln!("{:>12} {}", "", child);
                }
            }
        }
    }

    if failures > 0 {
        printer.error(
            "Finished",
            &format!(
                "{} with {}",
                plural(failures, "failing file", "failing files"),
                plural(faults, "error", "errors")
            ),
        );
        Err(FableError::CheckFailed {
            failures,
            checked: files.len(),
        })
    } else {
        printer.status("Finished", &format!("{} ok", plural(files.len(), "file", "files")));
        Ok(())
    }
}
