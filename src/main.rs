use clap::Parser;
use fable::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse(args) => fable::cli::parse::run(args)?,
        Commands::Check(args) => fable::cli::check::run(args)?,
        Commands::Languages(args) => fable::cli::languages::run(args)?,
        Commands::Completions(args) => fable::cli::completions::run(args)?,
    }

    Ok(())
}
