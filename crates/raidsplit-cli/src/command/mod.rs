use clap::{Parser, Subcommand};

use self::{optimize::OptimizeArg, validate::ValidateArg};

mod optimize;
mod validate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Split a roster into raids and save the best assignment
    Optimize(#[clap(flatten)] OptimizeArg),
    /// Check a saved assignment against its roster and constraints
    Validate(#[clap(flatten)] ValidateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Optimize(arg) => optimize::run(&arg)?,
        Mode::Validate(arg) => validate::run(&arg)?,
    }
    Ok(())
}
