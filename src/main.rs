//! modfetch - PowerShell module installer
//!
//! Downloads a branch snapshot of a GitHub repository, validates or repairs
//! its module manifest and copies the module into the PowerShell module path.

use clap::Parser;

mod acquisition;
mod cache;
mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod logging;
mod manifest;
mod pipeline;
mod placement;
mod source;
mod temp;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.config, args),
        Commands::Cache(args) => commands::cache::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
