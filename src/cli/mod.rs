//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod install;

pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use install::InstallArgs;

/// modfetch - PowerShell module installer
///
/// Install PowerShell modules straight from GitHub repositories.
#[derive(Parser, Debug)]
#[command(
    name = "modfetch",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install PowerShell modules straight from GitHub repositories",
    long_about = "modfetch downloads a branch snapshot of a GitHub repository, checks or repairs \
                  its module manifest (.psd1) and copies the module into the PowerShell module \
                  path for the chosen scope.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modfetch install acme/widget                  \x1b[90m# Install from owner/repo\x1b[0m\n   \
                  modfetch install --uri https://github.com/acme/widget/tree/dev\n   \
                  modfetch install acme/widget --scope all-users \x1b[90m# Install for all users\x1b[0m\n   \
                  modfetch cache                                \x1b[90m# Show snapshot cache statistics\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/modfetch/config.yaml)
    #[arg(long, global = true, env = "MODFETCH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a module from GitHub
    Install(InstallArgs),

    /// Manage the snapshot cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["modfetch", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["modfetch", "-v", "--config", "/tmp/mf.yaml", "cache"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mf.yaml")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["modfetch", "cache", "list", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["modfetch", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, clap_complete::Shell::Bash);
            }
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["modfetch"]).is_err());
    }
}
