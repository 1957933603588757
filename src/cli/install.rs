use std::path::PathBuf;

use clap::Parser;

use crate::placement::{Edition, Scope};

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install from GitHub:\n    modfetch install acme/widget\n    \
                   modfetch install --uri https://github.com/acme/widget\n\n\
                   Install a branch:\n    modfetch install acme/widget --branch develop\n\n\
                   Install into a custom directory:\n    modfetch install acme/widget -d ./Modules\n\n\
                   Pin the version of a module without one:\n    modfetch install acme/broken --assert-version 1.2.3")]
pub struct InstallArgs {
    /// GitHub repository as owner/repo
    pub repo: Option<String>,

    /// Full GitHub project URL (https://github.com/owner/repo[/tree/<branch>])
    #[arg(long, value_name = "URL")]
    pub uri: Option<String>,

    /// Branch to download (defaults to the URL's branch, then "master")
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Module name (defaults to the repository name)
    #[arg(long, short = 'n', value_name = "MODULE")]
    pub name: Option<String>,

    /// Install for the current user or for all users
    #[arg(long, value_enum)]
    pub scope: Option<Scope>,

    /// PowerShell edition whose module path is used on Windows
    #[arg(long, value_enum)]
    pub edition: Option<Edition>,

    /// Install under this directory instead of the scope's module path
    #[arg(long, short = 'd', value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// GitHub token for private repositories
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Version to use when the manifest has to be rebuilt without one
    #[arg(long, value_name = "VERSION")]
    pub assert_version: Option<String>,

    /// Print the installed module's metadata
    #[arg(long)]
    pub show: bool,

    /// Print metadata as JSON (implies --show)
    #[arg(long)]
    pub json: bool,
}
