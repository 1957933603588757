use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    modfetch cache\n\n\
                  List cached snapshots:\n    modfetch cache list\n\n\
                  Clear all cached snapshots:\n    modfetch cache clear\n\n\
                  Remove specific snapshot:\n    modfetch cache clear --only blake3:3fa9c1")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached snapshots
    List,

    /// Clear cached snapshots
    Clear(ClearCacheArgs),
}

/// Arguments for cache clear command
#[derive(Parser, Debug)]
pub struct ClearCacheArgs {
    /// Remove only snapshots whose hash starts with this prefix
    #[arg(long, value_name = "HASH")]
    pub only: Option<String>,
}
