//! Cache command implementation

use std::path::{Path, PathBuf};

use crate::cache;
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::error::Result;
use crate::hash::HASH_PREFIX;

pub fn run(config_path: Option<PathBuf>, args: CacheArgs) -> Result<()> {
    let root = super::load_config(config_path.as_deref())?.temp_root;

    // Handle subcommands
    if let Some(command) = args.command {
        match command {
            CacheSubcommand::List => {
                list_cached_snapshots(&root)?;
                return Ok(());
            }
            CacheSubcommand::Clear(clear_args) => {
                if let Some(prefix) = clear_args.only {
                    clean_matching_snapshots(&root, &prefix)?;
                } else {
                    clean_all_cache(&root)?;
                }
                return Ok(());
            }
        }
    }

    // Default: show only cache statistics
    show_cache_stats(&root)?;

    Ok(())
}

fn print_stats(root: &Path) -> Result<usize> {
    let stats = cache::cache_stats(root)?;

    println!("Cache Statistics:");
    println!("  Location: {}", root.display());
    println!("  Snapshots: {}", stats.snapshots);
    println!("  Leftover archives: {}", stats.archives);
    println!("  Size: {}", stats.formatted_size());

    Ok(stats.snapshots)
}

fn show_cache_stats(root: &Path) -> Result<()> {
    if print_stats(root)? == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'modfetch cache list' to list cached snapshots.");
        println!("Run 'modfetch cache clear' to remove everything from cache.");
        println!("Run 'modfetch cache clear --only <hash>' to remove a specific snapshot.");
    }

    Ok(())
}

fn list_cached_snapshots(root: &Path) -> Result<()> {
    // Show the same statistics header as `modfetch cache` before listing
    print_stats(root)?;
    println!();

    let snapshots = cache::list_snapshots(root)?;

    if snapshots.is_empty() {
        println!("No cached snapshots.");
        return Ok(());
    }

    println!("Cached snapshots ({}):", snapshots.len());
    for snapshot in &snapshots {
        let mut parts = Vec::new();
        if snapshot.extracted {
            parts.push("extracted");
        }
        if snapshot.archive {
            parts.push("archive");
        }
        println!(
            "  {}{} ({}, {})",
            HASH_PREFIX,
            snapshot.hash,
            parts.join(" + "),
            snapshot.formatted_size()
        );
    }

    Ok(())
}

fn clean_all_cache(root: &Path) -> Result<()> {
    let removed = cache::clear_cache(root)?;
    println!(
        "Cache cleared successfully ({} snapshot{} removed).",
        removed,
        if removed == 1 { "" } else { "s" }
    );
    Ok(())
}

fn clean_matching_snapshots(root: &Path, prefix: &str) -> Result<()> {
    let removed = cache::remove_snapshots(root, prefix)?;
    println!(
        "Removed {} cached snapshot{} matching {}",
        removed,
        if removed == 1 { "" } else { "s" },
        prefix
    );
    Ok(())
}
