//! Temp directory layout for downloads and extracted snapshots.
//!
//! Archives are stored as `<root>/<hash>.zip` and extracted into `<root>/<hash>/`.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the temp root
pub const TEMP_DIR_ENV: &str = "MODFETCH_TEMP_DIR";

/// Subdirectory of the system temp dir used by default
const TEMP_SUBDIR: &str = "modfetch";

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path, so temp dirs are never created under the current working
/// directory (avoids repo/tmp when TMPDIR=tmp and cwd is the repo).
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Root shared by every install: `$MODFETCH_TEMP_DIR`, then the configured dir,
/// then `<system temp>/modfetch`
pub fn temp_root(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = env::var_os(TEMP_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    match configured {
        Some(dir) => dir.to_path_buf(),
        None => temp_dir_base().join(TEMP_SUBDIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_temp_dir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }

    #[test]
    #[serial]
    fn test_temp_root_uses_configured_dir() {
        // Only meaningful when the env override is not set in the test environment
        if env::var_os(TEMP_DIR_ENV).is_none() {
            let configured = Path::new("/var/tmp/mf");
            assert_eq!(temp_root(Some(configured)), configured);
            assert!(temp_root(None).ends_with(TEMP_SUBDIR));
        }
    }

    #[test]
    #[serial]
    fn test_temp_root_env_override_wins() {
        let previous = env::var_os(TEMP_DIR_ENV);
        // SAFETY: serialized with every other test touching this variable
        unsafe { env::set_var(TEMP_DIR_ENV, "/srv/modfetch-cache") };

        let root = temp_root(Some(Path::new("/var/tmp/mf")));

        match previous {
            Some(value) => unsafe { env::set_var(TEMP_DIR_ENV, value) },
            None => unsafe { env::remove_var(TEMP_DIR_ENV) },
        }
        assert_eq!(root, PathBuf::from("/srv/modfetch-cache"));
    }
}
