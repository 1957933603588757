//! Mark-of-the-web for downloaded archives
//!
//! On Windows a downloaded file carries a `Zone.Identifier` alternate data
//! stream so the OS treats its contents as coming from the internet. Other
//! platforms have no equivalent and this is a no-op there.

use std::path::Path;

use crate::error::Result;

#[cfg(windows)]
const ZONE_IDENTIFIER: &str = "[ZoneTransfer]\r\nZoneId=3\r\n";

/// Tag `path` as downloaded from the internet
#[cfg(windows)]
pub fn mark_downloaded(path: &Path, referrer: &str) -> Result<()> {
    let mut stream = path.as_os_str().to_os_string();
    stream.push(":Zone.Identifier");
    let stream = std::path::PathBuf::from(stream);

    let content = format!("{ZONE_IDENTIFIER}HostUrl={referrer}\r\n");
    std::fs::write(&stream, content).map_err(|e| crate::error::fs::write_error(&stream, e))?;
    tracing::debug!(path = %path.display(), "marked archive as downloaded");
    Ok(())
}

/// Tag `path` as downloaded from the internet
#[cfg(not(windows))]
pub fn mark_downloaded(_path: &Path, _referrer: &str) -> Result<()> {
    Ok(())
}
