use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

pub mod config;
pub mod errors;
pub mod logger;

use errors::DirectoryError;

/// Get the location of the config directory for mviz.
///
/// e.g. `~/.config/mviz` on linux.
///
/// # Errors
///
/// Fails if no home directory can be found for the current user.
#[inline]
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from("", "", "mviz")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Expand a leading `~` in `path` to the user's home directory.
#[must_use]
#[inline]
pub fn expand_path(path: &Path) -> PathBuf {
    shellexpand::tilde(&path.to_string_lossy())
        .into_owned()
        .into()
}

/// A `file://` URI for `path`, made absolute against the current directory.
///
/// Bytes outside of the unreserved set (and `/`) are percent-encoded.
///
/// # Errors
///
/// Fails if `path` is relative and the current directory can't be read.
#[inline]
pub fn file_uri(path: &Path) -> io::Result<String> {
    let absolute = std::path::absolute(expand_path(path))?;
    let mut uri = String::from("file://");
    for byte in absolute.to_string_lossy().bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                uri.push(char::from(byte));
            }
            _ => uri.push_str(&format!("%{byte:02X}")),
        }
    }
    Ok(uri)
}

/// Format a duration as `HH:MM:SS.mmm`, dropping the hours when there are none.
#[must_use]
#[inline]
pub fn format_duration(duration: &Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{seconds:02}.{millis:03}")
    }
}
