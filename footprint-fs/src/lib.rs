//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Artefacts are written through [`write_atomically`], so a reader never
//! observes a half-written file and a failed run leaves nothing behind.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

const PARTIAL_SUFFIX: &str = ".partial";

/// Resolve an ambient directory for the given path and return the directory with the file name.
///
/// # Errors
///
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = parent_or_current(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "target should include a file name",
            )
        })?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
///
/// Propagates failures from directory creation.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let parent = parent_or_current(path);
    if parent == Utf8Path::new(".") || parent == Utf8Path::new("/") {
        return Ok(());
    }
    fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())
}

/// Return whether `path` exists and is a directory.
///
/// A missing path, or a missing parent, reports `false`.
///
/// # Errors
///
/// Propagates IO failures other than `NotFound`.
pub fn is_directory(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Write `contents` to `path`, replacing any existing file in one step.
///
/// The bytes go to a sibling `.partial` file first, which is renamed over the
/// target once fully written. Parent directories are created as needed.
///
/// # Errors
///
/// Propagates directory creation, write and rename failures. The partial
/// file is removed on failure.
pub fn write_atomically(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, file_name) = open_dir_and_file(path)?;
    let partial = format!(".{file_name}{PARTIAL_SUFFIX}");
    let outcome = dir
        .write(partial.as_str(), contents)
        .and_then(|()| dir.rename(partial.as_str(), &dir, file_name.as_str()));
    if outcome.is_err() {
        // Best effort; the original error is more useful than a cleanup failure.
        let _cleanup = dir.remove_file(partial.as_str());
    }
    outcome
}

fn parent_or_current(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}
