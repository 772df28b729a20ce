//! Locating feature files from a directory, glob pattern or single path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Root marker used when the input names none.
pub const DEFAULT_ROOT: &str = "features";

const GLOB_META: [char; 3] = ['*', '?', '['];

/// Errors raised while expanding an input into feature files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The input looked like a glob but could not be compiled.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Compilation error from `glob`.
        #[source]
        source: glob::PatternError,
    },
    /// A plain input path does not exist.
    #[error("input path {} does not exist", path.display())]
    Missing {
        /// Path that was not found.
        path: PathBuf,
    },
    /// A directory could not be walked.
    #[error("failed to read {}: {source}", path.display())]
    Walk {
        /// Directory or entry that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn is_feature_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("feature"))
}

fn is_glob(input: &str) -> bool {
    input.contains(GLOB_META)
}

fn entry_path(entry: DirEntry) -> Option<PathBuf> {
    let path = entry.into_path();
    (path.is_file() && is_feature_file(&path)).then_some(path)
}

fn walk_error(base: &Path, err: walkdir::Error) -> Option<DiscoveryError> {
    if err.loop_ancestor().is_some() {
        tracing::debug!(path = %base.display(), "skipping symlink loop");
        return None;
    }
    let path = err.path().map_or_else(|| base.to_path_buf(), Path::to_path_buf);
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    Some(DiscoveryError::Walk { path, source })
}

fn walk_directory(base: &Path, files: &mut Vec<PathBuf>) -> Result<(), DiscoveryError> {
    for next in WalkDir::new(base).follow_links(true) {
        match next {
            Ok(entry) => files.extend(entry_path(entry)),
            Err(err) => {
                if let Some(err) = walk_error(base, err) {
                    return Err(err);
                }
            }
        }
    }
    Ok(())
}

fn expand_glob(pattern: &str, files: &mut Vec<PathBuf>) -> Result<(), DiscoveryError> {
    let paths = glob::glob(pattern).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => walk_directory(&path, files)?,
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(path = %err.path().display(), error = %err, "unreadable glob match");
            }
        }
    }
    Ok(())
}

/// Expand `input` into a sorted, de-duplicated list of feature files.
///
/// A directory is walked recursively for `*.feature` files, skipping
/// symlink loops. An input containing `*`, `?` or `[` is a glob pattern;
/// every matched file is kept and matched directories are walked. Anything
/// else is taken as a single file path.
///
/// # Errors
///
/// Returns [`DiscoveryError`] for an invalid pattern, a missing path or a
/// directory that cannot be read.
pub fn collect_feature_files(input: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    if is_glob(input) {
        expand_glob(input, &mut files)?;
    } else {
        let path = Path::new(input);
        if path.is_dir() {
            walk_directory(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            return Err(DiscoveryError::Missing {
                path: path.to_path_buf(),
            });
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!(input, count = files.len(), "collected feature files");
    Ok(files)
}

/// Directory marker used to relativise report paths for `input`.
///
/// For a relative input this is its first literal path component
/// (`features/**/*.feature` gives `features`). For an absolute input it is
/// the last literal directory before any glob. Falls back to
/// [`DEFAULT_ROOT`].
///
/// # Examples
///
/// ```
/// use cukedex::root_marker;
///
/// assert_eq!(root_marker("specs/**/*.feature"), "specs");
/// assert_eq!(root_marker("./features"), "features");
/// assert_eq!(root_marker("/srv/app/acceptance/*.feature"), "acceptance");
/// assert_eq!(root_marker("*.feature"), "features");
/// ```
#[must_use]
pub fn root_marker(input: &str) -> String {
    let absolute = input.starts_with(['/', '\\']);
    let literal: Vec<&str> = input
        .split(['/', '\\'])
        .take_while(|component| !is_glob(component))
        .filter(|component| !matches!(*component, "" | "." | ".."))
        .filter(|component| !is_feature_file(Path::new(component)))
        .collect();
    let chosen = if absolute {
        literal.last()
    } else {
        literal.first()
    };
    chosen.map_or_else(|| DEFAULT_ROOT.to_string(), |component| (*component).to_string())
}
