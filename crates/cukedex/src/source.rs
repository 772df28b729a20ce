//! Reading feature files and naming them for reports.

use std::path::Path;

use camino::Utf8PathBuf;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Read a feature file as UTF-8, dropping a leading byte-order mark.
///
/// # Errors
///
/// Returns the underlying I/O error when the file is missing, unreadable or
/// not valid UTF-8.
pub fn read_feature_text(path: &Path) -> std::io::Result<String> {
    let mut text = std::fs::read_to_string(path)?;
    if text.starts_with(BYTE_ORDER_MARK) {
        text.drain(..BYTE_ORDER_MARK.len_utf8());
    }
    Ok(text)
}

/// Drop a leading byte-order mark from in-memory text.
#[must_use]
pub fn strip_byte_order_mark(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

/// Path of a feature file relative to the `root` directory marker.
///
/// Everything before the last `root/` path component is dropped, so
/// `/home/me/project/features/billing/pay.feature` with root `features`
/// becomes `features/billing/pay.feature`. Backslashes are normalised to
/// forward slashes. A path without the marker is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cukedex::relative_feature_path;
///
/// let path = Path::new("/work/app/features/billing/pay.feature");
/// assert_eq!(relative_feature_path(path, "features"), "features/billing/pay.feature");
/// assert_eq!(relative_feature_path(Path::new("x/pay.feature"), "features"), "x/pay.feature");
/// ```
#[must_use]
pub fn relative_feature_path(path: &Path, root: &str) -> Utf8PathBuf {
    let text = path.to_string_lossy().replace('\\', "/");
    let root = root.trim_matches('/');
    if root.is_empty() {
        return Utf8PathBuf::from(text);
    }
    let marker = format!("{root}/");
    let start = text
        .rmatch_indices(&marker)
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || text.get(..idx).is_some_and(|head| head.ends_with('/')));
    let relative = start.and_then(|idx| text.get(idx..)).unwrap_or(&text);
    Utf8PathBuf::from(relative)
}
