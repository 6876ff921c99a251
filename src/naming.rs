//! Content-hash stripping for emitted file names
//!
//! Bundlers embed a content hash in emitted names (`main.3f2a9c1d.js`,
//! `static/js/2.8b1e44f0.chunk.js`). Stripping it gives a key that stays the
//! same for a logical file across two builds, which is what size deltas are
//! keyed on.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static HASH_SEGMENT_RE: OnceLock<Regex> = OnceLock::new();

fn hash_segment_re() -> &'static Regex {
    HASH_SEGMENT_RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"/?(.*)(\.[0-9a-f]+)(\.chunk)?(\.js|\.css)").unwrap()
    })
}

/// Strip the build root and the trailing content hash from an emitted file.
///
/// `file_name` may be absolute (as produced by walking the build folder) or
/// relative to the build folder (as reported in bundler stats); both yield
/// the same key. Path separators are normalized to `/`. Names without a hash
/// segment pass through with only the root and separators normalized.
///
/// # Examples
///
/// ```
/// use build_report::naming::remove_file_name_hash;
/// use std::path::Path;
///
/// let root = Path::new("/app/build");
/// assert_eq!(
///     remove_file_name_hash(root, Path::new("/app/build/static/js/main.3f2a9c1d.js")),
///     "static/js/main.js"
/// );
/// assert_eq!(
///     remove_file_name_hash(root, Path::new("static/js/2.8b1e44f0.chunk.js")),
///     "static/js/2.js"
/// );
/// assert_eq!(remove_file_name_hash(root, Path::new("logo.svg")), "logo.svg");
/// ```
pub fn remove_file_name_hash(root: &Path, file_name: &Path) -> String {
    let unified = match file_name.strip_prefix(root) {
        Ok(stripped) => stripped.to_string_lossy().replace('\\', "/"),
        Err(_) => {
            let name = file_name.to_string_lossy().replace('\\', "/");
            strip_leading_root(&name, root).to_string()
        }
    };
    let unified = unified.trim_start_matches('/');

    hash_segment_re()
        .replace(unified, "${1}${4}")
        .into_owned()
}

/// Remove `root` from the start of a `/`-separated name, but only when it
/// ends on a path boundary. `dist` is stripped from `dist/app.js` and kept in
/// `distance.js`.
fn strip_leading_root<'a>(name: &'a str, root: &Path) -> &'a str {
    let root = root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return name;
    }
    match name.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => name,
    }
}
