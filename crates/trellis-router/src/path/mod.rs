/// Path value type and the request path scanner
///
/// A [`Path`] wraps a path string in canonical form. The root path is stored
/// as `""` and printed as `"/"`; every other path starts with exactly one `/`
/// and never ends with one, so concatenating two paths always yields a path.
use std::borrow::Cow;
use std::fmt;

pub mod scanner;
pub use scanner::{PathScanner, ScanMark, ScanMatch};

/// Checks if a string is already in canonical path form
///
/// **Pure function**: no allocation, short-circuits on the first violation.
///
/// # Examples
///
/// ```
/// use trellis_router::path::is_normalized;
///
/// assert!(is_normalized(""));
/// assert!(is_normalized("/about"));
/// assert!(is_normalized("/users/123"));
///
/// assert!(!is_normalized("/"));          // root is ""
/// assert!(!is_normalized("about"));      // missing leading /
/// assert!(!is_normalized("/about/"));    // trailing /
/// assert!(!is_normalized("/about//x"));  // empty segment
/// ```
pub fn is_normalized(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }

    path.starts_with('/') && !path.ends_with('/') && !path.contains("//")
}

/// Normalizes a path string
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// - Trailing slashes: `/path/` → `/path`
/// - Missing leading slash: `path` → `/path`
/// - Empty segments: `/path//to` → `/path/to`
/// - Root: `""`, `"/"`, `"//"` → `""`
///
/// # Examples
///
/// ```
/// use trellis_router::path::normalize;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize("about/"), "/about");
/// assert_eq!(normalize("/path//to///page"), "/path/to/page");
/// assert_eq!(normalize("/"), "");
/// ```
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Tests if `path` starts with `prefix` and either equals it or continues
/// with a `/` right after the prefix
pub fn starts_with_segment(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// A normalized path string
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    value: String,
}

impl Path {
    /// The root path
    pub const ROOT: Path = Path {
        value: String::new(),
    };

    /// Creates a path from any string, normalizing it
    pub fn new(path: &str) -> Self {
        Self {
            value: normalize(path).into_owned(),
        }
    }

    /// Returns the internal value, `""` for the root path
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns a printable version: `"/"` for the root path
    pub fn print(&self) -> &str {
        if self.is_root() {
            "/"
        } else {
            &self.value
        }
    }

    pub fn is_root(&self) -> bool {
        self.value.is_empty()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns this path followed by `other`
    pub fn join(&self, other: &Path) -> Path {
        if other.is_root() {
            self.clone()
        } else if self.is_root() {
            other.clone()
        } else {
            Path {
                value: format!("{}{}", self.value, other.value),
            }
        }
    }

    /// Returns this path followed by a path string, which is normalized first
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::Path;
    ///
    /// let base = Path::new("/app");
    /// assert_eq!(base.add("users/").as_str(), "/app/users");
    /// assert_eq!(Path::ROOT.add("/").print(), "/");
    /// ```
    pub fn add(&self, path: &str) -> Path {
        self.join(&Path::new(path))
    }

    /// Appends the path to a buffer without doubling a `/` at the joint
    ///
    /// The root path is only written when the buffer is empty.
    pub fn add_to(&self, out: &mut String) {
        if self.is_root() {
            if out.is_empty() {
                out.push('/');
            }
        } else if out.ends_with('/') {
            out.push_str(&self.value[1..]);
        } else {
            out.push_str(&self.value);
        }
    }

    /// Tests if this path starts with the prefix at a segment boundary
    pub fn starts_with(&self, prefix: &str) -> bool {
        starts_with_segment(&self.value, prefix)
    }

    /// Removes a leading path, returning `None` if this path does not start with it
    pub fn cut_start(&self, prefix: &Path) -> Option<Path> {
        if prefix.is_root() {
            return Some(self.clone());
        }
        if !self.starts_with(&prefix.value) {
            return None;
        }
        Some(Path {
            value: self.value[prefix.len()..].to_string(),
        })
    }

    /// Returns the extension of the last segment: everything after its first `.`
    ///
    /// For `/user/view.en.html` this is `en.html`.
    pub fn extension(&self) -> Option<&str> {
        let last = self.last_segment();
        last.find('.').map(|p| &last[p + 1..])
    }

    /// Returns the last segment, `""` for the root path
    pub fn last_segment(&self) -> &str {
        self.value
            .rfind('/')
            .map(|p| &self.value[p + 1..])
            .unwrap_or("")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.print())
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Path::new(value)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
