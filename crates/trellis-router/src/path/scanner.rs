//! Segment cursor over a single request path
//!
//! The scanner never splits the path: it keeps byte offsets of the current
//! segment and advances them. Path parameters consume a variable number of
//! segments, so every speculative parse is wrapped in [`PathScanner::mark`] /
//! [`PathScanner::revert`].

use regex::{Captures, Regex};

/// Snapshot of a scanner position
///
/// Four offsets copied by value; restoring one is O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMark {
    end: usize,
    seg_start: usize,
    seg_end: usize,
    seg_len: usize,
}

/// Result of [`PathScanner::match_pattern`]
///
/// Holds the regex captures and the absolute end offset of the match, which
/// is always a segment boundary and can be passed to [`PathScanner::next_to`].
#[derive(Debug)]
pub struct ScanMatch<'a> {
    captures: Captures<'a>,
    offset: usize,
}

impl<'a> ScanMatch<'a> {
    /// Returns the text of capture group `i` (0 is the whole match)
    pub fn group(&self, i: usize) -> Option<&'a str> {
        self.captures.get(i).map(|m| m.as_str())
    }

    /// Number of capture groups, not counting the whole match
    pub fn group_count(&self) -> usize {
        self.captures.len() - 1
    }

    /// Absolute end offset of the match within the scanned path
    pub fn end(&self) -> usize {
        self.offset + self.captures.get(0).map(|m| m.end()).unwrap_or(0)
    }
}

/// Cursor over the segments of one request path
#[derive(Debug, Clone)]
pub struct PathScanner<'a> {
    path: &'a str,
    end: usize,
    seg_start: usize,
    seg_end: usize,
    seg_len: usize,
}

impl<'a> PathScanner<'a> {
    /// Creates a scanner for a path
    ///
    /// An extension in the last segment (everything from its first `.`) is
    /// ignored, then a trailing `/index` is ignored too. A single leading `/`
    /// is skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::PathScanner;
    ///
    /// let mut scanner = PathScanner::new("/test/index.html");
    /// assert!(scanner.match_segment("test"));
    /// scanner.next();
    /// assert!(!scanner.has_more());
    /// ```
    pub fn new(path: &'a str) -> Self {
        let mut end = path.len();

        let last_start = path.rfind('/').map(|p| p + 1).unwrap_or(0);
        if let Some(ext) = path[last_start..].find('.') {
            end = last_start + ext;
        }

        if path[..end].ends_with("/index") {
            end -= "/index".len();
        }

        let seg_start = if end > 0 && path.starts_with('/') { 1 } else { 0 };

        let mut scanner = Self {
            path,
            end,
            seg_start,
            seg_end: seg_start,
            seg_len: 0,
        };
        scanner.init_segment();
        scanner
    }

    fn init_segment(&mut self) {
        if self.seg_start >= self.end {
            self.seg_end = self.seg_start;
        } else {
            self.seg_end = self.path[self.seg_start..]
                .find('/')
                .map(|p| (self.seg_start + p).min(self.end))
                .unwrap_or(self.end);
        }
        self.seg_len = self.seg_end - self.seg_start;
    }

    /// Returns the whole path
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Returns the start offset of the current segment
    pub fn position(&self) -> usize {
        self.seg_start
    }

    /// Moves the scanner to the segment starting at `position`
    pub fn set_position(&mut self, position: usize) {
        self.seg_start = position;
        self.init_segment();
    }

    /// Returns true while the effective end of the path is not reached
    pub fn has_more(&self) -> bool {
        self.seg_start < self.end
    }

    /// Returns the current segment, `None` once the path is exhausted
    pub fn segment(&self) -> Option<&'a str> {
        if self.has_more() {
            Some(self.current())
        } else {
            None
        }
    }

    fn current(&self) -> &'a str {
        if self.seg_start >= self.end {
            ""
        } else {
            &self.path[self.seg_start..self.seg_end]
        }
    }

    /// Returns if the current segment equals `segment`; does not advance
    pub fn match_segment(&self, segment: &str) -> bool {
        segment.len() == self.seg_len && self.current() == segment
    }

    /// Matches a regex anchored at the current position
    ///
    /// The match may span several segments but must end on a segment
    /// boundary. The scanner is not advanced; call
    /// [`next_to`](Self::next_to) with [`ScanMatch::end`] to consume it.
    pub fn match_pattern(&self, pattern: &Regex) -> Option<ScanMatch<'a>> {
        if self.seg_start > self.end {
            return None;
        }

        let captures = pattern.captures(&self.path[self.seg_start..self.end])?;
        let whole = captures.get(0)?;
        if whole.start() != 0 || !self.is_segment_end(self.seg_start + whole.end()) {
            return None;
        }

        Some(ScanMatch {
            captures,
            offset: self.seg_start,
        })
    }

    /// Advances to the next segment
    ///
    /// Past the effective end the current segment becomes empty.
    pub fn next(&mut self) {
        self.seg_start = self.seg_end + 1;
        if self.has_more() {
            self.init_segment();
        } else {
            self.seg_end = self.seg_start;
            self.seg_len = 0;
        }
    }

    /// Advances past the segment that ends at `end`
    ///
    /// # Panics
    ///
    /// Panics if `end` is not a segment boundary after the current position.
    /// That only happens through a broken path parameter implementation.
    pub fn next_to(&mut self, end: usize) {
        assert!(
            self.is_segment_end(end),
            "not a segment or path end: {} in {:?}",
            end,
            self.path
        );
        self.seg_end = end;
        self.next();
    }

    fn is_segment_end(&self, pos: usize) -> bool {
        pos > self.seg_start
            && (pos == self.end || (pos < self.end && self.path.as_bytes()[pos] == b'/'))
    }

    /// Takes a snapshot of the current position
    pub fn mark(&self) -> ScanMark {
        ScanMark {
            end: self.end,
            seg_start: self.seg_start,
            seg_end: self.seg_end,
            seg_len: self.seg_len,
        }
    }

    /// Restores a snapshot taken by [`mark`](Self::mark)
    pub fn revert(&mut self, mark: ScanMark) {
        self.end = mark.end;
        self.seg_start = mark.seg_start;
        self.seg_end = mark.seg_end;
        self.seg_len = mark.seg_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create() {
        let scanner = PathScanner::new("");
        assert_eq!(scanner.position(), 0);
        assert!(!scanner.has_more());

        let scanner = PathScanner::new("/");
        assert_eq!(scanner.position(), 1);
        assert!(!scanner.has_more());

        let scanner = PathScanner::new("/abc");
        assert_eq!(scanner.path(), "/abc");
        assert_eq!(scanner.position(), 1);
        assert!(scanner.has_more());
    }

    #[test]
    fn test_segments() {
        let mut scanner = PathScanner::new("abc/def");
        assert_eq!(scanner.position(), 0);
        assert!(scanner.has_more());
        assert!(scanner.match_segment("abc"));
        assert!(!scanner.match_segment("ab"));
        assert!(!scanner.match_segment("abc/"));
        assert!(!scanner.match_segment(""));
        assert_eq!(scanner.segment(), Some("abc"));

        scanner.next();
        assert!(scanner.has_more());
        assert!(scanner.match_segment("def"));
        assert!(!scanner.match_segment("defg"));
        assert_eq!(scanner.segment(), Some("def"));

        scanner.next();
        assert!(!scanner.has_more());
        assert_eq!(scanner.segment(), None);
    }

    #[test]
    fn test_trailing_slash() {
        let mut scanner = PathScanner::new("/abc/");
        assert!(scanner.match_segment("abc"));
        scanner.next();
        assert!(!scanner.has_more());
        assert_eq!(scanner.segment(), None);
    }

    #[test]
    fn test_pattern() {
        let any = Regex::new(".+").unwrap();
        let any_seg = Regex::new("[^/]+").unwrap();
        let alpha = Regex::new("[a-z]+").unwrap();
        let number = Regex::new("[0-9]+").unwrap();
        let groups = Regex::new("a([a-z]{2})/1([0-9]{2})").unwrap();

        let mut scanner = PathScanner::new("abc/123");
        assert_eq!(scanner.match_pattern(&any).and_then(|m| m.group(0)), Some("abc/123"));
        assert_eq!(scanner.match_pattern(&any_seg).and_then(|m| m.group(0)), Some("abc"));
        assert_eq!(scanner.match_pattern(&alpha).and_then(|m| m.group(0)), Some("abc"));
        assert!(scanner.match_pattern(&number).is_none());

        let m = scanner.match_pattern(&groups).unwrap();
        assert_eq!(m.group_count(), 2);
        assert_eq!(m.group(1), Some("bc"));
        assert_eq!(m.group(2), Some("23"));

        scanner.next();
        assert!(scanner.match_segment("123"));
        assert!(scanner.match_pattern(&alpha).is_none());
        assert_eq!(scanner.match_pattern(&number).and_then(|m| m.group(0)), Some("123"));
    }

    #[test]
    fn test_pattern_must_end_on_boundary() {
        let scanner = PathScanner::new("abc123/x");
        let alpha = Regex::new("[a-z]+").unwrap();
        assert!(scanner.match_pattern(&alpha).is_none());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let scanner = PathScanner::new("x/123");
        let number = Regex::new("[0-9]+").unwrap();
        assert!(scanner.match_pattern(&number).is_none());
    }

    #[test]
    fn test_next_to() {
        let alpha = Regex::new("[a-z]+").unwrap();
        let number = Regex::new("[0-9]+").unwrap();

        let mut scanner = PathScanner::new("abc/123");
        let end = scanner.match_pattern(&alpha).unwrap().end();
        scanner.next_to(end);
        assert_eq!(scanner.position(), 4);

        let end = scanner.match_pattern(&number).unwrap().end();
        scanner.next_to(end);
        assert_eq!(scanner.position(), 8);
        assert!(!scanner.has_more());
    }

    #[test]
    #[should_panic(expected = "not a segment or path end")]
    fn test_next_to_rejects_non_boundary() {
        let mut scanner = PathScanner::new("/abc/def");
        scanner.next_to(3);
    }

    #[test]
    fn test_mark_revert() {
        let mut scanner = PathScanner::new("/a/b/c");
        let mark = scanner.mark();

        assert!(scanner.match_segment("a"));
        scanner.next();
        assert!(scanner.match_segment("b"));
        scanner.next();
        scanner.next();
        assert!(!scanner.has_more());

        scanner.revert(mark);
        assert!(scanner.match_segment("a"));
        assert_eq!(scanner.mark(), mark);
    }

    #[test]
    fn test_set_position() {
        let mut scanner = PathScanner::new("/a/b/c");
        let start = scanner.position();
        scanner.next();
        assert!(scanner.match_segment("b"));
        scanner.set_position(start);
        assert!(scanner.match_segment("a"));
    }

    #[test]
    fn test_extension_and_index_ignored() {
        let mut scanner = PathScanner::new("test.html/test.html");
        assert!(!scanner.match_segment("test"));
        assert!(scanner.match_segment("test.html"));
        scanner.next();
        assert!(scanner.has_more());
        assert!(scanner.match_segment("test"));
        assert!(!scanner.match_segment("test.html"));
        scanner.next();
        assert!(!scanner.has_more());

        let mut scanner = PathScanner::new("test/index");
        assert!(scanner.match_segment("test"));
        scanner.next();
        assert!(!scanner.has_more());

        let mut scanner = PathScanner::new("test/index.html");
        assert!(scanner.match_segment("test"));
        scanner.next();
        assert!(!scanner.has_more());
    }

    #[test]
    fn test_root_index() {
        let scanner = PathScanner::new("/index.html");
        assert!(!scanner.has_more());
    }
}
