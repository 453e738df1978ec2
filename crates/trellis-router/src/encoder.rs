//! Percent-encoding of path segments and query parts

use std::borrow::Cow;

/// Escapes text for use inside a URL
///
/// Passed to [`Route::build`](crate::Route::build) so callers decide how
/// path parameter values are escaped.
pub trait UriEncoder: Send + Sync {
    /// Returns the escaped form of `text`
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Appends the escaped form of `text` to `out`
    fn encode_into(&self, text: &str, out: &mut String) {
        out.push_str(&self.encode(text));
    }
}

/// RFC 3986 percent encoder
///
/// Leaves `A-Z a-z 0-9 - . _ ~` alone and encodes every other byte,
/// including `/` and space (`%20`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentEncoder;

impl UriEncoder for PercentEncoder {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, str> {
        urlencoding::encode(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_borrowed() {
        assert!(matches!(PercentEncoder.encode("a-b_c.d~9"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(PercentEncoder.encode("%/ "), "%25%2F%20");
        assert_eq!(PercentEncoder.encode("#"), "%23");

        let mut out = String::from("/");
        PercentEncoder.encode_into("x y", &mut out);
        assert_eq!(out, "/x%20y");
    }
}
