//! Path parameters: named, typed matchers over one or more path segments
//!
//! A [`PathParam`] is a stateless strategy. [`PathParam::parse`] reads a value
//! from a [`PathScanner`] and advances it past the consumed segments;
//! [`PathParam::build_path`] renders a value back into path segments. For every
//! variant, building a parsed value and parsing the result again yields the
//! same value.
//!
//! `parse` may leave the scanner advanced when it returns `None` (a prefix
//! was consumed, or a segment did not convert). Callers take a
//! [`mark`](PathScanner::mark) before parsing and revert on failure.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::encoder::UriEncoder;
use crate::error::{Error, Result};
use crate::path::PathScanner;

pub mod map;
mod value;

pub use map::PathParamMap;
pub use value::{PathValue, ValueType};

/// Shared handle to a path parameter
///
/// Resources, routes and registries all hold the same parameter instance.
pub type PathParamRef = Arc<PathParam>;

/// Validates a year/month/day triple and turns it into a date
pub type DateFactory = fn(i32, u32, u32) -> Option<NaiveDate>;

static YMD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})/([0-1][0-9])/([0-3][0-9])").expect("year/month/day pattern")
});

/// Conversion applied by a converting path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Decimal integer
    Integer,
    /// Compact `yyyymmdd` date
    Date,
}

impl Conversion {
    fn value_type(self) -> ValueType {
        match self {
            Conversion::Integer => ValueType::Integer,
            Conversion::Date => ValueType::Date,
        }
    }

    fn convert(self, text: &str) -> Option<PathValue> {
        match self {
            Conversion::Integer => text.parse::<i64>().ok().map(PathValue::Integer),
            Conversion::Date => {
                if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                NaiveDate::parse_from_str(text, "%Y%m%d")
                    .ok()
                    .map(PathValue::Date)
            }
        }
    }

    fn format(self, value: &PathValue) -> Option<String> {
        match (self, value) {
            (Conversion::Integer, PathValue::Integer(n)) => Some(n.to_string()),
            (Conversion::Date, PathValue::Date(d)) => Some(d.format("%Y%m%d").to_string()),
            _ => None,
        }
    }
}

/// The closed set of path parameter strategies
#[derive(Debug, Clone)]
pub enum PathParamKind {
    /// One segment, taken verbatim
    Segment,
    /// One segment of the form `prefix*suffix`; the value is the non-empty middle
    SegmentPattern { prefix: String, suffix: String },
    /// A span of segments matched by a regex; the value is capture group 1
    Regex {
        regex: Regex,
        source: String,
        build_pattern: String,
    },
    /// Three segments `yyyy/mm/dd`
    YearMonthDay { factory: DateFactory },
    /// All remaining segments, at least `min` of them
    MultiSegment { min: usize },
    /// A constant segment followed by the inner parameter
    Prefixed { segment: String, inner: PathParamRef },
    /// A text-valued inner parameter whose value is converted
    Converting {
        inner: PathParamRef,
        conversion: Conversion,
    },
    /// The inner parameter, or nothing
    Optional { inner: PathParamRef },
}

/// A named path parameter
#[derive(Debug, Clone)]
pub struct PathParam {
    name: String,
    kind: PathParamKind,
}

impl PathParam {
    fn create(name: &str, kind: PathParamKind) -> PathParamRef {
        Arc::new(PathParam {
            name: name.to_string(),
            kind,
        })
    }

    /// Matches one segment
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::{PathParam, PathScanner, PathValue};
    ///
    /// let id = PathParam::segment("id");
    /// let mut scanner = PathScanner::new("/42/edit");
    /// assert_eq!(id.parse(&mut scanner), Some(PathValue::from("42")));
    /// assert_eq!(scanner.segment(), Some("edit"));
    /// ```
    pub fn segment(name: &str) -> PathParamRef {
        Self::create(name, PathParamKind::Segment)
    }

    /// Matches one segment against a pattern with exactly one `*` wildcard
    pub fn segment_pattern(name: &str, pattern: &str) -> Result<PathParamRef> {
        let (prefix, suffix) = match pattern.split_once('*') {
            Some((prefix, suffix)) if !suffix.contains('*') => (prefix, suffix),
            _ => {
                return Err(Error::InvalidPattern {
                    name: name.to_string(),
                    reason: format!("'{}' must contain exactly one '*'", pattern),
                })
            }
        };
        if pattern.contains('/') {
            return Err(Error::InvalidPattern {
                name: name.to_string(),
                reason: format!("'{}' must not contain '/'", pattern),
            });
        }

        Ok(Self::create(
            name,
            PathParamKind::SegmentPattern {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
        ))
    }

    /// Matches a regex anchored at the current segment
    ///
    /// The regex needs at least one capture group; group 1 is the value.
    /// When building, every `*` in `build_pattern` is replaced by the value.
    pub fn pattern(name: &str, pattern: &str, build_pattern: &str) -> Result<PathParamRef> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| Error::InvalidPattern {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidPattern {
                name: name.to_string(),
                reason: format!("'{}' has no capture group", pattern),
            });
        }

        Ok(Self::create(
            name,
            PathParamKind::Regex {
                regex,
                source: pattern.to_string(),
                build_pattern: build_pattern.to_string(),
            },
        ))
    }

    /// Matches `yyyy/mm/dd`, validated as a proleptic Gregorian date
    pub fn year_month_day(name: &str) -> PathParamRef {
        Self::year_month_day_with(name, NaiveDate::from_ymd_opt)
    }

    /// Matches `yyyy/mm/dd`, validated by a custom date factory
    pub fn year_month_day_with(name: &str, factory: DateFactory) -> PathParamRef {
        Self::create(name, PathParamKind::YearMonthDay { factory })
    }

    /// Matches all remaining segments if there are at least `min` of them
    pub fn multi_segment(name: &str, min: usize) -> PathParamRef {
        Self::create(name, PathParamKind::MultiSegment { min })
    }

    /// Matches a constant segment, then the inner parameter
    ///
    /// The result shares the inner parameter's name.
    pub fn prefixed(segment: &str, inner: PathParamRef) -> Result<PathParamRef> {
        if segment.is_empty() || segment.contains('/') {
            return Err(Error::InvalidPattern {
                name: inner.name.clone(),
                reason: format!("invalid prefix segment '{}'", segment),
            });
        }
        let name = inner.name.clone();
        Ok(Self::create(
            &name,
            PathParamKind::Prefixed {
                segment: segment.to_string(),
                inner,
            },
        ))
    }

    /// Converts the text value of the inner parameter
    ///
    /// The result shares the inner parameter's name.
    pub fn converting(inner: PathParamRef, conversion: Conversion) -> Result<PathParamRef> {
        let name = inner.name.clone();
        Self::converting_named(&name, inner, conversion)
    }

    /// Converts the text value of the inner parameter, under a new name
    pub fn converting_named(
        name: &str,
        inner: PathParamRef,
        conversion: Conversion,
    ) -> Result<PathParamRef> {
        if inner.value_type() != ValueType::Text {
            return Err(Error::InvalidPattern {
                name: name.to_string(),
                reason: format!("cannot convert a {} parameter", inner.value_type()),
            });
        }
        Ok(Self::create(name, PathParamKind::Converting { inner, conversion }))
    }

    /// Makes the inner parameter optional
    ///
    /// Parsing yields [`PathValue::Optional`] and never fails.
    pub fn optional(inner: PathParamRef) -> PathParamRef {
        let name = inner.name.clone();
        Self::create(&name, PathParamKind::Optional { inner })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PathParamKind {
        &self.kind
    }

    /// The type of the values this parameter parses and builds
    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            PathParamKind::Segment
            | PathParamKind::SegmentPattern { .. }
            | PathParamKind::Regex { .. } => ValueType::Text,
            PathParamKind::YearMonthDay { .. } => ValueType::Date,
            PathParamKind::MultiSegment { .. } => ValueType::Segments,
            PathParamKind::Prefixed { inner, .. } => inner.value_type(),
            PathParamKind::Converting { conversion, .. } => conversion.value_type(),
            PathParamKind::Optional { inner } => ValueType::Optional(Box::new(inner.value_type())),
        }
    }

    /// Tests if a value can be built by this parameter
    pub fn accepts(&self, value: &PathValue) -> bool {
        self.value_type().accepts(value)
    }

    /// Reads a value at the scanner's position
    ///
    /// On success the scanner is positioned after the consumed segments.
    pub fn parse(&self, scanner: &mut PathScanner<'_>) -> Option<PathValue> {
        match &self.kind {
            PathParamKind::Segment => {
                let segment = scanner.segment().filter(|s| !s.is_empty())?;
                scanner.next();
                Some(PathValue::Text(segment.to_string()))
            }
            PathParamKind::SegmentPattern { prefix, suffix } => {
                let segment = scanner.segment()?;
                if segment.len() <= prefix.len() + suffix.len() {
                    return None;
                }
                let middle = segment.strip_prefix(prefix.as_str())?.strip_suffix(suffix.as_str())?;
                let value = middle.to_string();
                scanner.next();
                Some(PathValue::Text(value))
            }
            PathParamKind::Regex { regex, .. } => {
                let matched = scanner.match_pattern(regex)?;
                let value = matched.group(1)?.to_string();
                scanner.next_to(matched.end());
                Some(PathValue::Text(value))
            }
            PathParamKind::YearMonthDay { factory } => {
                let matched = scanner.match_pattern(&YMD_PATTERN)?;
                let year = matched.group(1)?.parse().ok()?;
                let month = matched.group(2)?.parse().ok()?;
                let day = matched.group(3)?.parse().ok()?;
                let date = factory(year, month, day)?;
                scanner.next_to(matched.end());
                Some(PathValue::Date(date))
            }
            PathParamKind::MultiSegment { min } => {
                let mut segments = Vec::new();
                while let Some(segment) = scanner.segment() {
                    if !segment.is_empty() {
                        segments.push(segment.to_string());
                    }
                    scanner.next();
                }
                if segments.len() < *min {
                    return None;
                }
                Some(PathValue::Segments(segments))
            }
            PathParamKind::Prefixed { segment, inner } => {
                if !scanner.match_segment(segment) {
                    return None;
                }
                scanner.next();
                inner.parse(scanner)
            }
            PathParamKind::Converting { inner, conversion } => {
                let value = inner.parse(scanner)?;
                conversion.convert(value.as_text()?)
            }
            PathParamKind::Optional { inner } => {
                let mark = scanner.mark();
                match inner.parse(scanner) {
                    Some(value) => Some(PathValue::some(value)),
                    None => {
                        scanner.revert(mark);
                        Some(PathValue::none())
                    }
                }
            }
        }
    }

    /// Renders a value as path segments, each preceded by `/`
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if the value does not have this parameter's
    /// type, [`Error::EmptyValue`] if it would render an empty segment.
    pub fn build_path(
        &self,
        value: &PathValue,
        encoder: &dyn UriEncoder,
        out: &mut String,
    ) -> Result<()> {
        match (&self.kind, value) {
            (PathParamKind::Segment, PathValue::Text(text)) => {
                self.push_segment(text, encoder, out)
            }
            (PathParamKind::SegmentPattern { prefix, suffix }, PathValue::Text(text)) => {
                if text.is_empty() {
                    return Err(self.empty_value());
                }
                self.push_segment(&format!("{}{}{}", prefix, text, suffix), encoder, out)
            }
            (PathParamKind::Regex { build_pattern, .. }, PathValue::Text(text)) => {
                if text.is_empty() {
                    return Err(self.empty_value());
                }
                // a build pattern may span segments
                build_pattern
                    .replace('*', text)
                    .split('/')
                    .filter(|segment| !segment.is_empty())
                    .try_for_each(|segment| self.push_segment(segment, encoder, out))
            }
            (PathParamKind::YearMonthDay { .. }, PathValue::Date(date)) => {
                out.push_str(&date.format("/%Y/%m/%d").to_string());
                Ok(())
            }
            (PathParamKind::MultiSegment { .. }, PathValue::Segments(segments)) => {
                segments
                    .iter()
                    .try_for_each(|segment| self.push_segment(segment, encoder, out))
            }
            (PathParamKind::Prefixed { segment, inner }, _) => {
                self.push_segment(segment, encoder, out)?;
                inner.build_path(value, encoder, out)
            }
            (PathParamKind::Converting { inner, conversion }, _) => {
                let text = conversion.format(value).ok_or_else(|| self.type_mismatch(value))?;
                inner.build_path(&PathValue::Text(text), encoder, out)
            }
            (PathParamKind::Optional { .. }, PathValue::Optional(None)) => Ok(()),
            (PathParamKind::Optional { inner }, PathValue::Optional(Some(v))) => {
                inner.build_path(v, encoder, out)
            }
            _ => Err(self.type_mismatch(value)),
        }
    }

    fn push_segment(&self, segment: &str, encoder: &dyn UriEncoder, out: &mut String) -> Result<()> {
        if segment.is_empty() {
            return Err(self.empty_value());
        }
        out.push('/');
        encoder.encode_into(segment, out);
        Ok(())
    }

    fn empty_value(&self) -> Error {
        Error::EmptyValue {
            param: self.name.clone(),
        }
    }

    fn type_mismatch(&self, value: &PathValue) -> Error {
        Error::TypeMismatch {
            param: self.detailed(),
            found: value.to_string(),
        }
    }

    fn pattern_string(&self) -> Option<String> {
        match &self.kind {
            PathParamKind::Segment => Some("/<segment>".to_string()),
            PathParamKind::SegmentPattern { prefix, suffix } => {
                Some(format!("{}*{}", prefix, suffix))
            }
            PathParamKind::Regex { source, .. } => Some(source.clone()),
            PathParamKind::YearMonthDay { .. } => Some("yyyy/mm/dd".to_string()),
            PathParamKind::MultiSegment { min } => Some(format!("minSize={}", min)),
            PathParamKind::Prefixed { segment, inner } => Some(match inner.pattern_string() {
                Some(p) if p.starts_with('/') => format!("/{}{}", segment, p),
                Some(p) => format!("/{}/{}", segment, p),
                None => format!("/{}", segment),
            }),
            PathParamKind::Converting { inner, .. } => inner.pattern_string(),
            PathParamKind::Optional { inner } => inner.pattern_string().map(|p| format!("{}?", p)),
        }
    }

    /// Describes the parameter with its type and pattern: `/{name : Type=pattern}`
    pub fn detailed(&self) -> String {
        match self.pattern_string() {
            Some(p) => format!("/{{{} : {}={}}}", self.name, self.value_type(), p),
            None => format!("/{{{} : {}}}", self.name, self.value_type()),
        }
    }
}

impl fmt::Display for PathParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{{{}}}", self.name)
    }
}

/// Source of path parameter values, such as a matched request
pub trait PathParamProvider {
    /// Returns the value of a parameter, if present
    fn path_param(&self, param: &PathParam) -> Option<&PathValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::PercentEncoder;
    use pretty_assertions::assert_eq;

    /// Scans `path` with `param`, returning the value and the segment after it
    fn scan<'a>(param: &PathParam, path: &'a str) -> (Option<PathValue>, Option<&'a str>) {
        let mut scanner = PathScanner::new(path);
        let mark = scanner.mark();
        let value = param.parse(&mut scanner);
        if value.is_none() {
            // a failed parse may consume segments; matching reverts the same way
            scanner.revert(mark);
        }
        (value, scanner.segment())
    }

    fn build(param: &PathParam, value: PathValue) -> String {
        let mut out = String::new();
        param.build_path(&value, &PercentEncoder, &mut out).unwrap();
        out
    }

    fn date(y: i32, m: u32, d: u32) -> PathValue {
        PathValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_segment() {
        let p = PathParam::segment("stringparam");
        assert_eq!(p.to_string(), "/{stringparam}");
        assert_eq!(build(&p, "a b".into()), "/a%20b");
        assert_eq!(scan(&p, "/abc/def"), (Some("abc".into()), Some("def")));
        assert_eq!(scan(&p, ""), (None, None));
    }

    #[test]
    fn test_segment_pattern() {
        let p = PathParam::segment_pattern("idparam", "id*").unwrap();
        assert_eq!(p.detailed(), "/{idparam : String=id*}");
        assert_eq!(build(&p, "789".into()), "/id789");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/id/def"), (None, Some("id")));
        assert_eq!(scan(&p, "/id123/def"), (Some("123".into()), Some("def")));

        let p = PathParam::segment_pattern("v", "v*-rc").unwrap();
        assert_eq!(scan(&p, "/v2-rc"), (Some("2".into()), None));
    }

    #[test]
    fn test_segment_pattern_invalid() {
        assert!(matches!(
            PathParam::segment_pattern("x", "id"),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(PathParam::segment_pattern("x", "a*b*").is_err());
        assert!(PathParam::segment_pattern("x", "a/*").is_err());
    }

    #[test]
    fn test_regex() {
        let p = PathParam::pattern("id", "id([^/]+)", "id*").unwrap();
        assert_eq!(p.to_string(), "/{id}");
        assert_eq!(build(&p, "456".into()), "/id456");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/id0123/def"), (Some("0123".into()), Some("def")));
    }

    #[test]
    fn test_regex_spanning_segments() {
        let p = PathParam::pattern("ver", "v([0-9]+)/latest", "v*/latest").unwrap();
        assert_eq!(scan(&p, "/v3/latest/x"), (Some("3".into()), Some("x")));
        assert_eq!(build(&p, "3".into()), "/v3/latest");
        assert_eq!(scan(&p, "/v3/latestx"), (None, Some("v3")));
    }

    #[test]
    fn test_regex_invalid() {
        assert!(matches!(
            PathParam::pattern("x", "[0-9]+", "*"),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(PathParam::pattern("x", "([0-9]+", "*").is_err());
    }

    #[test]
    fn test_regex_converting() {
        let p = PathParam::converting(
            PathParam::pattern("nr", "nr([0-9]+)", "nr*").unwrap(),
            Conversion::Integer,
        )
        .unwrap();
        assert_eq!(p.to_string(), "/{nr}");
        assert_eq!(p.detailed(), "/{nr : Integer=nr([0-9]+)}");
        assert_eq!(build(&p, PathValue::Integer(456)), "/nr456");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/nr0123/def"), (Some(PathValue::Integer(123)), Some("def")));

        let loose = PathParam::converting(
            PathParam::pattern("nr", "nr([^/]+)", "nr*").unwrap(),
            Conversion::Integer,
        )
        .unwrap();
        assert_eq!(scan(&loose, "/nrx/def"), (None, Some("nrx")));
        assert_eq!(scan(&loose, "/nr9/def"), (Some(PathValue::Integer(9)), Some("def")));
    }

    #[test]
    fn test_converting_consumes_on_failure() {
        let p = PathParam::converting(PathParam::segment("conv"), Conversion::Integer).unwrap();
        let mut scanner = PathScanner::new("/abc/def");
        assert_eq!(p.parse(&mut scanner), None);
        assert_eq!(scanner.segment(), Some("def"));
    }

    #[test]
    fn test_converting() {
        let p = PathParam::converting(PathParam::segment("conv"), Conversion::Integer).unwrap();
        assert_eq!(p.detailed(), "/{conv : Integer=/<segment>}");
        assert_eq!(build(&p, PathValue::Integer(1234)), "/1234");
        assert_eq!(scan(&p, "/1234/def"), (Some(PathValue::Integer(1234)), Some("def")));

        let p = PathParam::converting_named("intparam", PathParam::segment("some"), Conversion::Integer)
            .unwrap();
        assert_eq!(p.to_string(), "/{intparam}");
        assert_eq!(build(&p, PathValue::Integer(456)), "/456");
    }

    #[test]
    fn test_converting_date() {
        let p = PathParam::converting(PathParam::segment("dateparam"), Conversion::Date).unwrap();
        assert_eq!(build(&p, date(2012, 12, 4)), "/20121204");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/20121103/def"), (Some(date(2012, 11, 3)), Some("def")));
        assert_eq!(scan(&p, "/20121131/def"), (None, Some("20121131")));
    }

    #[test]
    fn test_converting_requires_text() {
        let err = PathParam::converting(PathParam::multi_segment("m", 0), Conversion::Integer);
        assert!(matches!(err, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_year_month_day() {
        let p = PathParam::year_month_day("ymd");
        assert_eq!(p.to_string(), "/{ymd}");
        assert_eq!(p.detailed(), "/{ymd : Date=yyyy/mm/dd}");
        assert_eq!(build(&p, date(2011, 10, 9)), "/2011/10/09");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/2012/11/10/def"), (Some(date(2012, 11, 10)), Some("def")));
        assert_eq!(scan(&p, "/2013/13/01"), (None, Some("2013")));
        assert_eq!(scan(&p, "/2013/02/30"), (None, Some("2013")));
    }

    #[test]
    fn test_year_month_day_custom_factory() {
        fn first_of_month(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
            if d == 1 {
                NaiveDate::from_ymd_opt(y, m, d)
            } else {
                None
            }
        }

        let p = PathParam::year_month_day_with("month", first_of_month);
        assert_eq!(scan(&p, "/2020/05/01"), (Some(date(2020, 5, 1)), None));
        assert_eq!(scan(&p, "/2020/05/02"), (None, Some("2020")));
    }

    #[test]
    fn test_multi_segment() {
        let p = PathParam::multi_segment("multi", 2);
        let abc = PathValue::Segments(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(p.to_string(), "/{multi}");
        assert_eq!(p.detailed(), "/{multi : Segments=minSize=2}");
        assert_eq!(build(&p, abc.clone()), "/a/b/c");
        assert_eq!(scan(&p, "/a"), (None, Some("a")));
        assert_eq!(scan(&p, "/a/b/c"), (Some(abc), None));
    }

    #[test]
    fn test_multi_segment_zero() {
        let p = PathParam::multi_segment("rest", 0);
        assert_eq!(scan(&p, ""), (Some(PathValue::Segments(vec![])), None));
        assert_eq!(build(&p, PathValue::Segments(vec![])), "");
    }

    #[test]
    fn test_prefixed() {
        let p = PathParam::prefixed("p", PathParam::segment("prefixed")).unwrap();
        assert_eq!(p.to_string(), "/{prefixed}");
        assert_eq!(p.detailed(), "/{prefixed : String=/p/<segment>}");
        assert_eq!(build(&p, "a".into()), "/p/a");
        assert_eq!(scan(&p, "/abc/def"), (None, Some("abc")));
        assert_eq!(scan(&p, "/p/def/ghi"), (Some("def".into()), Some("ghi")));

        // prefix consumed, but nothing follows
        let mut scanner = PathScanner::new("/p");
        assert_eq!(p.parse(&mut scanner), None);
        assert_eq!(scanner.segment(), None);
    }

    #[test]
    fn test_optional() {
        let p = PathParam::optional(PathParam::converting(PathParam::segment("page"), Conversion::Integer).unwrap());
        assert_eq!(p.value_type().to_string(), "Option<Integer>");
        assert_eq!(p.detailed(), "/{page : Option<Integer>=/<segment>?}");
        assert_eq!(
            scan(&p, "/3/x"),
            (Some(PathValue::some(PathValue::Integer(3))), Some("x"))
        );
        assert_eq!(scan(&p, "/x"), (Some(PathValue::none()), Some("x")));
        assert_eq!(build(&p, PathValue::none()), "");
        assert_eq!(build(&p, PathValue::some(PathValue::Integer(3))), "/3");
    }

    #[test]
    fn test_build_type_mismatch() {
        let p = PathParam::segment("p1");
        let mut out = String::new();
        let err = p
            .build_path(&PathValue::Integer(1), &PercentEncoder, &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_build_empty_value() {
        let p = PathParam::segment("p1");
        let mut out = String::new();
        assert_eq!(
            p.build_path(&"".into(), &PercentEncoder, &mut out),
            Err(Error::EmptyValue { param: "p1".into() })
        );
    }
}
