//! Routes: the immutable root-to-resource structure used to build paths
//!
//! A route is grown one step at a time as resources are declared. Consecutive
//! constant segments are merged into one fragment; each path parameter gets
//! the next index into a flat value array.

use std::fmt;
use std::sync::Arc;

use crate::encoder::{PercentEncoder, UriEncoder};
use crate::error::{Error, Result};
use crate::param::{PathParam, PathParamProvider, PathParamRef, PathValue};

/// An immutable route
///
/// ```
/// use trellis_router::{PathParam, PercentEncoder, Route};
///
/// let route = Route::Root
///     .add_segment("users")
///     .add_path_param(PathParam::segment("id"));
///
/// assert_eq!(route.to_string(), "/users/{id}");
/// assert_eq!(route.build(&[Some("42".into())], &PercentEncoder).unwrap(), "/users/42");
/// ```
#[derive(Debug, Clone)]
pub enum Route {
    /// The empty route, built as `/`
    Root,
    /// An already escaped constant path, or an absolute URL prefix
    Constant(String),
    /// A single path parameter with its value index
    Param { param: PathParamRef, index: usize },
    /// Constant and parameter fragments, in order
    List { parts: Vec<Route>, param_count: usize },
}

impl Route {
    /// Creates a constant route; `""` and `"/"` give the root route
    pub fn constant(path: &str) -> Route {
        if path.is_empty() || path == "/" {
            Route::Root
        } else {
            Route::Constant(path.to_string())
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Route::Root)
    }

    /// Returns a route extended by one percent-encoded segment
    ///
    /// An empty segment returns an unchanged copy.
    pub fn add_segment(&self, segment: &str) -> Route {
        if segment.is_empty() {
            return self.clone();
        }
        self.add_escaped_segment(&PercentEncoder.encode(segment))
    }

    fn add_escaped_segment(&self, segment: &str) -> Route {
        match self {
            Route::Root => Route::Constant(format!("/{}", segment)),
            Route::Constant(path) => {
                let mut path = path.clone();
                if !path.ends_with('/') {
                    path.push('/');
                }
                path.push_str(segment);
                Route::Constant(path)
            }
            Route::Param { .. } => self.add(Route::Constant(format!("/{}", segment))),
            Route::List { parts, param_count } => match parts.split_last() {
                Some((last @ Route::Constant(_), init)) => {
                    let mut parts = init.to_vec();
                    parts.push(last.add_escaped_segment(segment));
                    Route::List {
                        parts,
                        param_count: *param_count,
                    }
                }
                _ => self.add(Route::Constant(format!("/{}", segment))),
            },
        }
    }

    /// Returns a route extended by a path parameter with the next index
    pub fn add_path_param(&self, param: PathParamRef) -> Route {
        self.add(Route::Param {
            param,
            index: self.path_param_count(),
        })
    }

    fn add(&self, route: Route) -> Route {
        let added = route.path_param_count();
        match self {
            Route::Root => route,
            Route::Constant(_) | Route::Param { .. } => Route::List {
                param_count: self.path_param_count() + added,
                parts: vec![self.clone(), route],
            },
            Route::List { parts, param_count } => {
                let mut parts = parts.clone();
                parts.push(route);
                Route::List {
                    parts,
                    param_count: param_count + added,
                }
            }
        }
    }

    /// Number of fragments
    pub fn size(&self) -> usize {
        match self {
            Route::List { parts, .. } => parts.len(),
            _ => 1,
        }
    }

    pub fn path_param_count(&self) -> usize {
        match self {
            Route::Root | Route::Constant(_) => 0,
            Route::Param { .. } => 1,
            Route::List { param_count, .. } => *param_count,
        }
    }

    /// Returns the path parameter at a value index
    pub fn path_param(&self, index: usize) -> Option<&PathParamRef> {
        match self {
            Route::Param { param, index: i } if *i == index => Some(param),
            Route::List { parts, .. } => parts.iter().find_map(|p| p.path_param(index)),
            _ => None,
        }
    }

    /// Returns the value index of a path parameter
    ///
    /// Parameters are identified by name, which is unique along a route.
    pub fn index_of(&self, param: &PathParam) -> Option<usize> {
        match self {
            Route::Param { param: p, index } if p.name() == param.name() => Some(*index),
            Route::List { parts, .. } => parts.iter().find_map(|p| p.index_of(param)),
            _ => None,
        }
    }

    /// Iterates the path parameters in index order
    pub fn path_params(&self) -> impl Iterator<Item = &PathParamRef> {
        (0..self.path_param_count()).filter_map(move |i| self.path_param(i))
    }

    /// Copies the value of every path parameter from a provider into `values`
    ///
    /// `values` is indexed like the route's parameters; slots beyond its end
    /// are skipped.
    pub fn extract_path_params(
        &self,
        provider: &dyn PathParamProvider,
        values: &mut [Option<PathValue>],
    ) {
        match self {
            Route::Param { param, index } => {
                if let Some(slot) = values.get_mut(*index) {
                    *slot = provider.path_param(param).cloned();
                }
            }
            Route::List { parts, .. } => {
                for part in parts {
                    part.extract_path_params(provider, values);
                }
            }
            Route::Root | Route::Constant(_) => {}
        }
    }

    /// Builds the path string for the given parameter values
    ///
    /// # Errors
    ///
    /// - [`Error::ValueCount`] if `values` is shorter than the parameter count
    /// - [`Error::MissingValue`] if a parameter has no value
    /// - [`Error::TypeMismatch`] if a value does not fit its parameter
    pub fn build(&self, values: &[Option<PathValue>], encoder: &dyn UriEncoder) -> Result<String> {
        let mut out = String::new();
        self.build_into(values, encoder, &mut out)?;
        Ok(out)
    }

    /// Appends the path to `out`, which may already hold a URL prefix
    pub fn build_into(
        &self,
        values: &[Option<PathValue>],
        encoder: &dyn UriEncoder,
        out: &mut String,
    ) -> Result<()> {
        if values.len() < self.path_param_count() {
            return Err(Error::ValueCount {
                expected: self.path_param_count(),
                found: values.len(),
            });
        }
        self.build_fragment(values, encoder, out)?;
        if out.is_empty() {
            out.push('/');
        }
        Ok(())
    }

    fn build_fragment(
        &self,
        values: &[Option<PathValue>],
        encoder: &dyn UriEncoder,
        out: &mut String,
    ) -> Result<()> {
        match self {
            Route::Root => {
                if out.is_empty() {
                    out.push('/');
                }
                Ok(())
            }
            Route::Constant(path) => {
                remove_last_slash(out);
                out.push_str(path);
                Ok(())
            }
            Route::Param { param, index } => {
                let value = values[*index].as_ref().ok_or_else(|| Error::MissingValue {
                    param: param.name().to_string(),
                    index: *index,
                })?;
                if !param.accepts(value) {
                    return Err(Error::TypeMismatch {
                        param: param.detailed(),
                        found: value.to_string(),
                    });
                }
                remove_last_slash(out);
                param.build_path(value, encoder, out)
            }
            Route::List { parts, .. } => parts
                .iter()
                .try_for_each(|part| part.build_fragment(values, encoder, out)),
        }
    }
}

fn remove_last_slash(out: &mut String) {
    if out.ends_with('/') {
        out.pop();
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Root => f.write_str("/"),
            Route::Constant(path) => f.write_str(path),
            Route::Param { param, .. } => write!(f, "{}", param),
            Route::List { parts, .. } => parts.iter().try_for_each(|p| write!(f, "{}", p)),
        }
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Route::Root, Route::Root) => true,
            (Route::Constant(a), Route::Constant(b)) => a == b,
            (Route::Param { param: a, index: i }, Route::Param { param: b, index: j }) => {
                i == j && Arc::ptr_eq(a, b)
            }
            (Route::List { parts: a, .. }, Route::List { parts: b, .. }) => a == b,
            _ => false,
        }
    }
}
