/// Errors raised while declaring a resource tree or building paths from it
///
/// None of these describe request conditions: an unmatched request path is a
/// normal [`Match`](crate::Match) with `complete == false`. Every variant here
/// signals a configuration mistake or a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A path parameter name occurs twice on one root-to-leaf chain
    #[error("path parameter '{name}' is already used by ancestor resource {ancestor}")]
    DuplicatePathParam { name: String, ancestor: String },

    /// A resource must extend its parent by a non-empty constant segment
    #[error("a constant resource segment must not be empty")]
    EmptySegment,

    /// A constant resource segment contains a `/` and could never match
    #[error("constant resource segment '{0}' must not contain '/'")]
    InvalidSegment(String),

    /// A wildcard or regex pattern does not have the required shape
    #[error("invalid pattern for path parameter '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    /// `Route::build` was called without a value for a path parameter
    #[error("no value was set for path parameter '{param}' at index {index}")]
    MissingValue { param: String, index: usize },

    /// `Route::build` was called with a value of the wrong type
    #[error("value {found} does not match the type of path parameter '{param}'")]
    TypeMismatch { param: String, found: String },

    /// A path parameter value would render an empty segment
    #[error("path parameter '{param}' cannot be built from an empty value")]
    EmptyValue { param: String },

    /// The value array passed to `Route::build` is shorter than the route's parameter count
    #[error("expected {expected} path parameter values, got {found}")]
    ValueCount { expected: usize, found: usize },

    /// A value slot index beyond the route's parameters
    #[error("path parameter index {index} is out of range, the route has {count}")]
    IndexOutOfRange { index: usize, count: usize },

    /// A path parameter is not part of the route it was used with
    #[error("route does not contain path parameter '{0}'")]
    UnknownPathParam(String),

    /// Mutation of a sealed [`PathParamMap`](crate::PathParamMap)
    #[error("path parameter map is sealed, cannot add '{0}'")]
    MapSealed(String),

    /// A path parameter with the same name is already registered
    #[error("path parameter '{0}' is already registered")]
    DuplicateName(String),

    /// No registered constant holds the path parameter
    #[error("no constant for path parameter '{param}' defined in {holder}")]
    NoConstant { param: String, holder: String },
}

/// Result alias used throughout the router
pub type Result<T> = std::result::Result<T, Error>;
