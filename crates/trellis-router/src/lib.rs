//! # Trellis Router
//!
//! Resource routing and URL building:
//! - Match a request path against a tree of resources, collecting typed
//!   path parameter values (`/users/42` → resource `/users/{id}`, `id = "42"`)
//! - Build the canonical path of a resource from parameter values
//!
//! Matching and building are inverses: building the values of a complete
//! match yields a path that matches the same resource with the same values.
//!
//! ## Resources
//!
//! A tree is declared once at startup. Each resource extends its parent by
//! one constant segment or one [`PathParam`]. Siblings are tried in a fixed
//! order: constants first, then path parameters, each group by name.
//!
//! ## Path parameters
//!
//! - Single segment (`/{id}`)
//! - Wildcard segment (`id*` matches `/id42`)
//! - Regex with one capture group and a build pattern
//! - Year/month/day (`/2013/01/31`)
//! - Multi-segment, greedy (`/a/b/c`)
//! - Prefixed, converting (integer, `yyyymmdd` date) and optional wrappers
//!
//! ## Example
//!
//! ```
//! use trellis_router::{PathParam, PathValue, PercentEncoder, Resource};
//!
//! let root = Resource::root();
//! let user = root
//!     .add_segment("users").unwrap()
//!     .add_path_param(PathParam::segment("id")).unwrap();
//!
//! let m = root.match_path("/users/42");
//! assert!(m.complete);
//! assert_eq!(m.params.get("id"), Some(&PathValue::from("42")));
//!
//! let path = user.route().build(&[Some("42".into())], &PercentEncoder).unwrap();
//! assert_eq!(path, "/users/42");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod encoder;
pub mod error;
pub mod param;
pub mod path;
pub mod resource;
pub mod route;
pub mod tree;
pub mod url;

// ============================================================================
// Re-exports
// ============================================================================

pub use encoder::{PercentEncoder, UriEncoder};
pub use error::{Error, Result};
pub use param::{
    Conversion, DateFactory, PathParam, PathParamKind, PathParamMap, PathParamProvider,
    PathParamRef, PathValue, ValueType,
};
pub use path::{Path, PathScanner, ScanMark, ScanMatch};
pub use resource::{Match, PathParamValues, Resource, ResourceData, ResourceEdge};
pub use route::Route;
pub use tree::SharedTree;
pub use url::{QueryParam, Url};
