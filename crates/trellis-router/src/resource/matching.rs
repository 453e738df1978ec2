use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use tracing::trace;

use super::{Resource, ResourceEdge};
use crate::param::{PathParam, PathParamProvider, PathParamRef, PathValue};
use crate::path::PathScanner;

/// Path parameter values collected while matching, in root-to-leaf order
#[derive(Debug, Clone, Default)]
pub struct PathParamValues {
    values: IndexMap<String, (PathParamRef, PathValue)>,
}

impl PathParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, param: PathParamRef, value: PathValue) {
        self.values.insert(param.name().to_string(), (param, value));
    }

    /// Returns the value of the parameter with this name
    pub fn get(&self, name: &str) -> Option<&PathValue> {
        self.values.get(name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathParamRef, &PathValue)> {
        self.values.values().map(|(p, v)| (p, v))
    }
}

impl PathParamProvider for PathParamValues {
    fn path_param(&self, param: &PathParam) -> Option<&PathValue> {
        self.get(param.name())
    }
}

impl Serialize for PathParamValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, (_, value)) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of matching a path against a resource tree
///
/// An unmatched or partially matched path is not an error: `resource` is
/// the deepest resource reached and `complete` is false.
#[derive(Debug, Clone)]
pub struct Match {
    pub resource: Arc<Resource>,
    pub complete: bool,
    pub params: PathParamValues,
}

impl Resource {
    /// Matches a path against this subtree
    ///
    /// Descends one level at a time, trying children in their sorted order.
    /// The first child that accepts the current position wins; there is no
    /// backtracking into siblings once a child matched.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::{PathParam, PathValue, Resource};
    ///
    /// let root = Resource::root();
    /// let user = root
    ///     .add_segment("users").unwrap()
    ///     .add_path_param(PathParam::segment("id")).unwrap();
    ///
    /// let m = root.match_path("/users/42");
    /// assert!(m.complete);
    /// assert!(std::sync::Arc::ptr_eq(&m.resource, &user));
    /// assert_eq!(m.params.get("id"), Some(&PathValue::from("42")));
    /// ```
    pub fn match_path(self: &Arc<Self>, path: &str) -> Match {
        let mut scanner = PathScanner::new(path);
        let mut params = PathParamValues::new();
        let mut resource = Arc::clone(self);

        while let Some(child) = resource.match_child(&mut scanner, &mut params) {
            resource = child;
        }

        let complete = !scanner.has_more();
        trace!(path, resource = %resource.route, complete, "matched path");

        Match {
            resource,
            complete,
            params,
        }
    }

    fn match_child(
        &self,
        scanner: &mut PathScanner<'_>,
        params: &mut PathParamValues,
    ) -> Option<Arc<Resource>> {
        self.children
            .load()
            .iter()
            .find(|child| child.accepts(scanner, params))
            .cloned()
    }

    fn accepts(&self, scanner: &mut PathScanner<'_>, params: &mut PathParamValues) -> bool {
        match &self.edge {
            ResourceEdge::Segment(segment) => {
                if scanner.match_segment(segment) {
                    scanner.next();
                    true
                } else {
                    false
                }
            }
            ResourceEdge::PathParam(param) => {
                let mark = scanner.mark();
                match param.parse(scanner) {
                    Some(value) => {
                        params.insert(Arc::clone(param), value);
                        true
                    }
                    None => {
                        scanner.revert(mark);
                        false
                    }
                }
            }
            ResourceEdge::Root => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_path() {
        let root = Resource::root();
        root.add_segment("a").unwrap();

        for path in ["", "/", "/index.html"] {
            let m = root.match_path(path);
            assert!(m.complete, "{}", path);
            assert!(m.resource.is_root());
            assert!(m.params.is_empty());
        }
    }

    #[test]
    fn test_failed_param_reverts() {
        let root = Resource::root();
        let prefixed = PathParam::prefixed("p", PathParam::segment("v")).unwrap();
        let p = root.add_path_param(prefixed).unwrap();
        let fallback = root.add_path_param(PathParam::segment("z")).unwrap();

        // the prefixed parameter consumes "p" and fails; "z" must see "p" again
        let m = root.match_path("/p");
        assert!(Arc::ptr_eq(&m.resource, &fallback));
        assert_eq!(m.params.get("z"), Some(&PathValue::from("p")));

        let m = root.match_path("/p/q");
        assert!(Arc::ptr_eq(&m.resource, &p));
        assert_eq!(m.params.get("v"), Some(&PathValue::from("q")));
    }

    #[test]
    fn test_params_in_order() {
        let root = Resource::root();
        root.add_path_param(PathParam::segment("b"))
            .unwrap()
            .add_path_param(PathParam::segment("a"))
            .unwrap();

        let m = root.match_path("/1/2");
        let names: Vec<&str> = m.params.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(serde_json::to_string(&m.params).unwrap(), r#"{"b":"1","a":"2"}"#);
    }

    #[test]
    fn test_optional_matches_at_end() {
        let root = Resource::root();
        let list = root.add_segment("list").unwrap();
        let page = list
            .add_path_param(PathParam::optional(PathParam::segment("page")))
            .unwrap();

        let m = root.match_path("/list");
        assert!(m.complete);
        assert!(Arc::ptr_eq(&m.resource, &page));
        assert_eq!(m.params.get("page"), Some(&PathValue::none()));
    }
}
