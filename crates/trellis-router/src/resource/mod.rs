//! The resource tree
//!
//! Every [`Resource`] extends its parent by exactly one [`ResourceEdge`]: a
//! constant segment or a path parameter. Children are kept sorted, constants
//! before path parameters and each group by name, which fixes the order in
//! which siblings are tried when matching.
//!
//! Children are published copy-on-write: inserting one stores a new sorted
//! vector with a single atomic swap, so a concurrent reader sees either the
//! old or the new vector, never a half-sorted one.

use arc_swap::{ArcSwap, ArcSwapOption};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::error::{Error, Result};
use crate::param::PathParamRef;
use crate::route::Route;

mod matching;

pub use matching::{Match, PathParamValues};

/// How a resource extends its parent
#[derive(Debug, Clone)]
pub enum ResourceEdge {
    Root,
    Segment(String),
    PathParam(PathParamRef),
}

impl ResourceEdge {
    /// Sort key among siblings: constants first, then path parameters
    fn sort_key(&self) -> (u8, &str) {
        match self {
            ResourceEdge::Root => (0, ""),
            ResourceEdge::Segment(s) => (1, s),
            ResourceEdge::PathParam(p) => (2, p.name()),
        }
    }
}

/// Opaque data attached to a resource, such as a controller
pub struct ResourceData {
    value: Box<dyn Any + Send + Sync>,
    description: String,
}

impl ResourceData {
    pub fn new<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Self {
            description: format!("{:?}", value),
            value: Box::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl fmt::Display for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// A node of the resource tree
pub struct Resource {
    parent: Weak<Resource>,
    edge: ResourceEdge,
    route: Route,
    children: ArcSwap<Vec<Arc<Resource>>>,
    data: ArcSwapOption<ResourceData>,
}

impl Resource {
    /// Creates the root of a new tree
    pub fn root() -> Arc<Resource> {
        Arc::new(Resource {
            parent: Weak::new(),
            edge: ResourceEdge::Root,
            route: Route::Root,
            children: ArcSwap::from_pointee(Vec::new()),
            data: ArcSwapOption::empty(),
        })
    }

    /// Returns the child for a constant segment, creating it if needed
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::{PathParam, Resource};
    ///
    /// let root = Resource::root();
    /// let users = root.add_segment("users").unwrap();
    /// let user = users.add_path_param(PathParam::segment("id")).unwrap();
    ///
    /// assert_eq!(user.route().to_string(), "/users/{id}");
    /// assert!(std::sync::Arc::ptr_eq(&users, &root.add_segment("users").unwrap()));
    /// ```
    pub fn add_segment(self: &Arc<Self>, segment: &str) -> Result<Arc<Resource>> {
        if segment.is_empty() {
            return Err(Error::EmptySegment);
        }
        if segment.contains('/') {
            return Err(Error::InvalidSegment(segment.to_string()));
        }
        if let Some(child) = self.child_segment(segment) {
            return Ok(child);
        }

        let route = self.route.add_segment(segment);
        Ok(self.insert_child(ResourceEdge::Segment(segment.to_string()), route))
    }

    /// Returns the child for a path parameter, creating it if needed
    ///
    /// # Errors
    ///
    /// [`Error::DuplicatePathParam`] if this resource or one of its ancestors
    /// already uses a parameter of the same name.
    pub fn add_path_param(self: &Arc<Self>, param: PathParamRef) -> Result<Arc<Resource>> {
        if let Some(child) = self
            .children()
            .iter()
            .find(|c| matches!(&c.edge, ResourceEdge::PathParam(p) if Arc::ptr_eq(p, &param)))
        {
            return Ok(Arc::clone(child));
        }

        let mut ancestor = Some(Arc::clone(self));
        while let Some(resource) = ancestor {
            if let ResourceEdge::PathParam(p) = &resource.edge {
                if p.name() == param.name() {
                    return Err(Error::DuplicatePathParam {
                        name: param.name().to_string(),
                        ancestor: resource.route.to_string(),
                    });
                }
            }
            ancestor = resource.parent();
        }

        let route = self.route.add_path_param(Arc::clone(&param));
        Ok(self.insert_child(ResourceEdge::PathParam(param), route))
    }

    fn insert_child(self: &Arc<Self>, edge: ResourceEdge, route: Route) -> Arc<Resource> {
        let child = Arc::new(Resource {
            parent: Arc::downgrade(self),
            edge,
            route,
            children: ArcSwap::from_pointee(Vec::new()),
            data: ArcSwapOption::empty(),
        });

        self.children.rcu(|children| {
            let mut children = Vec::clone(children);
            children.push(Arc::clone(&child));
            children.sort_by(|a, b| compare(a, b));
            children
        });

        debug!(parent = %self.route, child = %child.route, "added resource");
        child
    }

    pub fn edge(&self) -> &ResourceEdge {
        &self.edge
    }

    /// The constant segment this resource adds, if any
    pub fn segment(&self) -> Option<&str> {
        match &self.edge {
            ResourceEdge::Segment(s) => Some(s),
            _ => None,
        }
    }

    /// The path parameter this resource adds, if any
    pub fn path_param(&self) -> Option<&PathParamRef> {
        match &self.edge {
            ResourceEdge::PathParam(p) => Some(p),
            _ => None,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn is_root(&self) -> bool {
        matches!(self.edge, ResourceEdge::Root)
    }

    pub fn parent(&self) -> Option<Arc<Resource>> {
        self.parent.upgrade()
    }

    /// Returns the root of the tree this resource belongs to
    pub fn tree_root(self: &Arc<Self>) -> Arc<Resource> {
        let mut resource = Arc::clone(self);
        while let Some(parent) = resource.parent() {
            resource = parent;
        }
        resource
    }

    /// Snapshot of the sorted children
    pub fn children(&self) -> Arc<Vec<Arc<Resource>>> {
        self.children.load_full()
    }

    pub fn child_count(&self) -> usize {
        self.children.load().len()
    }

    pub fn child_segment(&self, segment: &str) -> Option<Arc<Resource>> {
        self.children
            .load()
            .iter()
            .find(|c| c.segment() == Some(segment))
            .cloned()
    }

    pub fn data(&self) -> Option<Arc<ResourceData>> {
        self.data.load_full()
    }

    pub fn set_data(&self, data: ResourceData) {
        self.data.store(Some(Arc::new(data)));
    }

    /// Number of resources in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.load().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Iterates this subtree depth-first, parents before children
    pub fn iter(self: &Arc<Self>) -> Iter {
        Iter {
            stack: vec![Arc::clone(self)],
        }
    }

    /// Finds the resource in this subtree whose route prints as `route`
    pub fn find(self: &Arc<Self>, route: &str) -> Option<Arc<Resource>> {
        self.iter().find(|r| r.route.to_string() == route)
    }

    /// Writes the subtree, one resource per line with its data
    pub fn print(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let route = self.route.to_string();
        match self.data() {
            Some(data) => writeln!(out, "{:<30} {}", route, data)?,
            None => writeln!(out, "{}", route)?,
        }
        self.children.load().iter().try_for_each(|c| c.print(out))
    }
}

fn compare(a: &Resource, b: &Resource) -> Ordering {
    a.edge.sort_key().cmp(&b.edge.sort_key())
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("route", &self.route.to_string())
            .field("children", &self.child_count())
            .field("data", &self.data())
            .finish()
    }
}

/// Depth-first iterator over a resource subtree
pub struct Iter {
    stack: Vec<Arc<Resource>>,
}

impl Iterator for Iter {
    type Item = Arc<Resource>;

    fn next(&mut self) -> Option<Self::Item> {
        let resource = self.stack.pop()?;
        self.stack.extend(resource.children().iter().rev().cloned());
        Some(resource)
    }
}
