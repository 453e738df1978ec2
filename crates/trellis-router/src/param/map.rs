//! Registry of declared path parameters

use indexmap::IndexMap;
use std::sync::Arc;

use super::{PathParam, PathParamRef};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Entry {
    param: PathParamRef,
    constant: Option<String>,
}

/// Maps names to path parameters, in registration order
///
/// A map is filled once and then sealed; adding to a sealed map is an error.
/// Parameters may be registered under a constant name of a named holder
/// (for example the module declaring them), which is only used to describe
/// a parameter in diagnostics.
///
/// # Examples
///
/// ```
/// use trellis_router::{PathParam, PathParamMap};
///
/// let mut map = PathParamMap::with_holder("shop::params");
/// let id = map.add_constant("ID", PathParam::segment("id")).unwrap();
/// map.seal();
///
/// assert!(map.add(PathParam::segment("other")).is_err());
/// assert_eq!(map.constant(&id).unwrap(), "shop::params::ID");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathParamMap {
    holder: Option<String>,
    entries: IndexMap<String, Entry>,
    sealed: bool,
}

impl PathParamMap {
    /// Creates an empty, unsealed map
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map whose constants live in `holder`
    pub fn with_holder(holder: &str) -> Self {
        Self {
            holder: Some(holder.to_string()),
            ..Self::default()
        }
    }

    /// Registers a parameter, returning it for convenient binding
    pub fn add(&mut self, param: PathParamRef) -> Result<PathParamRef> {
        self.insert(param, None)
    }

    /// Registers a parameter under a constant name of the holder
    pub fn add_constant(&mut self, constant: &str, param: PathParamRef) -> Result<PathParamRef> {
        self.insert(param, Some(constant.to_string()))
    }

    /// Registers a parameter, then seals the map
    pub fn add_and_seal(&mut self, param: PathParamRef) -> Result<PathParamRef> {
        let param = self.add(param)?;
        self.seal();
        Ok(param)
    }

    fn insert(&mut self, param: PathParamRef, constant: Option<String>) -> Result<PathParamRef> {
        if self.sealed {
            return Err(Error::MapSealed(param.name().to_string()));
        }
        if self.entries.contains_key(param.name()) {
            return Err(Error::DuplicateName(param.name().to_string()));
        }

        self.entries.insert(
            param.name().to_string(),
            Entry {
                param: Arc::clone(&param),
                constant,
            },
        );
        Ok(param)
    }

    /// Seals the map; sealing twice has no further effect
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn get(&self, name: &str) -> Option<&PathParamRef> {
        self.entries.get(name).map(|e| &e.param)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the parameters in registration order
    pub fn iter(&self) -> impl Iterator<Item = &PathParamRef> {
        self.entries.values().map(|e| &e.param)
    }

    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    /// Returns the constant name `param` was registered under
    ///
    /// Only the registered instance is found, not an equal parameter
    /// created separately.
    pub fn constant_name(&self, param: &PathParam) -> Option<&str> {
        self.entries
            .get(param.name())
            .filter(|e| std::ptr::eq(Arc::as_ptr(&e.param), param))
            .and_then(|e| e.constant.as_deref())
    }

    /// Returns the qualified constant `holder::NAME` declaring `param`
    pub fn constant(&self, param: &PathParam) -> Result<String> {
        match (self.holder(), self.constant_name(param)) {
            (Some(holder), Some(name)) => Ok(format!("{}::{}", holder, name)),
            (holder, _) => Err(Error::NoConstant {
                param: param.to_string(),
                holder: holder.unwrap_or("<none>").to_string(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a PathParamMap {
    type Item = &'a PathParamRef;
    type IntoIter = Box<dyn Iterator<Item = &'a PathParamRef> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
