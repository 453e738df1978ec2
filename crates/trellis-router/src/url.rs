//! URL builder
//!
//! A [`Url`] combines a prefix (usually the application path), the route of a
//! resource with one value slot per path parameter, an optional extension,
//! query parameters and a fragment.

use std::sync::Arc;

use crate::encoder::UriEncoder;
use crate::error::{Error, Result};
use crate::param::{PathParam, PathParamProvider, PathParamRef, PathValue};
use crate::path::Path;
use crate::resource::Resource;

/// A query parameter; a `None` value renders as `name=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    pub value: Option<String>,
}

/// Builds URLs for resources
///
/// ```
/// use trellis_router::{Path, PathParam, PercentEncoder, Resource, Url};
///
/// let root = Resource::root();
/// let user = root
///     .add_segment("users").unwrap()
///     .add_path_param(PathParam::segment("id")).unwrap();
///
/// let mut url = Url::for_resource(&user, &Path::new("/app"));
/// url.set_path_param(0, "42").unwrap()
///     .set_extension(Some("html"))
///     .add_query_param("tab", "a b");
///
/// assert_eq!(url.build(&PercentEncoder).unwrap(), "/app/users/42.html?tab=a%20b");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Url {
    resource: Option<Arc<Resource>>,
    prefix: String,
    values: Vec<Option<PathValue>>,
    additional: Option<Path>,
    extension: Option<String>,
    query: Vec<QueryParam>,
    fragment: Option<String>,
}

impl Url {
    /// Creates a URL for a resource below an application path
    pub fn for_resource(resource: &Arc<Resource>, app_path: &Path) -> Self {
        Self {
            resource: Some(Arc::clone(resource)),
            prefix: app_path.as_str().to_string(),
            values: vec![None; resource.route().path_param_count()],
            ..Self::default()
        }
    }

    /// Creates a URL from a literal string
    pub fn for_path(url: &str) -> Self {
        Self {
            prefix: url.to_string(),
            ..Self::default()
        }
    }

    pub fn resource(&self) -> Option<&Arc<Resource>> {
        self.resource.as_ref()
    }

    /// Puts `url` in front of the current prefix without doubling a `/`
    pub fn prepend(&mut self, url: &str) -> &mut Self {
        if url.ends_with('/') && self.prefix.starts_with('/') {
            self.prefix = format!("{}{}", url, &self.prefix[1..]);
        } else {
            self.prefix = format!("{}{}", url, self.prefix);
        }
        self
    }

    /// Appends a path after the resource route
    pub fn append(&mut self, path: &str) -> &mut Self {
        self.additional = Some(match &self.additional {
            Some(additional) => additional.add(path),
            None => Path::new(path),
        });
        self
    }

    pub fn path_param_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the value in a slot
    pub fn path_param(&self, index: usize) -> Option<&PathValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Returns the path parameter of a slot
    pub fn path_param_def(&self, index: usize) -> Option<&PathParamRef> {
        self.resource.as_ref()?.route().path_param(index)
    }

    /// Sets the value of a slot
    pub fn set_path_param(&mut self, index: usize, value: impl Into<PathValue>) -> Result<&mut Self> {
        let count = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, count })?;
        *slot = Some(value.into());
        Ok(self)
    }

    /// Sets the value of a path parameter of the route
    pub fn set_path_param_for(
        &mut self,
        param: &PathParam,
        value: impl Into<PathValue>,
    ) -> Result<&mut Self> {
        let index = self
            .resource
            .as_ref()
            .and_then(|r| r.route().index_of(param))
            .ok_or_else(|| Error::UnknownPathParam(param.name().to_string()))?;
        self.set_path_param(index, value)
    }

    /// Sets the first slots, in order
    pub fn set_path_params<I, V>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<PathValue>,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.set_path_param(index, value)?;
        }
        Ok(self)
    }

    /// Fills every slot from a provider, such as the values of a matched request
    pub fn copy_path_params(&mut self, provider: &dyn PathParamProvider) -> &mut Self {
        if let Some(resource) = &self.resource {
            resource
                .route()
                .extract_path_params(provider, &mut self.values);
        }
        self
    }

    pub fn clear_path_params(&mut self) -> &mut Self {
        self.values.iter_mut().for_each(|v| *v = None);
        self
    }

    /// Sets the extension appended to the path, without the leading `.`
    pub fn set_extension(&mut self, extension: Option<&str>) -> &mut Self {
        self.extension = extension
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        self
    }

    pub fn set_fragment(&mut self, fragment: Option<&str>) -> &mut Self {
        self.fragment = fragment.map(str::to_string);
        self
    }

    pub fn add_query_param(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.query.push(QueryParam {
            name: name.to_string(),
            value: Some(value.to_string()),
        });
        self
    }

    pub fn add_empty_query_param(&mut self, name: &str) -> &mut Self {
        self.query.push(QueryParam {
            name: name.to_string(),
            value: None,
        });
        self
    }

    pub fn query_param_count(&self) -> usize {
        self.query.len()
    }

    /// Returns the first query parameter with this name
    pub fn query_param(&self, name: &str) -> Option<&QueryParam> {
        self.query.iter().find(|q| q.name == name)
    }

    pub fn query_params(&self) -> &[QueryParam] {
        &self.query
    }

    pub fn remove_query_params(&mut self, name: &str) -> &mut Self {
        self.query.retain(|q| q.name != name);
        self
    }

    pub fn clear_query_params(&mut self) -> &mut Self {
        self.query.clear();
        self
    }

    /// Renders the URL
    ///
    /// # Errors
    ///
    /// Fails like [`Route::build`](crate::Route::build) when a slot has no
    /// value or a value of the wrong type.
    pub fn build(&self, encoder: &dyn UriEncoder) -> Result<String> {
        let mut out = self.prefix.clone();

        if let Some(resource) = &self.resource {
            resource
                .route()
                .build_into(&self.values, encoder, &mut out)?;
        }
        if let Some(additional) = &self.additional {
            additional.add_to(&mut out);
        }
        if let Some(extension) = &self.extension {
            if out.ends_with('/') {
                out.push_str("index");
            }
            out.push('.');
            out.push_str(extension);
        }

        for (i, q) in self.query.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            encoder.encode_into(&q.name, &mut out);
            out.push('=');
            if let Some(value) = &q.value {
                encoder.encode_into(value, &mut out);
            }
        }

        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        Ok(out)
    }
}

impl PathParamProvider for Url {
    fn path_param(&self, param: &PathParam) -> Option<&PathValue> {
        let index = self.resource.as_ref()?.route().index_of(param)?;
        self.path_param(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::PercentEncoder;
    use crate::resource::PathParamValues;
    use pretty_assertions::assert_eq;

    fn tree() -> (Arc<Resource>, PathParamRef, Arc<Resource>) {
        let root = Resource::root();
        let id = PathParam::segment("id");
        let child = root.add_path_param(id.clone()).unwrap();
        (root, id, child)
    }

    #[test]
    fn test_for_path() {
        assert_eq!(Url::for_path("/").build(&PercentEncoder).unwrap(), "/");
        assert_eq!(Url::for_path("index.html").build(&PercentEncoder).unwrap(), "index.html");
        assert_eq!(
            Url::for_path("http://test.com").build(&PercentEncoder).unwrap(),
            "http://test.com"
        );
    }

    #[test]
    fn test_resource_url() {
        let (_, id, child) = tree();
        let mut provider = PathParamValues::new();
        provider.insert(id.clone(), "abc".into());

        let mut url = Url::for_resource(&child, &Path::new("/app"));
        url.copy_path_params(&provider);
        assert_eq!(url.path_param_count(), 1);
        assert_eq!(url.path_param(0), Some(&PathValue::from("abc")));
        assert!(Arc::ptr_eq(url.path_param_def(0).unwrap(), &id));
        assert_eq!(PathParamProvider::path_param(&url, &id), Some(&PathValue::from("abc")));
        assert_eq!(url.build(&PercentEncoder).unwrap(), "/app/abc");

        url.set_path_param(0, "xyz").unwrap();
        assert_eq!(url.path_param(0), Some(&PathValue::from("xyz")));
        url.set_path_param_for(&id, "mno").unwrap();
        assert_eq!(url.path_param(0), Some(&PathValue::from("mno")));
        url.set_path_params(["rst"]).unwrap();
        assert_eq!(url.path_param(0), Some(&PathValue::from("rst")));

        url.clear_path_params();
        assert_eq!(url.path_param(0), None);
        assert!(matches!(url.build(&PercentEncoder), Err(Error::MissingValue { .. })));

        assert_eq!(
            url.set_path_param_for(&PathParam::segment("id2"), "x").unwrap_err(),
            Error::UnknownPathParam("id2".into())
        );
        assert_eq!(
            url.set_path_param(1, "x").unwrap_err(),
            Error::IndexOutOfRange { index: 1, count: 1 }
        );
    }

    #[test]
    fn test_root_resource() {
        let (root, _, _) = tree();
        assert_eq!(Url::for_resource(&root, &Path::ROOT).build(&PercentEncoder).unwrap(), "/");
        assert_eq!(
            Url::for_resource(&root, &Path::new("/app")).build(&PercentEncoder).unwrap(),
            "/app"
        );

        let mut url = Url::for_resource(&root, &Path::ROOT);
        url.set_extension(Some(".html"));
        assert_eq!(url.build(&PercentEncoder).unwrap(), "/index.html");
    }

    #[test]
    fn test_append() {
        let mut url = Url::for_path("/");
        url.append("a");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "/a");
        url.append("/test.xml");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "/a/test.xml");
    }

    #[test]
    fn test_prepend() {
        let mut url = Url::for_path("/users");
        url.prepend("http://host/");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "http://host/users");
        url.prepend("x:");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "x:http://host/users");
    }

    #[test]
    fn test_query_params() {
        let mut url = Url::for_path("index.html");
        assert_eq!(url.query_param_count(), 0);
        url.clear_query_params();

        url.add_empty_query_param("a").add_query_param("b", 2);
        assert_eq!(url.build(&PercentEncoder).unwrap(), "index.html?a=&b=2");
        assert_eq!(url.query_param("a").unwrap().value, None);
        assert!(url.query_param("c").is_none());

        url.add_query_param("a", "#");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "index.html?a=&b=2&a=%23");

        url.remove_query_params("a");
        assert_eq!(url.build(&PercentEncoder).unwrap(), "index.html?b=2");

        url.clear_query_params().add_query_param("b", true);
        url.set_fragment(Some("frag"));
        assert_eq!(url.build(&PercentEncoder).unwrap(), "index.html?b=true#frag");
    }
}
