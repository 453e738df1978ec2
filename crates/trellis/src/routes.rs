//! Building the path parameter registry and resource tree from declarations

use anyhow::{anyhow, bail, Context, Result};
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::debug;
use trellis_router::{
    Conversion, Path, PathParam, PathParamMap, PathParamRef, Resource, ResourceData, Url,
};

use crate::config::{Config, ParamKind};

/// A segment of a declared route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSegment {
    /// `{name}`: a reference to a declared path parameter
    Param(String),
    /// Any other text
    Constant(String),
}

/// Classifies one segment of a declared route (pure function)
///
/// # Examples
///
/// ```
/// use trellis::routes::{classify_segment, RouteSegment};
///
/// assert_eq!(classify_segment("users"), RouteSegment::Constant("users".into()));
/// assert_eq!(classify_segment("{id}"), RouteSegment::Param("id".into()));
/// ```
pub fn classify_segment(segment: &str) -> RouteSegment {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(name) => RouteSegment::Param(name.trim().to_string()),
        None => RouteSegment::Constant(segment.to_string()),
    }
}

/// Splits a declared route into classified segments, skipping empty ones
pub fn parse_route(route: &str) -> Vec<RouteSegment> {
    route
        .split('/')
        .filter(|s| !s.is_empty())
        .map(classify_segment)
        .collect()
}

/// Creates a path parameter from its declared kind
pub fn build_param(name: &str, kind: &ParamKind) -> trellis_router::Result<PathParamRef> {
    match kind {
        ParamKind::Segment => Ok(PathParam::segment(name)),
        ParamKind::SegmentPattern { pattern } => PathParam::segment_pattern(name, pattern),
        ParamKind::Regex { pattern, build } => PathParam::pattern(name, pattern, build),
        ParamKind::YearMonthDay => Ok(PathParam::year_month_day(name)),
        ParamKind::MultiSegment { min } => Ok(PathParam::multi_segment(name, *min)),
        ParamKind::Prefixed { prefix, inner } => {
            PathParam::prefixed(prefix, build_param(name, inner)?)
        }
        ParamKind::Integer { inner } => converting(name, inner.as_deref(), Conversion::Integer),
        ParamKind::Date { inner } => converting(name, inner.as_deref(), Conversion::Date),
        ParamKind::Optional { inner } => Ok(PathParam::optional(build_param(name, inner)?)),
    }
}

fn converting(
    name: &str,
    inner: Option<&ParamKind>,
    conversion: Conversion,
) -> trellis_router::Result<PathParamRef> {
    let inner = match inner {
        Some(kind) => build_param(name, kind)?,
        None => PathParam::segment(name),
    };
    PathParam::converting(inner, conversion)
}

/// Declared path parameters and the resource tree built from them
#[derive(Debug)]
pub struct RouteTable {
    pub params: PathParamMap,
    pub root: Arc<Resource>,
    pub app_path: Path,
    pub default_extension: Option<String>,
}

impl RouteTable {
    /// Builds the parameter registry and the resource tree
    ///
    /// The registry is sealed once every declared parameter is added.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut params = PathParamMap::with_holder(&config.routing.params_holder);
        for decl in &config.params {
            let param = build_param(&decl.name, &decl.kind)
                .with_context(|| format!("Invalid path parameter '{}'", decl.name))?;
            params.add_constant(&decl.name, param)?;
        }
        params.seal();

        let root = Resource::root();
        for decl in &config.resources {
            let resource = add_route(&root, &params, &decl.route)
                .with_context(|| format!("Invalid resource route '{}'", decl.route))?;
            if let Some(data) = &decl.data {
                resource.set_data(ResourceData::new(data.clone()));
            }
        }

        debug!(
            params = params.len(),
            resources = root.size(),
            "built route table"
        );

        Ok(Self {
            params,
            root,
            app_path: Path::new(&config.routing.app_path),
            default_extension: config.routing.default_extension.clone(),
        })
    }

    /// Loads a config file and builds its route table
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self> {
        let config = crate::config::Config::load(path)?;
        Self::from_config(&config)
    }

    /// Finds a resource by its route, e.g. `/users/{id}`
    pub fn resource(&self, route: &str) -> Option<Arc<Resource>> {
        let route = trellis_router::path::normalize(route);
        let route = if route.is_empty() { "/" } else { &route };
        self.root.find(route)
    }

    /// Creates a URL for a resource with the application path and default extension
    pub fn url(&self, resource: &Arc<Resource>) -> Url {
        let mut url = Url::for_resource(resource, &self.app_path);
        url.set_extension(self.default_extension.as_deref());
        url
    }
}

/// Adds the resources of a declared route below `root`, returning the last one
fn add_route(root: &Arc<Resource>, params: &PathParamMap, route: &str) -> Result<Arc<Resource>> {
    let mut resource = Arc::clone(root);
    for segment in parse_route(route) {
        resource = match segment {
            RouteSegment::Constant(segment) => resource.add_segment(&segment)?,
            RouteSegment::Param(name) => {
                if name.is_empty() {
                    bail!("empty path parameter reference");
                }
                let param = params
                    .get(&name)
                    .ok_or_else(|| anyhow!("Unknown path parameter '{}'", name))?;
                resource.add_path_param(Arc::clone(param))?
            }
        };
    }
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use trellis_router::{PathValue, PercentEncoder};

    fn table(toml: &str) -> Result<RouteTable> {
        RouteTable::from_config(&Config::parse(toml)?)
    }

    const SHOP: &str = r#"
        [routing]
        app_path = "/app"
        default_extension = "html"

        [[params]]
        name = "id"
        kind = "segment"

        [[params]]
        name = "day"
        kind = "year-month-day"

        [[resources]]
        route = "/"
        data = "Index"

        [[resources]]
        route = "/users/{id}"
        data = "UserController"

        [[resources]]
        route = "/users/new"

        [[resources]]
        route = "/archive/{day}"
    "#;

    #[rstest]
    #[case("users", RouteSegment::Constant("users".into()))]
    #[case("{id}", RouteSegment::Param("id".into()))]
    #[case("{ id }", RouteSegment::Param("id".into()))]
    #[case("{id", RouteSegment::Constant("{id".into()))]
    fn test_classify_segment(#[case] segment: &str, #[case] expected: RouteSegment) {
        assert_eq!(classify_segment(segment), expected);
    }

    #[test]
    fn test_parse_route() {
        assert_eq!(parse_route("/"), vec![]);
        assert_eq!(
            parse_route("/users//{id}/"),
            vec![
                RouteSegment::Constant("users".into()),
                RouteSegment::Param("id".into())
            ]
        );
    }

    #[test]
    fn test_from_config() {
        let table = table(SHOP).unwrap();
        assert!(table.params.is_sealed());
        assert_eq!(table.params.len(), 2);
        assert_eq!(table.root.size(), 6);

        let users = table.resource("/users").unwrap();
        let names: Vec<String> = users.children().iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["/users/new", "/users/{id}"]);

        let user = table.resource("/users/{id}").unwrap();
        let data = user.data().unwrap();
        assert_eq!(data.downcast_ref::<String>().unwrap(), "UserController");
        assert!(table.resource("/").unwrap().data().is_some());
    }

    #[test]
    fn test_match_and_url() {
        let table = table(SHOP).unwrap();
        let m = table.root.match_path("/users/42.html");
        assert!(m.complete);
        assert_eq!(m.resource.to_string(), "/users/{id}");
        assert_eq!(m.params.get("id"), Some(&PathValue::from("42")));

        let mut url = table.url(&m.resource);
        url.copy_path_params(&m.params);
        assert_eq!(url.build(&PercentEncoder).unwrap(), "/app/users/42.html");
    }

    #[test]
    fn test_params_constant() {
        let table = table(SHOP).unwrap();
        let id = table.params.get("id").unwrap();
        assert_eq!(table.params.constant(id).unwrap(), "params::id");
    }

    #[test]
    fn test_unknown_param() {
        let err = table(
            r#"
            [[resources]]
            route = "/users/{id}"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown path parameter 'id'"));
    }

    #[test]
    fn test_duplicate_param_on_chain() {
        let err = table(
            r#"
            [[params]]
            name = "id"
            kind = "segment"

            [[resources]]
            route = "/{id}/x/{id}"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("already used"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = table(
            r#"
            [[params]]
            name = "sku"
            kind = "segment-pattern"
            pattern = "sku"
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid path parameter 'sku'"));
    }

    #[test]
    fn test_build_param_kinds() {
        let nr = build_param(
            "nr",
            &ParamKind::Integer {
                inner: Some(Box::new(ParamKind::Regex {
                    pattern: "nr([0-9]+)".into(),
                    build: "nr*".into(),
                })),
            },
        )
        .unwrap();
        assert_eq!(nr.detailed(), "/{nr : Integer=nr([0-9]+)}");

        let tag = build_param(
            "tag",
            &ParamKind::Prefixed {
                prefix: "t".into(),
                inner: Box::new(ParamKind::Segment),
            },
        )
        .unwrap();
        assert_eq!(tag.detailed(), "/{tag : String=/t/<segment>}");

        let since = build_param("since", &ParamKind::Date { inner: None }).unwrap();
        assert_eq!(since.detailed(), "/{since : Date=/<segment>}");
    }
}
