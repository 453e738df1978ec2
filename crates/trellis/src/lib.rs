// Trellis - declared resource routes with typed path parameters
// Loads trellis.toml into a resource tree and keeps it fresh while developing

pub mod config;
pub mod hot_reload;
pub mod routes;

// Re-export framework types
pub use config::{Config, ParamConfig, ParamKind, ResourceConfig, CONFIG_FILE};
pub use hot_reload::{reload, HotReloadWatcher, ReloadEvent};
pub use routes::{build_param, classify_segment, parse_route, RouteSegment, RouteTable};

// Re-export the router
pub use trellis_router;
pub use trellis_router::{
    Match, PathParam, PathValue, PercentEncoder, Resource, SharedTree, UriEncoder, Url,
};
