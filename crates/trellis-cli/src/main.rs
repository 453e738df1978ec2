mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about = "Trellis CLI - resource routes and URL building", long_about = None)]
struct Cli {
    /// Route declarations file
    #[arg(short, long, global = true, default_value = trellis::CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource tree
    Routes {
        /// Show parameter types and patterns
        #[arg(short, long)]
        detailed: bool,
    },

    /// Match a request path against the resource tree
    Match {
        /// Request path, e.g. /users/42
        path: String,

        /// Print the match as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the URL of a resource
    Build {
        /// Route of the resource, e.g. "/users/{id}"
        route: String,

        /// Path parameter values in route order ("-" leaves an optional parameter out)
        values: Vec<String>,

        /// Query parameter as name=value (repeatable)
        #[arg(short, long)]
        query: Vec<String>,

        /// URL fragment
        #[arg(short, long)]
        fragment: Option<String>,
    },

    /// Reload the resource tree whenever the declarations change
    Watch,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Execute command
    match cli.command {
        Commands::Routes { detailed } => {
            commands::routes::execute(&cli.config, detailed)?;
        }
        Commands::Match { path, json } => {
            commands::match_path::execute(&cli.config, &path, json)?;
        }
        Commands::Build {
            route,
            values,
            query,
            fragment,
        } => {
            commands::build::execute(&cli.config, &route, &values, &query, fragment.as_deref())?;
        }
        Commands::Watch => {
            commands::watch::execute(&cli.config)?;
        }
    }

    Ok(())
}
