//! Content router
//!
//! Serves a content repository by resolving request paths against an
//! in-memory route index.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                    CONTENT ROUTER                    │
//!                      │                                                      │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌────────────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ resolver │───▶│ theme → item → │  │
//!                      │  │ server  │    │          │    │ file → rewrite │  │
//!                      │  └─────────┘    └────┬─────┘    └────────────────┘  │
//!                      │                      │ one snapshot per request      │
//!                      │                      ▼                               │
//!   Client Response    │  ┌─────────┐    ┌──────────┐    ┌────────────────┐  │
//!   ◀──────────────────┼──│ render  │◀───│ snapshot │◀───│ scan + rebuild │◀─┼── Repository
//!                      │  │         │    │  store   │    │   (watcher)    │  │   on disk
//!                      │  └─────────┘    └──────────┘    └────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use content_router::config::{load_config, ServerConfig};
use content_router::http::mime;
use content_router::lifecycle;
use content_router::observability::logging::init_logging;
use content_router::repository::build_snapshot;
use content_router::resolve::{Outcome, Resolver};

#[derive(Parser)]
#[command(name = "content-router")]
#[command(about = "Serve a content repository by route", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the repository over HTTP (default)
    Serve,
    /// List every indexed route
    Routes,
    /// Resolve one request path and print the outcome
    Resolve {
        /// Request path, e.g. /docs/intro
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    init_logging(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Routes => list_routes(&config),
        Commands::Resolve { path } => resolve(&config, &path),
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        repository = %config.repository.path.display(),
        bind_address = %config.listener.bind_address,
        "content-router starting"
    );

    lifecycle::serve(config).await?;
    Ok(())
}

fn list_routes(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = build_snapshot(config)?;

    for item in snapshot.items.iter() {
        println!("item  {}", item.route().to_url_path());
        for file in item.files() {
            println!("file  {}", file.route().to_url_path());
        }
    }
    for file in snapshot.files.iter() {
        println!("theme {}", file.route().to_url_path());
    }
    for rule in snapshot.rewrites.rules() {
        println!("rule  {} -> {}", rule.pattern(), rule.target().to_url_path());
    }
    Ok(())
}

fn resolve(config: &ServerConfig, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = Resolver::new(build_snapshot(config)?.into());

    match resolver.resolve(path) {
        Outcome::ResolvedFile(resolved) => {
            let name = resolved.file.route().last_segment().unwrap_or_default();
            println!(
                "file {} via {} stage ({}, {} bytes)",
                resolved.file.route().to_url_path(),
                resolved.stage,
                mime::detect(&resolved.data, name),
                resolved.data.len()
            );
            Ok(())
        }
        Outcome::ResolvedItem(item) => {
            println!(
                "item {} \"{}\" ({}, {} children, {} files)",
                item.route().to_url_path(),
                item.title(),
                item.item_type().as_str(),
                item.children().len(),
                item.files().len()
            );
            Ok(())
        }
        Outcome::NotFound { route } => Err(format!("item {:?} not found.", route.as_str()).into()),
        Outcome::Error(e) => Err(e.into()),
    }
}
