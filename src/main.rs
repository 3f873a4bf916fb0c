//! Deprecated API gate CLI.
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!   gate.toml ──────────▶│ config → RuleSet (compiled, immutable)   │
//!                        │              │                           │
//!   Client Request ─────▶│ http server → deprecated_api middleware ─┼──▶ 404 JSON
//!                        │              │ allowed                   │
//!                        │              ▼                           │
//!                        │          route handler ──────────────────┼──▶ 200
//!                        │                                          │
//!   routes.toml ────────▶│ RouteTable + RuleSet → report (log/CLI)  │
//!                        └──────────────────────────────────────────┘
//! ```
//!
//! - `serve`: stub every route from a routes file behind the gate
//! - `check`: decide a single `METHOD PATH`
//! - `report`: list the routes the configuration disables

use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use deprecated_api_gate::config::loader::parse_config;
use deprecated_api_gate::config::{compile_rules, load_config, load_routes, ConfigError, GateConfig};
use deprecated_api_gate::lifecycle::{signals, Shutdown};
use deprecated_api_gate::observability::logging;
use deprecated_api_gate::{disabled_endpoints, ApiRouter, HttpServer};

#[derive(Parser)]
#[command(name = "deprecated-api-gate")]
#[command(about = "Decline calls to disabled deprecated REST APIs", long_about = None)]
struct Cli {
    /// Gate configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve stub routes from a routes file behind the gate
    Serve {
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Decide whether a request would be declined
    Check { method: String, path: String },
    /// List registered routes the configuration disables
    Report {
        #[arg(short, long)]
        routes: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => parse_config("")?,
    };

    logging::init(&config.observability);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        gating = config.deprecated_api.disabled,
        patterns = config.deprecated_api.patterns.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Serve { routes } => serve(config, routes).await?,
        Commands::Check { method, path } => {
            let rules = compile_rules(&config.deprecated_api).map_err(ConfigError::Validation)?;
            if !config.deprecated_api.disabled {
                eprintln!("note: gating is off, the server would allow every request");
            }
            let verdict = if rules.is_disabled(&method, &path) {
                "declined"
            } else {
                "allowed"
            };
            println!("{} {}: {}", method.to_ascii_uppercase(), path, verdict);
        }
        Commands::Report { routes } => {
            let routes = load_routes(&routes)?;
            let rules = compile_rules(&config.deprecated_api).map_err(ConfigError::Validation)?;
            for line in disabled_endpoints(routes.routes.as_slice(), &rules) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

async fn serve(config: GateConfig, routes: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let routes = load_routes(&routes)?;

    let mut api: ApiRouter = ApiRouter::new();
    for route in &routes.routes {
        for method in &route.methods {
            let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())?;
            api = api.on(method, &route.path, || async { "ok" })?;
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, api)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_signal(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
