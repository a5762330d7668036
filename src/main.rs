//! flext: serve a directory of handler files as HTTP routes.
//!
//! # Commands
//! - `serve`: discover and load handlers, then serve them
//! - `routes`: print the route table without loading anything
//! - `check`: load every handler and report the first failure

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;

use flext::config::{load_config, validate_config, AppConfig, ConfigError};
use flext::loader::{HandlerLoader, ManifestLoader};
use flext::observability::{logging, metrics};
use flext::routing::discover;
use flext::{AppServer, FileRouter};

#[derive(Parser)]
#[command(name = "flext")]
#[command(about = "Serve a directory of handler files as HTTP routes", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RouterArgs {
    /// Application root the API directory is resolved against.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory holding handler files.
    #[arg(long)]
    api_dir: Option<PathBuf>,

    /// URL prefix for every route.
    #[arg(long)]
    prefix: Option<String>,

    /// Log each route as it is registered.
    #[arg(long)]
    debug: bool,
}

impl RouterArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(root) = self.root {
            config.server.root_path = root;
        }
        if let Some(api_dir) = self.api_dir {
            config.router.api_dir = api_dir;
        }
        if let Some(prefix) = self.prefix {
            config.router.prefix = prefix;
        }
        if self.debug {
            config.router.debug = true;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Discover handlers and serve them
    Serve {
        /// Bind address, overriding the config file.
        #[arg(short, long)]
        bind: Option<String>,

        #[command(flatten)]
        router: RouterArgs,
    },
    /// Print the discovered route table
    Routes {
        #[command(flatten)]
        router: RouterArgs,
    },
    /// Load every handler without serving
    Check {
        #[command(flatten)]
        router: RouterArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Serve { bind, router } => {
            router.apply(&mut config);
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            validate_config(&config).map_err(ConfigError::Validation)?;
            logging::init_logging(&config.observability, config.router.debug)?;
            serve(config).await
        }
        Commands::Routes { router } => {
            router.apply(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            logging::init_logging(&config.observability, config.router.debug)?;
            print_routes(&config);
            Ok(())
        }
        Commands::Check { router } => {
            router.apply(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            logging::init_logging(&config.observability, config.router.debug)?;
            check(&config)
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("flext v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = AppServer::from_config(&config);
    let router = FileRouter::new(server, config.router.clone(), &ManifestLoader::new())?;

    tracing::info!(
        api_root = %router.api_root().display(),
        prefix = %config.router.prefix,
        routes = router.route_count(),
        "Handlers loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    router.into_server().run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(config: &AppConfig) {
    let loader = ManifestLoader::new();
    let root = config.server.root_path.join(&config.router.api_dir);
    let routes = discover(&root, &config.router.prefix, loader.extension());

    if routes.is_empty() {
        println!("No handlers found under {}", root.display());
        return;
    }

    println!("{:<8} {:<40} {:<32} FILE", "METHOD", "PATH", "NAME");
    for route in routes {
        println!(
            "{:<8} {:<40} {:<32} {}",
            route.method(),
            route.route_path,
            route.name,
            route.file.relative.display()
        );
    }
}

fn check(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let server = AppServer::from_config(config);
    let router = FileRouter::new(server, config.router.clone(), &ManifestLoader::new())?;

    println!(
        "{} handler(s) under {} loaded successfully",
        router.route_count(),
        router.api_root().display()
    );
    Ok(())
}
