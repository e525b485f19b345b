use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pressman::cli::{bootstrap_site, publish_files};
use pressman::config::ServerConfig;
use pressman::server::{AppState, create_router};
use pressman::store::{SqliteStore, Store};
use pressman::types::DEFAULT_TENANT_ID;

#[derive(Parser)]
#[command(name = "pressman")]
#[command(about = "A self-hostable multi-tenant blog engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Tenant to serve (defaults to single-tenant mode)
        #[arg(long)]
        tenant: Option<String>,

        /// URL prefix for generated links, e.g. "/dennis"
        #[arg(long, default_value = "")]
        url_prefix: String,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Seed the default site bundle for a tenant with no revisions
    Bootstrap {
        #[arg(long, default_value = "./data")]
        data_dir: String,

        #[arg(long, default_value = DEFAULT_TENANT_ID)]
        tenant: String,
    },

    /// Import markdown files (with YAML front matter) as pages
    Publish {
        /// Markdown files to import
        files: Vec<String>,

        #[arg(long, default_value = "./data")]
        data_dir: String,

        #[arg(long, default_value = DEFAULT_TENANT_ID)]
        tenant: String,
    },
}

fn open_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        data_dir: PathBuf::from(data_dir),
        ..Default::default()
    };
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    let store = SqliteStore::new(config.db_path()).context("opening database")?;
    store.initialize().context("initializing schema")?;
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            tenant,
            url_prefix,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: PathBuf::from(data_dir),
                tenant_id: tenant,
                url_prefix,
            };

            std::fs::create_dir_all(&config.data_dir).with_context(|| {
                format!("creating data directory {}", config.data_dir.display())
            })?;
            let store = SqliteStore::new(config.db_path()).context("opening database")?;
            store.initialize().context("initializing schema")?;

            let state = Arc::new(AppState::new(
                Arc::new(store),
                config.tenant_id.clone(),
                config.url_prefix.clone(),
            ));
            let router = create_router(state);

            let addr = config.socket_addr().context("invalid host/port")?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!("listening on http://{addr}");

            axum::serve(listener, router).await.context("server error")?;
        }

        Commands::Admin { command } => match command {
            AdminCommands::Bootstrap { data_dir, tenant } => {
                let store = open_store(&data_dir)?;
                if bootstrap_site(&store, &tenant)? {
                    info!("initialized site bundle for tenant {tenant}");
                } else {
                    info!("site bundle already initialized for tenant {tenant}");
                }
            }

            AdminCommands::Publish {
                files,
                data_dir,
                tenant,
            } => {
                if files.is_empty() {
                    anyhow::bail!("no files given; usage: pressman admin publish <file.md>...");
                }
                let store = open_store(&data_dir)?;
                let ids = publish_files(&store, &files, &tenant)?;
                info!("published {} page(s)", ids.len());
            }
        },
    }

    Ok(())
}
