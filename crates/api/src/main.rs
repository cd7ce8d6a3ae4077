use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use students_api::{build_app, server};
use students_infra::config::{CONFIG_PATH_ENV, Config};
use students_infra::SqliteStudentStore;

#[derive(Debug, Parser)]
#[command(name = "students-api", about = "HTTP service for student records")]
struct Cli {
    /// Path to the YAML configuration file (`CONFIG_PATH` takes precedence).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            students_observability::init("");
            tracing::error!(error = %format!("{e:#}"), "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    students_observability::init(&config.env);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "server exited with error");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: Cli) -> anyhow::Result<Config> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let path = Config::resolve_path(env_path, cli.config)?;
    Config::load(&path).with_context(|| format!("loading {}", path.display()))
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!(env = %config.env, storage_path = %config.storage_path.display(), "initializing storage");
    let store = SqliteStudentStore::open(&config.storage_path)
        .await
        .context("failed to initialize storage")?;

    let app = build_app(Arc::new(store.clone()));

    let listener = server::bind(&config.http_server.address).await?;
    server::serve(
        listener,
        app,
        server::shutdown_signal(),
        config.http_server.shutdown_grace(),
    )
    .await?;

    store.close().await;
    Ok(())
}
