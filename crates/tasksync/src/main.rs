use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasksync::cli::{self, Cli};
use tasksync::remote::simulated_remote;
use tasksync::{Config, TasksRepository};
use tasksync_core::storage::TaskDataSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasksync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(db) = cli.db.clone() {
        config.sqlite_path = db;
    }

    #[cfg(feature = "sqlite")]
    let local = {
        tracing::info!(path = %config.sqlite_path, "Opening SQLite local store");
        tasksync::storage::SqliteDataSource::new(&config.sqlite_path).await?
    };

    #[cfg(not(feature = "sqlite"))]
    let local = {
        tracing::info!("Using in-memory local store");
        tasksync::InMemoryDataSource::new(tasksync_core::storage::SourceKind::Local)
    };

    execute(cli, &config, local).await
}

async fn execute<L>(cli: Cli, config: &Config, local: L) -> Result<()>
where
    L: TaskDataSource + 'static,
{
    let remote = simulated_remote(&local, config).await?;
    let repository =
        TasksRepository::with_event_capacity(Arc::new(remote), Arc::new(local), config.event_capacity);

    let output = cli::run(&repository, cli.command, cli.format).await?;
    println!("{output}");
    Ok(())
}
