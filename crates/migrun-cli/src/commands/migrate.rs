//! Migrate command
//!
//! Usage: migrun migrate --migrations-dir <DIR> --database-url <URL> --app-id <ID>

use clap::Args;
use migrun_core::config::UNLIMITED_STEPS;
use migrun_core::errors::{MigrunError, Result};
use migrun_core::{discover, migrate, CancelToken, RunConfig, RunReport, StepLimit};
use migrun_store::SqliteTarget;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Root directory of the migration files
    #[arg(long, env = "MIGRUN_MIGRATIONS_DIR")]
    pub migrations_dir: PathBuf,

    /// sqlite::memory:, sqlite://relative/path.db or sqlite:///absolute/path.db
    #[arg(long, env = "MIGRUN_DATABASE_URL")]
    pub database_url: String,

    /// Application identity the ledger rows are scoped to
    #[arg(long, env = "MIGRUN_APP_ID")]
    pub app_id: String,

    /// Apply at most this many pending files; -1 applies all
    #[arg(
        long,
        env = "MIGRUN_STEPS",
        default_value_t = UNLIMITED_STEPS,
        allow_negative_numbers = true
    )]
    pub steps: i64,

    /// Trust the ledger when an applied file's content changed
    #[arg(long, env = "MIGRUN_SKIP_FILE_VALIDATION")]
    pub skip_file_validation: bool,

    /// Seconds allowed for opening and checking the database connection
    #[arg(
        long,
        env = "MIGRUN_CONNECTION_TIMEOUT",
        default_value_t = 45,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub connection_timeout: u64,
}

impl MigrateArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let config = RunConfig::new(self.app_id.clone(), self.migrations_dir.clone())
            .with_steps(StepLimit::from_steps(self.steps)?)
            .with_skip_file_validation(self.skip_file_validation)
            .with_tool_version(env!("CARGO_PKG_VERSION"));
        config.validate()?;
        Ok(config)
    }
}

/// Execute migrate command
pub async fn execute(args: MigrateArgs) -> Result<RunReport> {
    let config = args.run_config()?;

    // File problems fail before the database is touched
    let files = discover(&config.migrations_dir)?;

    let cancel = CancelToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let timeout = Duration::from_secs(args.connection_timeout);
    let conn = connect_within(args.database_url, timeout).await?;

    tokio::task::spawn_blocking(move || {
        let mut target = SqliteTarget::new(conn);
        migrate(&mut target, files, &config, &cancel)
    })
    .await
    .map_err(|e| MigrunError::Internal {
        message: format!("migration task failed: {}", e),
    })?
}

/// Open the database on the blocking pool, giving up after `timeout`
async fn connect_within(url: String, timeout: Duration) -> Result<Connection> {
    let connecting = tokio::task::spawn_blocking(move || migrun_store::connect(&url, timeout));

    match tokio::time::timeout(timeout, connecting).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(MigrunError::Internal {
            message: format!("connect task failed: {}", e),
        }),
        Err(_) => Err(MigrunError::ConnectionTimeout {
            seconds: timeout.as_secs(),
        }),
    }
}

/// Trip the token on Ctrl+C or SIGTERM
async fn cancel_on_signal(cancel: CancelToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, stopping at the next checkpoint");
        },
        _ = terminate => {
            tracing::warn!("Received terminate signal, stopping at the next checkpoint");
        },
    }

    cancel.cancel();
}
