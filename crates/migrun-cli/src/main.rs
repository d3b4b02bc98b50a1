//! migrun CLI
//!
//! Applies ordered SQL migration files to a database and records them in a
//! ledger

use clap::{Parser, Subcommand, ValueEnum};
use migrun_core::errors::ExError;
use migrun_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "migrun", version)]
#[command(about = "migrun - ordered SQL migrations with a drift-checked ledger", long_about = None)]
struct Cli {
    /// Log output format; defaults to json inside Kubernetes and text elsewhere
    #[arg(long, global = true, env = "MIGRUN_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn profile(self) -> Profile {
        match self {
            LogFormat::Text => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    logging_facility::init(
        cli.log_format
            .map(LogFormat::profile)
            .unwrap_or_else(Profile::detect),
    );

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args).await,
    };

    match result {
        Ok(report) => {
            println!(
                "Applied {} migration(s), {} file(s) on disk",
                report.applied, report.discovered
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            let ex_err: ExError = e.into();
            std::process::exit(ex_err.exit_code());
        }
    }
}
