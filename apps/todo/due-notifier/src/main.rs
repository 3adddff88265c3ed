//! Due Notifier
//!
//! Reports incomplete tasks that fall due within a time window, either once
//! or on a cron schedule.

use axum_helpers::ShutdownCoordinator;
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use domain_tasks::{PgTaskRepository, TaskService};
use eyre::Result;
use tracing::info;

mod config;
mod notifier;

use config::Config;
use notifier::{DEFAULT_CRON, DueNotifier};

#[derive(Parser)]
#[command(name = "due-notifier")]
#[command(about = "Report incomplete tasks that are due soon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single report and print it as JSON
    Run {
        /// Look-ahead window in minutes (non-positive falls back to 60)
        #[arg(short, long)]
        window_minutes: Option<i64>,
    },

    /// Run reports on a cron schedule until interrupted
    Schedule {
        /// Cron expression with a seconds field
        #[arg(short, long, default_value = DEFAULT_CRON)]
        cron: String,

        /// Look-ahead window in minutes (non-positive falls back to 60)
        #[arg(short, long)]
        window_minutes: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();

    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        RetryConfig::default(),
    )
    .await
    .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    let notifier = DueNotifier::new(TaskService::new(PgTaskRepository::new(db)));

    match cli.command {
        Commands::Run { window_minutes } => {
            let report = notifier
                .run_once(window_minutes.unwrap_or(config.window_minutes))
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Schedule {
            cron,
            window_minutes,
        } => {
            let shutdown = ShutdownCoordinator::new();
            let signals = shutdown.clone();
            tokio::spawn(async move { signals.wait_for_signal().await });

            notifier
                .run_scheduled(
                    &cron,
                    window_minutes.unwrap_or(config.window_minutes),
                    shutdown,
                )
                .await?;
        }
    }

    Ok(())
}
