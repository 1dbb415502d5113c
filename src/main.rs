use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use ledger_lens::cli::{handle_report_command, ReportCommands};
use ledger_lens::config::{paths::LedgerPaths, settings::Settings};
use ledger_lens::storage::Storage;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-lens",
    version,
    about = "Reports over a personal income and expense ledger",
    long_about = "ledger-lens reads a personal ledger of income and expense transactions \
                  and turns it into monthly summaries, category breakdowns, budget \
                  comparisons, a dashboard and month-end spending projections."
)]
struct Cli {
    /// Log level for this program. RUST_LOG overrides it when set.
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// Print reports as JSON instead of terminal text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Report(ReportCommands),

    /// Create the data directory, settings and default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level.to_string().to_lowercase());

    match main_inner(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(cli: Cli) -> Result<()> {
    trace!("{cli:?}");
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Commands::Report(cmd) => {
            let today = chrono::Local::now().date_naive();
            let stdout = std::io::stdout();
            handle_report_command(
                &storage,
                &settings,
                cmd,
                cli.json,
                today,
                &mut stdout.lock(),
            )?;
        }
        Commands::Init => {
            println!("Initializing ledger-lens at: {}", paths.data_dir().display());
            let seeded = storage.categories.seed_defaults()?;
            settings.save(&paths)?;
            storage.save_all()?;
            info!(seeded, "initialized ledger");
            println!("Initialization complete!");
            println!("{} default categories created.", seeded);
        }
        Commands::Config => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                return Ok(());
            }
            println!("ledger-lens Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", storage.is_initialized());
            println!();
            println!("Settings:");
            println!(
                "  Peak day tie-break:   {:?}",
                settings.insights.peak_day_tie_break
            );
            println!("  Zero-current deltas:  {:?}", settings.insights.zero_current);
            println!("  Delta limit:          {}", settings.insights.delta_limit);
            println!("  Top categories:       {}", settings.dashboard.top_categories);
            println!(
                "  Recent transactions:  {}",
                settings.dashboard.recent_transactions
            );
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise scope the requested level to this crate only.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
