//! Command-line interface for daybook.

mod entry;
mod sync;

use clap::{Parser, Subcommand};
use daybook_core::config::Config;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Daily task records as plain markdown")]
struct Cli {
    /// Path to an alternate config file
    #[arg(long, env = "DAYBOOK_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task to a day
    Add {
        /// Task title
        title: String,
        /// Duration in hours
        #[arg(long, default_value_t = 1.0)]
        hours: f64,
        /// Day: today, yesterday, tomorrow, or YYYY-MM-DD
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Mark a task completed
    Done {
        /// Task title (first match wins on duplicates)
        title: String,
        /// Day: today, yesterday, tomorrow, or YYYY-MM-DD
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Show one day's record
    Show {
        /// Day: today, yesterday, tomorrow, or YYYY-MM-DD
        #[arg(default_value = "today")]
        date: String,
        /// Print the record as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// List recorded days
    List {
        /// Print all records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a day's record
    Remove {
        /// Day: today, yesterday, tomorrow, or YYYY-MM-DD
        date: String,
    },
    /// Synchronize the journal with the remote store
    Sync {
        /// Keep syncing on the configured interval until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
}

/// Entry point called from `main`.
pub fn run_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daybook=info,daybook_sync=info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Add { title, hours, date } => entry::handle_add(&config, &title, hours, &date),
        Command::Done { title, date } => entry::handle_done(&config, &title, &date),
        Command::Show { date, json } => entry::handle_show(&config, &date, json),
        Command::List { json } => entry::handle_list(&config, json),
        Command::Remove { date } => entry::handle_remove(&config, &date),
        Command::Sync { watch } => sync::handle_sync(&config, watch),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
