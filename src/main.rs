//! # Recurdo
//!
//! A terminal to-do list for things that come back: water the plants every
//! 5 days, change the filter every month, renew the passport once. Each task
//! shows how much of its interval has already elapsed.
//!
//! ## Usage
//!
//! ```bash
//! # Recurring task, first due one interval from today
//! recurdo add "Water plants" --every 5
//!
//! # Recurring task with an explicit first due date
//! recurdo add "Change filter" --every 1 --unit months --due 2025-12-01
//!
//! # One-shot task
//! recurdo add "Renew passport" --due 2026-03-15
//!
//! # List, soonest due first
//! recurdo list
//!
//! # Renew: recurring tasks move one interval past today, one-shot tasks are removed
//! recurdo renew 1f0c
//! ```
//!
//! Ids can be abbreviated to any unique prefix.
//!
//! Running without a subcommand opens the interactive UI.
//!
//! ## Environment
//!
//! *   `RECURDO_DB`: tasks file (default `~/.local/share/recurdo/tasks.json` on Linux)
//! *   `RECURDO_LOG`: log filter, e.g. `info` or `recurdo=debug` (default `warn`)
//! *   `RECURDO_BAR_WIDTH`: progress bar width in characters (default 20)

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use recurdo::badge::TracingBadge;
use recurdo::commands::*;
use recurdo::config::Config;
use recurdo::ids::UuidGenerator;
use recurdo::logging;
use recurdo::models::IntervalUnit;
use recurdo::storage::JsonFileStore;
use recurdo::tui::run_tui;

#[derive(Parser)]
#[command(name = "recurdo")]
#[command(about = "Recurring task list with progress bars", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Repeat every N units; omit for a one-shot task
        #[arg(short, long)]
        every: Option<i64>,
        /// Interval unit (days, weeks, months)
        #[arg(short, long)]
        unit: Option<IntervalUnit>,
        /// Due date in YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List tasks, soonest due first
    List,
    /// Renew a task (advance a recurring task, complete a one-shot task)
    Renew {
        id: String,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New due date
        #[arg(short, long)]
        due: Option<String>,
        /// New interval
        #[arg(short, long)]
        every: Option<i64>,
        /// New interval unit
        #[arg(short, long)]
        unit: Option<IntervalUnit>,
        /// Whether the task recurs
        #[arg(short, long)]
        recurring: Option<bool>,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Print the number of tasks due by the end of today
    Badge,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();
    let store = JsonFileStore::new(config.db_path.clone());

    let result = match cli.command {
        Some(Commands::Ui) | None => {
            logging::init_tui(&config);
            if let Err(e) = run_tui(Box::new(store), config.bar_width) {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(1);
            }
            return;
        }
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    std::process::exit(1);
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "recurdo", &mut io::stdout());
            return;
        }
        Some(command) => {
            logging::init_cli(&config);
            run_command(command, &store, &config)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands, store: &JsonFileStore, config: &Config) -> Result<(), recurdo::collection::TaskError> {
    match command {
        Commands::Add { title, every, unit, due } => {
            cmd_add(store, &UuidGenerator, NewTask { title, every, unit, due }, false).map(|_| ())
        }
        Commands::List => {
            cmd_list(store, config.bar_width);
            Ok(())
        }
        Commands::Renew { id } => cmd_renew(store, &id, false).map(|_| ()),
        Commands::Edit { id, title, due, every, unit, recurring } => {
            cmd_edit(store, &id, TaskEdit { title, due, every, unit, recurring }, false)
        }
        Commands::Remove { id } => cmd_remove(store, &id, false),
        Commands::Badge => {
            println!("{}", cmd_badge(store, &TracingBadge));
            Ok(())
        }
        Commands::Ui | Commands::Completions { .. } => Ok(()),
    }
}
