//! # todolist
//!
//! A small personal task tracker. One binary runs the JSON-backed REST
//! service and also acts as its client, either as an interactive TUI or as
//! single CLI commands.
//!
//! ## Usage
//!
//! ```bash
//! # Start the service (default 127.0.0.1:5000)
//! todolist serve
//!
//! # Interactive UI against it
//! todolist
//!
//! # One-off commands
//! todolist add "Write report" --code RPT-1 --project Work -H 1 -m 30 --date 2025-12-01
//! todolist list --filter active --search report
//! todolist toggle 3
//! todolist project add Work
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task, `e`/`Enter`: Edit selected task
//! *   `Space`: Toggle done, `d`: Delete
//! *   `/`: Search, `f`: Cycle filter (All, Complete, Active), `r`: Reload
//! *   In the form: `Tab` moves between fields, `←`/`→` pick a project,
//!     `Del` deletes the picked project, `Enter` saves (or adds the typed
//!     project when on "New Project"), `Esc` cancels.
//!
//! ## Data Storage
//!
//! The service keeps everything in one JSON document in the local data
//! directory (`~/.local/share/todolist/todolist.json` on Linux). Override it
//! with `TODOLIST_DB`, or run `todolist serve --memory` for a throwaway store.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use todolist::api;
use todolist::client::ApiClient;
use todolist::commands::*;
use todolist::config::{Config, DEFAULT_LOG_FILTER};
use todolist::storage::Store;
use todolist::tui::run_tui;
use todolist::view::FilterMode;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Personal task tracker", long_about = None)]
struct Cli {
    /// Base URL of the task API (overrides TODOLIST_API)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST service
    Serve {
        /// Listen host (overrides HOST)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Database file (overrides TODOLIST_DB)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Keep data in memory only
        #[arg(long, conflicts_with = "db")]
        memory: bool,
    },
    /// List tasks grouped by completion date
    List {
        /// Case-insensitive match on code, project or completion date
        #[arg(short, long)]
        search: Option<String>,
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
    /// Add a new task
    Add {
        /// Task description (quoted if it has spaces)
        description: String,
        #[command(flatten)]
        fields: TaskArgs,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New description
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        fields: TaskArgs,
    },
    /// Flip a task between done and active
    Toggle {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a new project
    Add {
        /// Project name
        name: String,
    },
    /// List projects
    List,
    /// Remove a project; its tasks are kept without a project
    Remove {
        id: u64,
    },
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`;
/// with `log_file` set, output goes there instead of stderr. A log file that
/// cannot be opened falls back to stderr with a warning.
fn init_tracing(default_filter: &str, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Some(path) = log_file {
        match open_log_file(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
                return;
            }
            Err(e) => eprintln!("Cannot open log file {}: {}; logging to stderr", path.display(), e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_server(config: &Config, memory: bool) -> Result<(), Box<dyn Error>> {
    let address = config.socket_addr()?;
    let store = if memory {
        tracing::info!("Using in-memory store");
        Store::in_memory()
    } else {
        tracing::info!(path = %config.db_path.display(), "Opening database");
        Store::open(config.db_path.clone())?
    };
    api::serve(store, address).await?;
    Ok(())
}

fn runtime() -> Runtime {
    match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting async runtime: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    if let Some(url) = cli.api {
        config.api_url = url;
    }
    let api = ApiClient::new(config.api_url.clone());

    match cli.command {
        Some(Commands::Serve { host, port, db, memory }) => {
            if let Some(host) = host { config.host = host; }
            if let Some(port) = port { config.port = port; }
            if let Some(db) = db { config.db_path = db; }
            init_tracing(DEFAULT_LOG_FILTER, None);
            if let Err(e) = runtime().block_on(run_server(&config, memory)) {
                tracing::error!(error = %e, "Server failed");
                process::exit(1);
            }
        }
        Some(Commands::List { search, filter }) => {
            init_tracing("off", None);
            runtime().block_on(cmd_list(&api, search, filter));
        }
        Some(Commands::Add { description, fields }) => {
            init_tracing("off", None);
            runtime().block_on(cmd_add(&api, description, fields, false));
        }
        Some(Commands::Edit { id, description, fields }) => {
            init_tracing("off", None);
            runtime().block_on(cmd_edit(&api, id, description, fields, false));
        }
        Some(Commands::Toggle { id }) => {
            init_tracing("off", None);
            runtime().block_on(cmd_toggle(&api, id, false));
        }
        Some(Commands::Remove { id }) => {
            init_tracing("off", None);
            runtime().block_on(cmd_remove(&api, id, false));
        }
        Some(Commands::Project { command }) => {
            init_tracing("off", None);
            let rt = runtime();
            match command {
                ProjectCommands::Add { name } => rt.block_on(cmd_project_add(&api, name, false)),
                ProjectCommands::List => rt.block_on(cmd_project_list(&api)),
                ProjectCommands::Remove { id } => rt.block_on(cmd_project_remove(&api, id, false)),
            }
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
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "todolist", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            init_tracing(DEFAULT_LOG_FILTER, Some(&config.log_path()));
            let rt = runtime();
            if let Err(e) = run_tui(api, rt.handle().clone()) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
