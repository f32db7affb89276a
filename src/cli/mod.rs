//! Command-line interface for taskboard
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::api::ApiClient;
use crate::auth::{self, Session};
use crate::backend::{LocalBackend, RemoteBackend, TaskBackend};
use crate::board::BoardController;
use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::output::{HumanOutput, OutputOptions};
use crate::persist;
use crate::storage::Storage;
use crate::store::BoardState;
use crate::task::TaskStatus;

mod account;
mod board;
mod init;
mod task;

/// taskboard - a kanban board for the terminal
///
/// Tasks live in three columns (todo, in-progress, done) and are stored
/// either locally or on a taskboard REST server.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKBOARD_DIR")]
    pub dir: Option<PathBuf>,

    /// Base URL of the REST API
    #[arg(long, global = true, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Where tasks are stored: local or remote
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and write a default config
    Init,

    /// Create an account on the server
    Register {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the board, filtered by the saved search term
    Board,

    /// Set or clear the saved search term
    #[command(group(ArgGroup::new("search_input").required(true).args(["term", "clear"])))]
    Search {
        /// Case-insensitive text matched against title and description
        term: Option<String>,

        /// Remove the saved search term
        #[arg(long)]
        clear: bool,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    New {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// todo, in-progress, or done
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Edit a task's fields
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
    },

    /// List tasks
    List {
        /// Only show one column
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },

    /// Show one task
    Show {
        /// Task id or unique id prefix
        id: String,
    },

    /// Move a task onto another task or to the end of a column
    #[command(group(ArgGroup::new("target").required(true).args(["onto", "column"])))]
    Move {
        /// Task id or unique id prefix
        id: String,

        /// Drop onto this task (takes its column and slot)
        #[arg(long)]
        onto: Option<String>,

        /// Drop at the end of this column
        #[arg(long)]
        column: Option<TaskStatus>,
    },
}

/// Resolved global options shared by every command
pub(crate) struct Context {
    pub storage: Storage,
    pub config: Config,
    pub output: OutputOptions,
    /// Problems found while resolving options, shown with every result
    pub warnings: Vec<String>,
}

impl Context {
    fn new(cli: &Cli) -> Self {
        let storage = Storage::resolve(cli.dir.clone());
        let (mut config, config_warning) = Config::load_from_dir_checked(storage.root());
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(backend) = cli.backend {
            config.board.backend = backend;
        }
        Self {
            storage,
            config,
            output: OutputOptions {
                json: cli.json,
                quiet: cli.quiet,
            },
            warnings: config_warning.into_iter().collect(),
        }
    }

    /// Human output for a command, carrying any context warnings.
    pub fn human(&self, header: impl Into<String>) -> HumanOutput {
        let mut human = HumanOutput::new(header);
        for warning in &self.warnings {
            human.push_warning(warning.clone());
        }
        human
    }

    /// API client carrying the stored session cookie, if any.
    pub fn api_client(&self) -> Result<ApiClient> {
        let session = Session::load(&self.storage)?;
        Ok(ApiClient::new(&self.config.api)?.with_session(session.cookie))
    }

    /// Board state with persisted UI fields restored.
    pub fn initial_state(&self) -> Result<BoardState> {
        let mut state = BoardState::new();
        persist::load(&self.storage, &self.config.storage.state_key)?.apply_to(&mut state.ui);
        Ok(state)
    }

    pub fn save_ui(&self, state: &BoardState) -> Result<()> {
        persist::save(&self.storage, &self.config.storage.state_key, &state.ui)
    }

    /// Open the configured backend and load the task list.
    ///
    /// The remote backend requires a valid session.
    pub async fn open_board(&self) -> Result<BoardController<Box<dyn TaskBackend>>> {
        let mut state = self.initial_state()?;
        let backend: Box<dyn TaskBackend> = match self.config.board.backend {
            BackendKind::Local => Box::new(LocalBackend::new(self.storage.clone())),
            BackendKind::Remote => {
                let client = self.api_client()?;
                auth::init_auth(&client, &mut state).await;
                auth::require_auth(&state)?;
                Box::new(RemoteBackend::new(client))
            }
        };
        tracing::debug!(backend = ?self.config.board.backend, "opening board");

        let mut board = BoardController::with_state(backend, state);
        board.load().await?;
        Ok(board)
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let ctx = Context::new(&self);
        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::Register { email, password } => {
                account::run_register(&ctx, account::CredentialOptions { email, password }).await
            }
            Commands::Login { email, password } => {
                account::run_login(&ctx, account::CredentialOptions { email, password }).await
            }
            Commands::Logout => account::run_logout(&ctx).await,
            Commands::Whoami => account::run_whoami(&ctx).await,
            Commands::Board => board::run_board(&ctx).await,
            Commands::Search { term, clear } => {
                board::run_search(&ctx, board::SearchOptions { term, clear })
            }
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    title,
                    description,
                    status,
                } => {
                    task::run_new(
                        &ctx,
                        task::NewOptions {
                            title,
                            description,
                            status,
                        },
                    )
                    .await
                }
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    status,
                } => {
                    task::run_edit(
                        &ctx,
                        task::EditOptions {
                            id,
                            title,
                            description,
                            status,
                        },
                    )
                    .await
                }
                TaskCommands::Rm { id } => task::run_rm(&ctx, &id).await,
                TaskCommands::List { status } => task::run_list(&ctx, status).await,
                TaskCommands::Show { id } => task::run_show(&ctx, &id).await,
                TaskCommands::Move { id, onto, column } => {
                    task::run_move(&ctx, task::MoveOptions { id, onto, column }).await
                }
            },
        }
    }
}
