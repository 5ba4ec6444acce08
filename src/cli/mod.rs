//! Command-line interface for kb
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand group is implemented in its own submodule.

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::repo::Repository;
use crate::store::RemoteStore;

mod board;
mod contact;
mod task;
mod user;

/// kb - Kanban task board
///
/// A CLI over a shared Kanban board: four lanes, tasks with subtasks and
/// assigned contacts, persisted through a remote key-value store.
#[derive(Parser, Debug)]
#[command(name = "kb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding .kb.toml (defaults to current directory)
    #[arg(long, global = true, env = "KB_CONFIG_DIR")]
    pub config_dir: Option<std::path::PathBuf>,

    /// Store access token (overrides the configured one)
    #[arg(long, global = true, env = "KB_TOKEN")]
    pub token: Option<String>,

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
    /// Show the board, optionally narrowed by a search query
    Board {
        /// Free-text filter over task names and descriptions
        #[arg(long)]
        filter: Option<String>,
    },

    /// Move a task to another lane
    Move {
        /// Task id
        task: uuid::Uuid,

        /// Destination lane: toDo, inProgress, awaitFeedback, done
        lane: String,
    },

    /// Board statistics
    Summary,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Subtasks of a committed task
    #[command(subcommand)]
    Subtask(SubtaskCommands),

    /// Contact book
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Accounts
    #[command(subcommand)]
    User(UserCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Compose and submit a new task
    Add {
        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(long)]
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Category: "Technical Task" or "Contact Story"
        #[arg(long)]
        category: String,

        /// Priority: urgent, medium, low
        #[arg(long)]
        priority: String,

        /// Lane to create the task in
        #[arg(long, default_value = "toDo")]
        lane: String,

        /// Contact ids to assign (repeatable; toggle semantics)
        #[arg(long = "assign")]
        assign: Vec<uuid::Uuid>,

        /// Subtasks to start with (repeatable)
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id
        id: uuid::Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Category: "Technical Task" or "Contact Story"
        #[arg(long)]
        category: Option<String>,

        /// Priority: urgent, medium, low
        #[arg(long)]
        priority: Option<String>,

        /// Toggle these contact assignments (repeatable)
        #[arg(long = "toggle-assign")]
        toggle_assign: Vec<uuid::Uuid>,
    },

    /// Show one task
    Show {
        /// Task id
        id: uuid::Uuid,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: uuid::Uuid,
    },
}

/// Subtask subcommands
#[derive(Subcommand, Debug)]
pub enum SubtaskCommands {
    /// Append a subtask to a task
    Add {
        /// Task id
        task: uuid::Uuid,

        /// Subtask name (blank names are ignored)
        name: String,
    },

    /// Rename a subtask in place
    Rename {
        /// Task id
        task: uuid::Uuid,

        /// Subtask index (0-based)
        index: usize,

        /// New name
        name: String,
    },

    /// Remove a subtask; later subtasks shift down
    Rm {
        /// Task id
        task: uuid::Uuid,

        /// Subtask index (0-based)
        index: usize,
    },

    /// Flip a subtask between complete and incomplete
    Toggle {
        /// Task id
        task: uuid::Uuid,

        /// Subtask index (0-based)
        index: usize,
    },
}

/// Contact subcommands
#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Add a contact
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        mail: String,

        #[arg(long)]
        phone: String,
    },

    /// Edit a contact (keeps its icon color)
    Edit {
        /// Contact id
        id: uuid::Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        mail: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// List contacts, optionally narrowed by a name prefix
    List {
        /// Case-insensitive name prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Delete a contact
    Rm {
        /// Contact id
        id: uuid::Uuid,
    },
}

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register an account
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Check credentials
    Login {
        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        password: String,

        /// Log in without an account
        #[arg(long)]
        guest: bool,
    },

    /// Set a new password for an account
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Ask the mail relay to send a reset notice
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
}

/// Loaded config plus a hydrated repository over the remote store.
pub struct Context {
    pub config: Config,
    pub repo: Repository<RemoteStore>,
}

impl Cli {
    fn load_config(&self) -> Config {
        let dir = self
            .config_dir
            .clone()
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let mut config = Config::load_from_dir(&dir);
        if let Some(token) = &self.token {
            config.store.token = token.clone();
        }
        config
    }

    async fn context(&self) -> Result<Context> {
        let config = self.load_config();
        let store = RemoteStore::new(&config.store)?;
        let mut repo = Repository::new(store, &config.store);
        repo.load().await?;
        Ok(Context { config, repo })
    }

    pub async fn run(self) -> Result<()> {
        let options = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let ctx = self.context().await?;

        match self.command {
            Commands::Board { filter } => board::run_show(ctx, options, filter),
            Commands::Move { task, lane } => board::run_move(ctx, options, task, lane).await,
            Commands::Summary => board::run_summary(ctx, options),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    description,
                    due,
                    category,
                    priority,
                    lane,
                    assign,
                    subtasks,
                } => {
                    task::run_add(
                        ctx,
                        options,
                        task::AddOptions {
                            title,
                            description,
                            due,
                            category,
                            priority,
                            lane,
                            assign,
                            subtasks,
                        },
                    )
                    .await
                }
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    due,
                    category,
                    priority,
                    toggle_assign,
                } => {
                    task::run_edit(
                        ctx,
                        options,
                        task::EditOptions {
                            id,
                            title,
                            description,
                            due,
                            category,
                            priority,
                            toggle_assign,
                        },
                    )
                    .await
                }
                TaskCommands::Show { id } => task::run_show(ctx, options, id),
                TaskCommands::Rm { id } => task::run_rm(ctx, options, id).await,
            },
            Commands::Subtask(cmd) => match cmd {
                SubtaskCommands::Add { task, name } => {
                    task::run_subtask_add(ctx, options, task, name).await
                }
                SubtaskCommands::Rename { task, index, name } => {
                    task::run_subtask_rename(ctx, options, task, index, name).await
                }
                SubtaskCommands::Rm { task, index } => {
                    task::run_subtask_rm(ctx, options, task, index).await
                }
                SubtaskCommands::Toggle { task, index } => {
                    task::run_subtask_toggle(ctx, options, task, index).await
                }
            },
            Commands::Contact(cmd) => match cmd {
                ContactCommands::Add { name, mail, phone } => {
                    contact::run_add(ctx, options, name, mail, phone).await
                }
                ContactCommands::Edit {
                    id,
                    name,
                    mail,
                    phone,
                } => contact::run_edit(ctx, options, id, name, mail, phone).await,
                ContactCommands::List { prefix } => contact::run_list(ctx, options, prefix),
                ContactCommands::Rm { id } => contact::run_rm(ctx, options, id).await,
            },
            Commands::User(cmd) => match cmd {
                UserCommands::Register {
                    username,
                    email,
                    password,
                } => user::run_register(ctx, options, username, email, password).await,
                UserCommands::Login {
                    email,
                    password,
                    guest,
                } => user::run_login(ctx, options, email, password, guest),
                UserCommands::ResetPassword { email, password } => {
                    user::run_reset_password(ctx, options, email, password).await
                }
                UserCommands::ForgotPassword { email } => {
                    user::run_forgot_password(ctx, options, email).await
                }
            },
        }
    }
}
