//! kb - Kanban Task Board Library
//!
//! This library provides the core functionality for the kb CLI tool:
//! a four-lane Kanban board with contacts and lightweight accounts,
//! persisted through a generic remote key-value HTTP store.
//!
//! # Core Concepts
//!
//! - **Lanes**: the four fixed statuses a task can occupy; they partition
//!   the task collection and any lane can transition to any other
//! - **Draft**: the in-progress, uncommitted task being composed or edited
//! - **Assignment**: the link between a task and the contacts responsible
//!   for it, held as durable contact ids
//! - **Remote Store**: the external key-value HTTP service used as the
//!   sole persistence backend; every mutation writes the whole owning
//!   collection (last write wins across sessions)
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.kb.toml`
//! - `error`: error types and result aliases
//! - `store`: remote store client and the in-memory test backend
//! - `model`: domain types and wire format
//! - `repo`: repository owning the users/contacts/tasks collections
//! - `draft`: the task draft buffer and its validation
//! - `board`: lane views, search, and the drag transition state
//! - `summary`: derived board statistics
//! - `auth`: password-reset flow and the mail relay client
//! - `output`: shared CLI output formatting

pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod model;
pub mod output;
pub mod repo;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
