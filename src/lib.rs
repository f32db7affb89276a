//! taskboard - Kanban Task Board Library
//!
//! This library provides the core functionality for the taskboard CLI: a
//! three-column board whose tasks are reordered by drag and drop and kept
//! in sync with a REST backend or a local JSON file.
//!
//! # Core Concepts
//!
//! - **Tasks**: titled cards in `todo`, `in-progress` or `done`, sorted by a
//!   fractional `order` key within their column
//! - **Moves**: a drop onto a task or a column resolves to a new status and
//!   an order between the new neighbours
//! - **Optimistic updates**: moves apply locally first and roll back if the
//!   backend rejects them
//! - **Persisted UI state**: the search term survives restarts under a
//!   namespaced key
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskboard.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task model and column helpers
//! - `reorder`: Drag-end placement
//! - `store`: Board state and reducer
//! - `board`: Controller tying the state to a backend
//! - `backend`: Remote and local task backends
//! - `api`: REST client
//! - `auth`: Session handling
//! - `persist`: Persisted UI state
//! - `storage`: Data directory layout and JSON helpers
//! - `lock`: File locking and atomic writes

pub mod api;
pub mod auth;
pub mod backend;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod persist;
pub mod reorder;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
