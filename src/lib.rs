//! `equipment_tracker` - Equipment inventory with an append-only audit trail
//!
//! This crate provides the core functionality for the `eqt` CLI tool. Every
//! quantity change to an equipment item is written together with a
//! transaction record in a single `SQLite` transaction.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Equipment, Transaction, ChangeType)
//! - [`storage`] - `SQLite` store, transaction log and backups
//! - [`validation`] - Input validation and normalization
//! - [`config`] - Layered configuration and workspace discovery
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON, CSV)
//! - [`logging`] - tracing subscriber setup
//! - [`util`] - Utility functions (ids, time)

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod storage;
pub mod util;
pub mod validation;

pub use error::{Result, TrackerError};
pub use storage::SqliteStorage;
