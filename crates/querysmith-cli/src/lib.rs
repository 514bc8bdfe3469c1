//! Querysmith CLI library.
//!
//! Settings management, request execution and output formatting behind the
//! `querysmith` binary. Provider, schema and corpus settings live in the
//! SQLite settings store; presentation settings live in
//! `~/.querysmith/config.toml`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
