//! CLI module
//!
//! Command-line interface for browsing an indexer.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode
//! - `latest` - Latest blocks and transactions
//! - `page` - One page of a paginated resource
//! - `config` - Print the effective configuration

mod commands;
mod runner;
mod server;
mod session;

pub use commands::{Cli, Commands, OutputFormat, Resource};
pub use runner::Runner;
pub use server::{build_router, serve, AppState};
pub use session::{session_cookie, session_from_cookie_header, SessionStore, SESSION_COOKIE};
