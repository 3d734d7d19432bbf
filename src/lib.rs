// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # chainscan
//!
//! Blockchain explorer over a cursor-paginated block indexer.
//!
//! The indexer only ever hands out "the page after this one". chainscan
//! remembers the pages a visitor has seen so it can also offer "the page
//! before", and keeps the page number in the URL.
//!
//! ## Features
//!
//! - **Cursor Pagination**: previous / current / next navigation over forward-only cursors
//! - **Multiple Networks**: one indexer per network, picked with `?network=`
//! - **HTTP Server**: JSON views for blocks, addresses, tokens and contracts
//! - **CLI**: fetch latest data or single pages from the terminal
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chainscan::pagination::{Cursor, PaginationController};
//!
//! let mut controller = PaginationController::new();
//! let query = Cursor::from_query_str("page_number=1");
//! let ticket = controller.navigate(&query).ticket().unwrap();
//!
//! // ... fetch the page ...
//! let next = Cursor::from_query_str("block_number=100&items_count=50");
//! controller.data_loaded(ticket, Some(next));
//!
//! assert_eq!(controller.buttons().page_numbers(), vec![1, 2]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                Server routes  /  CLI commands                   │
//! │   /blocks   /address/:aid   /token/:id   latest   page          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────────┬─────────────┴─────────┬───────────────────────┐
//! │   Sessions     │      Pagination       │      Indexer API      │
//! ├────────────────┼───────────────────────┼───────────────────────┤
//! │ Cookie id      │ Controller            │ Blocks / Addresses    │
//! │ LRU eviction   │ Page history          │ Tokens / Contracts    │
//! │ One view each  │ Links                 │ Retry / Rate Limit    │
//! └────────────────┴───────────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for chainscan
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination controller
pub mod pagination;

/// Indexer API client
pub mod api;

/// Explorer configuration
pub mod config;

/// Command-line interface and server mode
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ExplorerConfig;
pub use pagination::{Cursor, PaginationController};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
