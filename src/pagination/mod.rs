//! Pagination module
//!
//! Forward and backward navigation over a forward-only cursor API.
//!
//! # Overview
//!
//! The indexing API returns each slice of a collection with an opaque
//! `next_page_params` cursor and nothing else: there is no way to ask for
//! "page 3" or for the page before. The controller here remembers every
//! page a view has shown so the previous page can be looked up instead of
//! derived, and keeps the page number in the URL so the state survives
//! re-rendering.
//!
//! ```text
//!   URL query ──navigate──▶ PaginationController ──ticket──▶ PageSource::fetch_page
//!        ▲                       │       ▲                          │
//!        │                   buttons     └──────data_loaded─────────┘
//!        └──── LinkContext::render ◀─┘
//! ```

mod controller;
mod cursor;
mod history;
mod links;
mod types;

pub use controller::{page_buttons, PaginationController};
pub use cursor::{parse_page_number, Cursor};
pub use history::PageHistory;
pub use links::LinkContext;
pub use types::{
    ButtonRole, ButtonView, FetchTicket, LoadOutcome, NavigateOutcome, Page, PageButton,
    PageButtonSet, PageSource, PaginationView, Phase,
};
