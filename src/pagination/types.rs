//! Pagination types and traits
//!
//! Defines the values flowing in and out of the pagination controller.

use super::cursor::Cursor;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Backend Envelope
// ============================================================================

/// One slice of a backend collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this slice
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Cursor of the following slice; absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_params: Option<Cursor>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_page_params: Option<Cursor>) -> Self {
        Self {
            items,
            next_page_params,
        }
    }

    /// Check if this is the last page
    pub fn is_last(&self) -> bool {
        self.next_page_params.is_none()
    }

    /// Transform the items, keeping the cursor
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_page_params: self.next_page_params,
        }
    }
}

/// Backend data fetch for one paginated resource
///
/// Given the cursor fields of the current URL, returns the matching slice.
/// The returned `next_page_params` is opaque and must be echoed back
/// verbatim (plus `page_number`) on the next request.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type of the collection
    type Item: Send;

    /// Fetch the slice identified by `cursor`
    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<Self::Item>>;
}

// ============================================================================
// Page Buttons
// ============================================================================

/// Position of a button relative to the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRole {
    /// Page before the current one
    Previous,
    /// The page being shown; never navigates
    Current,
    /// Page after the current one
    Next,
}

/// A navigable `(page_number, cursor)` target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageButton {
    /// Button position
    pub role: ButtonRole,
    /// Page number displayed on the button
    pub page_number: u64,
    /// Query to navigate to
    pub cursor: Cursor,
}

impl PageButton {
    /// Check if this button is the inert current-page button
    pub fn is_current(&self) -> bool {
        self.role == ButtonRole::Current
    }
}

/// Previous / current / next buttons computed for one render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageButtonSet {
    buttons: Vec<PageButton>,
}

impl PageButtonSet {
    pub(crate) fn from_buttons(buttons: Vec<PageButton>) -> Self {
        Self { buttons }
    }

    fn by_role(&self, role: ButtonRole) -> Option<&PageButton> {
        self.buttons.iter().find(|b| b.role == role)
    }

    /// Previous-page button, if resolvable
    pub fn previous(&self) -> Option<&PageButton> {
        self.by_role(ButtonRole::Previous)
    }

    /// Current-page button
    pub fn current(&self) -> Option<&PageButton> {
        self.by_role(ButtonRole::Current)
    }

    /// Next-page button, if there is a next page
    pub fn next(&self) -> Option<&PageButton> {
        self.by_role(ButtonRole::Next)
    }

    /// Page numbers in display order
    pub fn page_numbers(&self) -> Vec<u64> {
        self.buttons.iter().map(|b| b.page_number).collect()
    }

    /// Iterate over buttons in display order
    pub fn iter(&self) -> std::slice::Iter<'_, PageButton> {
        self.buttons.iter()
    }

    /// Number of buttons
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Check if there are no buttons
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

impl<'a> IntoIterator for &'a PageButtonSet {
    type Item = &'a PageButton;
    type IntoIter = std::slice::Iter<'a, PageButton>;

    fn into_iter(self) -> Self::IntoIter {
        self.buttons.iter()
    }
}

// ============================================================================
// Controller Events
// ============================================================================

/// Token identifying the fetch started by one navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// Navigation generation this fetch belongs to
    pub generation: u64,
    /// Page the fetch is for
    pub page_number: u64,
}

/// Result of a `navigate` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Fetch the page, then report back with the ticket
    Accepted(FetchTicket),
    /// History cannot reach this page; go back to the unpaginated base URL
    Redirect,
}

impl NavigateOutcome {
    /// Ticket of an accepted navigation
    pub fn ticket(&self) -> Option<FetchTicket> {
        match self {
            Self::Accepted(ticket) => Some(*ticket),
            Self::Redirect => None,
        }
    }

    /// Check if this is a redirect
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect)
    }
}

/// Result of a `data_loaded` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response belongs to the latest navigation and was applied
    Applied,
    /// A newer navigation superseded this response; state is unchanged
    Stale,
}

/// Lifecycle phase of a mounted view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the fetch with this ticket
    Loading(FetchTicket),
    /// Latest fetch applied
    Loaded,
}

// ============================================================================
// Rendered View
// ============================================================================

/// A button as rendered into a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    /// Number shown on the button
    pub page_number: u64,
    /// Whether this is the current page
    pub active: bool,
    /// Link target; absent for the current page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Pagination controls of a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    /// Numbered buttons
    pub buttons: Vec<ButtonView>,
    /// "Prev" arrow target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// "Next" arrow target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}
