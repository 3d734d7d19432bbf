//! Pagination controller
//!
//! One controller lives for as long as a paginated view is mounted. It is
//! driven by two events:
//!
//! - [`PaginationController::navigate`] whenever the URL query changes
//! - [`PaginationController::data_loaded`] when the fetch for it completes
//!
//! and answers [`PaginationController::buttons`] for rendering.

use super::cursor::Cursor;
use super::history::PageHistory;
use super::types::{
    ButtonRole, FetchTicket, LoadOutcome, NavigateOutcome, PageButton, PageButtonSet, Phase,
};
use tracing::debug;

/// Cursor pagination state for one mounted view
#[derive(Debug, Clone, Default)]
pub struct PaginationController {
    page_number: u64,
    cursor: Cursor,
    history: PageHistory,
    next_page_params: Option<Cursor>,
    generation: u64,
    phase: Phase,
}

impl PaginationController {
    /// Controller of a freshly mounted view: page 1, empty history
    pub fn new() -> Self {
        Self {
            page_number: 1,
            ..Default::default()
        }
    }

    /// Handle a URL change
    ///
    /// A page past the first with nothing in history means the view was
    /// reached by deep link or reload; there is no way back, so the view is
    /// reset and sent to its base URL. Otherwise the page is recorded and a
    /// ticket is issued for its fetch.
    pub fn navigate(&mut self, query: &Cursor) -> NavigateOutcome {
        let cursor = query.without_network();
        let page_number = cursor.page_number();

        if page_number > 1 && self.history.is_empty() {
            debug!(page_number, "No history for page, redirecting to first page");
            self.reset();
            return NavigateOutcome::Redirect;
        }

        if self.history.record(&cursor) {
            debug!(page_number, recorded = self.history.len(), "Recorded page cursor");
        }

        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            page_number,
        };
        self.page_number = page_number;
        self.cursor = cursor;
        self.next_page_params = None;
        self.phase = Phase::Loading(ticket);

        NavigateOutcome::Accepted(ticket)
    }

    /// Handle a completed fetch
    ///
    /// Responses for anything but the latest navigation are dropped, so a
    /// slow response for an older page can never overwrite a newer one.
    pub fn data_loaded(
        &mut self,
        ticket: FetchTicket,
        next_page_params: Option<Cursor>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "Dropping stale page response"
            );
            return LoadOutcome::Stale;
        }

        self.next_page_params = next_page_params;
        self.phase = Phase::Loaded;
        LoadOutcome::Applied
    }

    /// Buttons for the current state
    pub fn buttons(&self) -> PageButtonSet {
        page_buttons(
            self.page_number,
            &self.cursor,
            self.next_page_params.as_ref(),
            &self.history,
        )
    }

    fn reset(&mut self) {
        self.page_number = 1;
        self.cursor = Cursor::new();
        self.history.clear();
        self.next_page_params = None;
        self.phase = Phase::Idle;
    }

    /// Page currently shown
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// Query of the page currently shown, without `network`
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Pages seen so far
    pub fn history(&self) -> &PageHistory {
        &self.history
    }

    /// Cursor of the following page from the latest applied response
    pub fn next_page_params(&self) -> Option<&Cursor> {
        self.next_page_params.as_ref()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Compute the previous / current / next buttons
///
/// - last page (no `next_page_params`): previous, current
/// - first page: current, next
/// - otherwise: previous, current, next
///
/// A previous page missing from history is left out, and so is a next
/// page whose number would not fit.
pub fn page_buttons(
    current_page: u64,
    current_query: &Cursor,
    next_page_params: Option<&Cursor>,
    history: &PageHistory,
) -> PageButtonSet {
    let current_page = current_page.max(1);

    let previous = current_page
        .checked_sub(1)
        .filter(|n| *n >= 1)
        .and_then(|n| history.get(n).map(|cursor| (n, cursor)))
        .map(|(n, cursor)| PageButton {
            role: ButtonRole::Previous,
            page_number: n,
            cursor: cursor.clone(),
        });

    let current = PageButton {
        role: ButtonRole::Current,
        page_number: current_page,
        cursor: current_query.with_page_number(current_page),
    };

    // No page follows u64::MAX
    let next = next_page_params
        .zip(current_page.checked_add(1))
        .map(|(params, n)| PageButton {
            role: ButtonRole::Next,
            page_number: n,
            cursor: params.with_page_number(n),
        });

    let buttons = match (next, current_page) {
        (None, _) => vec![previous, Some(current)],
        (next @ Some(_), 1) => vec![Some(current), next],
        (next, _) => vec![previous, Some(current), next],
    };

    PageButtonSet::from_buttons(buttons.into_iter().flatten().collect())
}
