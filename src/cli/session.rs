//! Per-visitor pagination state for server mode
//!
//! A browser session stands in for the single-page app: it has one mounted
//! paginated view at a time, identified by its base href. Requesting a
//! different view unmounts the old one together with its page history.

use crate::pagination::{
    page_buttons, Cursor, FetchTicket, LoadOutcome, NavigateOutcome, PageButtonSet, PageHistory,
    PaginationController,
};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "chainscan_session";

const MAX_SESSION_ID_LEN: usize = 64;

const SESSION_ID_BYTES: usize = 16;

/// The mounted view of a session
#[derive(Debug)]
struct View {
    key: String,
    controller: PaginationController,
}

#[derive(Debug)]
struct Session {
    view: Option<View>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, Session>,
    clock: u64,
}

impl Sessions {
    /// Session for `id`, created if needed and marked as most recently used
    fn touch(&mut self, id: &str, max_sessions: usize) -> &mut Session {
        self.clock += 1;
        let now = self.clock;

        if !self.entries.contains_key(id) && self.entries.len() >= max_sessions {
            self.evict_oldest();
        }

        let session = self.entries.entry(id.to_string()).or_insert(Session {
            view: None,
            last_used: now,
        });
        session.last_used = now;
        session
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, session)| session.last_used)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            debug!(session = %id, "Evicting least recently used session");
            self.entries.remove(&id);
        }
    }
}

/// Bounded, shared map of session id to mounted view
///
/// Controllers are only touched while the write lock is held, and the lock
/// is never held across a backend fetch.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<Sessions>>,
    max_sessions: usize,
}

impl SessionStore {
    /// Store holding at most `max_sessions` sessions
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Sessions::default())),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Generate an unguessable id for a new session
    pub fn new_id(&self) -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Check if a client-supplied id has the shape of one we issue
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_SESSION_ID_LEN
            && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Feed a URL change to the session's view
    ///
    /// A `view_key` other than the mounted one mounts a fresh view first.
    pub async fn navigate(&self, session_id: &str, view_key: &str, query: &Cursor) -> NavigateOutcome {
        let mut sessions = self.sessions.write().await;
        let session = sessions.touch(session_id, self.max_sessions);

        let mut view = match session.view.take() {
            Some(view) if view.key == view_key => view,
            _ => {
                debug!(session = %session_id, view = %view_key, "Mounting view");
                View {
                    key: view_key.to_string(),
                    controller: PaginationController::new(),
                }
            }
        };

        let outcome = view.controller.navigate(query);
        session.view = Some(view);
        outcome
    }

    /// Feed a completed fetch to the session's view and compute its buttons
    ///
    /// The buttons always describe the page that was fetched, even when the
    /// response is stale or the view has since been replaced; only the
    /// mounted view's own state is protected.
    pub async fn data_loaded(
        &self,
        session_id: &str,
        view_key: &str,
        ticket: FetchTicket,
        query: &Cursor,
        next_page_params: Option<Cursor>,
    ) -> (LoadOutcome, PageButtonSet) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.touch(session_id, self.max_sessions);

        match session.view.as_mut().filter(|view| view.key == view_key) {
            Some(view) => {
                let outcome = view
                    .controller
                    .data_loaded(ticket, next_page_params.clone());
                let buttons = page_buttons(
                    ticket.page_number,
                    &query.without_network(),
                    next_page_params.as_ref(),
                    view.controller.history(),
                );
                (outcome, buttons)
            }
            None => {
                debug!(session = %session_id, view = %view_key, "View unmounted before response");
                let buttons = page_buttons(
                    ticket.page_number,
                    &query.without_network(),
                    next_page_params.as_ref(),
                    &PageHistory::new(),
                );
                (LoadOutcome::Stale, buttons)
            }
        }
    }

    /// Unmount whatever view the session has open
    pub async fn leave(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.touch(session_id, self.max_sessions).view = None;
    }

    /// Number of tracked sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }

    /// Check if no sessions are tracked
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.entries.is_empty()
    }

    /// Check if a session is tracked
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.entries.contains_key(session_id)
    }

    /// Pages recorded by the session's mounted view
    pub async fn history_pages(&self, session_id: &str) -> Vec<u64> {
        self.sessions
            .read()
            .await
            .entries
            .get(session_id)
            .and_then(|session| session.view.as_ref())
            .map(|view| view.controller.history().page_numbers().collect())
            .unwrap_or_default()
    }
}

/// Session id from a `Cookie` header value
pub fn session_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| SessionStore::is_valid_id(value))
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
