//! Navigation links
//!
//! Turns cursors into `pathname?query` hrefs. Links stay on the network the
//! user is browsing: a non-default network is carried along as `network=`.

use super::cursor::Cursor;
use super::types::{ButtonView, PageButtonSet, PaginationView};
use crate::types::NETWORK_KEY;

/// Where links of one rendered view point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    pathname: String,
    network: Option<String>,
}

impl LinkContext {
    /// Links for `pathname` on the default network
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            network: None,
        }
    }

    /// Carry `network` on every link; pass `None` for the default network
    #[must_use]
    pub fn with_network(mut self, network: Option<impl Into<String>>) -> Self {
        self.network = network.map(Into::into);
        self
    }

    /// Path links are built on
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Href navigating to `cursor`
    pub fn href(&self, cursor: &Cursor) -> String {
        let mut query = cursor.without_network();
        if let Some(network) = &self.network {
            query.insert(NETWORK_KEY, network.as_str());
        }
        self.join(&query)
    }

    /// The unpaginated base URL, used when history cannot reach a page
    pub fn base_href(&self) -> String {
        self.href(&Cursor::new())
    }

    fn join(&self, query: &Cursor) -> String {
        if query.is_empty() {
            self.pathname.clone()
        } else {
            format!("{}?{}", self.pathname, query.to_query_string())
        }
    }

    /// Render a button set into link targets
    pub fn render(&self, buttons: &PageButtonSet) -> PaginationView {
        PaginationView {
            buttons: buttons
                .iter()
                .map(|button| ButtonView {
                    page_number: button.page_number,
                    active: button.is_current(),
                    href: (!button.is_current()).then(|| self.href(&button.cursor)),
                })
                .collect(),
            prev: buttons.previous().map(|b| self.href(&b.cursor)),
            next: buttons.next().map(|b| self.href(&b.cursor)),
        }
    }
}
