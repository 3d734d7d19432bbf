//! Backend indexing API client
//!
//! Typed wrappers over the indexer's REST endpoints, one [`ExplorerApi`] per
//! network. Paginated endpoints return [`Page`], whose `next_page_params`
//! is an opaque [`Cursor`](crate::pagination::Cursor).
//!
//! Cursor fields taken from the URL are sanitized before they are sent:
//! malformed numbers are dropped (or reset the whole cursor, for block
//! lists) rather than rejected.

mod addresses;
mod blocks;
mod contracts;
mod latest;
mod models;
mod sources;
mod tokens;

pub use contracts::{AbiParam, ContractAbiEntry, ContractView, RawContract};
pub use latest::{format_units, time_ago, LatestRow, RowInfo, MAX_ROW};
pub use models::{
    AddressCounters, AddressInfo, AddressRef, Block, Reward, Token, TokenBalance, TokenCounters,
    TokenTransfer, Transaction,
};
pub use sources::{
    AddressTokensSource, AddressTransactionsSource, BlockTransactionsSource, BlocksSource,
    TokenTransfersSource, TokensSource,
};

use crate::config::ExplorerConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Cursor, Page};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Endpoints
// ============================================================================

/// Block list and detail
pub const BLOCKS_URL: &str = "api/v2/blocks";
/// Wallet and contract addresses
pub const ADDRESSES_URL: &str = "api/v2/addresses";
/// Token list and detail
pub const TOKENS_URL: &str = "api/v2/tokens";
/// Most recent blocks for the home page
pub const LATEST_BLOCKS_URL: &str = "api/v2/main-page/blocks";
/// Most recent transactions for the home page
pub const LATEST_TRANSACTIONS_URL: &str = "api/v2/main-page/transactions";
/// Verified contract source and ABI
pub const SMART_CONTRACTS_URL: &str = "api/v2/smart-contracts";

static EVM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

static RESOURCE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z_.-]+$").expect("valid id regex"));

/// Check if a string is a `0x`-prefixed 20-byte hex address
pub fn is_evm_address(value: &str) -> bool {
    EVM_ADDRESS.is_match(value)
}

/// Check if a block height, hash or token id is safe to put in a request path
pub fn is_resource_id(value: &str) -> bool {
    RESOURCE_ID.is_match(value)
}

/// Path to a single resource under `base`, optionally with a sub-collection
///
/// Ids end up in the request path, so anything that could change which
/// endpoint is hit is refused.
fn resource_path(base: &str, id: &str, tail: Option<&str>) -> Result<String> {
    if !is_resource_id(id) {
        return Err(Error::invalid_id(id));
    }
    Ok(match tail {
        Some(tail) => format!("{base}/{id}/{tail}"),
        None => format!("{base}/{id}"),
    })
}

/// Path to an address resource, refusing anything but an EVM address
fn address_path(aid: &str, tail: Option<&str>) -> Result<String> {
    if !is_evm_address(aid) {
        return Err(Error::invalid_address(aid));
    }
    resource_path(ADDRESSES_URL, aid, tail)
}

/// Check if a cursor value is a finite number
pub fn is_numeric(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .is_some_and(f64::is_finite)
}

/// Add the listed cursor fields that hold numbers, in the listed order
fn numeric_params(cursor: &Cursor, keys: &[&str]) -> RequestConfig {
    keys.iter().fold(RequestConfig::new(), |config, key| {
        let value = cursor.get(key).filter(|v| is_numeric(Some(v)));
        config.query_opt(*key, value)
    })
}

/// Add the listed cursor fields that are present, in the listed order
fn present_params(cursor: &Cursor, keys: &[&str]) -> RequestConfig {
    keys.iter().fold(RequestConfig::new(), |config, key| {
        config.query_opt(*key, cursor.get(key))
    })
}

// ============================================================================
// Client
// ============================================================================

/// Indexer client bound to one network
#[derive(Debug)]
pub struct ExplorerApi {
    network: String,
    http: HttpClient,
}

impl ExplorerApi {
    /// Wrap an HTTP client whose base URL points at the indexer
    pub fn new(network: impl Into<String>, http: HttpClient) -> Self {
        Self {
            network: network.into(),
            http,
        }
    }

    /// Network this client talks to
    pub fn network(&self) -> &str {
        &self.network
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(network = %self.network, path, "Fetching");
        self.http.get_json(path).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: RequestConfig,
    ) -> Result<Page<T>> {
        debug!(network = %self.network, path, query = ?params.query, "Fetching page");
        self.http.get_json_with_config(path, params).await
    }
}

/// One [`ExplorerApi`] per configured network
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    apis: BTreeMap<String, Arc<ExplorerApi>>,
}

impl ApiRegistry {
    /// Build clients for every network in the configuration
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        let mut registry = Self::default();
        for (name, network) in &config.networks {
            let http = HttpClient::with_config(config.http.client_config(&network.base_url))?;
            registry.insert(ExplorerApi::new(name, http));
        }
        Ok(registry)
    }

    /// Add or replace a client
    pub fn insert(&mut self, api: ExplorerApi) {
        self.apis.insert(api.network.clone(), Arc::new(api));
    }

    /// Client for a network
    pub fn get(&self, network: &str) -> Option<Arc<ExplorerApi>> {
        self.apis.get(network).cloned()
    }

    /// Configured network names
    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests;
