//! Wallet and contract address endpoints

use super::models::{AddressCounters, AddressInfo, TokenBalance, Transaction};
use super::{address_path, numeric_params, ExplorerApi};
use crate::error::Result;
use crate::http::RequestConfig;
use crate::pagination::{Cursor, Page};
use crate::types::PAGE_NUMBER_KEY;

const TRANSACTION_CURSOR: [&str; 3] = ["block_number", "items_count", "index"];

impl ExplorerApi {
    /// Address detail
    pub async fn address(&self, aid: &str) -> Result<AddressInfo> {
        self.get(&address_path(aid, None)?).await
    }

    /// Address counters
    pub async fn address_counters(&self, aid: &str) -> Result<AddressCounters> {
        self.get(&address_path(aid, Some("counters"))?).await
    }

    /// One page of the tokens held by an address
    ///
    /// The token cursor has no fixed shape, so every cursor field but
    /// `page_number` is forwarded.
    pub async fn address_tokens(&self, aid: &str, cursor: &Cursor) -> Result<Page<TokenBalance>> {
        let params = cursor
            .without_network()
            .iter()
            .filter(|(key, _)| *key != PAGE_NUMBER_KEY)
            .fold(RequestConfig::new(), |config, (key, value)| {
                config.query(key, value)
            });
        self.get_page(&address_path(aid, Some("tokens"))?, params)
            .await
    }

    /// One page of the transactions of an address
    pub async fn address_transactions(
        &self,
        aid: &str,
        cursor: &Cursor,
    ) -> Result<Page<Transaction>> {
        let path = address_path(aid, Some("transactions"))?;
        self.get_page(&path, numeric_params(cursor, &TRANSACTION_CURSOR))
            .await
    }
}
