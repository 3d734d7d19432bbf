//! Token endpoints

use super::models::{Token, TokenCounters, TokenTransfer};
use super::{numeric_params, present_params, resource_path, ExplorerApi, TOKENS_URL};
use crate::error::Result;
use crate::pagination::{Cursor, Page};

const TOKEN_CURSOR: [&str; 6] = [
    "contract_address_hash",
    "holder_count",
    "is_name_null",
    "items_count",
    "market_cap",
    "name",
];
const TRANSFER_CURSOR: [&str; 2] = ["block_number", "index"];

impl ExplorerApi {
    /// One page of the token list
    pub async fn tokens(&self, cursor: &Cursor) -> Result<Page<Token>> {
        self.get_page(TOKENS_URL, present_params(cursor, &TOKEN_CURSOR))
            .await
    }

    /// Token by contract address
    pub async fn token(&self, id: &str) -> Result<Token> {
        self.get(&resource_path(TOKENS_URL, id, None)?).await
    }

    /// Token counters
    pub async fn token_counters(&self, id: &str) -> Result<TokenCounters> {
        self.get(&resource_path(TOKENS_URL, id, Some("counters"))?)
            .await
    }

    /// One page of the transfers of a token
    pub async fn token_transfers(&self, id: &str, cursor: &Cursor) -> Result<Page<TokenTransfer>> {
        let path = resource_path(TOKENS_URL, id, Some("transfers"))?;
        self.get_page(&path, numeric_params(cursor, &TRANSFER_CURSOR))
            .await
    }
}
