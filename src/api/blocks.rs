//! Block endpoints

use super::models::{Block, Transaction};
use super::{is_numeric, numeric_params, resource_path, ExplorerApi, BLOCKS_URL};
use crate::error::Result;
use crate::http::RequestConfig;
use crate::pagination::{Cursor, Page};
use crate::types::PAGE_NUMBER_KEY;

const BLOCK_CURSOR: [&str; 2] = ["block_number", "items_count"];
const TRANSACTION_CURSOR: [&str; 3] = ["block_number", "items_count", "index"];

/// Query for the block list
///
/// Any non-numeric cursor field, `page_number` included, sends the request
/// for the first page instead.
pub(crate) fn block_list_params(cursor: &Cursor) -> RequestConfig {
    let valid = BLOCK_CURSOR
        .iter()
        .chain(std::iter::once(&PAGE_NUMBER_KEY))
        .all(|key| is_numeric(cursor.get(key)));

    let params = if valid {
        numeric_params(cursor, &BLOCK_CURSOR)
    } else {
        RequestConfig::new()
    };
    params.query("type", "block")
}

impl ExplorerApi {
    /// One page of the block list
    pub async fn blocks(&self, cursor: &Cursor) -> Result<Page<Block>> {
        self.get_page(BLOCKS_URL, block_list_params(cursor)).await
    }

    /// Block by height or hash
    pub async fn block(&self, id: &str) -> Result<Block> {
        self.get(&resource_path(BLOCKS_URL, id, None)?).await
    }

    /// One page of the transactions in a block
    pub async fn block_transactions(
        &self,
        id: &str,
        cursor: &Cursor,
    ) -> Result<Page<Transaction>> {
        let path = resource_path(BLOCKS_URL, id, Some("transactions"))?;
        self.get_page(&path, numeric_params(cursor, &TRANSACTION_CURSOR))
            .await
    }
}
