//! [`PageSource`] adapters for every paginated endpoint

use super::models::{Block, Token, TokenBalance, TokenTransfer, Transaction};
use super::ExplorerApi;
use crate::error::Result;
use crate::pagination::{Cursor, Page, PageSource};
use async_trait::async_trait;
use std::sync::Arc;

/// Paginated collection with no parent resource
macro_rules! collection_source {
    ($(#[$doc:meta])* $name:ident, $item:ty, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            api: Arc<ExplorerApi>,
        }

        impl $name {
            pub fn new(api: Arc<ExplorerApi>) -> Self {
                Self { api }
            }
        }

        #[async_trait]
        impl PageSource for $name {
            type Item = $item;

            async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<$item>> {
                self.api.$method(cursor).await
            }
        }
    };
}

/// Paginated collection under a block, address or token
macro_rules! nested_source {
    ($(#[$doc:meta])* $name:ident, $item:ty, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            api: Arc<ExplorerApi>,
            id: String,
        }

        impl $name {
            pub fn new(api: Arc<ExplorerApi>, id: impl Into<String>) -> Self {
                Self { api, id: id.into() }
            }
        }

        #[async_trait]
        impl PageSource for $name {
            type Item = $item;

            async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<$item>> {
                self.api.$method(&self.id, cursor).await
            }
        }
    };
}

collection_source!(
    /// Block list
    BlocksSource,
    Block,
    blocks
);

collection_source!(
    /// Token list
    TokensSource,
    Token,
    tokens
);

nested_source!(
    /// Transactions in one block
    BlockTransactionsSource,
    Transaction,
    block_transactions
);

nested_source!(
    /// Transactions of one address
    AddressTransactionsSource,
    Transaction,
    address_transactions
);

nested_source!(
    /// Tokens held by one address
    AddressTokensSource,
    TokenBalance,
    address_tokens
);

nested_source!(
    /// Transfers of one token
    TokenTransfersSource,
    TokenTransfer,
    token_transfers
);
