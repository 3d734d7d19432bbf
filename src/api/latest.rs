//! Home page rows for the most recent blocks and transactions

use super::models::{Block, Transaction};
use super::{ExplorerApi, LATEST_BLOCKS_URL, LATEST_TRANSACTIONS_URL};
use crate::error::Result;
use crate::types::TransactionType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Rows shown per home page table
pub const MAX_ROW: usize = 5;

const WEI_DECIMALS: u32 = 18;

/// One row of a home page table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRow {
    /// Block height or transaction hash
    pub transaction_id: String,
    /// Block rewards or transaction value
    pub token_amount: String,
    /// Kind-specific details
    pub txn_or_block_info: RowInfo,
    /// Age relative to now, e.g. "5 mins ago"
    pub time: String,
}

/// Details of a [`LatestRow`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RowInfo {
    /// Block row
    Block {
        /// Transactions in the block; absent when there are none
        transactions_per_block: Option<u64>,
    },
    /// Transaction row
    Transaction {
        /// Sender hash
        from: Option<String>,
        /// Recipient hash; absent for contract creation
        to: Option<String>,
        /// Display category
        transaction_type: TransactionType,
    },
}

impl LatestRow {
    /// Row for a block, with rewards summed and converted from wei
    pub fn from_block(block: &Block, now: DateTime<Utc>) -> Self {
        let rewards = block
            .rewards
            .iter()
            .filter_map(|r| match r.reward.trim().parse::<u128>() {
                Ok(wei) => Some(wei),
                Err(_) => {
                    warn!(height = block.height, reward = %r.reward, "Skipping malformed reward");
                    None
                }
            })
            .fold(0u128, u128::saturating_add);

        Self {
            transaction_id: block.height.to_string(),
            token_amount: format_units(rewards, WEI_DECIMALS),
            txn_or_block_info: RowInfo::Block {
                transactions_per_block: block.tx_count.filter(|n| *n > 0),
            },
            time: age(block.timestamp.as_deref(), now),
        }
    }

    /// Row for a transaction; the value is kept as sent
    pub fn from_transaction(tx: &Transaction, now: DateTime<Utc>) -> Self {
        Self {
            transaction_id: tx.hash.clone(),
            token_amount: tx.value.clone().unwrap_or_default(),
            txn_or_block_info: RowInfo::Transaction {
                from: tx.from.as_ref().map(|a| a.hash.clone()),
                to: tx.to.as_ref().map(|a| a.hash.clone()),
                transaction_type: TransactionType::from_tx_types(&tx.tx_types),
            },
            time: age(tx.timestamp.as_deref(), now),
        }
    }
}

fn age(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    timestamp.map(|ts| time_ago(ts, now)).unwrap_or_default()
}

/// Render an integer amount with `decimals` implied decimal places
///
/// Trailing zeros of the fraction are dropped, and so is the point when
/// nothing is left after it. `decimals` is capped at 38, the most a
/// `u128` scale can hold.
pub fn format_units(amount: u128, decimals: u32) -> String {
    let decimals = decimals.min(38);
    let scale = 10u128.pow(decimals);
    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{fraction:0width$}", width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Describe how long before `now` an RFC 3339 timestamp was
///
/// Uses the coarsest unit that fits. Timestamps that do not parse are
/// returned as given.
pub fn time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let seconds = (now - then.with_timezone(&Utc)).num_seconds().max(0);

    let (value, unit) = match seconds {
        s if s >= 86_400 => (s / 86_400, "day"),
        s if s >= 3_600 => (s / 3_600, "hr"),
        s if s >= 60 => (s / 60, "min"),
        s => (s, "sec"),
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}

impl ExplorerApi {
    /// Most recent blocks, newest first
    pub async fn latest_blocks(&self) -> Result<Vec<LatestRow>> {
        let blocks: Vec<Block> = self.get(LATEST_BLOCKS_URL).await?;
        let now = Utc::now();
        Ok(blocks
            .iter()
            .take(MAX_ROW)
            .map(|block| LatestRow::from_block(block, now))
            .collect())
    }

    /// Most recent transactions, newest first
    pub async fn latest_transactions(&self) -> Result<Vec<LatestRow>> {
        let transactions: Vec<Transaction> = self.get(LATEST_TRANSACTIONS_URL).await?;
        let now = Utc::now();
        Ok(transactions
            .iter()
            .take(MAX_ROW)
            .map(|tx| LatestRow::from_transaction(tx, now))
            .collect())
    }
}
