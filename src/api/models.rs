//! Backend response models
//!
//! Only the fields the explorer reads are typed. Everything else the
//! indexer sends is kept in `extra` and passed through to rendered pages.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// Address reference embedded in other objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRef {
    /// Address hash
    pub hash: String,
    /// Whether the address is a contract
    #[serde(default)]
    pub is_contract: Option<bool>,
    /// Contract name, if verified
    #[serde(default)]
    pub name: Option<String>,
}

/// Block reward entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Reward amount in wei
    pub reward: String,
    /// Reward kind (e.g. "Miner Reward")
    #[serde(rename = "type", default)]
    pub reward_type: Option<String>,
}

/// Block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block height
    pub height: u64,
    /// Block hash
    #[serde(default)]
    pub hash: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Number of transactions
    #[serde(default)]
    pub tx_count: Option<u64>,
    /// Rewards paid out in this block
    #[serde(default)]
    pub rewards: Vec<Reward>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash
    pub hash: String,
    /// Sender
    #[serde(default)]
    pub from: Option<AddressRef>,
    /// Recipient; absent for contract creation
    #[serde(default)]
    pub to: Option<AddressRef>,
    /// Value in wei
    #[serde(default)]
    pub value: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Backend transaction categories
    #[serde(default)]
    pub tx_types: Vec<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Token transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    /// Transaction carrying the transfer
    pub tx_hash: String,
    /// Transfer kind
    #[serde(rename = "type", default)]
    pub transfer_type: Option<String>,
    /// Sender
    #[serde(default)]
    pub from: Option<AddressRef>,
    /// Recipient
    #[serde(default)]
    pub to: Option<AddressRef>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address
    pub address: String,
    /// Token name
    #[serde(default)]
    pub name: Option<String>,
    /// Ticker symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Decimal places
    #[serde(default)]
    pub decimals: Option<String>,
    /// Number of holders
    #[serde(default)]
    pub holders: Option<String>,
    /// Total supply in base units
    #[serde(default)]
    pub total_supply: Option<String>,
    /// Token standard (e.g. "ERC-20")
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    /// Exchange rate, if known
    #[serde(default)]
    pub exchange_rate: Option<String>,
    /// Market cap, if known
    #[serde(default)]
    pub circulating_market_cap: Option<String>,
    /// Icon URL
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Token counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounters {
    /// Number of holders
    pub token_holders_count: String,
    /// Number of transfers
    pub transfers_count: String,
}

/// Token balance held by an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Token held
    pub token: Token,
    /// Balance in base units
    #[serde(default)]
    pub value: Option<String>,
    /// NFT id, for non-fungible tokens
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Wallet or contract address detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Address hash
    pub hash: String,
    /// Native coin balance in wei
    #[serde(default)]
    pub coin_balance: Option<String>,
    /// Whether the address is a contract
    #[serde(default)]
    pub is_contract: bool,
    /// Whether the contract source is verified
    #[serde(default)]
    pub is_verified: Option<bool>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Address counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCounters {
    /// Number of transactions
    #[serde(default)]
    pub transactions_count: Option<String>,
    /// Number of token transfers
    #[serde(default)]
    pub token_transfers_count: Option<String>,
    /// Gas used
    #[serde(default)]
    pub gas_usage_count: Option<String>,
    /// Blocks validated by this address
    #[serde(default)]
    pub validations_count: Option<String>,
}
