//! Common types used throughout chainscan
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Query Keys
// ============================================================================

/// Query key the frontend synthesizes for page navigation
pub const PAGE_NUMBER_KEY: &str = "page_number";

/// Query key selecting the backend network; never part of a cursor
pub const NETWORK_KEY: &str = "network";

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Transaction Type
// ============================================================================

/// Display category of a transaction row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Plain value transfer
    #[default]
    Transaction,
    /// Call into a smart contract
    ContractCall,
}

impl TransactionType {
    /// Classify from the backend `tx_types` list (first entry wins)
    pub fn from_tx_types(tx_types: &[String]) -> Self {
        match tx_types.first() {
            Some(kind) if kind.contains("contract") => Self::ContractCall,
            _ => Self::Transaction,
        }
    }
}
