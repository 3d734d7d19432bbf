//! Verified smart contracts
//!
//! The backend sends contracts snake_cased with nullable metadata; pages
//! render the camelCased [`ContractView`] with display defaults filled in.

use super::{is_evm_address, ExplorerApi, SMART_CONTRACTS_URL};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown when the optimizer run count is unknown
const UNKNOWN_RUNS: &str = "N/A";

/// Parameter of an ABI entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    /// Tuple components and the like
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Function, event or constructor in a contract ABI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAbiEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<AbiParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

/// Contract as sent by the backend
///
/// Unverified contracts come back with most fields null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawContract {
    pub abi: Option<Vec<ContractAbiEntry>>,
    pub compiler_settings: Option<JsonValue>,
    pub compiler_version: Option<String>,
    pub constructor_args: Option<String>,
    pub creation_bytecode: Option<String>,
    pub deployed_bytecode: Option<String>,
    pub evm_version: Option<String>,
    pub is_changed_bytecode: Option<bool>,
    pub is_fully_verified: Option<bool>,
    pub is_partially_verified: Option<bool>,
    pub is_self_destructed: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_verified_via_eth_bytecode_db: Option<bool>,
    pub is_verified_via_sourcify: Option<bool>,
    pub is_vyper_contract: Option<bool>,
    pub name: Option<String>,
    pub optimization_enabled: Option<bool>,
    pub optimization_runs: Option<u64>,
    pub source_code: Option<String>,
    pub verified_at: Option<String>,
}

/// Contract as rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractView {
    pub abi: Vec<ContractAbiEntry>,
    pub compiler_settings: Option<JsonValue>,
    pub compiler_version: String,
    pub constructor_args: Option<String>,
    pub creation_bytecode: Option<String>,
    pub deployed_bytecode: Option<String>,
    pub evm_version: Option<String>,
    pub is_changed_bytecode: bool,
    pub is_fully_verified: bool,
    pub is_partially_verified: bool,
    pub is_self_destructed: bool,
    pub is_verified: bool,
    pub is_verified_via_eth_bytecode_db: bool,
    pub is_verified_via_sourcify: bool,
    pub is_vyper_contract: bool,
    pub name: Option<String>,
    pub optimization_enabled: bool,
    /// Run count, or "N/A"
    pub optimization_runs: String,
    pub source_code: Option<String>,
    /// Verification date as MM/DD/YYYY in UTC
    pub verified_at: String,
}

impl From<RawContract> for ContractView {
    fn from(raw: RawContract) -> Self {
        Self {
            abi: raw.abi.unwrap_or_default(),
            compiler_settings: raw.compiler_settings,
            compiler_version: raw.compiler_version.unwrap_or_default(),
            constructor_args: raw.constructor_args,
            creation_bytecode: raw.creation_bytecode,
            deployed_bytecode: raw.deployed_bytecode,
            evm_version: raw.evm_version,
            is_changed_bytecode: raw.is_changed_bytecode.unwrap_or_default(),
            is_fully_verified: raw.is_fully_verified.unwrap_or_default(),
            is_partially_verified: raw.is_partially_verified.unwrap_or_default(),
            is_self_destructed: raw.is_self_destructed.unwrap_or_default(),
            is_verified: raw.is_verified.unwrap_or_default(),
            is_verified_via_eth_bytecode_db: raw.is_verified_via_eth_bytecode_db.unwrap_or_default(),
            is_verified_via_sourcify: raw.is_verified_via_sourcify.unwrap_or_default(),
            is_vyper_contract: raw.is_vyper_contract.unwrap_or_default(),
            name: raw.name,
            optimization_enabled: raw.optimization_enabled.unwrap_or_default(),
            optimization_runs: raw
                .optimization_runs
                .map_or_else(|| UNKNOWN_RUNS.to_string(), |runs| runs.to_string()),
            source_code: raw.source_code,
            verified_at: raw.verified_at.as_deref().map(format_date).unwrap_or_default(),
        }
    }
}

/// Format an RFC 3339 timestamp as MM/DD/YYYY in UTC, or return it unchanged
fn format_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc).format("%m/%d/%Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

impl ExplorerApi {
    /// Verified contract at an address, ready for display
    pub async fn contract(&self, hash: &str) -> Result<ContractView> {
        if !is_evm_address(hash) {
            return Err(Error::invalid_address(hash));
        }
        let raw: RawContract = self.get(&format!("{SMART_CONTRACTS_URL}/{hash}")).await?;
        Ok(raw.into())
    }
}
