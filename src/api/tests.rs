//! Tests for the backend API client

use super::blocks::block_list_params;
use super::*;
use crate::config::ExplorerConfig;
use crate::error::Error;
use crate::http::HttpClientConfig;
use crate::pagination::PageSource;
use crate::types::{BackoffType, TransactionType};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0x1a2B3c4D5e6F708192a3b4C5d6e7F8091A2b3C4d";

fn api_for(server: &MockServer) -> ExplorerApi {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(1),
        )
        .no_rate_limit()
        .build();
    ExplorerApi::new("MainNet", HttpClient::with_config(config).unwrap())
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn query(params: &RequestConfig) -> Vec<(&str, &str)> {
    params
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

// ============================================================================
// Input checks
// ============================================================================

#[test_case(ADDRESS => true ; "mixed case address")]
#[test_case("0x0000000000000000000000000000000000000000" => true ; "zero address")]
#[test_case("1a2B3c4D5e6F708192a3b4C5d6e7F8091A2b3C4d" => false ; "missing prefix")]
#[test_case("0x1a2B" => false ; "too short")]
#[test_case("0xZZ2B3c4D5e6F708192a3b4C5d6e7F8091A2b3C4d" => false ; "not hex")]
#[test_case("" => false ; "empty")]
fn test_is_evm_address(value: &str) -> bool {
    is_evm_address(value)
}

#[test_case("12345" => true ; "block height")]
#[test_case(ADDRESS => true ; "token address")]
#[test_case("a b" => false ; "space")]
#[test_case("../counters" => false ; "path traversal")]
#[test_case("" => false ; "empty")]
fn test_is_resource_id(value: &str) -> bool {
    is_resource_id(value)
}

#[test_case(Some("100") => true ; "integer")]
#[test_case(Some(" 42 ") => true ; "padded")]
#[test_case(Some("1.5") => true ; "decimal")]
#[test_case(Some("abc") => false ; "word")]
#[test_case(Some("") => false ; "empty")]
#[test_case(Some("inf") => false ; "infinite")]
#[test_case(None => false ; "missing")]
fn test_is_numeric(value: Option<&str>) -> bool {
    is_numeric(value)
}

#[test]
fn test_block_list_params_valid_cursor() {
    let cursor = Cursor::from_query_str("block_number=100&items_count=50&page_number=2");
    let params = block_list_params(&cursor);
    assert_eq!(
        query(&params),
        vec![
            ("block_number", "100"),
            ("items_count", "50"),
            ("type", "block")
        ]
    );
}

#[test_case("block_number=abc&items_count=50&page_number=2" ; "bad block number")]
#[test_case("block_number=100&items_count=x&page_number=2" ; "bad items count")]
#[test_case("block_number=100&items_count=50&page_number=two" ; "bad page number")]
#[test_case("block_number=100&items_count=50" ; "first page")]
#[test_case("" ; "empty")]
fn test_block_list_params_falls_back_to_first_page(raw: &str) {
    let params = block_list_params(&Cursor::from_query_str(raw));
    assert_eq!(query(&params), vec![("type", "block")]);
}

#[test]
fn test_resource_path_rejects_path_tricks() {
    assert_eq!(
        resource_path(BLOCKS_URL, "12", Some("transactions")).unwrap(),
        "api/v2/blocks/12/transactions"
    );
    assert!(resource_path(BLOCKS_URL, "../tokens", None)
        .unwrap_err()
        .is_bad_request());
    assert!(resource_path(BLOCKS_URL, "1?type=x", None).is_err());
    assert!(resource_path(BLOCKS_URL, "", None).is_err());
}

// ============================================================================
// Latest rows
// ============================================================================

#[test_case(0, 18 => "0" ; "zero")]
#[test_case(1_000_000_000_000_000_000, 18 => "1" ; "one coin")]
#[test_case(1_500_000_000_000_000_000, 18 => "1.5" ; "fraction")]
#[test_case(1, 18 => "0.000000000000000001" ; "one wei")]
#[test_case(12_345, 2 => "123.45" ; "cents")]
#[test_case(7, 0 => "7" ; "no decimals")]
fn test_format_units(amount: u128, decimals: u32) -> String {
    format_units(amount, decimals)
}

#[test_case("2024-03-01T11:59:30Z" => "30 secs ago" ; "seconds")]
#[test_case("2024-03-01T11:59:59Z" => "1 sec ago" ; "one second")]
#[test_case("2024-03-01T11:55:00Z" => "5 mins ago" ; "minutes")]
#[test_case("2024-03-01T10:30:00Z" => "1 hr ago" ; "hour")]
#[test_case("2024-02-27T12:00:00Z" => "3 days ago" ; "days")]
#[test_case("2024-03-01T13:00:00+01:00" => "0 secs ago" ; "offset")]
#[test_case("2024-03-01T12:00:10Z" => "0 secs ago" ; "future")]
#[test_case("yesterday" => "yesterday" ; "unparseable")]
fn test_time_ago(timestamp: &str) -> String {
    time_ago(timestamp, now())
}

#[test]
fn test_latest_row_from_block() {
    let block: Block = serde_json::from_value(json!({
        "height": 1200,
        "timestamp": "2024-03-01T11:55:00Z",
        "tx_count": 0,
        "rewards": [
            { "reward": "1000000000000000000", "type": "Miner Reward" },
            { "reward": "500000000000000000", "type": "Emission Reward" },
            { "reward": "n/a" }
        ]
    }))
    .unwrap();

    let row = LatestRow::from_block(&block, now());
    assert_eq!(row.transaction_id, "1200");
    assert_eq!(row.token_amount, "1.5");
    assert_eq!(row.time, "5 mins ago");
    assert_eq!(
        row.txn_or_block_info,
        RowInfo::Block {
            transactions_per_block: None
        }
    );
}

#[test]
fn test_latest_row_from_transaction() {
    let tx: Transaction = serde_json::from_value(json!({
        "hash": "0xabc",
        "value": "25",
        "timestamp": "2024-03-01T10:00:00Z",
        "from": { "hash": "0xfrom" },
        "to": null,
        "tx_types": ["contract_creation", "coin_transfer"]
    }))
    .unwrap();

    let row = LatestRow::from_transaction(&tx, now());
    assert_eq!(row.transaction_id, "0xabc");
    assert_eq!(row.token_amount, "25");
    assert_eq!(row.time, "2 hrs ago");
    assert_eq!(
        row.txn_or_block_info,
        RowInfo::Transaction {
            from: Some("0xfrom".to_string()),
            to: None,
            transaction_type: TransactionType::ContractCall,
        }
    );
}

// ============================================================================
// Contracts
// ============================================================================

#[test]
fn test_contract_view_defaults() {
    let raw: RawContract = serde_json::from_value(json!({
        "name": "Vault",
        "compiler_version": null,
        "optimization_runs": null,
        "is_verified": null,
        "abi": null
    }))
    .unwrap();

    let view = ContractView::from(raw);
    assert_eq!(view.compiler_version, "");
    assert_eq!(view.optimization_runs, "N/A");
    assert_eq!(view.verified_at, "");
    assert!(!view.is_verified);
    assert!(view.abi.is_empty());
}

#[test]
fn test_contract_view_serializes_camel_case() {
    let raw: RawContract = serde_json::from_value(json!({
        "name": "Vault",
        "compiler_version": "v0.8.19+commit.7dd6d404",
        "optimization_enabled": true,
        "optimization_runs": 200,
        "is_verified": true,
        "verified_at": "2023-07-04T23:30:00.000000Z",
        "abi": [{
            "type": "function",
            "name": "deposit",
            "stateMutability": "payable",
            "inputs": [{ "name": "amount", "type": "uint256", "internalType": "uint256" }],
            "outputs": []
        }]
    }))
    .unwrap();

    let view = serde_json::to_value(ContractView::from(raw)).unwrap();
    assert_eq!(view["compilerVersion"], "v0.8.19+commit.7dd6d404");
    assert_eq!(view["optimizationRuns"], "200");
    assert_eq!(view["optimizationEnabled"], true);
    assert_eq!(view["isVerified"], true);
    assert_eq!(view["verifiedAt"], "07/04/2023");
    assert_eq!(view["abi"][0]["stateMutability"], "payable");
    assert_eq!(view["abi"][0]["inputs"][0]["internalType"], "uint256");
}

// ============================================================================
// Endpoints
// ============================================================================

#[tokio::test]
async fn test_blocks_sends_cursor_and_coerces_next_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/blocks"))
        .and(query_param("block_number", "100"))
        .and(query_param("items_count", "50"))
        .and(query_param("type", "block"))
        .and(query_param_is_missing("page_number"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "height": 99, "tx_count": 3 }],
            "next_page_params": { "block_number": 49, "items_count": 100, "index": null }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = Cursor::from_query_str("block_number=100&items_count=50&page_number=2");
    let page = api_for(&server).blocks(&cursor).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].height, 99);
    let next = page.next_page_params.unwrap();
    assert_eq!(next.get("block_number"), Some("49"));
    assert_eq!(next.get("items_count"), Some("100"));
    assert!(!next.contains_key("index"));
}

#[tokio::test]
async fn test_blocks_with_bad_cursor_fetches_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/blocks"))
        .and(query_param("type", "block"))
        .and(query_param_is_missing("block_number"))
        .and(query_param_is_missing("items_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = Cursor::from_query_str("block_number=oops&items_count=50&page_number=2");
    let page = api_for(&server).blocks(&cursor).await.unwrap();
    assert!(page.items.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_block_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/blocks/404404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let err = api_for(&server).block("404404").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_block_transactions_drops_non_numeric_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/blocks/12/transactions"))
        .and(query_param("block_number", "12"))
        .and(query_param("index", "4"))
        .and(query_param_is_missing("items_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "hash": "0x01", "tx_types": ["coin_transfer"] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = Cursor::from_query_str("block_number=12&items_count=many&index=4");
    let page = api_for(&server)
        .block_transactions("12", &cursor)
        .await
        .unwrap();
    assert_eq!(page.items[0].hash, "0x01");
}

#[tokio::test]
async fn test_address_rejects_invalid_hash_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(matches!(
        api.address("0x123").await,
        Err(Error::InvalidAddress { .. })
    ));
    assert!(matches!(
        api.contract("not-an-address").await,
        Err(Error::InvalidAddress { .. })
    ));
}

#[tokio::test]
async fn test_address_detail_and_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/addresses/{ADDRESS}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": ADDRESS,
            "coin_balance": "1000",
            "is_contract": true,
            "creator_address_hash": "0xcreator"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/addresses/{ADDRESS}/counters")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions_count": "12",
            "token_transfers_count": "3",
            "gas_usage_count": "21000",
            "validations_count": "0"
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let (info, counters) = futures::join!(api.address(ADDRESS), api.address_counters(ADDRESS));
    let info = info.unwrap();
    assert!(info.is_contract);
    assert_eq!(info.extra["creator_address_hash"], "0xcreator");
    assert_eq!(counters.unwrap().transactions_count.as_deref(), Some("12"));
}

#[tokio::test]
async fn test_address_tokens_passes_cursor_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/addresses/{ADDRESS}/tokens")))
        .and(query_param("fiat_value", "12.5"))
        .and(query_param("id", "7"))
        .and(query_param_is_missing("page_number"))
        .and(query_param_is_missing("network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "token": { "address": "0xtoken", "symbol": "DFI" },
                "value": "5"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = Cursor::from_query_str("fiat_value=12.5&id=7&page_number=2&network=TestNet");
    let page = api_for(&server)
        .address_tokens(ADDRESS, &cursor)
        .await
        .unwrap();
    assert_eq!(page.items[0].token.symbol.as_deref(), Some("DFI"));
}

#[tokio::test]
async fn test_tokens_sends_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tokens"))
        .and(query_param("contract_address_hash", "0xabc"))
        .and(query_param("is_name_null", "false"))
        .and(query_param("items_count", "50"))
        .and(query_param("name", "Wrapped DFI"))
        .and(query_param_is_missing("market_cap"))
        .and(query_param_is_missing("page_number"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "address": "0xabc", "name": "Wrapped DFI", "type": "ERC-20" }],
            "next_page_params": {
                "contract_address_hash": "0xdef",
                "holder_count": 10,
                "is_name_null": false,
                "items_count": 100,
                "market_cap": null,
                "name": "Token"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = Cursor::from_query_str(
        "contract_address_hash=0xabc&is_name_null=false&items_count=50&name=Wrapped+DFI&page_number=2",
    );
    let page = api_for(&server).tokens(&cursor).await.unwrap();
    assert_eq!(page.items[0].token_type.as_deref(), Some("ERC-20"));

    let next = page.next_page_params.unwrap();
    assert_eq!(next.get("holder_count"), Some("10"));
    assert_eq!(next.get("is_name_null"), Some("false"));
    assert!(!next.contains_key("market_cap"));
}

#[tokio::test]
async fn test_token_detail_counters_and_transfers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tokens/0xtoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": "0xtoken",
            "symbol": "DUSD",
            "decimals": "18"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tokens/0xtoken/counters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_holders_count": "42",
            "transfers_count": "1000"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/tokens/0xtoken/transfers"))
        .and(query_param("block_number", "77"))
        .and(query_param("index", "0"))
        .and(query_param_is_missing("items_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "tx_hash": "0xtx", "type": "token_transfer" }],
            "next_page_params": { "block_number": 70, "index": 3 }
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert_eq!(api.token("0xtoken").await.unwrap().symbol.as_deref(), Some("DUSD"));
    assert_eq!(
        api.token_counters("0xtoken").await.unwrap().token_holders_count,
        "42"
    );

    let cursor = Cursor::from_query_str("block_number=77&index=0&items_count=50&page_number=2");
    let page = api.token_transfers("0xtoken", &cursor).await.unwrap();
    assert_eq!(page.items[0].transfer_type.as_deref(), Some("token_transfer"));
    assert_eq!(
        page.next_page_params.unwrap().to_query_string(),
        "block_number=70&index=3"
    );
}

#[tokio::test]
async fn test_latest_rows_are_capped() {
    let server = MockServer::start().await;
    let blocks: Vec<_> = (0..8)
        .map(|i| json!({ "height": 100 - i, "tx_count": i, "rewards": [] }))
        .collect();
    let transactions: Vec<_> = (0..3)
        .map(|i| json!({ "hash": format!("0x{i}"), "value": "0", "from": { "hash": "0xa" } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v2/main-page/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(blocks))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/main-page/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transactions))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let blocks = api.latest_blocks().await.unwrap();
    assert_eq!(blocks.len(), MAX_ROW);
    assert_eq!(blocks[0].transaction_id, "100");
    assert_eq!(
        blocks[0].txn_or_block_info,
        RowInfo::Block {
            transactions_per_block: None
        }
    );
    assert_eq!(
        blocks[1].txn_or_block_info,
        RowInfo::Block {
            transactions_per_block: Some(1)
        }
    );
    assert_eq!(blocks[0].token_amount, "0");

    let transactions = api.latest_transactions().await.unwrap();
    assert_eq!(transactions.len(), 3);
}

#[tokio::test]
async fn test_contract_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/smart-contracts/{ADDRESS}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Vault",
            "compiler_version": "v0.8.19",
            "source_code": "contract Vault {}"
        })))
        .mount(&server)
        .await;

    let view = api_for(&server).contract(ADDRESS).await.unwrap();
    assert_eq!(view.name.as_deref(), Some("Vault"));
    assert_eq!(view.optimization_runs, "N/A");
}

// ============================================================================
// Sources and registry
// ============================================================================

#[tokio::test]
async fn test_page_sources_delegate_to_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/addresses/{ADDRESS}/transactions")))
        .and(query_param("block_number", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "hash": "0xaa" }, { "hash": "0xbb" }],
            "next_page_params": { "block_number": 8, "index": 1, "items_count": 50 }
        })))
        .mount(&server)
        .await;

    let api = Arc::new(api_for(&server));
    let source = AddressTransactionsSource::new(api, ADDRESS);
    let page = source
        .fetch_page(&Cursor::from_query_str("block_number=9&page_number=2"))
        .await
        .unwrap();

    let hashes: Vec<_> = page.items.iter().map(|tx| tx.hash.as_str()).collect();
    assert_eq!(hashes, vec!["0xaa", "0xbb"]);
    assert!(!page.is_last());
}

#[test]
fn test_registry_from_config() {
    let registry = ApiRegistry::from_config(&ExplorerConfig::default()).unwrap();
    let networks: Vec<_> = registry.networks().collect();
    assert_eq!(networks, vec!["Changi", "MainNet", "Playground", "TestNet"]);

    let api = registry.get("TestNet").unwrap();
    assert_eq!(api.network(), "TestNet");
    assert!(registry.get("DevNet").is_none());
}
