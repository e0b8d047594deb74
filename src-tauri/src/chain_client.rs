/// Chain gateway RPC client
///
/// HTTP-based JSON-RPC communication with the contract gateway. The gateway
/// performs ABI encoding and event decoding; this client only moves JSON.
/// Also home of the bounded confirmation poll the mint workflow relies on.
use crate::chain::TransactionReceipt;
use crate::errors::{MarketError, MarketResult};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval between block-height polls while waiting on a transaction
const BLOCK_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// HTTP client for gateway RPC communication
pub struct ChainClient {
    client: Client,
    base_url: String,
}

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest<T: Serialize> {
    jsonrpc: String,
    method: String,
    params: T,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
#[allow(dead_code)] // fields are populated via serde; not all are read by all call sites
struct JsonRpcResponse<T> {
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    id: u64,
}

/// JSON-RPC error structure
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl ChainClient {
    /// Create a new gateway client
    pub fn new(base_url: String) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MarketError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(ChainClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get current block number
    pub async fn block_number(&self) -> MarketResult<u64> {
        let response: serde_json::Value = self
            .rpc_call("eth_blockNumber", serde_json::Value::Null)
            .await?;

        let block_num_str = match &response {
            serde_json::Value::String(s) => s.as_str(),
            other => other
                .get("blockNumber")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    MarketError::InvalidResponse("Invalid block number response".to_string())
                })?,
        };

        let block_num = if let Some(stripped) = block_num_str.strip_prefix("0x") {
            u64::from_str_radix(stripped, 16)
        } else {
            block_num_str.parse()
        }
        .map_err(|_| MarketError::InvalidResponse("Invalid block number format".to_string()))?;

        Ok(block_num)
    }

    /// Get the receipt for a transaction hash, if it exists yet
    pub async fn transaction_receipt(
        &self,
        hash: &str,
    ) -> MarketResult<Option<TransactionReceipt>> {
        let params = serde_json::json!([hash]);
        self.rpc_call_nullable("eth_getTransactionReceipt", params)
            .await
    }

    /// Issue a read call against a gateway contract namespace
    pub async fn contract_read<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> MarketResult<T> {
        self.rpc_call(method, params).await
    }

    /// Submit a state-changing contract call; returns the transaction hash
    pub async fn contract_send(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> MarketResult<String> {
        let response: serde_json::Value = self.rpc_call(method, params).await?;
        let tx_hash = match &response {
            serde_json::Value::String(s) => s.as_str(),
            other => other
                .get("transactionHash")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    MarketError::InvalidResponse("Invalid transaction response".to_string())
                })?,
        };

        Ok(tx_hash.to_string())
    }

    /// Wait for the first confirmation of a transaction.
    ///
    /// Polls the receipt until it appears with a block number. Unbounded,
    /// mirroring the submission wait of the contract-binding library; the
    /// bounded follow-up check is `confirm_within`.
    pub async fn await_confirmation(&self, hash: &str) -> MarketResult<TransactionReceipt> {
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                if receipt.is_mined() {
                    return Ok(receipt);
                }
            }
            tokio::time::sleep(BLOCK_POLL_INTERVAL).await;
        }
    }

    /// Poll up to `max_blocks` subsequent blocks for the transaction receipt.
    ///
    /// Resolves `false` once more than `max_blocks` blocks have elapsed
    /// without a receipt and `true` as soon as the receipt appears,
    /// whichever occurs first.
    pub async fn confirm_within(&self, hash: &str, max_blocks: u64) -> MarketResult<bool> {
        let mut tracker = ConfirmationTracker::new(max_blocks);
        let mut last_block = self.block_number().await?;

        loop {
            tokio::time::sleep(BLOCK_POLL_INTERVAL).await;
            let current = self.block_number().await?;

            while last_block < current {
                last_block += 1;
                let receipt_found = self
                    .transaction_receipt(hash)
                    .await?
                    .map(|r| r.is_mined())
                    .unwrap_or(false);

                match tracker.on_block(receipt_found) {
                    PollOutcome::Pending => {}
                    PollOutcome::Confirmed => return Ok(true),
                    PollOutcome::Exhausted => return Ok(false),
                }
            }
        }
    }

    /// Make a JSON-RPC call to the gateway
    async fn rpc_call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> MarketResult<T> {
        self.rpc_call_nullable(method, params)
            .await?
            .ok_or_else(|| MarketError::InvalidResponse("No result in RPC response".to_string()))
    }

    /// Make a JSON-RPC call whose result may legitimately be null
    async fn rpc_call_nullable<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> MarketResult<Option<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: rand::thread_rng().gen(),
        };

        let url = format!("{}/jsonrpc", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MarketError::NetworkError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| MarketError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(MarketError::NetworkError(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        Ok(rpc_response.result)
    }
}

/// Outcome of feeding one block event to a [`ConfirmationTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Pending,
    Confirmed,
    Exhausted,
}

/// Pure block counter behind the confirmation poll.
///
/// Exhaustion is checked before receipt presence on the same block event:
/// a receipt first observed after the budget is spent no longer counts.
#[derive(Debug)]
pub struct ConfirmationTracker {
    max_blocks: u64,
    elapsed: u64,
}

impl ConfirmationTracker {
    pub fn new(max_blocks: u64) -> Self {
        Self {
            max_blocks,
            elapsed: 0,
        }
    }

    pub fn elapsed_blocks(&self) -> u64 {
        self.elapsed
    }

    /// Feed one block event, reporting whether the receipt was visible.
    pub fn on_block(&mut self, receipt_found: bool) -> PollOutcome {
        self.elapsed += 1;
        if self.elapsed > self.max_blocks {
            return PollOutcome::Exhausted;
        }
        if receipt_found {
            return PollOutcome::Confirmed;
        }
        PollOutcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_confirms_on_receipt() {
        let mut tracker = ConfirmationTracker::new(5);
        assert_eq!(tracker.on_block(false), PollOutcome::Pending);
        assert_eq!(tracker.on_block(true), PollOutcome::Confirmed);
    }

    #[test]
    fn tracker_exhausts_after_budget() {
        let mut tracker = ConfirmationTracker::new(3);
        assert_eq!(tracker.on_block(false), PollOutcome::Pending);
        assert_eq!(tracker.on_block(false), PollOutcome::Pending);
        assert_eq!(tracker.on_block(false), PollOutcome::Pending);
        // more than max_blocks blocks have now elapsed
        assert_eq!(tracker.on_block(false), PollOutcome::Exhausted);
        assert_eq!(tracker.elapsed_blocks(), 4);
    }

    #[test]
    fn tracker_exhaustion_wins_over_late_receipt() {
        let mut tracker = ConfirmationTracker::new(1);
        assert_eq!(tracker.on_block(false), PollOutcome::Pending);
        assert_eq!(tracker.on_block(true), PollOutcome::Exhausted);
    }

    #[test]
    fn tracker_confirms_immediately_on_first_block() {
        let mut tracker = ConfirmationTracker::new(3);
        assert_eq!(tracker.on_block(true), PollOutcome::Confirmed);
    }

}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires running gateway at localhost:8599"]
    async fn test_real_block_number_call() {
        let client = ChainClient::new("http://localhost:8599".to_string()).unwrap();
        let result = client.block_number().await;
        assert!(result.is_ok(), "Block number call should succeed");
    }

    #[tokio::test]
    #[ignore = "requires running gateway at localhost:8599"]
    async fn test_real_receipt_call() {
        let client = ChainClient::new("http://localhost:8599".to_string()).unwrap();
        let result = client
            .transaction_receipt(
                "0x0000000000000000000000000000000000000000000000000000000000000000",
            )
            .await;
        assert!(result.is_ok(), "Receipt call should succeed");
    }
}
