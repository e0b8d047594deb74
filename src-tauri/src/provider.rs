/// Wallet provider adapter
///
/// Speaks JSON-RPC to the user's wallet provider: account discovery and
/// chain management. Transaction signing stays inside the provider; this
/// client never sees key material.
use crate::deployment::ChainProfile;
use crate::errors::{MarketError, MarketResult};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider error code for a chain id the wallet does not know yet
pub const UNRECOGNIZED_CHAIN_CODE: i32 = 4902;

/// HTTP client for the wallet provider's request surface
pub struct WalletProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ProviderRequest<T: Serialize> {
    jsonrpc: String,
    method: String,
    params: T,
    id: u64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // fields are populated via serde; not all are read by all call sites
struct ProviderResponse<T> {
    jsonrpc: String,
    result: Option<T>,
    error: Option<ProviderError>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: i32,
    message: String,
}

impl WalletProvider {
    /// Create a new provider client
    pub fn new(base_url: String) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MarketError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(WalletProvider {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Prompt the wallet to expose its accounts; first entry is the active one
    pub async fn request_accounts(&self) -> MarketResult<Vec<String>> {
        self.request("eth_requestAccounts", serde_json::Value::Null)
            .await
    }

    /// Accounts already exposed without prompting
    pub async fn accounts(&self) -> MarketResult<Vec<String>> {
        self.request("eth_accounts", serde_json::Value::Null).await
    }

    /// Whether the wallet currently exposes any account
    pub async fn is_connected(&self) -> MarketResult<bool> {
        Ok(!self.accounts().await?.is_empty())
    }

    /// Chain id the wallet is currently on (0x-prefixed hex)
    pub async fn chain_id(&self) -> MarketResult<String> {
        self.request("eth_chainId", serde_json::Value::Null).await
    }

    /// Ask the wallet to switch to the given chain id
    pub async fn switch_chain(&self, chain_id: &str) -> MarketResult<()> {
        let params = serde_json::json!([{ "chainId": chain_id }]);
        let _: serde_json::Value = self.request("wallet_switchEthereumChain", params).await?;
        Ok(())
    }

    /// Register a chain with the wallet
    pub async fn add_chain(&self, profile: &ChainProfile) -> MarketResult<()> {
        let params = serde_json::json!([{
            "chainId": profile.chain_id,
            "chainName": profile.chain_name,
            "nativeCurrency": {
                "name": profile.chain_name,
                "symbol": profile.symbol,
                "decimals": 18,
            },
            "rpcUrls": [profile.rpc_url],
            "blockExplorerUrls": [profile.explorer_url],
            "iconUrls": [""],
        }]);
        let _: serde_json::Value = self.request("wallet_addEthereumChain", params).await?;
        Ok(())
    }

    /// Make sure the wallet is on the market's chain.
    ///
    /// Tries a switch first; when the wallet reports the chain as unknown
    /// (code 4902), registers it and leaves the wallet on it.
    pub async fn ensure_chain(&self, profile: &ChainProfile) -> MarketResult<()> {
        match self.switch_chain(&profile.chain_id).await {
            Ok(()) => Ok(()),
            Err(MarketError::ProviderRejected(code, _)) if code == UNRECOGNIZED_CHAIN_CODE => {
                log::info!(
                    "Chain {} unknown to wallet, registering it",
                    profile.chain_id
                );
                self.add_chain(profile).await
            }
            Err(err) => Err(err),
        }
    }

    /// Make a JSON-RPC request against the wallet provider
    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> MarketResult<T> {
        let request = ProviderRequest {
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

        let rpc_response: ProviderResponse<T> = response
            .json()
            .await
            .map_err(|e| MarketError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(MarketError::ProviderRejected(error.code, error.message));
        }

        rpc_response
            .result
            .ok_or_else(|| MarketError::InvalidResponse("No result in provider response".to_string()))
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires running wallet provider at localhost:8550"]
    async fn test_real_accounts_call() {
        let provider = WalletProvider::new("http://localhost:8550".to_string()).unwrap();
        let result = provider.accounts().await;
        assert!(result.is_ok(), "Accounts call should succeed");
    }

    #[tokio::test]
    #[ignore = "requires running wallet provider at localhost:8550"]
    async fn test_real_chain_id_call() {
        let provider = WalletProvider::new("http://localhost:8550".to_string()).unwrap();
        let result = provider.chain_id().await;
        assert!(result.is_ok(), "Chain id call should succeed");
    }
}
