use serde::{Deserialize, Serialize};

use crate::chain::TokenInfo;
use crate::config_store::MarketConfig;
use crate::deployment::{ChainProfile, ContractAddresses};
use crate::listing::LoadPhase;
use crate::metadata::TokenMetadata;
use crate::mint::{MintIssue, MintOutcome};
use crate::sale::SaleKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletResponse {
    pub account: String,
    pub chain_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_for_secs: Option<u64>,
    pub listing_phase: LoadPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectWalletResponse {
    pub disconnected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureChainResponse {
    pub chain_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAddressRequest {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAddressResponse {
    pub is_valid: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPriceRequest {
    pub price: String,
    pub decimals: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatPriceResponse {
    pub formatted: String,
}

/// Successful mint as reported to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedSummary {
    pub token_id: u64,
    pub owner: String,
    pub transaction_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_revision: Option<u64>,
}

impl From<MintOutcome> for MintedSummary {
    fn from(outcome: MintOutcome) -> Self {
        Self {
            token_id: outcome.token_id,
            owner: outcome.owner,
            transaction_hash: outcome.transaction_hash,
            record_revision: outcome.record_revision,
        }
    }
}

/// Mint command result: either a minted token or a field-scoped issue.
/// Chain failures travel as command errors instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintTokenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minted: Option<MintedSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<MintIssue>,
}

impl MintTokenResponse {
    pub fn minted(outcome: MintOutcome) -> Self {
        Self {
            minted: Some(outcome.into()),
            issue: None,
        }
    }

    pub fn rejected(issue: MintIssue) -> Self {
        Self {
            minted: None,
            issue: Some(issue),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPageRequest {
    pub page: u64,
    #[serde(default)]
    pub rows_per_page: Option<u64>,
    /// Optional gateway override, bypassing configured failover
    #[serde(default)]
    pub gateway_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetailsResponse {
    #[serde(flatten)]
    pub info: TokenInfo,
    pub display_price: String,
    pub metadata: TokenMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareSaleRequest {
    pub token_id: u64,
    pub kind: SaleKind,
    #[serde(default)]
    pub asking_price: Option<String>,
}

/// Addresses of the deployed contract suite, for display and explorer links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSuite {
    pub nft: String,
    pub market: String,
    pub auction: String,
    pub loan: String,
}

impl From<&ContractAddresses> for ContractSuite {
    fn from(contracts: &ContractAddresses) -> Self {
        Self {
            nft: contracts.nft.as_string().to_string(),
            market: contracts.market.as_string().to_string(),
            auction: contracts.auction.as_string().to_string(),
            loan: contracts.loan.as_string().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfoResponse {
    pub environment: String,
    pub chain: ChainProfile,
    pub contracts: ContractSuite,
    pub config: MarketConfig,
    pub connected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkRequest {
    #[serde(default)]
    pub primary_endpoint: Option<String>,
    #[serde(default)]
    pub failover_endpoints: Option<Vec<String>>,
    #[serde(default)]
    pub wallet_endpoint: Option<String>,
    #[serde(default)]
    pub records_endpoint: Option<String>,
}
