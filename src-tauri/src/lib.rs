// lib.rs - Core library structure for the market client

pub mod api;
pub mod app_state;
pub mod chain;
pub mod chain_client;
pub mod config_store;
pub mod contracts;
pub mod deployment;
pub mod errors;
pub mod listing;
pub mod metadata;
pub mod mint;
pub mod provider;
pub mod sale;
pub mod session;
pub mod storage;
pub mod validation;

pub mod market {
    //! Market client bootstrap

    use crate::deployment::{init_deployment_config, Environment};
    use crate::errors::MarketResult;

    /// Initialize the market client subsystem
    pub fn init() -> MarketResult<()> {
        log::info!("Initializing market client subsystem");

        let _ = init_deployment_config(Environment::Development)?;
        log::info!("Deployment configuration initialized");

        Ok(())
    }
}

// Re-export common types
pub use api::types::*;
pub use app_state::{MarketContext, SharedMarketContext};
pub use chain::{
    Address, AddressType, Amount, MintedToken, PaymentSplit, SplitEntry, TokenInfo,
    TransactionReceipt,
};
pub use chain_client::{ChainClient, ConfirmationTracker, PollOutcome};
pub use config_store::{
    ConfigStore, ListingConfig, MarketConfig, NetworkConfig, RecordStoreConfig,
};
pub use contracts::{
    get_auction_contract, get_loan_contract, get_market_contract, get_nft_contract, MintCall,
};
pub use deployment::{ChainProfile, ContractAddresses, DeploymentConfig, Environment};
pub use errors::{MarketError, MarketResult};
pub use listing::{page_window, ListingPage, LoadPhase, PageLoader, TokenRecord};
pub use metadata::{MetadataClient, TokenMetadata};
pub use mint::{MintField, MintIssue, MintOutcome, MintRequest};
pub use provider::WalletProvider;
pub use sale::{SaleDraft, SaleKind};
pub use session::ConnectionManager;
pub use storage::{MarketPaths, MintedRecord, RecordEntry, RecordStore};
pub use validation::InputValidator;
