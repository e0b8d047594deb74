use crate::chain::Address;
use crate::errors::{MarketError, MarketResult};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const KEY_CHAIN_ID: &str = "CHAIN_ID";
const KEY_CHAIN_NAME: &str = "CHAIN_NAME";
const KEY_CHAIN_SYMBOL: &str = "CHAIN_SYMBOL";
const KEY_CHAIN_RPC_URL: &str = "CHAIN_RPC_URL";
const KEY_CHAIN_EXPLORER_URL: &str = "CHAIN_EXPLORER_URL";
const KEY_NFT_CONTRACT_ADDRESS: &str = "NFT_CONTRACT_ADDRESS";
const KEY_MARKET_CONTRACT_ADDRESS: &str = "MARKET_CONTRACT_ADDRESS";
const KEY_AUCTION_CONTRACT_ADDRESS: &str = "AUCTION_CONTRACT_ADDRESS";
const KEY_LOAN_CONTRACT_ADDRESS: &str = "LOAN_CONTRACT_ADDRESS";
const KEY_TX_WAIT_BLOCK_COUNT: &str = "TX_WAIT_BLOCK_COUNT";

/// Environment types for different deployment configurations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
    Test,
}

/// Chain parameters handed to the wallet provider when switching or
/// registering the market's network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainProfile {
    /// Hexadecimal chain id, 0x prefixed
    pub chain_id: String,
    pub chain_name: String,
    pub symbol: String,
    pub rpc_url: String,
    pub explorer_url: String,
}

/// Addresses of the marketplace contract suite
#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub nft: Address,
    pub market: Address,
    pub auction: Address,
    pub loan: Address,
}

/// Deployment configuration manager
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    environment: Environment,
    config_map: HashMap<String, String>,
}

impl DeploymentConfig {
    /// Create a new deployment configuration
    pub fn new(environment: Environment) -> Self {
        let mut config = DeploymentConfig {
            environment,
            config_map: HashMap::new(),
        };

        // Load default configuration based on environment
        config.load_defaults();
        config
    }

    /// Load configuration from environment variables
    pub fn from_env() -> MarketResult<Self> {
        let env_str =
            std::env::var("TESSERA_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match env_str.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" | "testing" => Environment::Test,
            _ => Environment::Development,
        };

        Self::from_environment(environment)
    }

    /// Construct a configuration for the provided environment and apply overrides.
    pub fn from_environment(environment: Environment) -> MarketResult<Self> {
        let mut config = Self::new(environment);
        config.load_from_env_vars();
        config.validate_required_configs()?;
        Ok(config)
    }

    /// Get a configuration value
    pub fn get(&self, key: &str) -> Option<&String> {
        self.config_map.get(key)
    }

    /// Get a required configuration value
    pub fn get_required(&self, key: &str) -> MarketResult<&String> {
        self.config_map.get(key).ok_or_else(|| {
            MarketError::ValidationError(format!("Required config key '{}' not found", key))
        })
    }

    /// Set a configuration value (for testing purposes)
    pub fn set(&mut self, key: String, value: String) {
        self.config_map.insert(key, value);
    }

    /// Check if we're in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the current environment
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Chain parameters for provider switch/add requests
    pub fn chain_profile(&self) -> MarketResult<ChainProfile> {
        Ok(ChainProfile {
            chain_id: self.get_required(KEY_CHAIN_ID)?.clone(),
            chain_name: self.get_required(KEY_CHAIN_NAME)?.clone(),
            symbol: self.get_required(KEY_CHAIN_SYMBOL)?.clone(),
            rpc_url: self.get_required(KEY_CHAIN_RPC_URL)?.clone(),
            explorer_url: self.get_required(KEY_CHAIN_EXPLORER_URL)?.clone(),
        })
    }

    /// Parsed addresses of the contract suite
    pub fn contract_addresses(&self) -> MarketResult<ContractAddresses> {
        Ok(ContractAddresses {
            nft: Address::contract(self.get_required(KEY_NFT_CONTRACT_ADDRESS)?)?,
            market: Address::contract(self.get_required(KEY_MARKET_CONTRACT_ADDRESS)?)?,
            auction: Address::contract(self.get_required(KEY_AUCTION_CONTRACT_ADDRESS)?)?,
            loan: Address::contract(self.get_required(KEY_LOAN_CONTRACT_ADDRESS)?)?,
        })
    }

    /// Number of blocks the mint workflow waits for a transaction receipt
    pub fn tx_wait_block_count(&self) -> MarketResult<u64> {
        let value = self.get_required(KEY_TX_WAIT_BLOCK_COUNT)?;
        value.trim().parse::<u64>().map_err(|_| {
            MarketError::ValidationError(format!(
                "Invalid numeric value '{}' for key '{}'",
                value, KEY_TX_WAIT_BLOCK_COUNT
            ))
        })
    }

    /// Validate that all required keys are present
    pub fn validate_required_configs(&self) -> MarketResult<()> {
        let required_keys = [
            KEY_CHAIN_ID,
            KEY_CHAIN_NAME,
            KEY_CHAIN_SYMBOL,
            KEY_CHAIN_RPC_URL,
            KEY_CHAIN_EXPLORER_URL,
            KEY_NFT_CONTRACT_ADDRESS,
            KEY_MARKET_CONTRACT_ADDRESS,
            KEY_AUCTION_CONTRACT_ADDRESS,
            KEY_LOAN_CONTRACT_ADDRESS,
            KEY_TX_WAIT_BLOCK_COUNT,
        ];

        for key in required_keys {
            if !self.config_map.contains_key(key) {
                return Err(MarketError::ValidationError(format!(
                    "Required configuration key '{}' is missing for {} environment",
                    key,
                    format!("{:?}", self.environment).to_lowercase()
                )));
            }
        }

        // Addresses and block count must parse, not merely exist
        self.contract_addresses()?;
        self.tx_wait_block_count()?;

        Ok(())
    }

    /// Load default configuration values
    fn load_defaults(&mut self) {
        match self.environment {
            Environment::Production => {
                self.insert_default(KEY_CHAIN_ID, "0x64");
                self.insert_default(KEY_CHAIN_NAME, "Tessera Market Chain");
                self.insert_default(KEY_CHAIN_SYMBOL, "TES");
                self.insert_default(KEY_CHAIN_RPC_URL, "https://rpc.tessera.market");
                self.insert_default(KEY_CHAIN_EXPLORER_URL, "https://explorer.tessera.market");
                self.insert_default(KEY_TX_WAIT_BLOCK_COUNT, "12");
            }
            Environment::Development => {
                self.insert_default(KEY_CHAIN_ID, "0x27d8");
                self.insert_default(KEY_CHAIN_NAME, "Tessera Testnet");
                self.insert_default(KEY_CHAIN_SYMBOL, "TES");
                self.insert_default(KEY_CHAIN_RPC_URL, "http://localhost:8545");
                self.insert_default(KEY_CHAIN_EXPLORER_URL, "http://localhost:4000");
                self.insert_default(KEY_TX_WAIT_BLOCK_COUNT, "5");
                self.insert_default(
                    KEY_NFT_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000a1",
                );
                self.insert_default(
                    KEY_MARKET_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000a2",
                );
                self.insert_default(
                    KEY_AUCTION_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000a3",
                );
                self.insert_default(
                    KEY_LOAN_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000a4",
                );
            }
            Environment::Test => {
                self.insert_default(KEY_CHAIN_ID, "0x7a69");
                self.insert_default(KEY_CHAIN_NAME, "Tessera Local");
                self.insert_default(KEY_CHAIN_SYMBOL, "TES");
                self.insert_default(KEY_CHAIN_RPC_URL, "http://127.0.0.1:8545");
                self.insert_default(KEY_CHAIN_EXPLORER_URL, "http://127.0.0.1:4000");
                self.insert_default(KEY_TX_WAIT_BLOCK_COUNT, "3");
                self.insert_default(
                    KEY_NFT_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000b1",
                );
                self.insert_default(
                    KEY_MARKET_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000b2",
                );
                self.insert_default(
                    KEY_AUCTION_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000b3",
                );
                self.insert_default(
                    KEY_LOAN_CONTRACT_ADDRESS,
                    "0x00000000000000000000000000000000000000b4",
                );
            }
        }
    }

    fn insert_default(&mut self, key: &str, value: &str) {
        self.config_map.insert(key.to_string(), value.to_string());
    }

    /// Apply TESSERA_-prefixed environment variable overrides
    fn load_from_env_vars(&mut self) {
        let keys = [
            KEY_CHAIN_ID,
            KEY_CHAIN_NAME,
            KEY_CHAIN_SYMBOL,
            KEY_CHAIN_RPC_URL,
            KEY_CHAIN_EXPLORER_URL,
            KEY_NFT_CONTRACT_ADDRESS,
            KEY_MARKET_CONTRACT_ADDRESS,
            KEY_AUCTION_CONTRACT_ADDRESS,
            KEY_LOAN_CONTRACT_ADDRESS,
            KEY_TX_WAIT_BLOCK_COUNT,
        ];

        for key in keys {
            if let Ok(value) = std::env::var(format!("TESSERA_{}", key)) {
                if !value.trim().is_empty() {
                    self.config_map.insert(key.to_string(), value);
                }
            }
        }
    }
}

/// Global deployment configuration instance
static DEPLOYMENT_CONFIG: OnceCell<DeploymentConfig> = OnceCell::new();

fn init_deployment_config_internal(
    environment: Option<Environment>,
) -> MarketResult<&'static DeploymentConfig> {
    DEPLOYMENT_CONFIG.get_or_try_init(|| {
        let config = match environment {
            Some(explicit) => DeploymentConfig::from_environment(explicit)?,
            None => DeploymentConfig::from_env()?,
        };

        log::info!(
            "Deployment configuration initialized for {:?} environment",
            config.environment
        );
        Ok(config)
    })
}

/// Initialize deployment configuration for a specific environment.
pub fn init_deployment_config(environment: Environment) -> MarketResult<&'static DeploymentConfig> {
    init_deployment_config_internal(Some(environment))
}

/// Initialize deployment configuration using the environment selection logic.
pub fn init_deployment_config_from_env() -> MarketResult<&'static DeploymentConfig> {
    init_deployment_config_internal(None)
}

/// Get global deployment configuration
pub fn get_deployment_config() -> MarketResult<&'static DeploymentConfig> {
    DEPLOYMENT_CONFIG.get().ok_or(MarketError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_config_creation() {
        let config = DeploymentConfig::new(Environment::Development);
        assert_eq!(config.environment(), &Environment::Development);
        assert!(config.get(KEY_CHAIN_ID).is_some());
    }

    #[test]
    fn test_required_config_validation() {
        let config = DeploymentConfig::new(Environment::Test);
        assert!(config.validate_required_configs().is_ok());
    }

    #[test]
    fn test_production_requires_contract_addresses() {
        // Production ships no default contract addresses; they must come
        // from the environment.
        let config = DeploymentConfig::new(Environment::Production);
        assert!(config.validate_required_configs().is_err());
    }

    #[test]
    fn test_chain_profile_exposed() {
        let config = DeploymentConfig::new(Environment::Test);
        let profile = config.chain_profile().unwrap();
        assert!(profile.chain_id.starts_with("0x"));
        assert_eq!(profile.symbol, "TES");
    }

    #[test]
    fn test_contract_addresses_parse() {
        let config = DeploymentConfig::new(Environment::Test);
        let contracts = config.contract_addresses().unwrap();
        assert_ne!(contracts.nft.as_string(), contracts.market.as_string());
    }

    #[test]
    fn test_environment_detection() {
        let config = DeploymentConfig::new(Environment::Production);
        assert!(config.is_production());
    }
}
