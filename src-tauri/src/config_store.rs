use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use blake3::Hasher as Blake3;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{MarketError, MarketResult};
use crate::storage::MarketPaths;

const CONFIG_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Contract gateway endpoint used for reads and submissions
    pub primary_endpoint: String,
    pub failover_endpoints: Vec<String>,
    /// RPC surface of the user's wallet provider
    pub wallet_endpoint: String,
    pub allow_untrusted_certs: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            primary_endpoint: "https://gateway.tessera.market".to_string(),
            failover_endpoints: vec!["https://gateway-backup.tessera.market".to_string()],
            wallet_endpoint: "http://localhost:8550".to_string(),
            allow_untrusted_certs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingConfig {
    pub default_rows_per_page: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_rows_per_page: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordStoreConfig {
    /// Keyed document store holding minted-token records
    pub endpoint: String,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://records.tessera.market".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketConfig {
    pub network: NetworkConfig,
    pub listing: ListingConfig,
    pub records: RecordStoreConfig,
    pub environment: String,
    pub last_updated: DateTime<Utc>,
    pub version: u16,
}

impl MarketConfig {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            network: NetworkConfig::default(),
            listing: ListingConfig::default(),
            records: RecordStoreConfig::default(),
            environment: environment.into(),
            last_updated: Utc::now(),
            version: CONFIG_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigEnvelope {
    version: u16,
    checksum: [u8; 32],
    payload: MarketConfig,
    modified_at_unix: i64,
}

/// Handles persistence of client configuration with integrity checks.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_paths(paths: &MarketPaths) -> Self {
        Self {
            path: paths.config_file().to_path_buf(),
        }
    }

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load_or_default(&self, environment: impl Into<String>) -> MarketResult<MarketConfig> {
        if !self.path.exists() {
            let config = MarketConfig::new(environment);
            self.save(&config)?;
            return Ok(config);
        }

        let bytes = fs::read(&self.path)?;
        let envelope: ConfigEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != CONFIG_VERSION {
            return Err(MarketError::ValidationError(format!(
                "Unsupported config version {}",
                envelope.version
            )));
        }

        let checksum = checksum(&envelope.payload);
        if checksum != envelope.checksum {
            return Err(MarketError::ValidationError(
                "Config integrity verification failed".to_string(),
            ));
        }

        Ok(envelope.payload)
    }

    pub fn save(&self, config: &MarketConfig) -> MarketResult<()> {
        let mut payload = config.clone();
        payload.touch();

        let envelope = ConfigEnvelope {
            version: CONFIG_VERSION,
            checksum: checksum(&payload),
            modified_at_unix: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_err(|e| MarketError::StorageError(e.to_string()))?
                .as_secs() as i64,
            payload,
        };

        let serialized = serde_json::to_vec_pretty(&envelope)?;
        let tmp_path = self.path.with_extension("new");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&serialized)?;
            file.sync_all()?;
        }
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }

    pub fn update<F>(
        &self,
        environment: impl Into<String>,
        updater: F,
    ) -> MarketResult<MarketConfig>
    where
        F: FnOnce(&mut MarketConfig) -> MarketResult<()>,
    {
        let mut config = self.load_or_default(environment)?;
        updater(&mut config)?;
        config.touch();
        self.save(&config)?;
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn checksum(config: &MarketConfig) -> [u8; 32] {
    let mut hasher = Blake3::new();
    let encoded = serde_json::to_vec(config).expect("config serialization must succeed");
    hasher.update(&encoded);
    let mut output = [0u8; 32];
    output.copy_from_slice(hasher.finalize().as_bytes());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_config_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("market.config");
        let store = ConfigStore::new(&path);

        let mut config = MarketConfig::new("development");
        config.network.primary_endpoint = "http://localhost:8599".into();
        store.save(&config).unwrap();

        let loaded = store.load_or_default("development").unwrap();
        assert_eq!(loaded.network.primary_endpoint, "http://localhost:8599");
        assert_eq!(loaded.listing.default_rows_per_page, 10);
    }

    #[test]
    fn tampered_config_detected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("market.config");
        let store = ConfigStore::new(&path);
        store.save(&MarketConfig::new("test")).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        if let Some(byte) = bytes.iter_mut().find(|b| **b != 0) {
            *byte ^= 0xAA;
        }
        fs::write(&path, bytes).unwrap();

        let result = store.load_or_default("test");
        assert!(matches!(result, Err(MarketError::ValidationError(_))));
    }

    #[test]
    fn update_persists_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("market.config");
        let store = ConfigStore::new(&path);

        store
            .update("test", |config| {
                config.records.endpoint = "http://localhost:9000".into();
                Ok(())
            })
            .unwrap();

        let loaded = store.load_or_default("test").unwrap();
        assert_eq!(loaded.records.endpoint, "http://localhost:9000");
    }
}
