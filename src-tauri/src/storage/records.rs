/// Remote keyed document store for minted-token records
///
/// After a successful mint the client persists a minimal record to an
/// external JSON document store so other devices of the same user can list
/// their minted tokens. Entries are keyed by a digest derived from the owner
/// address and carry a monotonically increasing revision.
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{MarketError, MarketResult};

const RECORD_KEY_DOMAIN: &[u8] = b"TESSERA_MINTED_RECORDS_V1";

/// Minimal record persisted per minted token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedRecord {
    pub token_id: u64,
    pub owner: String,
}

/// Revisioned entry stored in the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEntry {
    pub data: Vec<MintedRecord>,
    pub data_key: String,
    pub revision: u64,
}

impl RecordEntry {
    pub fn empty(data_key: String) -> Self {
        Self {
            data: Vec::new(),
            data_key,
            revision: 0,
        }
    }

    /// Append a record and bump the revision.
    pub fn push(&mut self, record: MintedRecord) {
        self.data.push(record);
        self.revision += 1;
    }
}

/// HTTP client for the keyed document store
pub struct RecordStore {
    client: Client,
    base_url: String,
}

impl RecordStore {
    /// Create a new record store client
    pub fn new(base_url: String) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MarketError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(RecordStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Derive the registry key for an owner address.
    ///
    /// The same owner always maps to the same key, regardless of the hex
    /// casing the wallet reports.
    pub fn registry_key(owner: &str) -> String {
        let mut hasher = Sha3_256::new();
        hasher.update(RECORD_KEY_DOMAIN);
        hasher.update(owner.to_lowercase().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Fetch the record entry for an owner; absent entries come back empty.
    pub async fn fetch_records(&self, owner: &str) -> MarketResult<RecordEntry> {
        let key = Self::registry_key(owner);
        let url = format!("{}/registry/{}", self.base_url, key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(format!("HTTP request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RecordEntry::empty(key));
        }

        if !response.status().is_success() {
            return Err(MarketError::NetworkError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let entry: RecordEntry = response
            .json()
            .await
            .map_err(|e| MarketError::InvalidResponse(format!("Failed to parse entry: {}", e)))?;

        Ok(entry)
    }

    /// Append a minted record to the owner's entry and write it back.
    /// Returns the stored revision.
    pub async fn save_minted(&self, owner: &str, record: MintedRecord) -> MarketResult<u64> {
        let mut entry = self.fetch_records(owner).await?;
        entry.push(record);

        let url = format!("{}/registry/{}", self.base_url, entry.data_key);
        let response = self
            .client
            .put(&url)
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(&entry)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MarketError::NetworkError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(entry.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_key_is_case_insensitive() {
        let lower = RecordStore::registry_key("0xabcdef0102030405060708090a0b0c0d0e0f1011");
        let upper = RecordStore::registry_key("0xABCDEF0102030405060708090A0B0C0D0E0F1011");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 64);
    }

    #[test]
    fn registry_key_differs_per_owner() {
        let a = RecordStore::registry_key("0x00000000000000000000000000000000000000aa");
        let b = RecordStore::registry_key("0x00000000000000000000000000000000000000ab");
        assert_ne!(a, b);
    }

    #[test]
    fn entry_push_bumps_revision() {
        let mut entry = RecordEntry::empty("key".to_string());
        assert_eq!(entry.revision, 0);
        entry.push(MintedRecord {
            token_id: 3,
            owner: "0x00000000000000000000000000000000000000aa".to_string(),
        });
        assert_eq!(entry.revision, 1);
        assert_eq!(entry.data.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires running record store at localhost:9800"]
    async fn save_and_fetch_round_trip() {
        let store = RecordStore::new("http://localhost:9800".to_string()).unwrap();
        let owner = "0x00000000000000000000000000000000000000aa";
        let revision = store
            .save_minted(
                owner,
                MintedRecord {
                    token_id: 1,
                    owner: owner.to_string(),
                },
            )
            .await
            .unwrap();
        assert!(revision >= 1);

        let entry = store.fetch_records(owner).await.unwrap();
        assert!(!entry.data.is_empty());
    }
}
