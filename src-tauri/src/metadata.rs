/// Token metadata fetching and shape checking
///
/// Token URIs resolve to externally hosted JSON documents. A document is
/// only usable when it carries non-empty `name`, `description` and `image`
/// fields; everything else is preserved as-is for display.
use crate::errors::{MarketError, MarketResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    /// Fields beyond the required shape (external_url, attributes, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TokenMetadata {
    /// Validate the shape of a fetched document.
    ///
    /// Rejects documents missing any of the required fields or carrying
    /// them empty.
    pub fn from_value(value: Value) -> MarketResult<Self> {
        let object = match value {
            Value::Object(map) => map,
            _ => {
                return Err(MarketError::ValidationError(
                    "Token metadata must be a JSON object".to_string(),
                ))
            }
        };

        let required = |map: &serde_json::Map<String, Value>, field: &str| -> MarketResult<String> {
            match map.get(field).and_then(|v| v.as_str()) {
                Some(s) if !s.is_empty() => Ok(s.to_string()),
                _ => Err(MarketError::ValidationError(format!(
                    "Token metadata is missing '{}'",
                    field
                ))),
            }
        };

        let name = required(&object, "name")?;
        let description = required(&object, "description")?;
        let image = required(&object, "image")?;

        let mut extra = object;
        extra.remove("name");
        extra.remove("description");
        extra.remove("image");

        Ok(TokenMetadata {
            name,
            description,
            image,
            extra,
        })
    }
}

/// HTTP client for metadata documents
pub struct MetadataClient {
    client: Client,
}

impl MetadataClient {
    pub fn new() -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                MarketError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(MetadataClient { client })
    }

    /// Fetch and shape-check the document behind a token URI
    pub async fn fetch(&self, uri: &str) -> MarketResult<TokenMetadata> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(format!("Metadata fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MarketError::NetworkError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let value: Value = response.json().await.map_err(|e| {
            MarketError::InvalidResponse(format!("Metadata is not valid JSON: {}", e))
        })?;

        TokenMetadata::from_value(value)
    }
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new().expect("Failed to create MetadataClient")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_complete_document() {
        let value = json!({
            "name": "Common Card",
            "description": "A card from the show",
            "image": "https://ipfs.example/ipfs/Qm123",
            "external_url": "0.04",
            "attributes": { "content_type": "video/mp4" },
        });

        let metadata = TokenMetadata::from_value(value).unwrap();
        assert_eq!(metadata.name, "Common Card");
        assert!(metadata.extra.contains_key("attributes"));
    }

    #[test]
    fn rejects_missing_name() {
        let value = json!({
            "description": "A card",
            "image": "https://ipfs.example/ipfs/Qm123",
        });
        assert!(matches!(
            TokenMetadata::from_value(value),
            Err(MarketError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_missing_description() {
        let value = json!({
            "name": "Card",
            "image": "https://ipfs.example/ipfs/Qm123",
        });
        assert!(TokenMetadata::from_value(value).is_err());
    }

    #[test]
    fn rejects_missing_image() {
        let value = json!({
            "name": "Card",
            "description": "A card",
        });
        assert!(TokenMetadata::from_value(value).is_err());
    }

    #[test]
    fn rejects_empty_fields() {
        let value = json!({
            "name": "",
            "description": "A card",
            "image": "https://ipfs.example/ipfs/Qm123",
        });
        assert!(TokenMetadata::from_value(value).is_err());
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(TokenMetadata::from_value(json!("just a string")).is_err());
        assert!(TokenMetadata::from_value(json!([1, 2, 3])).is_err());
    }
}
