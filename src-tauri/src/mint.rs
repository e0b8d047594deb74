/// Mint workflow: validation, submission, confirmation, record keeping
///
/// Validation is pure with respect to presentation: it returns a structured
/// field-scoped issue instead of raising notifications, and the command
/// layer decides how to render it. Chain access is injected through the
/// contract and client handles, never read from ambient state.
use serde::{Deserialize, Serialize};

use crate::chain::{Amount, MintedToken, PaymentSplit};
use crate::chain_client::ChainClient;
use crate::contracts::{MarketContract, MintCall};
use crate::errors::{MarketError, MarketResult};
use crate::metadata::{MetadataClient, TokenMetadata};
use crate::storage::{MintedRecord, RecordStore};
use crate::validation::InputValidator;

/// Form field a validation issue is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MintField {
    Uri,
    Price,
    FeeSplit,
    RoyaltySplit,
}

/// A field-scoped validation failure; submission does not proceed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintIssue {
    pub field: MintField,
    pub message: String,
}

impl MintIssue {
    fn new(field: MintField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Mint input as submitted by the form: splits arrive comma-joined
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub uri: String,
    pub price: String,
    pub fee_addresses: String,
    pub fee_percentages: String,
    pub royalty_addresses: String,
    pub royalty_percentages: String,
}

/// Mint input after validation, ready for submission
#[derive(Debug, Clone)]
pub struct ValidatedMint {
    pub uri: String,
    pub price: Amount,
    pub fees: PaymentSplit,
    pub royalties: PaymentSplit,
    pub metadata: TokenMetadata,
}

/// Result of a successful mint
#[derive(Debug, Clone)]
pub struct MintOutcome {
    pub token_id: u64,
    pub owner: String,
    pub transaction_hash: String,
    /// Revision the record store reported, when the write succeeded
    pub record_revision: Option<u64>,
}

/// Validate a mint request field by field, aborting on the first failure.
///
/// Check order: URI presence, URI fetch-and-shape, price floor, fee split,
/// royalty split.
pub async fn validate(
    request: &MintRequest,
    validator: &InputValidator,
    metadata_client: &MetadataClient,
) -> Result<ValidatedMint, MintIssue> {
    if request.uri.is_empty() {
        return Err(MintIssue::new(MintField::Uri, "Please enter the token URI"));
    }
    if let Err(err) = validator.validate_uri(&request.uri) {
        return Err(MintIssue::new(MintField::Uri, err.to_string()));
    }

    let metadata = match metadata_client.fetch(&request.uri).await {
        Ok(metadata) => metadata,
        Err(err) => {
            log::debug!("URI validation failed for {}: {}", request.uri, err);
            return Err(MintIssue::new(
                MintField::Uri,
                "URI is not a valid token metadata document",
            ));
        }
    };

    let price = check_price(validator, &request.price)?;

    let fees = PaymentSplit::parse(&request.fee_addresses, &request.fee_percentages)
        .map_err(|err| MintIssue::new(MintField::FeeSplit, err.to_string()))?;

    let royalties = PaymentSplit::parse(&request.royalty_addresses, &request.royalty_percentages)
        .map_err(|err| MintIssue::new(MintField::RoyaltySplit, err.to_string()))?;

    Ok(ValidatedMint {
        uri: request.uri.clone(),
        price,
        fees,
        royalties,
        metadata,
    })
}

/// Price must be well-formed and at least one whole token.
fn check_price(validator: &InputValidator, price: &str) -> Result<Amount, MintIssue> {
    if let Err(err) = validator.validate_price(price) {
        return Err(MintIssue::new(MintField::Price, err.to_string()));
    }

    let amount = Amount::from_string(price)
        .map_err(|err| MintIssue::new(MintField::Price, err.to_string()))?;

    let floor = Amount::from_tokens(1).expect("one token is a valid amount");
    if amount < floor {
        return Err(MintIssue::new(
            MintField::Price,
            "Price can not be less than one",
        ));
    }

    Ok(amount)
}

/// Submit a validated mint and see it through to a persisted record.
pub async fn execute(
    validated: &ValidatedMint,
    account: &str,
    market: &MarketContract,
    chain: &ChainClient,
    records: &RecordStore,
    wait_blocks: u64,
) -> MarketResult<MintOutcome> {
    let call = MintCall::new(
        validated.uri.clone(),
        validated.price.base_units(),
        &validated.fees,
        &validated.royalties,
    );

    log::info!("Submitting mint transaction for {}", validated.uri);
    let tx_hash = market.mint(&call).await?;

    let receipt = chain.await_confirmation(&tx_hash).await?;
    log::debug!(
        "Mint transaction {} first confirmed in block {:?}",
        tx_hash,
        receipt.block_number
    );

    let mined = chain.confirm_within(&tx_hash, wait_blocks).await?;
    if !mined {
        return Err(MarketError::ConfirmationTimeout(wait_blocks));
    }

    let minted = MintedToken::from_receipt(&receipt)?;
    if !minted.minted_to.eq_ignore_ascii_case(account) {
        return Err(MarketError::AccountMismatch(format!(
            "token {} was minted to {}, connected account is {}",
            minted.token_id, minted.minted_to, account
        )));
    }

    let record = MintedRecord {
        token_id: minted.token_id,
        owner: minted.minted_to.clone(),
    };
    // Record persistence is best-effort; the token exists on chain either way.
    let record_revision = match records.save_minted(&minted.minted_to, record).await {
        Ok(revision) => Some(revision),
        Err(err) => {
            log::warn!("Failed to persist minted record: {}", err);
            None
        }
    };

    log::info!("Token {} minted to {}", minted.token_id, minted.minted_to);
    Ok(MintOutcome {
        token_id: minted.token_id,
        owner: minted.minted_to.clone(),
        transaction_hash: tx_hash,
        record_revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MintRequest {
        MintRequest {
            uri: "https://meta.example/token/1.json".to_string(),
            price: "2".to_string(),
            fee_addresses: "0x0102030405060708090a0b0c0d0e0f1011121314".to_string(),
            fee_percentages: "100".to_string(),
            royalty_addresses: "0x1112131415161718191a1b1c1d1e1f2021222324".to_string(),
            royalty_percentages: "100".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_uri_rejected_before_anything_else() {
        let mut req = request();
        req.uri = String::new();
        req.price = "0".to_string(); // also invalid, but the URI issue must win

        let issue = validate(&req, &InputValidator::default(), &MetadataClient::default())
            .await
            .unwrap_err();
        assert_eq!(issue.field, MintField::Uri);
    }

    #[tokio::test]
    async fn malicious_uri_rejected_without_fetch() {
        let mut req = request();
        req.uri = "javascript:alert(1)".to_string();

        let issue = validate(&req, &InputValidator::default(), &MetadataClient::default())
            .await
            .unwrap_err();
        assert_eq!(issue.field, MintField::Uri);
    }

    #[test]
    fn price_below_one_rejected() {
        let validator = InputValidator::default();
        let issue = check_price(&validator, "0.5").unwrap_err();
        assert_eq!(issue.field, MintField::Price);

        let issue = check_price(&validator, "0").unwrap_err();
        assert_eq!(issue.field, MintField::Price);
    }

    #[test]
    fn price_of_one_or_more_accepted() {
        let validator = InputValidator::default();
        assert_eq!(check_price(&validator, "1").unwrap(), Amount::from_tokens(1).unwrap());
        assert!(check_price(&validator, "12.5").is_ok());
    }

    #[test]
    fn malformed_price_rejected() {
        let validator = InputValidator::default();
        assert!(check_price(&validator, "abc").is_err());
        assert!(check_price(&validator, "").is_err());
    }
}
