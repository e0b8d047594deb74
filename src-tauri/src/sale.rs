/// Sale preparation for an owned token
///
/// Builds everything the sale dialog needs: resolved metadata, the current
/// price, whether the token can be listed at all, and the venue the chosen
/// sale kind would go through. There is intentionally no submission here:
/// the on-chain listing call is not part of this client yet.
use serde::{Deserialize, Serialize};

use crate::chain::Amount;
use crate::contracts::{MarketContract, NftContract};
use crate::deployment::ContractAddresses;
use crate::errors::{MarketError, MarketResult};
use crate::metadata::{MetadataClient, TokenMetadata};
use crate::validation::InputValidator;

/// How the owner wants to offer the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleKind {
    Auction,
    Sale,
}

/// Prepared sale dialog data for one token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub token_id: u64,
    pub kind: SaleKind,
    /// Asking price in whole tokens
    pub price: String,
    /// Contract the listing would be submitted to
    pub venue: String,
    pub metadata: TokenMetadata,
    /// Tokens already for sale cannot be listed again
    pub listable: bool,
}

/// Assemble a sale draft for a token the account owns.
pub async fn prepare_draft(
    token_id: u64,
    kind: SaleKind,
    asking_price: Option<String>,
    market: &MarketContract,
    nft: &NftContract,
    metadata_client: &MetadataClient,
    contracts: &ContractAddresses,
    validator: &InputValidator,
) -> MarketResult<SaleDraft> {
    let info = market.token_info(token_id).await?;

    if !info.owner.eq_ignore_ascii_case(market.signer()) {
        return Err(MarketError::PermissionDenied(format!(
            "token {} is owned by {}",
            token_id, info.owner
        )));
    }

    let uri = nft.token_uri(token_id).await?;
    let metadata = metadata_client.fetch(&uri).await?;

    let price = match asking_price {
        Some(price) => {
            validator.validate_price(&price)?;
            Amount::from_string(&price)?.as_string()
        }
        None => info.price_amount()?.as_string(),
    };

    let venue = venue_for(kind, contracts);

    Ok(SaleDraft {
        token_id,
        kind,
        price,
        venue: venue.to_string(),
        metadata,
        listable: !info.for_sale,
    })
}

/// Venue contract a sale kind routes to
pub fn venue_for(kind: SaleKind, contracts: &ContractAddresses) -> &str {
    match kind {
        SaleKind::Auction => contracts.auction.as_string(),
        SaleKind::Sale => contracts.market.as_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::{DeploymentConfig, Environment};

    #[test]
    fn venue_follows_sale_kind() {
        let contracts = DeploymentConfig::new(Environment::Test)
            .contract_addresses()
            .unwrap();

        assert_eq!(
            venue_for(SaleKind::Auction, &contracts),
            contracts.auction.as_string()
        );
        assert_eq!(
            venue_for(SaleKind::Sale, &contracts),
            contracts.market.as_string()
        );
    }

    #[test]
    fn sale_kind_serializes_as_dialog_options() {
        assert_eq!(serde_json::to_string(&SaleKind::Auction).unwrap(), "\"Auction\"");
        assert_eq!(serde_json::to_string(&SaleKind::Sale).unwrap(), "\"Sale\"");
    }
}
