/// Typed contract handles over the chain gateway
///
/// Mirrors the contract suite the marketplace deploys: the NFT collection,
/// the market itself, and the auction and loan venues. A handle binds a
/// contract address and the connected account acting as signer to a gateway
/// client; call encoding and event decoding happen gateway-side.
use crate::chain::{Address, PaymentSplit, TokenInfo};
use crate::chain_client::ChainClient;
use crate::errors::MarketResult;
use serde::Serialize;

/// Shared binding of a contract address and signer to a gateway client
pub struct ContractHandle {
    client: ChainClient,
    address: Address,
    signer: String,
}

impl ContractHandle {
    fn bind(endpoint: &str, address: Address, signer: &str) -> MarketResult<Self> {
        Ok(Self {
            client: ChainClient::new(endpoint.to_string())?,
            address,
            signer: signer.to_string(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn signer(&self) -> &str {
        &self.signer
    }

    fn client(&self) -> &ChainClient {
        &self.client
    }
}

/// Handle to the NFT collection contract
pub struct NftContract(ContractHandle);

/// Handle to the market contract
pub struct MarketContract(ContractHandle);

/// Handle to the auction venue contract
pub struct AuctionContract(ContractHandle);

/// Handle to the loan venue contract
pub struct LoanContract(ContractHandle);

pub fn get_nft_contract(endpoint: &str, address: Address, signer: &str) -> MarketResult<NftContract> {
    Ok(NftContract(ContractHandle::bind(endpoint, address, signer)?))
}

pub fn get_market_contract(
    endpoint: &str,
    address: Address,
    signer: &str,
) -> MarketResult<MarketContract> {
    Ok(MarketContract(ContractHandle::bind(endpoint, address, signer)?))
}

pub fn get_auction_contract(
    endpoint: &str,
    address: Address,
    signer: &str,
) -> MarketResult<AuctionContract> {
    Ok(AuctionContract(ContractHandle::bind(endpoint, address, signer)?))
}

pub fn get_loan_contract(
    endpoint: &str,
    address: Address,
    signer: &str,
) -> MarketResult<LoanContract> {
    Ok(LoanContract(ContractHandle::bind(endpoint, address, signer)?))
}

/// Parameters of a mint submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintCall {
    pub uri: String,
    /// Price in base units, as a decimal string
    pub price: String,
    pub fee_addresses: Vec<String>,
    pub fee_percentages: Vec<u32>,
    pub royalty_addresses: Vec<String>,
    pub royalty_percentages: Vec<u32>,
}

impl MintCall {
    pub fn new(uri: String, price_base_units: u128, fees: &PaymentSplit, royalties: &PaymentSplit) -> Self {
        Self {
            uri,
            price: price_base_units.to_string(),
            fee_addresses: fees.addresses(),
            fee_percentages: fees.percentages(),
            royalty_addresses: royalties.addresses(),
            royalty_percentages: royalties.percentages(),
        }
    }
}

impl NftContract {
    /// Metadata URI of a token
    pub async fn token_uri(&self, token_id: u64) -> MarketResult<String> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
            "tokenId": token_id,
        });
        self.0.client().contract_read("nft_tokenUri", params).await
    }

    /// Number of tokens an account holds
    pub async fn balance_of(&self, owner: &str) -> MarketResult<u64> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
            "owner": owner,
        });
        self.0.client().contract_read("nft_balanceOf", params).await
    }

    /// Token id at the given index of an owner's holdings
    pub async fn token_of_owner_by_index(&self, owner: &str, index: u64) -> MarketResult<u64> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
            "owner": owner,
            "index": index,
        });
        self.0
            .client()
            .contract_read("nft_tokenOfOwnerByIndex", params)
            .await
    }

    /// Total number of tokens minted so far
    pub async fn current_token_id(&self) -> MarketResult<u64> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
        });
        self.0
            .client()
            .contract_read("nft_currentTokenId", params)
            .await
    }

    pub fn address(&self) -> &Address {
        self.0.address()
    }
}

impl MarketContract {
    /// Submit a mint transaction; returns the transaction hash
    pub async fn mint(&self, call: &MintCall) -> MarketResult<String> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
            "from": self.0.signer(),
            "call": call,
        });
        self.0.client().contract_send("market_mint", params).await
    }

    /// On-chain record of a token
    pub async fn token_info(&self, token_id: u64) -> MarketResult<TokenInfo> {
        let params = serde_json::json!({
            "contract": self.0.address().as_string(),
            "tokenId": token_id,
        });
        self.0
            .client()
            .contract_read("market_getTokenInfo", params)
            .await
    }

    pub fn address(&self) -> &Address {
        self.0.address()
    }

    pub fn signer(&self) -> &str {
        self.0.signer()
    }
}

impl AuctionContract {
    pub fn address(&self) -> &Address {
        self.0.address()
    }
}

impl LoanContract {
    pub fn address(&self) -> &Address {
        self.0.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(last_byte: u8) -> Address {
        let mut bytes = vec![0u8; 20];
        bytes[19] = last_byte;
        Address::from_bytes(bytes, crate::chain::AddressType::Contract).unwrap()
    }

    #[test]
    fn handles_bind_address_and_signer() {
        let nft = get_nft_contract(
            "http://localhost:8599",
            address(1),
            "0x00000000000000000000000000000000000000aa",
        )
        .unwrap();
        assert_eq!(
            nft.address().as_string(),
            "0x0000000000000000000000000000000000000001"
        );

        let market = get_market_contract(
            "http://localhost:8599",
            address(2),
            "0x00000000000000000000000000000000000000aa",
        )
        .unwrap();
        assert_eq!(market.signer(), "0x00000000000000000000000000000000000000aa");
    }

    #[test]
    fn mint_call_flattens_splits() {
        let fees = PaymentSplit::parse(
            "0x0102030405060708090a0b0c0d0e0f1011121314,0x1112131415161718191a1b1c1d1e1f2021222324",
            "60,40",
        )
        .unwrap();
        let royalties =
            PaymentSplit::parse("0x0102030405060708090a0b0c0d0e0f1011121314", "100").unwrap();

        let call = MintCall::new(
            "https://meta.example/1.json".to_string(),
            2_000_000_000_000_000_000,
            &fees,
            &royalties,
        );

        assert_eq!(call.fee_addresses.len(), 2);
        assert_eq!(call.fee_percentages, vec![60, 40]);
        assert_eq!(call.royalty_percentages, vec![100]);
        assert_eq!(call.price, "2000000000000000000");
    }
}
