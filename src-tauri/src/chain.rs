/// Core chain types for the Tessera market client
///
/// This module defines the data structures exchanged with the marketplace
/// contracts through the chain gateway: addresses, token amounts, payment
/// splits, token records and transaction receipts.
use crate::errors::{MarketError, MarketResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account or contract address
///
/// Addresses follow the format: 0x{40_hex_chars}, compatible with
/// Ethereum-style tooling and infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// The raw address bytes (20 bytes)
    raw_bytes: Vec<u8>,
    /// The human-readable string representation (0x prefixed hex)
    hex_address: String,
    /// Address type for different purposes
    address_type: AddressType,
}

/// Types of addresses the client distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    /// Standard user account address
    Account,
    /// Smart contract address
    Contract,
}

impl Address {
    /// Create a new address from raw bytes
    pub fn from_bytes(bytes: Vec<u8>, address_type: AddressType) -> MarketResult<Self> {
        if bytes.is_empty() {
            return Err(MarketError::InvalidAddress(
                "Address bytes cannot be empty".to_string(),
            ));
        }

        if bytes.len() != 20 {
            return Err(MarketError::InvalidAddress(format!(
                "Invalid address length: expected 20 bytes, got {}",
                bytes.len()
            )));
        }

        let hex_address = format!("0x{}", hex::encode(&bytes));

        Ok(Address {
            raw_bytes: bytes,
            hex_address,
            address_type,
        })
    }

    /// Parse a 0x-prefixed hex address
    pub fn from_string(address: &str) -> MarketResult<Self> {
        Self::parse_typed(address, AddressType::Account)
    }

    /// Parse a 0x-prefixed hex contract address
    pub fn contract(address: &str) -> MarketResult<Self> {
        Self::parse_typed(address, AddressType::Contract)
    }

    fn parse_typed(hex_address: &str, address_type: AddressType) -> MarketResult<Self> {
        if !hex_address.starts_with("0x") {
            return Err(MarketError::InvalidAddress(
                "Address must start with '0x'".to_string(),
            ));
        }

        if hex_address.len() != 42 {
            // "0x" (2) + 40 hex chars = 42 total
            return Err(MarketError::InvalidAddress(format!(
                "Invalid address length: expected 42 characters, got {}",
                hex_address.len()
            )));
        }

        let hex_part = &hex_address[2..];
        let bytes = hex::decode(hex_part)
            .map_err(|_| MarketError::InvalidAddress("Invalid hex in address".to_string()))?;

        Self::from_bytes(bytes, address_type)
    }

    /// Get the raw address bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Get the string representation (hex format)
    pub fn as_string(&self) -> &str {
        &self.hex_address
    }

    /// Get the address type
    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    /// Case-insensitive comparison against another hex address string
    pub fn matches(&self, other: &str) -> bool {
        self.hex_address.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex_address)
    }
}

impl FromStr for Address {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

/// Represents an amount of the market's native token
///
/// Uses fixed-point arithmetic to avoid floating-point precision issues.
/// The base unit is the smallest divisible unit (like wei in Ethereum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    /// The amount in base units (1 token = 10^18 base units)
    base_units: u128,
}

impl Amount {
    /// Number of decimal places for the native token (18, like ETH)
    pub const DECIMALS: u8 = 18;
    /// Base units per whole token (10^18)
    pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;
    /// Maximum supply in whole tokens
    pub const MAX_TOKENS: u128 = 1_000_000_000_000;

    /// Create amount from base units
    pub fn from_base_units(base_units: u128) -> MarketResult<Self> {
        let max_base_units = Self::MAX_TOKENS
            .checked_mul(Self::UNITS_PER_TOKEN)
            .ok_or_else(|| {
                MarketError::InvalidAmount("Maximum supply calculation overflow".to_string())
            })?;

        if base_units > max_base_units {
            return Err(MarketError::InvalidAmount("Amount too large".to_string()));
        }

        Ok(Amount { base_units })
    }

    /// Create amount from whole tokens
    pub fn from_tokens(tokens: u128) -> MarketResult<Self> {
        if tokens > Self::MAX_TOKENS {
            return Err(MarketError::InvalidAmount("Amount too large".to_string()));
        }

        let base_units = tokens
            .checked_mul(Self::UNITS_PER_TOKEN)
            .ok_or_else(|| MarketError::InvalidAmount("Amount calculation overflow".to_string()))?;
        Self::from_base_units(base_units)
    }

    /// Create amount from string (supports decimal notation)
    pub fn from_string(amount_str: &str) -> MarketResult<Self> {
        if amount_str.is_empty() {
            return Err(MarketError::InvalidAmount(
                "Amount cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = amount_str.split('.').collect();
        if parts.len() > 2 {
            return Err(MarketError::InvalidAmount(
                "Invalid decimal format".to_string(),
            ));
        }

        let whole_part: u128 = parts[0]
            .parse()
            .map_err(|_| MarketError::InvalidAmount("Invalid number format".to_string()))?;

        let fractional_units = if parts.len() == 2 {
            let fractional_str = parts[1];
            if fractional_str.len() > Self::DECIMALS as usize {
                return Err(MarketError::InvalidAmount(
                    "Too many decimal places".to_string(),
                ));
            }

            // Pad with zeros to get full precision
            let padded = format!("{:0<18}", fractional_str);
            padded
                .parse::<u128>()
                .map_err(|_| MarketError::InvalidAmount("Invalid fractional part".to_string()))?
        } else {
            0
        };

        let total_base_units = whole_part
            .checked_mul(Self::UNITS_PER_TOKEN)
            .and_then(|w| w.checked_add(fractional_units))
            .ok_or_else(|| MarketError::InvalidAmount("Amount overflow".to_string()))?;

        Self::from_base_units(total_base_units)
    }

    /// Get base units
    pub fn base_units(&self) -> u128 {
        self.base_units
    }

    /// Get amount as string with full precision
    pub fn as_string(&self) -> String {
        let whole = self.base_units / Self::UNITS_PER_TOKEN;
        let fractional = self.base_units % Self::UNITS_PER_TOKEN;

        if fractional == 0 {
            whole.to_string()
        } else {
            let frac_str = format!("{:018}", fractional)
                .trim_end_matches('0')
                .to_string();
            format!("{}.{}", whole, frac_str)
        }
    }

    /// Check if amount is zero
    pub fn is_zero(&self) -> bool {
        self.base_units == 0
    }

    /// Get amount as string with specified decimal precision
    pub fn to_display_string(self, decimals: u8) -> String {
        let whole = self.base_units / Self::UNITS_PER_TOKEN;
        let fractional = self.base_units % Self::UNITS_PER_TOKEN;

        if fractional == 0 || decimals == 0 {
            whole.to_string()
        } else {
            let scale = 10_u128.pow((Self::DECIMALS - decimals) as u32);
            let scaled_fractional = (fractional + scale / 2) / scale; // Round to nearest

            if scaled_fractional == 0 {
                whole.to_string()
            } else {
                let frac_str = format!("{:0width$}", scaled_fractional, width = decimals as usize)
                    .trim_end_matches('0')
                    .to_string();
                if frac_str.is_empty() {
                    whole.to_string()
                } else {
                    format!("{}.{}", whole, frac_str)
                }
            }
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl FromStr for Amount {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_string(s)
    }
}

/// One recipient of a payment split
///
/// Addresses are carried as the form submitted them; the contract is the
/// authority on address validity for split recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitEntry {
    pub address: String,
    pub percentage: u32,
}

/// An ordered list of (address, percentage) pairs distributing a payment.
///
/// Invariant: the list is non-empty and the percentages sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    entries: Vec<SplitEntry>,
}

impl PaymentSplit {
    /// Build a split, enforcing the sum-to-100 invariant.
    pub fn new(entries: Vec<SplitEntry>) -> MarketResult<Self> {
        if entries.is_empty() {
            return Err(MarketError::ValidationError(
                "Split must name at least one address".to_string(),
            ));
        }

        let sum: u64 = entries.iter().map(|e| e.percentage as u64).sum();
        if sum != 100 {
            return Err(MarketError::ValidationError(format!(
                "Sum of split percentages must equal 100, got {}",
                sum
            )));
        }

        Ok(PaymentSplit { entries })
    }

    /// Parse a split from comma-joined address and percentage lists, the
    /// shape the mint form submits.
    pub fn parse(addresses: &str, percentages: &str) -> MarketResult<Self> {
        let address_items: Vec<&str> = addresses.split(',').map(str::trim).collect();
        let percentage_items: Vec<&str> = percentages.split(',').map(str::trim).collect();

        if address_items.is_empty() || address_items[0].is_empty() {
            return Err(MarketError::ValidationError(
                "Split addresses can not be empty".to_string(),
            ));
        }

        if percentage_items.is_empty() || percentage_items[0].is_empty() {
            return Err(MarketError::ValidationError(
                "Split percentages can not be empty".to_string(),
            ));
        }

        if address_items.len() != percentage_items.len() {
            return Err(MarketError::ValidationError(format!(
                "Addresses and percentages not the same length - {} : {}",
                address_items.len(),
                percentage_items.len()
            )));
        }

        let mut entries = Vec::with_capacity(address_items.len());
        for (addr, pct) in address_items.iter().zip(percentage_items.iter()) {
            let percentage: u32 = pct.parse().map_err(|_| {
                MarketError::ValidationError(format!("Invalid percentage value '{}'", pct))
            })?;
            entries.push(SplitEntry {
                address: addr.to_string(),
                percentage,
            });
        }

        Self::new(entries)
    }

    pub fn entries(&self) -> &[SplitEntry] {
        &self.entries
    }

    /// Addresses in order, for the contract call
    pub fn addresses(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.address.clone()).collect()
    }

    /// Percentages in order, for the contract call
    pub fn percentages(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.percentage).collect()
    }
}

/// On-chain token record as reported by the market contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub token_id: u64,
    pub minter: String,
    pub owner: String,
    /// Price in base units, as a decimal string
    pub price: String,
    pub for_sale: bool,
    pub for_auction: bool,
    pub for_loan: bool,
    pub on_loan: bool,
}

impl TokenInfo {
    /// Price converted from base units to a display amount
    pub fn price_amount(&self) -> MarketResult<Amount> {
        let base_units: u128 = self.price.parse().map_err(|_| {
            MarketError::InvalidResponse(format!("Invalid token price '{}'", self.price))
        })?;
        Amount::from_base_units(base_units)
    }
}

/// A decoded contract event carried on a transaction receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEvent {
    pub event: String,
    pub args: serde_json::Value,
}

/// Transaction receipt as returned by the gateway, with decoded events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    #[serde(default)]
    pub events: Vec<ContractEvent>,
}

impl TransactionReceipt {
    /// A receipt counts as mined once it carries a block number
    pub fn is_mined(&self) -> bool {
        self.block_number.is_some()
    }
}

/// Token id and recipient extracted from the Minted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token_id: u64,
    pub minted_to: String,
}

impl MintedToken {
    /// Extract the minted token from a receipt's event data.
    pub fn from_receipt(receipt: &TransactionReceipt) -> MarketResult<Self> {
        let event = receipt
            .events
            .iter()
            .find(|e| e.event == "Minted")
            .ok_or_else(|| {
                MarketError::InvalidResponse(
                    "Transaction receipt carries no Minted event".to_string(),
                )
            })?;

        let token_id = event
            .args
            .get("tokenId")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                MarketError::InvalidResponse("Minted event is missing tokenId".to_string())
            })?;

        let minted_to = event
            .args
            .get("to")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                MarketError::InvalidResponse("Minted event is missing recipient".to_string())
            })?
            .to_string();

        Ok(MintedToken {
            token_id,
            minted_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_creation() {
        let bytes = vec![
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20,
        ];
        let addr = Address::from_bytes(bytes.clone(), AddressType::Account).unwrap();
        assert_eq!(addr.as_bytes(), &bytes);
        assert_eq!(addr.as_string().len(), 42);
    }

    #[test]
    fn test_address_parsing() {
        let addr_str = "0x0102030405060708090a0b0c0d0e0f1011121314";
        let addr = Address::from_string(addr_str).unwrap();
        assert_eq!(addr.as_string(), addr_str);
        assert!(addr.matches("0x0102030405060708090A0B0C0D0E0F1011121314"));
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(Address::from_string("nope").is_err());
        assert!(Address::from_string("0x1234").is_err());
        assert!(Address::from_string("0xzz02030405060708090a0b0c0d0e0f1011121314").is_err());
    }

    #[test]
    fn test_amount_parsing() {
        let amount = Amount::from_string("1.5").unwrap();
        assert_eq!(amount.base_units(), 1_500_000_000_000_000_000);
        assert_eq!(amount.as_string(), "1.5");
    }

    #[test]
    fn test_amount_display_precision() {
        let amount = Amount::from_string("2.123456789").unwrap();
        assert_eq!(amount.to_display_string(5), "2.12346");
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(Amount::from_string("").is_err());
        assert!(Amount::from_string("1.2.3").is_err());
        assert!(Amount::from_string("abc").is_err());
    }

    #[test]
    fn split_accepts_matching_lists_summing_to_100() {
        let split = PaymentSplit::parse("0xA,0xB", "60,40").unwrap();
        assert_eq!(split.entries().len(), 2);
        assert_eq!(split.percentages(), vec![60, 40]);
        assert_eq!(split.addresses(), vec!["0xA", "0xB"]);
    }

    #[test]
    fn split_rejects_sum_not_100() {
        let result = PaymentSplit::parse("0xA,0xB", "60,41");
        assert!(matches!(result, Err(MarketError::ValidationError(_))));
    }

    #[test]
    fn split_rejects_length_mismatch() {
        let result = PaymentSplit::parse("0xA", "50,50");
        assert!(matches!(result, Err(MarketError::ValidationError(_))));
    }

    #[test]
    fn split_rejects_empty_lists() {
        assert!(PaymentSplit::parse("", "100").is_err());
        assert!(PaymentSplit::parse("0xA", "").is_err());
    }

    #[test]
    fn split_tolerates_whitespace_around_items() {
        let split = PaymentSplit::parse("0xA, 0xB", " 60 ,40").unwrap();
        assert_eq!(split.addresses(), vec!["0xA", "0xB"]);
        assert_eq!(split.percentages(), vec![60, 40]);
    }

    #[test]
    fn minted_token_extracted_from_receipt() {
        let receipt = TransactionReceipt {
            transaction_hash: "0xabc".to_string(),
            block_number: Some(12),
            events: vec![ContractEvent {
                event: "Minted".to_string(),
                args: json!({ "tokenId": 7, "to": "0x0102030405060708090a0b0c0d0e0f1011121314" }),
            }],
        };

        let minted = MintedToken::from_receipt(&receipt).unwrap();
        assert_eq!(minted.token_id, 7);
        assert_eq!(
            minted.minted_to,
            "0x0102030405060708090a0b0c0d0e0f1011121314"
        );
    }

    #[test]
    fn minted_token_requires_minted_event() {
        let receipt = TransactionReceipt {
            transaction_hash: "0xabc".to_string(),
            block_number: Some(12),
            events: vec![ContractEvent {
                event: "Transfer".to_string(),
                args: json!({}),
            }],
        };

        assert!(matches!(
            MintedToken::from_receipt(&receipt),
            Err(MarketError::InvalidResponse(_))
        ));
    }

    #[test]
    fn token_info_price_is_base_units() {
        let info = TokenInfo {
            token_id: 1,
            minter: "0x0102030405060708090a0b0c0d0e0f1011121314".to_string(),
            owner: "0x0102030405060708090a0b0c0d0e0f1011121314".to_string(),
            price: "2500000000000000000".to_string(),
            for_sale: true,
            for_auction: false,
            for_loan: false,
            on_loan: false,
        };
        assert_eq!(info.price_amount().unwrap().as_string(), "2.5");
    }
}
