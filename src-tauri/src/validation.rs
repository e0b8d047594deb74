use crate::errors::{MarketError, MarketResult};
use regex::Regex;

/// Input validation utilities for the market client
pub struct InputValidator {
    // Compiled regex patterns for performance
    address_pattern: Regex,
    price_pattern: Regex,

    // Blacklisted patterns for security
    malicious_patterns: Vec<Regex>,
}

impl InputValidator {
    pub fn new() -> MarketResult<Self> {
        let address_pattern = Regex::new(r"^0x[a-fA-F0-9]{40}$")
            .map_err(|e| MarketError::ValidationError(format!("Invalid address regex: {}", e)))?;

        let price_pattern = Regex::new(r"^\d+(\.\d{1,18})?$")
            .map_err(|e| MarketError::ValidationError(format!("Invalid price regex: {}", e)))?;

        // Common malicious patterns to block
        let malicious_patterns = vec![
            Regex::new(r"<script").unwrap(),
            Regex::new(r"javascript:").unwrap(),
            Regex::new(r"data:text/html").unwrap(),
            Regex::new(r"vbscript:").unwrap(),
            Regex::new(r"onload=").unwrap(),
            Regex::new(r"onerror=").unwrap(),
        ];

        Ok(InputValidator {
            address_pattern,
            price_pattern,
            malicious_patterns,
        })
    }

    /// Validate a chain address
    pub fn validate_address(&self, address: &str) -> MarketResult<()> {
        self.check_basic_security(address)?;

        if address.is_empty() {
            return Err(MarketError::ValidationError(
                "Address cannot be empty".to_string(),
            ));
        }

        if address.len() > 100 {
            return Err(MarketError::ValidationError("Address too long".to_string()));
        }

        if !self.address_pattern.is_match(address) {
            return Err(MarketError::InvalidAddress(
                "Address format is invalid".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a price string
    pub fn validate_price(&self, price: &str) -> MarketResult<()> {
        self.check_basic_security(price)?;

        if price.is_empty() {
            return Err(MarketError::ValidationError(
                "Price cannot be empty".to_string(),
            ));
        }

        if !self.price_pattern.is_match(price) {
            return Err(MarketError::InvalidAmount(
                "Price format is invalid".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a token metadata URI
    ///
    /// Shape of the document behind the URI is checked separately by the
    /// metadata fetch; this only rejects inputs that are unusable as URIs.
    pub fn validate_uri(&self, uri: &str) -> MarketResult<()> {
        self.check_basic_security(uri)?;

        if uri.is_empty() {
            return Err(MarketError::ValidationError(
                "URI cannot be empty".to_string(),
            ));
        }

        if uri.len() > 1000 {
            return Err(MarketError::ValidationError("URI too long".to_string()));
        }

        Ok(())
    }

    /// Sanitize input string by removing/escaping dangerous characters
    pub fn sanitize_input(&self, input: &str) -> String {
        input
            .chars()
            .filter(|c| c.is_alphanumeric() || " .-_@:/".contains(*c))
            .take(1000) // Limit length
            .collect()
    }

    /// Check for basic security issues in any input
    fn check_basic_security(&self, input: &str) -> MarketResult<()> {
        if input.len() > 1000 {
            return Err(MarketError::ValidationError("Input too long".to_string()));
        }

        // Check for malicious patterns
        for pattern in &self.malicious_patterns {
            if pattern.is_match(&input.to_lowercase()) {
                return Err(MarketError::ValidationError(
                    "Input contains potentially malicious content".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new().expect("Failed to create InputValidator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_format_enforced() {
        let validator = InputValidator::default();
        assert!(validator
            .validate_address("0x0102030405060708090a0b0c0d0e0f1011121314")
            .is_ok());
        assert!(validator.validate_address("0x12345").is_err());
        assert!(validator.validate_address("").is_err());
    }

    #[test]
    fn price_format_enforced() {
        let validator = InputValidator::default();
        assert!(validator.validate_price("1").is_ok());
        assert!(validator.validate_price("0.25").is_ok());
        assert!(validator.validate_price("-3").is_err());
        assert!(validator.validate_price("1,5").is_err());
    }

    #[test]
    fn uri_blocks_script_injection() {
        let validator = InputValidator::default();
        assert!(validator.validate_uri("https://meta.example/token/1.json").is_ok());
        assert!(validator.validate_uri("javascript:alert(1)").is_err());
        assert!(validator.validate_uri("").is_err());
    }
}
