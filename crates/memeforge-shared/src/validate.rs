//! Deploy request validation.
//!
//! The raw JSON body deserializes into [`DeployRequest`]; [`ValidatedDeploy::parse`]
//! checks every rule before anything touches the record store, so a rejected
//! request never leaves a partial record behind.  Validation is fail-fast: the
//! first violated rule is reported.
//!
//! The validated value is a separate type from the storage record on purpose —
//! wire-level concerns stay out of the store layer.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Maximum token name length in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum token symbol length in characters.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Deploy request body as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub creator_address: String,
}

/// A single violated validation rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Token name is required")]
    NameRequired,

    #[error("Token name too long")]
    NameTooLong,

    #[error("Token symbol is required")]
    SymbolRequired,

    #[error("Symbol too long")]
    SymbolTooLong,

    #[error("Symbol must be uppercase letters and numbers only")]
    SymbolCharset,

    #[error("Valid image URL is required")]
    InvalidImageUrl,

    #[error("Valid Ethereum address required")]
    InvalidCreatorAddress,
}

/// A deploy request that passed every rule.
///
/// Construct via [`ValidatedDeploy::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDeploy {
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub creator_address: String,
}

impl ValidatedDeploy {
    /// Validate a raw request, consuming it.
    ///
    /// Rules, checked in order:
    /// - `name`: 1–50 characters
    /// - `symbol`: 1–10 characters, ASCII uppercase letters and digits only
    ///   (the store never normalizes case — callers must submit uppercase)
    /// - `image_url`: must parse as an absolute URL
    /// - `creator_address`: `0x` followed by exactly 40 hex digits
    pub fn parse(req: DeployRequest) -> Result<Self, ValidationError> {
        if req.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if req.name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong);
        }

        if req.symbol.is_empty() {
            return Err(ValidationError::SymbolRequired);
        }
        if req.symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong);
        }
        if !req
            .symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(ValidationError::SymbolCharset);
        }

        if Url::parse(&req.image_url).is_err() {
            return Err(ValidationError::InvalidImageUrl);
        }

        if !is_eth_address(&req.creator_address) {
            return Err(ValidationError::InvalidCreatorAddress);
        }

        Ok(Self {
            name: req.name,
            symbol: req.symbol,
            image_url: req.image_url,
            creator_address: req.creator_address,
        })
    }
}

/// `0x` followed by exactly 40 hex digits, either case.
pub fn is_eth_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(rest) => rest.len() == 40 && rest.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> DeployRequest {
        DeployRequest {
            name: "Boss Coin".to_string(),
            symbol: "BOSS".to_string(),
            image_url: "https://ipfs.io/ipfs/abc".to_string(),
            creator_address: "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let validated = ValidatedDeploy::parse(valid_request()).unwrap();
        assert_eq!(validated.name, "Boss Coin");
        assert_eq!(validated.symbol, "BOSS");
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let req: DeployRequest = serde_json::from_str(
            r#"{
                "name": "Boss Coin",
                "symbol": "BOSS",
                "imageUrl": "https://ipfs.io/ipfs/abc",
                "creatorAddress": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
            }"#,
        )
        .unwrap();
        assert_eq!(req.image_url, "https://ipfs.io/ipfs/abc");
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = DeployRequest {
            name: String::new(),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(req),
            Err(ValidationError::NameRequired)
        );
    }

    #[test]
    fn test_name_length_boundary() {
        let ok = DeployRequest {
            name: "x".repeat(50),
            ..valid_request()
        };
        assert!(ValidatedDeploy::parse(ok).is_ok());

        let too_long = DeployRequest {
            name: "x".repeat(51),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(too_long),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_symbol_with_punctuation_rejected() {
        let req = DeployRequest {
            symbol: "boss!".to_string(),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(req),
            Err(ValidationError::SymbolCharset)
        );
    }

    #[test]
    fn test_lowercase_symbol_rejected() {
        let req = DeployRequest {
            symbol: "boss".to_string(),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(req),
            Err(ValidationError::SymbolCharset)
        );
    }

    #[test]
    fn test_symbol_length_boundary() {
        let ok = DeployRequest {
            symbol: "A1B2C3D4E5".to_string(),
            ..valid_request()
        };
        assert!(ValidatedDeploy::parse(ok).is_ok());

        let too_long = DeployRequest {
            symbol: "A1B2C3D4E5F".to_string(),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(too_long),
            Err(ValidationError::SymbolTooLong)
        );
    }

    #[test]
    fn test_relative_image_url_rejected() {
        let req = DeployRequest {
            image_url: "ipfs/abc".to_string(),
            ..valid_request()
        };
        assert_eq!(
            ValidatedDeploy::parse(req),
            Err(ValidationError::InvalidImageUrl)
        );
    }

    #[test]
    fn test_bad_creator_address_rejected() {
        for bad in [
            "742d35Cc6634C0532925a3b844Bc454e4438f44e", // missing 0x
            "0x742d35Cc6634C0532925a3b844Bc454e4438f4",  // 39 hex chars
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44ea", // 41 hex chars
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44g", // non-hex digit
        ] {
            let req = DeployRequest {
                creator_address: bad.to_string(),
                ..valid_request()
            };
            assert_eq!(
                ValidatedDeploy::parse(req),
                Err(ValidationError::InvalidCreatorAddress),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_mixed_case_address_accepted() {
        assert!(is_eth_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
        assert!(is_eth_address(&format!("0x{}", "A".repeat(40))));
        assert!(is_eth_address(&format!("0x{}", "0".repeat(40))));
    }
}
