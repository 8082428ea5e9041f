use alloy::primitives::Address;
use serde::Deserialize;

pub const BASE_ASSET_URL: &str = "https://assets.smold.app/api/token/";

/// Placeholder address used for a network's native gas coin.
pub const DEFAULT_COIN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Kind of asset a token record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TokenType {
    Native,
    Wrapped,
    Standard,
    #[serde(rename = "Yearn Vault")]
    YearnVault,
    #[serde(rename = "Automated Yearn Vault")]
    AutomatedVault,
    #[serde(rename = "Curve LP")]
    CurveLp,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::Wrapped => "Wrapped",
            Self::Standard => "Standard",
            Self::YearnVault => "Yearn Vault",
            Self::AutomatedVault => "Automated Yearn Vault",
            Self::CurveLp => "Curve LP",
        }
    }
}

/// Display and on-chain metadata for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub address: Address,
    pub chain_id: u64,
    pub token_type: TokenType,
    pub name: String,
    pub symbol: String,
    pub display_name: String,
    pub display_symbol: String,
    pub description: String,
    pub icon: String,
    pub decimals: u8,
    pub underlying_tokens: Vec<Address>,
}

/// Default logo location for a token on the asset CDN.
pub fn icon_url(chain_id: u64, address: &Address) -> String {
    format!(
        "{}{}/{}/logo-128.png",
        BASE_ASSET_URL,
        chain_id,
        address.to_checksum(None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_icon_url_uses_checksum_address() {
        let address = Address::from_str(DEFAULT_COIN_ADDRESS).unwrap();
        assert_eq!(
            icon_url(42161, &address),
            "https://assets.smold.app/api/token/42161/0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE/logo-128.png"
        );
    }

    #[test]
    fn test_token_type_names() {
        let parsed: TokenType = serde_json::from_str("\"Automated Yearn Vault\"").unwrap();
        assert_eq!(parsed, TokenType::AutomatedVault);
        assert_eq!(parsed.as_str(), "Automated Yearn Vault");
    }
}
