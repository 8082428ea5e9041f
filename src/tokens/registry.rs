use alloy::primitives::Address;
use std::collections::HashSet;
use std::str::FromStr;

use crate::chains::registry::ChainRegistry;
use crate::config::TokenConfig;

use super::types::{icon_url, TokenRecord};

/// Build a typed token record from its config entry. Display fields fall back to the
/// on-chain name and symbol, and the icon falls back to the asset CDN location.
pub fn build_token_record(chain_id: u64, config: &TokenConfig) -> eyre::Result<TokenRecord> {
    let address = Address::from_str(&config.address)
        .map_err(|e| eyre::eyre!("Invalid token address '{}': {}", config.address, e))?;

    let underlying_tokens = config
        .underlying_tokens
        .iter()
        .map(|a| {
            Address::from_str(a)
                .map_err(|e| eyre::eyre!("Invalid underlying token address '{}': {}", a, e))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(TokenRecord {
        address,
        chain_id,
        token_type: config.token_type,
        name: config.name.clone(),
        symbol: config.symbol.clone(),
        display_name: config
            .display_name
            .clone()
            .unwrap_or_else(|| config.name.clone()),
        display_symbol: config
            .display_symbol
            .clone()
            .unwrap_or_else(|| config.symbol.clone()),
        description: config.description.clone(),
        icon: config
            .icon
            .clone()
            .unwrap_or_else(|| icon_url(chain_id, &address)),
        decimals: config.decimals,
        underlying_tokens,
    })
}

/// Lookup of the manually curated token lists for one chain.
/// Used by discovery to decide whether a token should be tracked.
#[derive(Debug, Clone, Default)]
pub struct TokenOverrides {
    extra: HashSet<Address>,
    ignored: HashSet<Address>,
}

impl TokenOverrides {
    pub fn from_chain(chain: &ChainRegistry) -> Self {
        let overrides = Self {
            extra: chain.extra_tokens.iter().copied().collect(),
            ignored: chain.ignored_tokens.iter().copied().collect(),
        };
        tracing::debug!(
            chain = %chain.name,
            extra = overrides.extra.len(),
            ignored = overrides.ignored.len(),
            "Built token overrides"
        );
        overrides
    }

    /// Ignored tokens are never tracked, even when also listed as extra.
    pub fn should_track(&self, address: &Address, discovered: bool) -> bool {
        if self.ignored.contains(address) {
            return false;
        }
        discovered || self.extra.contains(address)
    }

    pub fn is_ignored(&self, address: &Address) -> bool {
        self.ignored.contains(address)
    }

    /// Extra tokens that are not also ignored.
    pub fn extra_tokens(&self) -> impl Iterator<Item = &Address> {
        self.extra.iter().filter(|a| !self.ignored.contains(*a))
    }
}
