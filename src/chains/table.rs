use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ChainConfig, Config};

use super::registry::ChainRegistry;

/// Hand-maintained network files compiled into the binary.
const BUILTIN_CHAINS: &[(&str, &str)] = &[
    ("ethereum.toml", include_str!("../../chains/ethereum.toml")),
    ("arbitrum.toml", include_str!("../../chains/arbitrum.toml")),
];

/// Every supported network keyed by chain id. Built once at startup and shared by `Arc`;
/// there is no way to modify it afterwards.
#[derive(Debug, Clone)]
pub struct ChainTable {
    by_id: BTreeMap<u64, Arc<ChainRegistry>>,
}

impl ChainTable {
    /// Parse and validate the builtin network files.
    pub fn builtin() -> eyre::Result<Self> {
        let chains = BUILTIN_CHAINS
            .iter()
            .map(|(file, content)| {
                toml::from_str::<ChainConfig>(content)
                    .map_err(|e| eyre::eyre!("Failed to parse builtin chain file '{}': {}", file, e))
            })
            .collect::<eyre::Result<Vec<_>>>()?;
        Self::from_config(&Config { chains })
    }

    /// Each chain is validated while its registry is built.
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        config.validate_chain_ids()?;

        let mut by_id = BTreeMap::new();
        for chain_config in &config.chains {
            let chain = ChainRegistry::from_config(chain_config)?;
            tracing::debug!(
                chain = %chain.name,
                chain_id = chain.id,
                registries = chain.registries.len(),
                extra_vaults = chain.extra_vaults.len(),
                "Loaded chain registry"
            );
            by_id.insert(chain.id, Arc::new(chain));
        }

        tracing::info!(chains = by_id.len(), "Chain table built");
        Ok(Self { by_id })
    }

    /// Look up a network. `None` means the id is not part of this table.
    pub fn get(&self, chain_id: u64) -> Option<Arc<ChainRegistry>> {
        self.by_id.get(&chain_id).cloned()
    }

    pub fn require(&self, chain_id: u64) -> eyre::Result<Arc<ChainRegistry>> {
        self.get(chain_id)
            .ok_or_else(|| eyre::eyre!("Unknown network id {}", chain_id))
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.by_id.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ChainRegistry>> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
