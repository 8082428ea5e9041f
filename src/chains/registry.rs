use alloy::primitives::Address;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::config::{ChainConfig, ContractConfig, CurveConfig, ExtraVaultConfig};
use crate::tokens::registry::build_token_record;
use crate::tokens::types::{TokenRecord, TokenType};

/// Family of a vault registry, used by the indexer to pick the right ABI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryLabel {
    Yearn,
    PublicErc4626,
    PoolTogether,
    Juiced,
    Gimme,
    Other(String),
}

impl RegistryLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Yearn => "YEARN",
            Self::PublicErc4626 => "PUBLIC_ERC4626",
            Self::PoolTogether => "POOL_TOGETHER",
            Self::Juiced => "JUICED",
            Self::Gimme => "GIMME",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for RegistryLabel {
    fn from(label: &str) -> Self {
        match label {
            "YEARN" => Self::Yearn,
            "PUBLIC_ERC4626" => Self::PublicErc4626,
            "POOL_TOGETHER" => Self::PoolTogether,
            "JUICED" => Self::Juiced,
            "GIMME" => Self::Gimme,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A contract together with the first block at which it is authoritative.
/// Scans for this contract must not look earlier than `block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractData {
    pub address: Address,
    pub block: u64,
    pub version: Option<u32>,
    pub tag: Option<String>,
    pub label: Option<RegistryLabel>,
}

impl ContractData {
    fn from_config(config: &ContractConfig) -> eyre::Result<Self> {
        Ok(Self {
            address: parse_address(&config.address)?,
            block: config.block,
            version: config.version,
            tag: config.tag.clone(),
            label: config.label.as_deref().map(RegistryLabel::from),
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
    }

    pub fn is_disabled(&self) -> bool {
        self.has_tag("DISABLED")
    }

    pub fn is_stealth(&self) -> bool {
        self.has_tag("STEALTH")
    }
}

/// A vault that cannot be discovered through registry events and is listed by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraVault {
    pub chain_id: u64,
    pub address: Address,
    pub registry_address: Address,
    pub token_address: Address,
    pub api_version: String,
    pub block: u64,
    pub token_type: TokenType,
}

impl ExtraVault {
    fn from_config(chain_id: u64, config: &ExtraVaultConfig) -> eyre::Result<Self> {
        Ok(Self {
            chain_id: config.chain_id.unwrap_or(chain_id),
            address: parse_address(&config.address)?,
            registry_address: parse_address(&config.registry_address)?,
            token_address: parse_address(&config.token_address)?,
            api_version: config.api_version.clone(),
            block: config.block,
            token_type: config.token_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveIntegration {
    pub registry_address: Address,
    pub factory_address: Option<Address>,
    pub pools_uris: Vec<String>,
    pub gauges_uri: String,
}

impl CurveIntegration {
    fn from_config(config: &CurveConfig) -> eyre::Result<Self> {
        Ok(Self {
            registry_address: parse_address(&config.registry_address)?,
            factory_address: config
                .factory_address
                .as_deref()
                .map(parse_address)
                .transpose()?,
            pools_uris: config.pools_uris.clone(),
            gauges_uri: config.gauges_uri.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraUri {
    pub gamma_merkl_uri: Option<String>,
    pub gamma_hypervisor_uris: Vec<String>,
    pub pendle_core_uri: Option<String>,
}

/// Immutable deployment description of one network.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    pub id: u64,
    pub name: String,
    pub rpc_uri: String,
    pub subgraph_uri: String,
    pub explorer_uri: String,
    pub max_block_range: u64,
    pub max_batch_size: u64,
    pub avg_blocks_per_day: u64,
    pub can_use_websocket: bool,
    pub lens: ContractData,
    pub multicall: ContractData,
    pub partner: Option<ContractData>,
    pub apr_oracle: Option<ContractData>,
    pub staking_reward_registries: Vec<ContractData>,
    pub registries: Vec<ContractData>,
    pub yearn_x_registries: Vec<ContractData>,
    pub coin: TokenRecord,
    pub extra_vaults: Vec<ExtraVault>,
    pub blacklisted_vaults: Vec<Address>,
    pub extra_tokens: Vec<Address>,
    pub ignored_tokens: Vec<Address>,
    pub curve: Option<CurveIntegration>,
    pub extra_uri: ExtraUri,
}

impl ChainRegistry {
    /// Validate a chain config and parse every address in it.
    pub fn from_config(config: &ChainConfig) -> eyre::Result<Self> {
        config.validate()?;

        let contracts = |list: &[ContractConfig]| -> eyre::Result<Vec<ContractData>> {
            list.iter().map(ContractData::from_config).collect()
        };
        let addresses = |list: &[String]| -> eyre::Result<Vec<Address>> {
            list.iter().map(|a| parse_address(a)).collect()
        };

        let registry = Self {
            id: config.chain_id,
            name: config.name.clone(),
            rpc_uri: config.rpc_uri.clone(),
            subgraph_uri: config.subgraph_uri.clone(),
            explorer_uri: config.explorer_uri.clone(),
            max_block_range: config.max_block_range,
            max_batch_size: config.max_batch_size,
            avg_blocks_per_day: config.avg_blocks_per_day,
            can_use_websocket: config.can_use_websocket,
            lens: ContractData::from_config(&config.lens)?,
            multicall: ContractData::from_config(&config.multicall)?,
            partner: config
                .partner
                .as_ref()
                .map(ContractData::from_config)
                .transpose()?,
            apr_oracle: config
                .apr_oracle
                .as_ref()
                .map(ContractData::from_config)
                .transpose()?,
            staking_reward_registries: contracts(&config.staking_reward_registries)?,
            registries: contracts(&config.registries)?,
            yearn_x_registries: contracts(&config.yearn_x_registries)?,
            coin: build_token_record(config.chain_id, &config.coin)?,
            extra_vaults: config
                .extra_vaults
                .iter()
                .map(|v| ExtraVault::from_config(config.chain_id, v))
                .collect::<eyre::Result<_>>()?,
            blacklisted_vaults: addresses(&config.blacklisted_vaults)?,
            extra_tokens: addresses(&config.extra_tokens)?,
            ignored_tokens: addresses(&config.ignored_tokens)?,
            curve: config
                .curve
                .as_ref()
                .map(CurveIntegration::from_config)
                .transpose()?,
            extra_uri: ExtraUri {
                gamma_merkl_uri: config.extra_uri.gamma_merkl_uri.clone(),
                gamma_hypervisor_uris: config.extra_uri.gamma_hypervisor_uris.clone(),
                pendle_core_uri: config.extra_uri.pendle_core_uri.clone(),
            },
        };

        for disabled in registry.registries.iter().filter(|r| r.is_disabled()) {
            tracing::debug!(
                chain = %registry.name,
                registry = %disabled.address,
                "Registry is disabled, kept for historical queries"
            );
        }

        Ok(registry)
    }

    /// Vault registries that should be actively scanned. Disabled entries are still
    /// present in `registries`; this only filters the view.
    pub fn active_registries(&self) -> impl Iterator<Item = &ContractData> {
        self.registries.iter().filter(|r| !r.is_disabled())
    }

    pub fn is_blacklisted_vault(&self, address: &Address) -> bool {
        self.blacklisted_vaults.contains(address)
    }

    pub fn extra_vault(&self, address: &Address) -> Option<&ExtraVault> {
        self.extra_vaults.iter().find(|v| &v.address == address)
    }

    /// Approximate number of blocks produced over `days`.
    pub fn blocks_for_days(&self, days: u64) -> u64 {
        self.avg_blocks_per_day.saturating_mul(days)
    }

    /// First block a scan of `contract` may start from, given a requested start.
    pub fn scan_start(&self, contract: &ContractData, requested: u64) -> u64 {
        requested.max(contract.block)
    }

    /// Split the inclusive window `[from, to]` into chunks no wider than `max_block_range`.
    pub fn block_ranges(&self, from: u64, to: u64) -> Vec<RangeInclusive<u64>> {
        let step = self.max_block_range.max(1);
        let mut ranges = Vec::new();
        if from > to {
            return ranges;
        }

        let mut start = from;
        loop {
            let end = start.saturating_add(step - 1).min(to);
            ranges.push(start..=end);
            if end == to {
                break;
            }
            start = end + 1;
        }
        ranges
    }
}

fn parse_address(address: &str) -> eyre::Result<Address> {
    Address::from_str(address).map_err(|e| eyre::eyre!("Invalid address '{}': {}", address, e))
}
