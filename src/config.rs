use serde::Deserialize;
use std::collections::HashSet;

use crate::tokens::types::{TokenType, DEFAULT_COIN_ADDRESS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub chains: Vec<ChainConfig>,
}

/// Hand-maintained description of one network. Addresses stay as strings here and are
/// parsed into typed values when the `ChainRegistry` is built.
#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_uri: String,
    pub subgraph_uri: String,
    pub explorer_uri: String,
    #[serde(default = "default_max_block_range")]
    pub max_block_range: u64,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u64,
    pub avg_blocks_per_day: u64,
    #[serde(default)]
    pub can_use_websocket: bool,
    #[serde(default)]
    pub blacklisted_vaults: Vec<String>,
    #[serde(default)]
    pub extra_tokens: Vec<String>,
    #[serde(default)]
    pub ignored_tokens: Vec<String>,
    pub lens: ContractConfig,
    pub multicall: ContractConfig,
    pub partner: Option<ContractConfig>,
    pub apr_oracle: Option<ContractConfig>,
    pub coin: TokenConfig,
    #[serde(default)]
    pub staking_reward_registries: Vec<ContractConfig>,
    #[serde(default)]
    pub registries: Vec<ContractConfig>,
    #[serde(default)]
    pub yearn_x_registries: Vec<ContractConfig>,
    #[serde(default)]
    pub extra_vaults: Vec<ExtraVaultConfig>,
    pub curve: Option<CurveConfig>,
    #[serde(default)]
    pub extra_uri: ExtraUriConfig,
}

fn default_max_block_range() -> u64 {
    100_000_000
}

fn default_max_batch_size() -> u64 {
    i64::MAX as u64
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContractConfig {
    pub address: String,
    pub block: u64,
    pub version: Option<u32>,
    pub tag: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    #[serde(default = "default_coin_address")]
    pub address: String,
    pub token_type: TokenType,
    pub name: String,
    pub symbol: String,
    pub display_name: Option<String>,
    pub display_symbol: Option<String>,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    pub decimals: u8,
    #[serde(default)]
    pub underlying_tokens: Vec<String>,
}

fn default_coin_address() -> String {
    DEFAULT_COIN_ADDRESS.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtraVaultConfig {
    pub address: String,
    pub registry_address: String,
    pub token_address: String,
    pub api_version: String,
    pub block: u64,
    #[serde(default = "default_vault_type")]
    pub token_type: TokenType,
    pub chain_id: Option<u64>,
}

fn default_vault_type() -> TokenType {
    TokenType::AutomatedVault
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurveConfig {
    pub registry_address: String,
    pub factory_address: Option<String>,
    #[serde(default)]
    pub pools_uris: Vec<String>,
    pub gauges_uri: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtraUriConfig {
    pub gamma_merkl_uri: Option<String>,
    #[serde(default)]
    pub gamma_hypervisor_uris: Vec<String>,
    pub pendle_core_uri: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        self.validate_chain_ids()?;
        for chain in &self.chains {
            chain.validate()?;
        }
        Ok(())
    }

    /// Table-level checks only: at least one chain and no repeated chain id.
    pub fn validate_chain_ids(&self) -> eyre::Result<()> {
        if self.chains.is_empty() {
            return Err(eyre::eyre!("At least one chain must be configured"));
        }
        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.chain_id) {
                return Err(eyre::eyre!(
                    "Duplicate chain id {} (chain '{}')",
                    chain.chain_id,
                    chain.name
                ));
            }
        }
        Ok(())
    }
}

impl ChainConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        let uris = [
            ("rpc_uri", self.rpc_uri.as_str()),
            ("subgraph_uri", self.subgraph_uri.as_str()),
            ("explorer_uri", self.explorer_uri.as_str()),
        ];
        for (field, uri) in uris {
            self.check_uri(field, uri)?;
        }

        let limits = [
            ("max_block_range", self.max_block_range),
            ("max_batch_size", self.max_batch_size),
            ("avg_blocks_per_day", self.avg_blocks_per_day),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(eyre::eyre!(
                    "Chain '{}' must have a positive {}",
                    self.name,
                    field
                ));
            }
        }

        self.check_address("lens", &self.lens.address)?;
        self.check_address("multicall", &self.multicall.address)?;
        if let Some(partner) = &self.partner {
            self.check_address("partner", &partner.address)?;
        }
        if let Some(oracle) = &self.apr_oracle {
            self.check_address("apr_oracle", &oracle.address)?;
        }
        self.check_address("coin", &self.coin.address)?;
        for underlying in &self.coin.underlying_tokens {
            self.check_address("coin.underlying_tokens", underlying)?;
        }

        let sets = [
            ("staking_reward_registries", &self.staking_reward_registries),
            ("registries", &self.registries),
            ("yearn_x_registries", &self.yearn_x_registries),
        ];
        for (field, contracts) in sets {
            for contract in contracts {
                self.check_address(field, &contract.address)?;
            }
        }

        for vault in &self.extra_vaults {
            self.check_address("extra_vaults.address", &vault.address)?;
            self.check_address("extra_vaults.registry_address", &vault.registry_address)?;
            self.check_address("extra_vaults.token_address", &vault.token_address)?;
            if let Some(chain_id) = vault.chain_id {
                if chain_id != self.chain_id {
                    return Err(eyre::eyre!(
                        "Extra vault {} on chain '{}' declares chain id {}, expected {}",
                        vault.address,
                        self.name,
                        chain_id,
                        self.chain_id
                    ));
                }
            }
        }

        let lists = [
            ("blacklisted_vaults", &self.blacklisted_vaults),
            ("extra_tokens", &self.extra_tokens),
            ("ignored_tokens", &self.ignored_tokens),
        ];
        for (field, addresses) in lists {
            for address in addresses {
                self.check_address(field, address)?;
            }
        }

        if let Some(curve) = &self.curve {
            self.check_address("curve.registry_address", &curve.registry_address)?;
            if let Some(factory) = &curve.factory_address {
                self.check_address("curve.factory_address", factory)?;
            }
            self.check_uri("curve.gauges_uri", &curve.gauges_uri)?;
            for uri in &curve.pools_uris {
                self.check_uri("curve.pools_uris", uri)?;
            }
        }

        if let Some(uri) = &self.extra_uri.gamma_merkl_uri {
            self.check_uri("extra_uri.gamma_merkl_uri", uri)?;
        }
        for uri in &self.extra_uri.gamma_hypervisor_uris {
            self.check_uri("extra_uri.gamma_hypervisor_uris", uri)?;
        }
        if let Some(uri) = &self.extra_uri.pendle_core_uri {
            self.check_uri("extra_uri.pendle_core_uri", uri)?;
        }

        Ok(())
    }

    fn check_uri(&self, field: &str, uri: &str) -> eyre::Result<()> {
        if uri.trim().is_empty() {
            return Err(eyre::eyre!(
                "Chain '{}' has an empty {}",
                self.name,
                field
            ));
        }
        Ok(())
    }

    fn check_address(&self, field: &str, address: &str) -> eyre::Result<()> {
        if !address.starts_with("0x") || address.len() != 42 {
            return Err(eyre::eyre!(
                "Invalid address '{}' for {} on chain '{}'",
                address,
                field,
                self.name
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CHAIN: &str = r#"
name = "testnet"
chain_id = 31337
rpc_uri = "http://localhost:8545"
subgraph_uri = "http://localhost:8000/subgraphs/name/vaults"
explorer_uri = "http://localhost:4000/api"
max_block_range = 1000
avg_blocks_per_day = 7200
blacklisted_vaults = ["0x5796698A29F3626c9FE13C4d3d3dEE987c84EBB3"]
extra_tokens = ["0x82e3A8F066a6989666b031d916c43672085b1582"]
ignored_tokens = ["0x976a1C749cd8153909e0B04EebE931eF8957b15b"]

[lens]
address = "0x043518AB266485dC085a1DB095B8d9C2Fc78E9b9"
block = 100

[multicall]
address = "0x842eC2c7D803033Edf55E478F461FC547Bc54EB2"
block = 50

[coin]
token_type = "Native"
name = "Ether"
symbol = "ETH"
decimals = 18

[[registries]]
address = "0x3199437193625DCcD6F9C9e98BDf93582200Eb1f"
block = 4841854
version = 2
tag = "DISABLED"
label = "YEARN"

[[registries]]
address = "0xff31A1B020c868F6eA3f61Eb953344920EeCA3af"
block = 171850013
version = 4
label = "YEARN"

[[extra_vaults]]
address = "0x074943fEfE3391D033A15557dfa1b6f246Ce5fD0"
registry_address = "0xff31A1B020c868F6eA3f61Eb953344920EeCA3af"
token_address = "0xE11f9786B06438456b044B3E21712228ADcAA0D1"
api_version = "3.0.2"
block = 195564702
"#;

    pub(crate) fn sample_chain() -> ChainConfig {
        toml::from_str(SAMPLE_CHAIN).unwrap()
    }

    #[test]
    fn test_parse_chain_config() {
        let chain = sample_chain();
        assert_eq!(chain.chain_id, 31337);
        assert_eq!(chain.max_block_range, 1000);
        assert_eq!(chain.max_batch_size, i64::MAX as u64); // default
        assert!(!chain.can_use_websocket); // default
        assert_eq!(chain.registries.len(), 2);
        assert_eq!(chain.registries[0].tag.as_deref(), Some("DISABLED"));
        assert_eq!(chain.extra_vaults[0].token_type, TokenType::AutomatedVault);
        assert!(chain.partner.is_none());
        assert_eq!(chain.coin.address, DEFAULT_COIN_ADDRESS); // default
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn test_parse_config_with_chains_array() {
        let nested = SAMPLE_CHAIN
            .replace("\n[[", "\n\u{0}")
            .replace("\n[", "\n[chains.")
            .replace("\n\u{0}", "\n[[chains.");
        let toml_str = format!("[[chains]]\n{}", nested);
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.chains.len(), 1);
        assert_eq!(config.chains[0].registries.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_chains() {
        let config = Config { chains: vec![] };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_chain_id() {
        let config = Config {
            chains: vec![sample_chain(), sample_chain()],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_address() {
        let mut chain = sample_chain();
        chain.registries[1].address = "not-an-address".to_string();
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_validate_empty_uri() {
        let mut chain = sample_chain();
        chain.subgraph_uri = "  ".to_string();
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_validate_empty_extra_uri() {
        let mut chain = sample_chain();
        chain.extra_uri.pendle_core_uri = Some("https://api-v2.pendle.finance/core/v1/1".to_string());
        assert!(chain.validate().is_ok());

        chain.extra_uri.pendle_core_uri = Some(String::new());
        assert!(chain.validate().is_err());

        let mut chain = sample_chain();
        chain.extra_uri.gamma_merkl_uri = Some(" ".to_string());
        assert!(chain.validate().is_err());

        let mut chain = sample_chain();
        chain.extra_uri.gamma_hypervisor_uris = vec![String::new()];
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_validate_curve() {
        let curve = CurveConfig {
            registry_address: "0x0000000022d53366457f9d5e68ec105046fc4383".to_string(),
            factory_address: None,
            pools_uris: vec!["https://api.curve.finance/api/getPools/all/ethereum".to_string()],
            gauges_uri: "https://api.curve.finance/api/getAllGauges".to_string(),
        };

        let mut chain = sample_chain();
        chain.curve = Some(curve.clone());
        assert!(chain.validate().is_ok());

        let mut empty_gauges = curve.clone();
        empty_gauges.gauges_uri = String::new();
        chain.curve = Some(empty_gauges);
        assert!(chain.validate().is_err());

        let mut empty_pool = curve.clone();
        empty_pool.pools_uris.push(String::new());
        chain.curve = Some(empty_pool);
        assert!(chain.validate().is_err());

        let mut bad_factory = curve;
        bad_factory.factory_address = Some("0x1234".to_string());
        chain.curve = Some(bad_factory);
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limit() {
        let mut chain = sample_chain();
        chain.avg_blocks_per_day = 0;
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_validate_extra_vault_chain_mismatch() {
        let mut chain = sample_chain();
        chain.extra_vaults[0].chain_id = Some(1);
        assert!(chain.validate().is_err());
    }
}
