use tracing_subscriber::EnvFilter;

use vaultlens::chains::ChainTable;
use vaultlens::config::Config;
use vaultlens::strategies::{filter_strategies, normalize_all, RawStrategy};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=debug for per-chain output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);

    // Usage: vaultlens [chains.toml|-] [strategies.json] [condition]
    let table = match args.next().filter(|p| p != "-") {
        Some(path) => {
            let config = Config::load(&path)?;
            tracing::info!(chains = config.chains.len(), "Configuration loaded from {}", path);
            ChainTable::from_config(&config)?
        }
        None => ChainTable::builtin()?,
    };

    for chain in table.iter() {
        tracing::info!(
            chain = %chain.name,
            chain_id = chain.id,
            registries = chain.registries.len(),
            active_registries = chain.active_registries().count(),
            extra_vaults = chain.extra_vaults.len(),
            blacklisted_vaults = chain.blacklisted_vaults.len(),
            websocket = chain.can_use_websocket,
            "Chain ready"
        );
    }

    let Some(strategies_path) = args.next() else {
        return Ok(());
    };
    let condition = args.next().unwrap_or_else(|| "all".to_string());

    let content = std::fs::read_to_string(&strategies_path)
        .map_err(|e| eyre::eyre!("Failed to read strategies file '{}': {}", strategies_path, e))?;
    let raws: Vec<RawStrategy> = serde_json::from_str(&content)
        .map_err(|e| eyre::eyre!("Failed to parse strategies file '{}': {}", strategies_path, e))?;

    let strategies = normalize_all(&raws);
    let included = filter_strategies(&strategies, &condition);
    tracing::info!(
        total = strategies.len(),
        included = included.len(),
        condition = %condition,
        "Strategies normalized"
    );

    println!("{}", serde_json::to_string_pretty(&included)?);
    Ok(())
}
