use alloy::primitives::U256;

use super::types::{ExternalStrategy, ExternalStrategyDetails, RawStrategy, StrategyStatus};

/// Resolve the public status of a strategy. Rules are checked in order and the first
/// match wins: a curated override, then the retired flag, then the reported debt.
pub fn resolve_status(raw: &RawStrategy) -> String {
    if let Some(status) = raw.status.as_deref().filter(|s| !s.is_empty()) {
        return status.to_string();
    }

    let derived = if raw.is_retired {
        StrategyStatus::NotActive
    } else if raw.last_total_debt.is_zero() {
        StrategyStatus::Unallocated
    } else {
        StrategyStatus::Active
    };
    derived.as_str().to_string()
}

/// Curated display name if set, on-chain name otherwise.
pub fn resolve_name(raw: &RawStrategy) -> String {
    raw.display_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&raw.name)
        .to_string()
}

/// Convert a fetched strategy into its API representation. Never fails.
pub fn normalize(raw: &RawStrategy) -> ExternalStrategy {
    ExternalStrategy {
        address: raw.address.to_checksum(None),
        name: resolve_name(raw),
        description: raw.description.clone().unwrap_or_default(),
        status: resolve_status(raw),
        net_apr: raw.net_apr,
        details: Some(ExternalStrategyDetails {
            total_debt: raw.last_total_debt,
            total_loss: raw.last_total_loss,
            total_gain: raw.last_total_gain,
            performance_fee: narrow(raw.last_performance_fee),
            last_report: narrow(raw.last_report),
            debt_ratio: narrow(raw.last_debt_ratio),
            in_queue: raw.is_in_queue,
        }),
    }
}

pub fn normalize_all<'a, I>(raws: I) -> Vec<ExternalStrategy>
where
    I: IntoIterator<Item = &'a RawStrategy>,
{
    raws.into_iter().map(normalize).collect()
}

// Upstream guarantees these fit in 64 bits.
fn narrow(value: U256) -> u64 {
    value.saturating_to::<u64>()
}
