use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Derived lifecycle state of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyStatus {
    Active,
    NotActive,
    Unallocated,
}

impl StrategyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NotActive => "not_active",
            Self::Unallocated => "unallocated",
        }
    }
}

/// Strategy state as decoded by the fetcher, including its latest report.
/// Every field except `address` may be missing upstream and defaults to empty/zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStrategy {
    #[serde(deserialize_with = "deserialize_address")]
    pub address: Address,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_retired: bool,
    #[serde(default)]
    pub is_in_queue: bool,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_total_debt: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_total_loss: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_total_gain: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_performance_fee: U256,
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_report: U256,
    /// Only reported by vaults from 0.2.2 onwards.
    #[serde(default, deserialize_with = "deserialize_u256")]
    pub last_debt_ratio: U256,
    #[serde(default, rename = "netAPR")]
    pub net_apr: f64,
}

/// API-facing strategy record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalStrategy {
    pub address: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: String,
    #[serde(rename = "netAPR", skip_serializing_if = "is_zero_f64")]
    pub net_apr: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ExternalStrategyDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStrategyDetails {
    #[serde(serialize_with = "serialize_u256")]
    pub total_debt: U256,
    #[serde(serialize_with = "serialize_u256")]
    pub total_loss: U256,
    #[serde(serialize_with = "serialize_u256")]
    pub total_gain: U256,
    pub performance_fee: u64,
    pub last_report: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub debt_ratio: u64,
    /// Used for filtering only, never part of the public payload.
    #[serde(skip)]
    pub in_queue: bool,
}

impl ExternalStrategyDetails {
    pub fn last_report_at(&self) -> Option<DateTime<Utc>> {
        if self.last_report == 0 {
            return None;
        }
        i64::try_from(self.last_report)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

// ============================================================
// Serde helpers
// ============================================================

/// Big integers go out as decimal strings so JSON consumers never lose precision.
fn serialize_u256<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn deserialize_address<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Address::from_str(raw.trim())
        .map_err(|e| serde::de::Error::custom(format!("Invalid address '{}': {}", raw, e)))
}

/// Accepts decimal or `0x` strings and integers of any size. Anything unreadable (fractions,
/// negatives, other JSON types) becomes zero so that a partially decoded report still
/// yields a record.
fn deserialize_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let value = match Option::<JsonValue>::deserialize(deserializer)? {
        None => U256::ZERO,
        Some(JsonValue::Number(n)) => parse_u256(&n.to_string()),
        Some(JsonValue::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                U256::ZERO
            } else {
                parse_u256(text)
            }
        }
        Some(other) => {
            tracing::warn!(value = %other, "Unsupported integer representation, using zero");
            U256::ZERO
        }
    };
    Ok(value)
}

fn parse_u256(text: &str) -> U256 {
    U256::from_str(text).unwrap_or_else(|e| {
        tracing::warn!(value = %text, error = %e, "Unreadable integer field, using zero");
        U256::ZERO
    })
}
