use alloy::primitives::U256;
use std::fmt;
use std::str::FromStr;

use super::types::ExternalStrategy;

/// Which strategies an API response should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InclusionCondition {
    /// Every strategy.
    All,
    /// Strategies currently holding debt.
    Absolute,
    /// Strategies in the vault's withdrawal queue.
    InQueue,
    /// Strategies with a positive debt ratio.
    DebtRatio,
}

impl InclusionCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Absolute => "absolute",
            Self::InQueue => "inQueue",
            Self::DebtRatio => "debtRatio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown inclusion condition '{}'", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for InclusionCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "absolute" => Ok(Self::Absolute),
            "inQueue" => Ok(Self::InQueue),
            "debtRatio" => Ok(Self::DebtRatio),
            other => Err(UnknownCondition(other.to_string())),
        }
    }
}

impl fmt::Display for InclusionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExternalStrategy {
    /// A record without details only passes `All`.
    pub fn should_be_included(&self, condition: InclusionCondition) -> bool {
        match condition {
            InclusionCondition::All => true,
            InclusionCondition::Absolute => self
                .details
                .as_ref()
                .map(|d| d.total_debt > U256::ZERO)
                .unwrap_or(false),
            InclusionCondition::InQueue => {
                self.details.as_ref().map(|d| d.in_queue).unwrap_or(false)
            }
            InclusionCondition::DebtRatio => self
                .details
                .as_ref()
                .map(|d| d.debt_ratio > 0)
                .unwrap_or(false),
        }
    }

    /// String entry point for query parameters. Unknown keywords exclude the record.
    pub fn should_be_included_raw(&self, condition: &str) -> bool {
        match condition.parse::<InclusionCondition>() {
            Ok(condition) => self.should_be_included(condition),
            Err(e) => {
                tracing::debug!(error = %e, "Excluding strategy");
                false
            }
        }
    }
}

/// Select the strategies matching `condition` without touching the input.
pub fn filter_strategies<'a, I>(strategies: I, condition: &str) -> Vec<&'a ExternalStrategy>
where
    I: IntoIterator<Item = &'a ExternalStrategy>,
{
    match condition.parse::<InclusionCondition>() {
        Ok(condition) => strategies
            .into_iter()
            .filter(|s| s.should_be_included(condition))
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "No strategies match");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::normalize::normalize;
    use crate::strategies::normalize::tests::raw_strategy;

    const CONDITIONS: [InclusionCondition; 4] = [
        InclusionCondition::All,
        InclusionCondition::Absolute,
        InclusionCondition::InQueue,
        InclusionCondition::DebtRatio,
    ];

    fn strategy(debt: u64, debt_ratio: u64, in_queue: bool) -> ExternalStrategy {
        let mut raw = raw_strategy();
        raw.last_total_debt = U256::from(debt);
        raw.last_debt_ratio = U256::from(debt_ratio);
        raw.is_in_queue = in_queue;
        normalize(&raw)
    }

    #[test]
    fn test_parse_keywords() {
        for condition in CONDITIONS {
            assert_eq!(condition.as_str().parse::<InclusionCondition>(), Ok(condition));
        }
        assert!("ALL".parse::<InclusionCondition>().is_err());
        assert!("inqueue".parse::<InclusionCondition>().is_err());
        assert!("".parse::<InclusionCondition>().is_err());
    }

    #[test]
    fn test_all_includes_everything() {
        let empty = strategy(0, 0, false);
        assert!(empty.should_be_included(InclusionCondition::All));
        assert!(empty.should_be_included_raw("all"));

        let mut no_details = empty.clone();
        no_details.details = None;
        assert!(no_details.should_be_included(InclusionCondition::All));
    }

    #[test]
    fn test_absolute() {
        assert!(!strategy(0, 5_000, true).should_be_included_raw("absolute"));
        assert!(strategy(1, 0, false).should_be_included_raw("absolute"));
    }

    #[test]
    fn test_in_queue() {
        assert!(strategy(0, 0, true).should_be_included_raw("inQueue"));
        assert!(!strategy(1_000, 5_000, false).should_be_included_raw("inQueue"));
    }

    #[test]
    fn test_debt_ratio() {
        assert!(!strategy(1_000, 0, true).should_be_included_raw("debtRatio"));
        assert!(strategy(0, 1, false).should_be_included_raw("debtRatio"));
    }

    #[test]
    fn test_unknown_keyword_excludes() {
        for debt in [0, 1] {
            for ratio in [0, 1] {
                for in_queue in [true, false] {
                    let s = strategy(debt, ratio, in_queue);
                    assert!(!s.should_be_included_raw("unknown-keyword"));
                    assert!(!s.should_be_included_raw("All"));
                }
            }
        }
    }

    #[test]
    fn test_missing_details_fail_closed() {
        let mut s = strategy(1_000, 5_000, true);
        s.details = None;
        assert!(!s.should_be_included(InclusionCondition::Absolute));
        assert!(!s.should_be_included(InclusionCondition::InQueue));
        assert!(!s.should_be_included(InclusionCondition::DebtRatio));
    }

    #[test]
    fn test_filter_strategies() {
        let strategies = vec![
            strategy(0, 0, false),
            strategy(1_000, 0, true),
            strategy(0, 2_500, true),
        ];

        assert_eq!(filter_strategies(&strategies, "all").len(), 3);
        assert_eq!(filter_strategies(&strategies, "absolute").len(), 1);
        assert_eq!(filter_strategies(&strategies, "inQueue").len(), 2);
        assert_eq!(filter_strategies(&strategies, "debtRatio").len(), 1);
        assert!(filter_strategies(&strategies, "bogus").is_empty());
        assert_eq!(strategies.len(), 3);
    }
}
