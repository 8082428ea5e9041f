pub mod filter;
pub mod normalize;
pub mod types;

pub use filter::{filter_strategies, InclusionCondition};
pub use normalize::{normalize, normalize_all};
pub use types::{ExternalStrategy, ExternalStrategyDetails, RawStrategy, StrategyStatus};
