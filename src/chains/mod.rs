pub mod registry;
pub mod table;

pub use registry::{ChainRegistry, ContractData, RegistryLabel};
pub use table::ChainTable;
