pub mod chains;
pub mod config;
pub mod strategies;
pub mod tokens;
