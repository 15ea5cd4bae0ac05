/// Tools for the indexer configuration layer - settings management, assembly and logging setup
pub mod assemble;
pub mod config;
pub mod logging;

pub use assemble::assemble;
pub use config::{ConfigManager, ConfigValidator, IndexerSettings};
