pub mod config;
pub mod cycle;
pub mod mapper;
pub mod model;
pub mod store;

pub use config::{Config, ConfigError, SourceConfig};
pub use cycle::{CycleSummary, run_cycle};
pub use model::ArticleRecord;
pub use store::{Database, StoreError};
