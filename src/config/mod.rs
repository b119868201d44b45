//! Configuration loading and validation
//!
//! Configuration is a TOML file with three sections: `[crawler]` tuning the
//! engine, `[source]` describing the target hierarchy and seed parameters,
//! and `[output]` naming the record dump and reconciliation report paths.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, OutputConfig, SourceConfig};
pub use validation::validate;
