//! Parsing and validation of `pie.toml` cache configuration files.
//!
//! The configuration file is optional. When it is absent every setting falls
//! back to the defaults baked into [`CacheConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
