//! TOML loading for the component configurations.
//!
//! ```rust
//! use libjbus::application::MonitorConfig;
//! use libjbus::config::parse_config;
//!
//! let config: MonitorConfig = parse_config("timeout_ms = 250").unwrap();
//! assert_eq!(config.timeout_ms, 250);
//! assert!(!config.strict);
//! ```

use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::types::Config;

/// Parses and validates a configuration from TOML text. Missing keys take
/// their defaults.
pub fn parse_config<T: DeserializeOwned + Config>(text: &str) -> Result<T> {
    let config: T = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates a TOML configuration file
pub fn load_config<T: DeserializeOwned + Config>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!("loading configuration from {}", path.display());
    parse_config(&text)
}
