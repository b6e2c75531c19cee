//! Layered settings.
//!
//! Values are resolved in increasing order of precedence: built-in
//! defaults, an optional config file, then `GGG_*` environment variables.
//! Command-line flags are applied on top by the binary.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default gmond/gmetad XML endpoint.
pub const DEFAULT_GANGLIA_ADDR: &str = "localhost:8649";

/// Default carbon plaintext endpoint.
pub const DEFAULT_CARBON_ADDR: &str = "localhost:2003";

/// Default key prefix, including its trailing separator.
pub const DEFAULT_PREFIX: &str = "ggg.";

/// Prefix of the environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "GGG";

/// Resolved endpoint and naming settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub ganglia_addr: String,
    pub carbon_addr: String,
    pub prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ganglia_addr: DEFAULT_GANGLIA_ADDR.to_string(),
            carbon_addr: DEFAULT_CARBON_ADDR.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, `config_path` (if any) and the process
    /// environment.
    ///
    /// The file format follows the extension (`.toml`, `.yaml`, `.json`,
    /// ...). A path that is given but missing is an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(config_path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("ganglia_addr", DEFAULT_GANGLIA_ADDR)?
            .set_default("carbon_addr", DEFAULT_CARBON_ADDR)?
            .set_default("prefix", DEFAULT_PREFIX)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.add_source(env).build()?.try_deserialize()
    }
}
