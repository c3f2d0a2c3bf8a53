//! Error types for configuration resolution and construction.

use thiserror::Error;

/// Errors that can occur while resolving a configuration source or
/// constructing a [`Configuration`](crate::config::Configuration) from it.
///
/// All of these are fatal to startup: there is no partial-configuration
/// fallback mode and no retry anywhere in the resolution path.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration file has an extension we do not understand.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),

    /// No configuration source could be resolved: no arguments were given,
    /// no recognized environment variable is set, and no configuration file
    /// was found.
    #[error(
        "Could not configure browser-grid: no arguments given, no BROWSER_GRID_* \
         environment variables set, and no browser-grid.toml or browser-grid.json found"
    )]
    NoSource,

    /// A source supplied a value that the property could not parse.
    #[error("Invalid value {value:?} for property '{property}': {reason}")]
    InvalidValue {
        /// Wire key of the property that rejected the value.
        property: &'static str,
        /// The raw textual value as supplied by the source.
        value: String,
        /// What the parser objected to.
        reason: String,
    },
}
