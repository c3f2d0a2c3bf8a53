//! # Browser Grid
//!
//! Configuration core for a distributed browser-testing grid.
//!
//! A grid is a set of cooperating processes: standalone test servers that
//! drive local browsers, and farm servers that coordinate remote test
//! runners. Every one of them starts from the same kind of record, a
//! [`config::Configuration`], resolved from exactly one source and then
//! treated as read-only for the life of the process.
//!
//! ## Features
//!
//! - **Single-origin resolution**: CLI arguments, environment variables, or
//!   a TOML/JSON configuration file, in that priority order, never merged
//! - **Closed property set**: every recognized run parameter is one variant
//!   of [`config::ConfigProperty`], configured in a fixed enumeration order
//! - **Role-aware validation**: [`config::ServerType`] declares which
//!   properties each grid role requires
//! - **Status XML**: snapshots for the coordinating server's status pages,
//!   including a live OS/IP/hostname readout
//! - **Argument round-tripping**: a resolved record renders back into the
//!   flag list needed to spawn a subprocess with equivalent settings
//!
//! ## Quick Start
//!
//! ```rust
//! use browser_grid::config::{Configuration, ServerType};
//!
//! let args: Vec<String> = ["-port", "9001", "-browserFileNames", "firefox"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let config = Configuration::resolve(&args)?;
//! assert!(config.is_valid_for(ServerType::Server));
//!
//! // Hand the same settings to a spawned runner.
//! let respawn_args = config.as_arguments();
//! let clone = Configuration::resolve(&respawn_args)?;
//! assert_eq!(config, clone);
//! # Ok::<(), browser_grid::config::ConfigError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: the configuration record, sources, properties, and roles
//! - [`system`]: live OS/IP/hostname introspection for status XML
//! - [`xml`]: the small element tree status snapshots are built from

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Configuration record, sources, property descriptors, and server roles.
pub mod config;

/// Live system introspection rendered into status XML.
pub mod system;

/// Minimal XML element tree for status snapshots.
pub mod xml;

pub use config::{
    ArgumentsSource, ConfigError, ConfigProperty, ConfigSource, Configuration,
    ConfigurationBuilder, EnvironmentSource, FileSource, ServerType,
};
pub use xml::XmlElement;

/// Prelude module for convenient imports.
///
/// ```rust
/// use browser_grid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigError, ConfigProperty, ConfigSource, Configuration, ServerType};
    pub use crate::xml::XmlElement;
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
