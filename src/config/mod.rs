//! Run configuration for grid members.
//!
//! Everything a grid member needs to know about a run (browser launchers,
//! remote machines, port, timeout, logging switches, resource paths) is
//! resolved from exactly one source into an immutable [`Configuration`]:
//!
//! ```rust
//! use browser_grid::config::{Configuration, ServerType};
//!
//! let args: Vec<String> = ["-browserFileNames", "firefox,chrome", "-port", "9001"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let config = Configuration::resolve(&args).unwrap();
//! assert!(config.is_valid_for(ServerType::Server));
//! ```

mod error;
pub mod property;
mod record;
mod server_type;
pub mod source;

pub use error::ConfigError;
pub use property::ConfigProperty;
pub use record::{Configuration, ConfigurationBuilder};
pub use server_type::ServerType;
pub use source::{ArgumentsSource, ConfigSource, EnvironmentSource, FileSource};
