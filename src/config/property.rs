//! The closed, ordered set of recognized configuration properties.
//!
//! Every run parameter the grid understands is listed here exactly once, in
//! a fixed declaration order. Each property knows its own wire key, its
//! environment variable name, how to parse its raw textual value, its
//! declared default, and how to render itself back out as text or XML.
//! The [`Configuration`](super::Configuration) record never interprets
//! property values itself; it only iterates [`ConfigProperty::ALL`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use super::record::{Configuration, ConfigurationBuilder};
use super::source::ConfigSource;
use super::ConfigError;
use crate::xml::XmlElement;

/// Default network port for grid members.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-run timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 60;

/// Default directory for run logs.
pub const DEFAULT_LOGS_DIRECTORY: &str = "logs";

/// Default root for served test resources.
pub const DEFAULT_RESOURCE_BASE: &str = ".";

/// One recognized configuration property.
///
/// The variant order is the canonical enumeration order: construction,
/// argument-list rendering, and environment detection all iterate
/// [`ConfigProperty::ALL`] in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigProperty {
    /// Ordered browser launcher paths, looked up by index at run time.
    BrowserFileNames,
    /// Whether launched browsers are closed once a test run finishes.
    CloseBrowsersAfterTestRuns,
    /// Optional display name for this configuration.
    Description,
    /// Whether unreachable remote machines are skipped instead of failing
    /// the run.
    IgnoreUnresponsiveRemoteMachines,
    /// Directory run logs are written to.
    LogsDirectory,
    /// Whether status is logged during runs.
    ShouldLogStatus,
    /// Network port this grid member listens on.
    Port,
    /// Ordered peer test-runner URLs, looked up by index at run time.
    RemoteMachineUrls,
    /// Root directory for served test resources.
    ResourceBase,
    /// Per-run timeout in seconds.
    TimeoutSeconds,
    /// URL of the page or suite under test.
    TestUrl,
}

impl ConfigProperty {
    /// All recognized properties, in canonical enumeration order.
    pub const ALL: [ConfigProperty; 11] = [
        ConfigProperty::BrowserFileNames,
        ConfigProperty::CloseBrowsersAfterTestRuns,
        ConfigProperty::Description,
        ConfigProperty::IgnoreUnresponsiveRemoteMachines,
        ConfigProperty::LogsDirectory,
        ConfigProperty::ShouldLogStatus,
        ConfigProperty::Port,
        ConfigProperty::RemoteMachineUrls,
        ConfigProperty::ResourceBase,
        ConfigProperty::TimeoutSeconds,
        ConfigProperty::TestUrl,
    ];

    /// The property's stable wire key, shared with other grid components
    /// through argument lists, config files, and status XML.
    pub fn key(self) -> &'static str {
        match self {
            ConfigProperty::BrowserFileNames => "browserFileNames",
            ConfigProperty::CloseBrowsersAfterTestRuns => "closeBrowsersAfterTestRuns",
            ConfigProperty::Description => "description",
            ConfigProperty::IgnoreUnresponsiveRemoteMachines => "ignoreUnresponsiveRemoteMachines",
            ConfigProperty::LogsDirectory => "logsDirectory",
            ConfigProperty::ShouldLogStatus => "shouldLogStatus",
            ConfigProperty::Port => "port",
            ConfigProperty::RemoteMachineUrls => "remoteMachineURLs",
            ConfigProperty::ResourceBase => "resourceBase",
            ConfigProperty::TimeoutSeconds => "timeoutSeconds",
            ConfigProperty::TestUrl => "testURL",
        }
    }

    /// The environment variable this property reads from.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigProperty::BrowserFileNames => "BROWSER_GRID_BROWSER_FILE_NAMES",
            ConfigProperty::CloseBrowsersAfterTestRuns => {
                "BROWSER_GRID_CLOSE_BROWSERS_AFTER_TEST_RUNS"
            }
            ConfigProperty::Description => "BROWSER_GRID_DESCRIPTION",
            ConfigProperty::IgnoreUnresponsiveRemoteMachines => {
                "BROWSER_GRID_IGNORE_UNRESPONSIVE_REMOTE_MACHINES"
            }
            ConfigProperty::LogsDirectory => "BROWSER_GRID_LOGS_DIRECTORY",
            ConfigProperty::ShouldLogStatus => "BROWSER_GRID_SHOULD_LOG_STATUS",
            ConfigProperty::Port => "BROWSER_GRID_PORT",
            ConfigProperty::RemoteMachineUrls => "BROWSER_GRID_REMOTE_MACHINE_URLS",
            ConfigProperty::ResourceBase => "BROWSER_GRID_RESOURCE_BASE",
            ConfigProperty::TimeoutSeconds => "BROWSER_GRID_TIMEOUT_SECONDS",
            ConfigProperty::TestUrl => "BROWSER_GRID_TEST_URL",
        }
    }

    /// Configures this property on the builder from the given source.
    ///
    /// An absent or empty raw value applies the property's declared default.
    /// A present value that fails to parse is a fatal
    /// [`ConfigError::InvalidValue`]; nothing is ever silently coerced.
    pub fn configure(
        self,
        builder: &mut ConfigurationBuilder,
        source: &ConfigSource,
    ) -> Result<(), ConfigError> {
        let raw = source.value_of(self.key()).filter(|v| !v.is_empty());
        match self {
            ConfigProperty::BrowserFileNames => {
                builder.browser_file_names(match raw {
                    Some(list) => split_list(&list).map(str::to_string).collect(),
                    None => Vec::new(),
                });
            }
            ConfigProperty::CloseBrowsersAfterTestRuns => {
                builder.close_browsers_after_test_runs(match raw {
                    Some(v) => parse_bool(self.key(), &v)?,
                    None => true,
                });
            }
            ConfigProperty::Description => {
                builder.description(raw);
            }
            ConfigProperty::IgnoreUnresponsiveRemoteMachines => {
                builder.ignore_unresponsive_remote_machines(match raw {
                    Some(v) => parse_bool(self.key(), &v)?,
                    None => false,
                });
            }
            ConfigProperty::LogsDirectory => {
                builder.logs_directory(PathBuf::from(
                    raw.unwrap_or_else(|| DEFAULT_LOGS_DIRECTORY.to_string()),
                ));
            }
            ConfigProperty::ShouldLogStatus => {
                builder.should_log_status(match raw {
                    Some(v) => parse_bool(self.key(), &v)?,
                    None => true,
                });
            }
            ConfigProperty::Port => {
                builder.port(match raw {
                    Some(v) => parse_number(self.key(), &v)?,
                    None => DEFAULT_PORT,
                });
            }
            ConfigProperty::RemoteMachineUrls => {
                let urls = match raw {
                    Some(list) => split_list(&list)
                        .map(|entry| parse_url(self.key(), entry))
                        .collect::<Result<Vec<Url>, ConfigError>>()?,
                    None => Vec::new(),
                };
                builder.remote_machine_urls(urls);
            }
            ConfigProperty::ResourceBase => {
                builder.resource_base(PathBuf::from(
                    raw.unwrap_or_else(|| DEFAULT_RESOURCE_BASE.to_string()),
                ));
            }
            ConfigProperty::TimeoutSeconds => {
                builder.timeout_seconds(match raw {
                    Some(v) => parse_number(self.key(), &v)?,
                    None => DEFAULT_TIMEOUT_SECONDS,
                });
            }
            ConfigProperty::TestUrl => {
                let url = match raw {
                    Some(v) => Some(parse_url(self.key(), &v)?),
                    None => None,
                };
                builder.test_url(url);
            }
        }
        Ok(())
    }

    /// Renders the property's current value as text.
    ///
    /// This is the argument-list form: lists are comma-joined, absent
    /// optionals render as the empty string, and every value parses back to
    /// an equal one through [`ConfigProperty::configure`].
    pub fn value_string(self, config: &Configuration) -> String {
        match self {
            ConfigProperty::BrowserFileNames => config.browser_file_names().join(","),
            ConfigProperty::CloseBrowsersAfterTestRuns => {
                config.should_close_browsers_after_test_runs().to_string()
            }
            ConfigProperty::Description => config.description().unwrap_or_default().to_string(),
            ConfigProperty::IgnoreUnresponsiveRemoteMachines => config
                .should_ignore_unresponsive_remote_machines()
                .to_string(),
            ConfigProperty::LogsDirectory => config.logs_directory().display().to_string(),
            ConfigProperty::ShouldLogStatus => config.should_log_status().to_string(),
            ConfigProperty::Port => config.port().to_string(),
            ConfigProperty::RemoteMachineUrls => config
                .remote_machine_urls()
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>()
                .join(","),
            ConfigProperty::ResourceBase => config.resource_base().display().to_string(),
            ConfigProperty::TimeoutSeconds => config.timeout_seconds().to_string(),
            ConfigProperty::TestUrl => config
                .test_url()
                .map(Url::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Renders the property as a status-XML child element.
    ///
    /// Scalar properties become a text element named by their wire key; the
    /// two list properties nest one child element per entry so index order
    /// survives in the document.
    pub fn to_xml(self, config: &Configuration) -> XmlElement {
        match self {
            ConfigProperty::BrowserFileNames => {
                let mut element = XmlElement::new(self.key());
                for name in config.browser_file_names() {
                    element.add_child(XmlElement::new("browserFileName").with_text(name));
                }
                element
            }
            ConfigProperty::RemoteMachineUrls => {
                let mut element = XmlElement::new(self.key());
                for url in config.remote_machine_urls() {
                    element.add_child(XmlElement::new("remoteMachineURL").with_text(url.as_str()));
                }
                element
            }
            _ => {
                let value = self.value_string(config);
                if value.is_empty() {
                    XmlElement::new(self.key())
                } else {
                    XmlElement::new(self.key()).with_text(value)
                }
            }
        }
    }

    /// Whether the record holds a non-absent value for this property.
    ///
    /// Properties with declared defaults are always set; only the list and
    /// optional properties can be absent.
    pub fn is_set_on(self, config: &Configuration) -> bool {
        match self {
            ConfigProperty::BrowserFileNames => !config.browser_file_names().is_empty(),
            ConfigProperty::RemoteMachineUrls => !config.remote_machine_urls().is_empty(),
            ConfigProperty::Description => config.description().is_some(),
            ConfigProperty::TestUrl => config.test_url().is_some(),
            _ => true,
        }
    }
}

impl fmt::Display for ConfigProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Splits a comma-separated list value, dropping empty entries.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

fn parse_bool(property: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            property,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_number<T>(property: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        property,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_url(property: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        property,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
