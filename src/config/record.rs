//! The resolved configuration record and its construction pass.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use url::Url;

use super::property::ConfigProperty;
use super::server_type::ServerType;
use super::source::ConfigSource;
use super::ConfigError;
use crate::system;
use crate::xml::XmlElement;

/// A fully-resolved set of run parameters for one grid member.
///
/// Built exactly once per process invocation by
/// [`Configuration::resolve`], then read-only: every field is populated by
/// a single pass over [`ConfigProperty::ALL`] before the record becomes
/// visible, and nothing mutates it afterwards, so shared references may be
/// read concurrently without synchronization.
///
/// # Example
///
/// ```rust
/// use browser_grid::config::Configuration;
///
/// let args: Vec<String> = ["-port", "8080", "-timeoutSeconds", "30"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let config = Configuration::resolve(&args).unwrap();
/// assert_eq!(config.port(), 8080);
/// assert_eq!(config.timeout_seconds(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    browser_file_names: Vec<String>,
    close_browsers_after_test_runs: bool,
    description: Option<String>,
    ignore_unresponsive_remote_machines: bool,
    logs_directory: PathBuf,
    should_log_status: bool,
    port: u16,
    #[serde(rename = "remoteMachineURLs")]
    remote_machine_urls: Vec<Url>,
    resource_base: PathBuf,
    timeout_seconds: u32,
    #[serde(rename = "testURL")]
    test_url: Option<Url>,
}

impl Configuration {
    /// Resolves a source for the given arguments and constructs the record
    /// from it. The usual entry point at process startup.
    pub fn resolve(args: &[String]) -> Result<Self, ConfigError> {
        Self::from_source(&ConfigSource::resolve(args)?)
    }

    /// Constructs the record from an already-chosen source.
    ///
    /// Every recognized property gets exactly one configuration attempt, in
    /// [`ConfigProperty::ALL`] order. Any property failure aborts
    /// construction and propagates unchanged; there is no partially-built
    /// record to observe.
    pub fn from_source(source: &ConfigSource) -> Result<Self, ConfigError> {
        let mut builder = ConfigurationBuilder::default();
        for property in ConfigProperty::ALL {
            property.configure(&mut builder, source)?;
        }
        let config = builder.build();
        debug!(%config, "configuration resolved");
        Ok(config)
    }

    /// Ordered browser launcher paths.
    pub fn browser_file_names(&self) -> &[String] {
        &self.browser_file_names
    }

    /// The launcher at index `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. An out-of-range browser id is a
    /// caller bug and must fail loudly rather than yield a default.
    pub fn browser_file_name_by_id(&self, id: usize) -> &str {
        &self.browser_file_names[id]
    }

    /// Whether launched browsers are closed after each test run.
    pub fn should_close_browsers_after_test_runs(&self) -> bool {
        self.close_browsers_after_test_runs
    }

    /// The configuration's display name, if one was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether unresponsive remote machines are skipped instead of failing
    /// the run.
    pub fn should_ignore_unresponsive_remote_machines(&self) -> bool {
        self.ignore_unresponsive_remote_machines
    }

    /// Directory run logs are written to.
    pub fn logs_directory(&self) -> &Path {
        &self.logs_directory
    }

    /// Whether status is logged during runs.
    pub fn should_log_status(&self) -> bool {
        self.should_log_status
    }

    /// Network port this grid member listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Ordered peer test-runner URLs.
    pub fn remote_machine_urls(&self) -> &[Url] {
        &self.remote_machine_urls
    }

    /// The remote machine at index `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range, like
    /// [`browser_file_name_by_id`](Self::browser_file_name_by_id).
    pub fn remote_machine_url_by_id(&self, id: usize) -> &Url {
        &self.remote_machine_urls[id]
    }

    /// Root directory for served test resources.
    pub fn resource_base(&self) -> &Path {
        &self.resource_base
    }

    /// Per-run timeout in seconds.
    pub fn timeout_seconds(&self) -> u32 {
        self.timeout_seconds
    }

    /// URL of the page or suite under test, if configured.
    pub fn test_url(&self) -> Option<&Url> {
        self.test_url.as_ref()
    }

    /// Whether this record satisfies every property `server_type` requires.
    ///
    /// Delegates entirely to the role's property table; "no violations
    /// reported" is the definition of valid.
    pub fn is_valid_for(&self, server_type: ServerType) -> bool {
        server_type.properties_invalid_for(self).is_empty()
    }

    /// Renders the record as a status-XML element tree for the given role.
    ///
    /// The root `configuration` element carries the role name as its `type`
    /// attribute, then three system elements (`os`, `ipAddress`,
    /// `hostname`) read live from the host at call time, then one element
    /// per property in the role's required-then-optional declared order.
    pub fn as_xml(&self, server_type: ServerType) -> XmlElement {
        let mut root = XmlElement::new("configuration");
        root.add_attribute("type", server_type.name());
        root.add_child(XmlElement::new("os").with_text(system::os_string()));
        root.add_child(XmlElement::new("ipAddress").with_text(system::ip_address()));
        root.add_child(XmlElement::new("hostname").with_text(system::host_name()));
        for property in server_type.required_and_optional_properties() {
            root.add_child(property.to_xml(self));
        }
        root
    }

    /// Renders the record as a flat `-key value` argument list covering the
    /// full property enumeration, independent of any role.
    ///
    /// Feeding the result back through [`Configuration::resolve`] in a
    /// spawned subprocess reproduces an equivalent record for every
    /// property whose textual form is lossless.
    pub fn as_arguments(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(ConfigProperty::ALL.len() * 2);
        for property in ConfigProperty::ALL {
            args.push(format!("-{}", property.key()));
            args.push(property.value_string(self));
        }
        args
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => f.write_str(description),
            None => write!(f, "browser-grid configuration on port {}", self.port),
        }
    }
}

/// Construction-time mutable counterpart of [`Configuration`].
///
/// Setters exist for the property configuration pass; once
/// [`build`](ConfigurationBuilder::build) runs, the resulting record
/// exposes no mutation at all.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    browser_file_names: Vec<String>,
    close_browsers_after_test_runs: bool,
    description: Option<String>,
    ignore_unresponsive_remote_machines: bool,
    logs_directory: PathBuf,
    should_log_status: bool,
    port: u16,
    remote_machine_urls: Vec<Url>,
    resource_base: PathBuf,
    timeout_seconds: u32,
    test_url: Option<Url>,
}

impl ConfigurationBuilder {
    pub fn browser_file_names(&mut self, names: Vec<String>) -> &mut Self {
        self.browser_file_names = names;
        self
    }

    pub fn close_browsers_after_test_runs(&mut self, close: bool) -> &mut Self {
        self.close_browsers_after_test_runs = close;
        self
    }

    pub fn description(&mut self, description: Option<String>) -> &mut Self {
        self.description = description;
        self
    }

    pub fn ignore_unresponsive_remote_machines(&mut self, ignore: bool) -> &mut Self {
        self.ignore_unresponsive_remote_machines = ignore;
        self
    }

    pub fn logs_directory(&mut self, directory: PathBuf) -> &mut Self {
        self.logs_directory = directory;
        self
    }

    pub fn should_log_status(&mut self, log_status: bool) -> &mut Self {
        self.should_log_status = log_status;
        self
    }

    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn remote_machine_urls(&mut self, urls: Vec<Url>) -> &mut Self {
        self.remote_machine_urls = urls;
        self
    }

    pub fn resource_base(&mut self, base: PathBuf) -> &mut Self {
        self.resource_base = base;
        self
    }

    pub fn timeout_seconds(&mut self, seconds: u32) -> &mut Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn test_url(&mut self, url: Option<Url>) -> &mut Self {
        self.test_url = url;
        self
    }

    /// Finalizes the record. Intended to run only after every property in
    /// [`ConfigProperty::ALL`] has configured its field.
    pub fn build(self) -> Configuration {
        Configuration {
            browser_file_names: self.browser_file_names,
            close_browsers_after_test_runs: self.close_browsers_after_test_runs,
            description: self.description,
            ignore_unresponsive_remote_machines: self.ignore_unresponsive_remote_machines,
            logs_directory: self.logs_directory,
            should_log_status: self.should_log_status,
            port: self.port,
            remote_machine_urls: self.remote_machine_urls,
            resource_base: self.resource_base,
            timeout_seconds: self.timeout_seconds,
            test_url: self.test_url,
        }
    }
}
