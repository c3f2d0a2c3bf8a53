//! Grid server roles and their property requirements.
//!
//! A resolved [`Configuration`](super::Configuration) is validated and
//! rendered against a role: a standalone test server drives local browsers,
//! a farm coordinates remote test runners. Which properties are required or
//! optional is declared here, per role, as fixed ordered tables; the record
//! itself never hardcodes role knowledge.

use std::fmt;
use std::str::FromStr;

use super::property::ConfigProperty;
use super::record::Configuration;
use super::ConfigError;

/// The role a configuration is being validated or rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    /// A standalone test server running browsers on the local machine.
    Server,
    /// A farm server coordinating a set of remote test runners.
    Farm,
}

impl ServerType {
    /// The role's wire name, used as the `type` attribute in status XML.
    pub fn name(self) -> &'static str {
        match self {
            ServerType::Server => "SERVER",
            ServerType::Farm => "FARM",
        }
    }

    /// Properties that must hold a value for this role, in declared order.
    pub fn required_properties(self) -> &'static [ConfigProperty] {
        match self {
            ServerType::Server => &[
                ConfigProperty::Port,
                ConfigProperty::ResourceBase,
                ConfigProperty::BrowserFileNames,
            ],
            ServerType::Farm => &[
                ConfigProperty::Port,
                ConfigProperty::RemoteMachineUrls,
            ],
        }
    }

    /// Properties this role understands but does not insist on, in
    /// declared order.
    pub fn optional_properties(self) -> &'static [ConfigProperty] {
        match self {
            ServerType::Server => &[
                ConfigProperty::CloseBrowsersAfterTestRuns,
                ConfigProperty::Description,
                ConfigProperty::LogsDirectory,
                ConfigProperty::ShouldLogStatus,
                ConfigProperty::TimeoutSeconds,
                ConfigProperty::TestUrl,
            ],
            ServerType::Farm => &[
                ConfigProperty::Description,
                ConfigProperty::IgnoreUnresponsiveRemoteMachines,
                ConfigProperty::LogsDirectory,
                ConfigProperty::ShouldLogStatus,
                ConfigProperty::TimeoutSeconds,
                ConfigProperty::TestUrl,
            ],
        }
    }

    /// The role's full property list: required first, then optional, both
    /// in declared order. Status XML renders properties in exactly this
    /// order.
    pub fn required_and_optional_properties(self) -> Vec<ConfigProperty> {
        let mut properties = self.required_properties().to_vec();
        properties.extend_from_slice(self.optional_properties());
        properties
    }

    /// The required properties for which `config` holds no value.
    ///
    /// An empty result means `config` is valid for this role.
    pub fn properties_invalid_for(self, config: &Configuration) -> Vec<ConfigProperty> {
        self.required_properties()
            .iter()
            .copied()
            .filter(|property| !property.is_set_on(config))
            .collect()
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServerType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" => Ok(ServerType::Server),
            "farm" => Ok(ServerType::Farm),
            _ => Err(ConfigError::InvalidValue {
                property: "serverType",
                value: s.to_string(),
                reason: "expected 'server' or 'farm'".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::ArgumentsSource;
    use crate::config::ConfigSource;

    fn config_from_args(args: &[&str]) -> Configuration {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Configuration::from_source(&ConfigSource::Arguments(ArgumentsSource::new(args))).unwrap()
    }

    #[test]
    fn test_role_names() {
        assert_eq!(ServerType::Server.name(), "SERVER");
        assert_eq!(ServerType::Farm.name(), "FARM");
        assert_eq!(ServerType::Farm.to_string(), "FARM");
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("server".parse::<ServerType>().unwrap(), ServerType::Server);
        assert_eq!("FARM".parse::<ServerType>().unwrap(), ServerType::Farm);
        assert!("coordinator".parse::<ServerType>().is_err());
    }

    #[test]
    fn test_required_then_optional_order() {
        let properties = ServerType::Server.required_and_optional_properties();
        let required = ServerType::Server.required_properties();
        assert_eq!(&properties[..required.len()], required);
        assert_eq!(
            &properties[required.len()..],
            ServerType::Server.optional_properties()
        );
    }

    #[test]
    fn test_farm_does_not_require_browsers() {
        assert!(!ServerType::Farm
            .required_properties()
            .contains(&ConfigProperty::BrowserFileNames));
        assert!(ServerType::Farm
            .required_properties()
            .contains(&ConfigProperty::RemoteMachineUrls));
    }

    #[test]
    fn test_invalid_properties_for_server_without_browsers() {
        let config = config_from_args(&["-port", "8080"]);
        let invalid = ServerType::Server.properties_invalid_for(&config);
        assert_eq!(invalid, [ConfigProperty::BrowserFileNames]);
        assert!(!config.is_valid_for(ServerType::Server));
    }

    #[test]
    fn test_server_valid_with_browsers() {
        let config = config_from_args(&["-browserFileNames", "firefox"]);
        assert!(ServerType::Server.properties_invalid_for(&config).is_empty());
        assert!(config.is_valid_for(ServerType::Server));
        // The same record is not a valid farm: it names no remote machines.
        assert!(!config.is_valid_for(ServerType::Farm));
    }

    #[test]
    fn test_farm_valid_with_remote_machines() {
        let config = config_from_args(&["-remoteMachineURLs", "http://runner1:8081/"]);
        assert!(config.is_valid_for(ServerType::Farm));
    }
}
