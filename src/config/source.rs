//! Configuration sources and the source resolution strategy.
//!
//! A run's parameters come from exactly one origin: an argument list, the
//! process environment, or a configuration file. [`ConfigSource::resolve`]
//! picks that origin in a fixed priority order; a value lookup never falls
//! through from one source to another, so precedence stays unambiguous.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::property::ConfigProperty;
use super::ConfigError;

/// File names probed, in order, when neither arguments nor environment
/// variables provide the configuration.
pub const DEFAULT_FILE_NAMES: [&str; 2] = ["browser-grid.toml", "browser-grid.json"];

/// The resolved origin of a run's configuration.
///
/// Exactly one variant is chosen per process invocation; see
/// [`ConfigSource::resolve`] for the priority order.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Backed by a `-key value` argument list.
    Arguments(ArgumentsSource),
    /// Backed by `BROWSER_GRID_*` process environment variables.
    Environment(EnvironmentSource),
    /// Backed by a TOML or JSON configuration file.
    File(FileSource),
}

impl ConfigSource {
    /// Picks the configuration source for this invocation.
    ///
    /// Priority, first match wins:
    /// 1. a non-empty argument list;
    /// 2. the environment, if *any* recognized property's variable is set
    ///    (presence only; whether the eventual role's required values are
    ///    all present is deferred to the validity check);
    /// 3. the first default configuration file that exists.
    ///
    /// With none of the three available this fails with
    /// [`ConfigError::NoSource`]; startup cannot proceed on a
    /// partially-populated record.
    pub fn resolve(args: &[String]) -> Result<ConfigSource, ConfigError> {
        if !args.is_empty() {
            debug!(count = args.len(), "configuring from arguments");
            return Ok(ConfigSource::Arguments(ArgumentsSource::new(args.to_vec())));
        }
        for property in ConfigProperty::ALL {
            if env::var_os(property.env_var()).is_some() {
                debug!(variable = property.env_var(), "configuring from environment");
                return Ok(ConfigSource::Environment(EnvironmentSource::new()));
            }
        }
        for name in DEFAULT_FILE_NAMES {
            if Path::new(name).exists() {
                debug!(file = name, "configuring from file");
                return Ok(ConfigSource::File(FileSource::open(name)?));
            }
        }
        Err(ConfigError::NoSource)
    }

    /// The configured textual value for the given wire key, or `None` when
    /// this source has no value for it.
    pub fn value_of(&self, key: &str) -> Option<String> {
        match self {
            ConfigSource::Arguments(source) => source.value_of(key),
            ConfigSource::Environment(source) => source.value_of(key),
            ConfigSource::File(source) => source.value_of(key),
        }
    }
}

/// A source backed by a flat `-key value` argument list, the same shape
/// [`Configuration::as_arguments`](super::Configuration::as_arguments)
/// produces for spawned grid subprocesses.
#[derive(Debug, Clone)]
pub struct ArgumentsSource {
    args: Vec<String>,
}

impl ArgumentsSource {
    /// Wraps an argument list. The list is not validated here; unknown
    /// flags are simply never looked up.
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    fn value_of(&self, key: &str) -> Option<String> {
        let flag = format!("-{}", key);
        let position = self.args.iter().position(|arg| *arg == flag)?;
        self.args.get(position + 1).cloned()
    }
}

/// A source backed by the process environment.
///
/// Each property reads its own `BROWSER_GRID_*` variable; see
/// [`ConfigProperty::env_var`].
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource;

impl EnvironmentSource {
    pub fn new() -> Self {
        Self
    }

    fn value_of(&self, key: &str) -> Option<String> {
        let property = ConfigProperty::ALL
            .iter()
            .find(|property| property.key() == key)?;
        env::var(property.env_var()).ok()
    }
}

/// A source backed by a TOML or JSON configuration file.
///
/// The format is dispatched on the file extension. Values are coerced to
/// their textual form at load time: strings pass through, integers and
/// booleans render with `to_string`, and arrays of strings join with
/// commas. Anything else is skipped with a warning.
#[derive(Debug, Clone)]
pub struct FileSource {
    values: BTreeMap<String, String>,
}

impl FileSource {
    /// Loads and parses the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let values = match extension.as_str() {
            "toml" => coerce_toml(toml::from_str(&content)?),
            "json" => coerce_json(serde_json::from_str(&content)?),
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };
        Ok(Self { values })
    }

    fn value_of(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn coerce_toml(value: toml::Value) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let toml::Value::Table(table) = value else {
        warn!("configuration file root is not a table; ignoring contents");
        return values;
    };
    for (key, entry) in table {
        match entry {
            toml::Value::String(s) => {
                values.insert(key, s);
            }
            toml::Value::Integer(n) => {
                values.insert(key, n.to_string());
            }
            toml::Value::Boolean(b) => {
                values.insert(key, b.to_string());
            }
            toml::Value::Array(entries) => {
                if let Some(joined) = join_string_array(
                    entries.iter().map(|e| e.as_str().map(str::to_string)),
                ) {
                    values.insert(key, joined);
                } else {
                    warn!(key = %key, "skipping non-string array in configuration file");
                }
            }
            _ => warn!(key = %key, "skipping unsupported value in configuration file"),
        }
    }
    values
}

fn coerce_json(value: serde_json::Value) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let serde_json::Value::Object(object) = value else {
        warn!("configuration file root is not an object; ignoring contents");
        return values;
    };
    for (key, entry) in object {
        match entry {
            serde_json::Value::String(s) => {
                values.insert(key, s);
            }
            serde_json::Value::Number(n) => {
                values.insert(key, n.to_string());
            }
            serde_json::Value::Bool(b) => {
                values.insert(key, b.to_string());
            }
            serde_json::Value::Array(entries) => {
                if let Some(joined) = join_string_array(
                    entries.iter().map(|e| e.as_str().map(str::to_string)),
                ) {
                    values.insert(key, joined);
                } else {
                    warn!(key = %key, "skipping non-string array in configuration file");
                }
            }
            _ => warn!(key = %key, "skipping unsupported value in configuration file"),
        }
    }
    values
}

/// Joins an array of optional strings with commas; `None` if any entry is
/// not a string.
fn join_string_array(entries: impl Iterator<Item = Option<String>>) -> Option<String> {
    let collected: Option<Vec<String>> = entries.collect();
    collected.map(|strings| strings.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests below mutate process-global environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_recognized_env() {
        for property in ConfigProperty::ALL {
            env::remove_var(property.env_var());
        }
    }

    #[test]
    fn test_arguments_lookup() {
        let source = ArgumentsSource::new(vec![
            "-port".to_string(),
            "8080".to_string(),
            "-description".to_string(),
            "nightly".to_string(),
        ]);
        assert_eq!(source.value_of("port"), Some("8080".to_string()));
        assert_eq!(source.value_of("description"), Some("nightly".to_string()));
        assert_eq!(source.value_of("timeoutSeconds"), None);
    }

    #[test]
    fn test_arguments_flag_without_value() {
        let source = ArgumentsSource::new(vec!["-port".to_string()]);
        assert_eq!(source.value_of("port"), None);
    }

    #[test]
    fn test_nonempty_arguments_always_win() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_recognized_env();
        env::set_var(ConfigProperty::Port.env_var(), "9999");

        let args = vec!["-port".to_string(), "8080".to_string()];
        let source = ConfigSource::resolve(&args).unwrap();
        assert!(matches!(source, ConfigSource::Arguments(_)));
        assert_eq!(source.value_of("port"), Some("8080".to_string()));

        clear_recognized_env();
    }

    #[test]
    fn test_any_recognized_env_var_selects_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_recognized_env();
        // Presence of any one recognized variable is enough, even if the
        // eventual role requires others.
        env::set_var(ConfigProperty::Description.env_var(), "from env");

        let source = ConfigSource::resolve(&[]).unwrap();
        assert!(matches!(source, ConfigSource::Environment(_)));
        assert_eq!(source.value_of("description"), Some("from env".to_string()));
        assert_eq!(source.value_of("port"), None);

        clear_recognized_env();
    }

    #[test]
    fn test_no_source_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_recognized_env();

        let err = ConfigSource::resolve(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::NoSource));
        assert!(err.to_string().contains("Could not configure"));
    }

    #[test]
    fn test_toml_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser-grid.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "port = 9001").unwrap();
        writeln!(file, "shouldLogStatus = false").unwrap();
        writeln!(file, "browserFileNames = [\"firefox\", \"chrome\"]").unwrap();
        writeln!(file, "description = \"from file\"").unwrap();

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.value_of("port"), Some("9001".to_string()));
        assert_eq!(source.value_of("shouldLogStatus"), Some("false".to_string()));
        assert_eq!(
            source.value_of("browserFileNames"),
            Some("firefox,chrome".to_string())
        );
        assert_eq!(source.value_of("description"), Some("from file".to_string()));
        assert_eq!(source.value_of("timeoutSeconds"), None);
    }

    #[test]
    fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser-grid.json");
        fs::write(
            &path,
            r#"{"port": 9002, "closeBrowsersAfterTestRuns": true, "remoteMachineURLs": ["http://runner1:8081/"]}"#,
        )
        .unwrap();

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.value_of("port"), Some("9002".to_string()));
        assert_eq!(
            source.value_of("closeBrowsersAfterTestRuns"),
            Some("true".to_string())
        );
        assert_eq!(
            source.value_of("remoteMachineURLs"),
            Some("http://runner1:8081/".to_string())
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser-grid.yaml");
        fs::write(&path, "port: 9000").unwrap();

        let err = FileSource::open(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileSource::open("does-not-exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
