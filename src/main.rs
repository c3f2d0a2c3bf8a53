//! Browser Grid - Main Entry Point
//!
//! Resolves the run configuration for a grid member, validates it for the
//! requested server role, and renders it in the requested form (a summary,
//! status XML, a respawn argument list, or JSON).

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use browser_grid::config::{Configuration, ServerType};
use browser_grid::{NAME, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("Browser Grid Team")
        .about("Configuration core for a distributed browser-testing grid")
        .long_about(
            "Resolves a grid member's run configuration from exactly one source:\n\
             - trailing '-key value' property arguments, if any are given\n\
             - otherwise BROWSER_GRID_* environment variables, if any are set\n\
             - otherwise browser-grid.toml or browser-grid.json in the working directory",
        )
        .arg(
            Arg::new("role")
                .short('r')
                .long("role")
                .value_name("ROLE")
                .help("Server role to validate and render for")
                .value_parser(["server", "farm"])
                .default_value("server"),
        )
        .arg(
            Arg::new("render")
                .long("render")
                .value_name("FORM")
                .help("Output form: summary, xml, args, or json")
                .value_parser(["summary", "xml", "args", "json"])
                .default_value("summary"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("params")
                .value_name("PROPERTY ARGS")
                .help("Property arguments, e.g. -port 9001 -browserFileNames firefox,chrome")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true),
        )
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Print a human-readable configuration summary
fn print_summary(config: &Configuration, role: ServerType) {
    println!(
        "{bold}{blue}Configuration ({role}):{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        role = role.name(),
        reset = colors::RESET
    );
    if let Some(description) = config.description() {
        println!(
            "  {dim}Description:{reset}      {}",
            description,
            dim = colors::DIM,
            reset = colors::RESET
        );
    }
    println!(
        "  {dim}Port:{reset}             {}",
        config.port(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Timeout:{reset}          {}s",
        config.timeout_seconds(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Browsers:{reset}         {}",
        if config.browser_file_names().is_empty() {
            "(none)".to_string()
        } else {
            config.browser_file_names().join(", ")
        },
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Remote machines:{reset}  {}",
        if config.remote_machine_urls().is_empty() {
            "(none)".to_string()
        } else {
            config
                .remote_machine_urls()
                .iter()
                .map(|url| url.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        },
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Resource base:{reset}    {}",
        config.resource_base().display(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Logs directory:{reset}   {}",
        config.logs_directory().display(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Close browsers:{reset}   {}",
        config.should_close_browsers_after_test_runs(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Log status:{reset}       {}",
        config.should_log_status(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    if let Some(url) = config.test_url() {
        println!(
            "  {dim}Test URL:{reset}         {}",
            url,
            dim = colors::DIM,
            reset = colors::RESET
        );
    }
    println!(
        "  {dim}Valid for {role}:{reset} {}",
        if config.is_valid_for(role) {
            format!("{green}yes{reset}", green = colors::GREEN, reset = colors::RESET)
        } else {
            format!("{yellow}no{reset}", yellow = colors::YELLOW, reset = colors::RESET)
        },
        role = role.name(),
        dim = colors::DIM,
        reset = colors::RESET
    );
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    init_tracing(verbosity, quiet);

    let role: ServerType = matches
        .get_one::<String>("role")
        .map(String::as_str)
        .unwrap_or("server")
        .parse()
        .context("Failed to parse server role")?;

    let params: Vec<String> = matches
        .get_many::<String>("params")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    debug!(role = role.name(), params = params.len(), "resolving configuration");

    let config = Configuration::resolve(&params).context("Failed to resolve configuration")?;

    let invalid = role.properties_invalid_for(&config);
    if !invalid.is_empty() {
        let missing: Vec<&str> = invalid.iter().map(|property| property.key()).collect();
        warn!(
            role = role.name(),
            missing = %missing.join(", "),
            "configuration is missing required properties for this role"
        );
    }

    match matches
        .get_one::<String>("render")
        .map(String::as_str)
        .unwrap_or("summary")
    {
        "xml" => println!("{}", config.as_xml(role)),
        "args" => println!("{}", config.as_arguments().join(" ")),
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
        ),
        _ => {
            if !quiet {
                print_summary(&config, role);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_role_parsing() {
        let matches = build_cli()
            .try_get_matches_from(["browser-grid", "--role", "farm"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("role").unwrap(), "farm");
    }

    #[test]
    fn test_cli_rejects_unknown_role() {
        let result = build_cli().try_get_matches_from(["browser-grid", "--role", "coordinator"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_trailing_property_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "browser-grid",
                "--render",
                "args",
                "-port",
                "9001",
                "-timeoutSeconds",
                "30",
            ])
            .unwrap();

        let params: Vec<&String> = matches.get_many::<String>("params").unwrap().collect();
        assert_eq!(params, ["-port", "9001", "-timeoutSeconds", "30"]);
        assert_eq!(matches.get_one::<String>("render").unwrap(), "args");
    }

    #[test]
    fn test_cli_verbose_quiet_conflict() {
        let result = build_cli().try_get_matches_from(["browser-grid", "-v", "-q"]);
        assert!(result.is_err());
    }
}
