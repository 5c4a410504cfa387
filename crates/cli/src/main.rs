//! winstatus: report the processes running on a Windows host
//!
//! Usage:
//!   winstatus procs            # PID-keyed JSON snapshot of every process
//!   winstatus procs --table    # Human-readable table
//!   winstatus call status.procs
//!   winstatus check            # Can the status module run on this host?
//!
//! The snapshot goes to stdout; diagnostics go to stderr.

use clap::{Parser, Subcommand};
use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;
use tracing::debug;
use winstatus_core::{render, Capabilities, CollectError, ProcessSnapshot};
use winstatus_platform_windows::{load_status_module, probe};

mod config;
mod logging;

use config::OutputFormat;
use logging::{LogFormat, LogLevel};

mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ERROR_GENERAL: i32 = 1;
    pub const ERROR_ENUMERATION: i32 = 3;
    pub const ERROR_INVALID_INPUT: i32 = 4;
    pub const ERROR_UNAVAILABLE: i32 = 5;
}

#[derive(Parser)]
#[command(name = "winstatus")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  winstatus procs                 Snapshot all processes as JSON
  winstatus procs --table         Show the snapshot as a table
  winstatus procs --compact       Single-line JSON for piping
  winstatus call status.procs     Call a module function by name
  winstatus check                 Report whether the module is usable")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Minimum level of diagnostics written to stderr
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Diagnostics format
    #[arg(long, global = true, value_enum, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Generate a sample config file at ~/.winstatus/config.toml
    #[arg(long)]
    init_config: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot every running process (default)
    Procs {
        /// Pretty-printed JSON
        #[arg(long, short = 'j', conflicts_with_all = ["compact", "table"])]
        json: bool,

        /// Single-line JSON
        #[arg(long, short = 'c', conflicts_with_all = ["json", "table"])]
        compact: bool,

        /// Human-readable table
        #[arg(long, short = 't', conflicts_with_all = ["json", "compact"])]
        table: bool,

        /// Enable SeDebugPrivilege before collecting
        #[arg(long)]
        debug_privilege: bool,
    },

    /// Call a status module function by name and print its JSON payload
    Call {
        /// Function name, e.g. `procs` or `status.procs`
        #[arg(value_name = "FUNCTION")]
        function: String,
    },

    /// Report whether the status module can run on this host
    Check,
}

/// Color configuration for output
struct Colors {
    success: Style,
    warning: Style,
    error: Style,
    info: Style,
}

impl Colors {
    fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                success: Style::new().green(),
                warning: Style::new().yellow(),
                error: Style::new().red().bold(),
                info: Style::new().cyan(),
            }
        } else {
            Self {
                success: Style::new(),
                warning: Style::new(),
                error: Style::new(),
                info: Style::new(),
            }
        }
    }
}

fn main() {
    let cfg = config::load_config();
    let cli = Cli::parse();

    // CLI flags override config
    let no_color = cli.no_color || cfg.output.no_color;
    let colors = Colors::new(!no_color && supports_color());

    logging::init_logging(
        cli.log_level.unwrap_or(cfg.logging.level),
        cli.log_format.unwrap_or(cfg.logging.format),
    );

    if cli.init_config {
        handle_init_config(&colors);
        return;
    }

    let capabilities = probe();

    let command = cli.command.unwrap_or(Command::Procs {
        json: false,
        compact: false,
        table: false,
        debug_privilege: false,
    });

    let result = match command {
        Command::Check => {
            handle_check(&capabilities, &colors);
            return;
        }
        Command::Procs {
            json,
            compact,
            table,
            debug_privilege,
        } => {
            let format = if json {
                OutputFormat::Json
            } else if compact {
                OutputFormat::Compact
            } else if table {
                OutputFormat::Table
            } else {
                cfg.output.format
            };
            if debug_privilege || cfg.collector.enable_debug_privilege {
                enable_debug_privilege();
            }
            handle_procs(&capabilities, format)
        }
        Command::Call { function } => handle_call(&capabilities, &function),
    };

    if let Err(e) = result {
        print_error(&colors, &e.to_string());
        std::process::exit(exit_code_for(&e));
    }
}

fn exit_code_for(err: &CollectError) -> i32 {
    match err {
        CollectError::Unavailable(_) => exit_codes::ERROR_UNAVAILABLE,
        CollectError::Enumeration { .. } => exit_codes::ERROR_ENUMERATION,
        CollectError::UnknownFunction(_) => exit_codes::ERROR_INVALID_INPUT,
        CollectError::Serialize(_) => exit_codes::ERROR_GENERAL,
    }
}

/// Handle `procs`
fn handle_procs(capabilities: &Capabilities, format: OutputFormat) -> Result<(), CollectError> {
    let module = load_status_module(capabilities)?;
    let snapshot = module.procs()?;
    println!("{}", format_snapshot(&snapshot, format)?);
    Ok(())
}

/// Handle `call <FUNCTION>`
fn handle_call(capabilities: &Capabilities, function: &str) -> Result<(), CollectError> {
    let module = load_status_module(capabilities)?;
    let payload = module.call(function)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn format_snapshot(snapshot: &ProcessSnapshot, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => render::render_json_string(snapshot),
        OutputFormat::Compact => render::render_json_compact(snapshot),
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            render::render_table(snapshot),
            render::render_summary(snapshot)
        )),
    }
}

/// Handle `check`
fn handle_check(capabilities: &Capabilities, colors: &Colors) {
    match capabilities.check() {
        Ok(()) => {
            println!(
                "{} module `{}` is available on {}",
                "available:".style(colors.success),
                winstatus_core::VIRTUAL_NAME,
                capabilities.os
            );
            std::process::exit(exit_codes::SUCCESS);
        }
        Err(reason) => {
            println!("{} {}", "unavailable:".style(colors.warning), reason);
            std::process::exit(exit_codes::ERROR_UNAVAILABLE);
        }
    }
}

#[cfg(windows)]
fn enable_debug_privilege() {
    match winstatus_platform_windows::try_enable_debug_privilege() {
        Ok(true) => debug!("SeDebugPrivilege enabled"),
        Ok(false) => {
            tracing::warn!("SeDebugPrivilege not held; run elevated to resolve more owners")
        }
        Err(e) => tracing::warn!(error = %e, "could not enable SeDebugPrivilege"),
    }
}

#[cfg(not(windows))]
fn enable_debug_privilege() {
    debug!("SeDebugPrivilege requested on a non-Windows host; ignoring");
}

/// Handle --init-config flag
fn handle_init_config(colors: &Colors) {
    use std::fs;

    let Some(config_path) = config::config_path() else {
        print_error(colors, "Could not determine home directory");
        std::process::exit(exit_codes::ERROR_GENERAL);
    };

    if let Some(parent) = config_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            print_error(colors, &format!("Failed to create config directory: {}", e));
            std::process::exit(exit_codes::ERROR_GENERAL);
        }
    }

    if config_path.exists() {
        eprintln!(
            "{} Config file already exists at: {}",
            "warning:".style(colors.warning),
            config_path.display()
        );
        eprintln!("Use a text editor to modify it, or delete it first to regenerate.");
        std::process::exit(exit_codes::SUCCESS);
    }

    match fs::write(&config_path, config::sample_config()) {
        Ok(()) => {
            eprintln!(
                "{} Created config file at: {}",
                "success:".style(colors.success),
                config_path.display()
            );
            eprintln!(
                "{} Edit this file to change the default output and log level.",
                "info:".style(colors.info)
            );
        }
        Err(e) => {
            print_error(colors, &format!("Failed to write config file: {}", e));
            std::process::exit(exit_codes::ERROR_GENERAL);
        }
    }
}

/// Print an error message
fn print_error(colors: &Colors, message: &str) {
    eprintln!("{} {}", "error:".style(colors.error), message);
}

/// Check if the terminal supports color
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use winstatus_core::{Owner, ProcessRecord, Unavailable};

    fn sample_snapshot() -> ProcessSnapshot {
        let mut snapshot = ProcessSnapshot::new();
        snapshot.insert(
            1234,
            ProcessRecord {
                command_line: "notepad.exe test.txt".to_string(),
                name: "notepad.exe".to_string(),
                owner: Some(Owner {
                    user: "alice".to_string(),
                    user_domain: "CORP".to_string(),
                }),
            },
        );
        snapshot
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_procs_is_optional_subcommand() {
        let cli = Cli::try_parse_from(["winstatus"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["winstatus", "procs", "--table"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Procs { table: true, .. })));
    }

    #[test]
    fn test_format_flags_conflict() {
        assert!(Cli::try_parse_from(["winstatus", "procs", "--json", "--table"]).is_err());
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::try_parse_from([
            "winstatus",
            "check",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_call_takes_function_name() {
        let cli = Cli::try_parse_from(["winstatus", "call", "status.procs"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Call { ref function }) if function == "status.procs"
        ));
    }

    #[test]
    fn test_format_snapshot_variants() {
        let snapshot = sample_snapshot();

        let pretty = format_snapshot(&snapshot, OutputFormat::Json).unwrap();
        assert!(pretty.contains("\"user_domain\": \"CORP\""));

        let compact = format_snapshot(&snapshot, OutputFormat::Compact).unwrap();
        assert!(!compact.contains('\n'));

        let table = format_snapshot(&snapshot, OutputFormat::Table).unwrap();
        assert!(table.contains("CORP\\alice"));
        assert!(table.ends_with("1 processes"));
    }

    #[test]
    fn test_exit_codes() {
        let unavailable = CollectError::Unavailable(Unavailable::UnsupportedOs {
            os: "linux".to_string(),
        });
        assert_eq!(exit_code_for(&unavailable), exit_codes::ERROR_UNAVAILABLE);
        assert_eq!(
            exit_code_for(&CollectError::UnknownFunction("x".to_string())),
            exit_codes::ERROR_INVALID_INPUT
        );
        assert_eq!(
            exit_code_for(&CollectError::Enumeration {
                api: "CreateToolhelp32Snapshot",
                message: String::new(),
            }),
            exit_codes::ERROR_ENUMERATION
        );
    }
}
