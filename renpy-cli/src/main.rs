//! Command-line interface for Ren'Py scripts
//! This binary runs the front end over a single script and prints what it found.
//!
//! Usage:
//!   renpy tokens `<path>` [--all] [--json]            - List the tokens of a script
//!   renpy ast `<path>` [--line-numbers] [--json]      - Print the syntax tree
//!   renpy check `<path>` [--no-unresolved] [--json]   - Report diagnostics, exit 1 on errors
//!   renpy symbols `<path>` [--builtins] [--json]      - List symbols and their uses
//!
//! Every command takes `--config <file>`. Without it, `renpy.toml` in the working directory
//! is layered over the defaults when present. `RUST_LOG` controls tracing output on stderr.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use commands::{CliError, Outcome};
use renpy_config::{Loader, RenpyConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Picked up from the working directory when no `--config` is given.
const LOCAL_CONFIG: &str = "renpy.toml";

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the .rpy script")
        .required(true)
        .index(1)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of text")
        .action(ArgAction::SetTrue)
}

fn cli() -> Command {
    Command::new("renpy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting Ren'Py scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("tokens")
                .about("List the tokens of a script")
                .arg(path_arg())
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Include whitespace and comments")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the syntax tree of a script")
                .arg(path_arg())
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .help("Prefix every node with its line number")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report lexical, syntax and symbol diagnostics")
                .arg(path_arg())
                .arg(
                    Arg::new("no-unresolved")
                        .long("no-unresolved")
                        .help("Do not report jumps, calls and names that resolve to nothing")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("symbols")
                .about("List the symbols a script defines and where they are used")
                .arg(path_arg())
                .arg(
                    Arg::new("builtins")
                        .long("builtins")
                        .help("Include builtin names")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the config file, then flags of the running command.
fn load_config(matches: &ArgMatches) -> Result<RenpyConfig, CliError> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if flag(matches, "line-numbers") {
        loader = loader.set_override("inspect.show_line_numbers", true)?;
    }
    if flag(matches, "no-unresolved") {
        loader = loader.set_override("analysis.report_unresolved", false)?;
    }
    Ok(loader.build()?)
}

/// True if the command defines `id` and it was passed.
fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.try_get_one::<bool>(id).ok().flatten().copied().unwrap_or(false)
}

fn run(matches: &ArgMatches) -> Result<Outcome, CliError> {
    let Some((name, sub)) = matches.subcommand() else {
        return Err(CliError::UnknownCommand(String::new()));
    };
    let path = sub
        .get_one::<String>("path")
        .map(PathBuf::from)
        .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
    let config = load_config(sub)?;
    let json = flag(sub, "json");

    match name {
        "tokens" => commands::tokens(&path, flag(sub, "all"), json),
        "ast" => commands::ast(&path, &config, json),
        "check" => commands::check(&path, &config, json),
        "symbols" => commands::symbols(&path, &config, flag(sub, "builtins"), json),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Problems) => ExitCode::from(1),
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(2)
        }
    }
}
